pub mod listener_set;
pub mod ordered_collection;
