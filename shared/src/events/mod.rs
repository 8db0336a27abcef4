pub mod change_event;
pub mod child_event;
