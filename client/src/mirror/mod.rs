pub mod mirror_core;
pub mod mirror_listener;
pub mod mirror_state;
pub mod ordered_mirror;
