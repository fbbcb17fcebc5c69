pub mod ball;
pub mod bodies;
pub mod layout;
#[cfg(feature = "physics")]
pub mod physics;
pub mod registry;
pub mod table;
pub mod time;
