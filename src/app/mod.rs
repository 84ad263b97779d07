pub mod remote;
pub mod screen;
pub mod state;

pub use screen::{AppCoordinator, Screen};
