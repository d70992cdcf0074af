pub mod event_bus;
pub mod pending;

pub use event_bus::*;
pub use pending::*;
