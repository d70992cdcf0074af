pub mod components;
pub mod error;
pub mod feature;
pub mod keys;
pub mod shape;

pub use components::*;
pub use error::*;
pub use feature::*;
pub use shape::*;
