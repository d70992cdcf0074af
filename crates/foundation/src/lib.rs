pub mod bounds;
pub mod codec;
pub mod coord;
pub mod coordinate_set;
pub mod ids;
pub mod math;
pub mod projection;

// Foundation crate: coordinate primitives and their wire encoding only.
pub use bounds::*;
pub use codec::*;
pub use coord::*;
pub use coordinate_set::*;
pub use ids::*;
pub use projection::*;
