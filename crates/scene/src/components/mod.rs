pub mod properties;
pub mod vector_geometry;

pub use properties::*;
pub use vector_geometry::*;
