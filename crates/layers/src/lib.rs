pub mod labels;
pub mod layer;
pub mod markers;
pub mod raster;
pub mod resolver;
pub mod style;
pub mod symbology;

pub use layer::*;
pub use resolver::*;
pub use style::*;
pub use symbology::*;
