pub mod bridge;
pub mod config;
pub mod convert;
pub mod error;
pub mod introspect;
pub mod memory;
pub mod native;
pub mod protocol;
pub mod renderer;
pub mod style_callback;

pub use bridge::*;
pub use config::*;
pub use convert::*;
pub use error::*;
pub use introspect::*;
pub use memory::*;
pub use native::*;
pub use protocol::*;
pub use renderer::*;
pub use style_callback::*;
