//! Known property-bag keys shared with the renderer.

pub const TYPE: &str = "type";
pub const POPUP: &str = "popup";
pub const TITLE: &str = "title";
pub const LABEL: &str = "label";
pub const CONTENT: &str = "content";
pub const STYLE: &str = "style";
pub const RADIUS: &str = "radius";

// Marker-specific keys.
pub const GLYPH: &str = "glyph";
pub const SRC: &str = "src";
pub const SIZE: &str = "size";
pub const ANCHOR: &str = "anchor";
pub const ROTATION: &str = "rotation";
pub const TEXT_OFFSET_X: &str = "textOffsetX";
pub const TEXT_OFFSET_Y: &str = "textOffsetY";
pub const PADDING: &str = "padding";
