use scene::Shape;
use serde::{Deserialize, Serialize};

pub const FALLBACK_FILL_COLOR: &str = "rgba(255,255,255,0.4)";
pub const FALLBACK_STROKE_COLOR: &str = "#3399CC";
pub const FALLBACK_STROKE_WIDTH: f64 = 1.25;
pub const FALLBACK_TEXT_COLOR: &str = "#000000";
pub const FALLBACK_TEXT_SCALE: f64 = 1.0;
pub const FALLBACK_FONT: &str = "14px sans-serif";
pub const FALLBACK_POINT_RADIUS: f64 = 5.0;
pub const FALLBACK_PIN_COLOR: &str = "red";

/// Caller-supplied style defaults, consulted after the shape's own fields and
/// before the hard-coded fallbacks.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    pub fill_color: Option<String>,
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub text_color: Option<String>,
    pub text_scale: Option<f64>,
    pub font: Option<String>,
    /// World units.
    pub point_radius: Option<f64>,
    pub pin_color: Option<String>,
}

/// Resolved style values of one shape: shape field, then defaults, then fallback.
#[derive(Debug, Clone, Copy)]
pub struct ShapeStyle<'a> {
    shape: &'a Shape,
    defaults: &'a StyleDefaults,
}

impl<'a> ShapeStyle<'a> {
    pub fn new(shape: &'a Shape, defaults: &'a StyleDefaults) -> Self {
        Self { shape, defaults }
    }

    pub fn fill_color(&self) -> &'a str {
        self.shape
            .background_color
            .as_deref()
            .or(self.defaults.fill_color.as_deref())
            .unwrap_or(FALLBACK_FILL_COLOR)
    }

    pub fn stroke_color(&self) -> &'a str {
        self.shape
            .border_color
            .as_deref()
            .or(self.defaults.stroke_color.as_deref())
            .unwrap_or(FALLBACK_STROKE_COLOR)
    }

    pub fn stroke_width(&self) -> f64 {
        self.shape
            .border_size
            .or(self.defaults.stroke_width)
            .unwrap_or(FALLBACK_STROKE_WIDTH)
    }

    pub fn text_color(&self) -> &'a str {
        self.shape
            .color
            .as_deref()
            .or(self.defaults.text_color.as_deref())
            .unwrap_or(FALLBACK_TEXT_COLOR)
    }

    pub fn text_scale(&self) -> f64 {
        self.shape
            .text_scale
            .or(self.defaults.text_scale)
            .unwrap_or(FALLBACK_TEXT_SCALE)
    }

    pub fn font(&self) -> &'a str {
        self.defaults.font.as_deref().unwrap_or(FALLBACK_FONT)
    }

    pub fn point_radius(&self) -> f64 {
        self.shape
            .radius()
            .or(self.defaults.point_radius)
            .unwrap_or(FALLBACK_POINT_RADIUS)
    }

    pub fn pin_color(&self) -> &'a str {
        self.shape
            .color
            .as_deref()
            .or(self.defaults.pin_color.as_deref())
            .unwrap_or(FALLBACK_PIN_COLOR)
    }

    /// Label text: `label`, then `title`.
    pub fn label(&self) -> Option<&'a str> {
        self.shape.label().or(self.shape.title())
    }
}

/// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)` and a few names.
pub fn parse_color(s: &str) -> Option<[u8; 4]> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(body) = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))
        .and_then(|b| b.strip_suffix(')'))
    {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let r = parts[0].parse::<u8>().ok()?;
        let g = parts[1].parse::<u8>().ok()?;
        let b = parts[2].parse::<u8>().ok()?;
        let a = match parts.get(3) {
            Some(a) => (a.parse::<f64>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
            None => 255,
        };
        return Some([r, g, b, a]);
    }
    match s.to_ascii_lowercase().as_str() {
        "black" => Some([0, 0, 0, 255]),
        "white" => Some([255, 255, 255, 255]),
        "red" => Some([255, 0, 0, 255]),
        "green" => Some([0, 128, 0, 255]),
        "blue" => Some([0, 0, 255, 255]),
        "yellow" => Some([255, 255, 0, 255]),
        "orange" => Some([255, 165, 0, 255]),
        "transparent" => Some([0, 0, 0, 0]),
        _ => None,
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 4]> {
    let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some([digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 255]),
        6 => Some([byte(0)?, byte(2)?, byte(4)?, 255]),
        8 => Some([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{FALLBACK_FILL_COLOR, ShapeStyle, StyleDefaults, parse_color};
    use foundation::Coordinate;
    use scene::Shape;

    #[test]
    fn resolution_order_shape_then_defaults_then_fallback() {
        let mut shape = Shape::point(Coordinate::new(0.0, 0.0));
        let mut defaults = StyleDefaults::default();

        assert_eq!(ShapeStyle::new(&shape, &defaults).fill_color(), FALLBACK_FILL_COLOR);

        defaults.fill_color = Some("#00ff00".into());
        assert_eq!(ShapeStyle::new(&shape, &defaults).fill_color(), "#00ff00");

        shape.background_color = Some("#0000ff".into());
        assert_eq!(ShapeStyle::new(&shape, &defaults).fill_color(), "#0000ff");
        assert_eq!(defaults.fill_color.as_deref(), Some("#00ff00"));
    }

    #[test]
    fn defaults_deserialize_partially() {
        let d: StyleDefaults = serde_json::from_str(r#"{"stroke_width": 3.0}"#).unwrap();
        assert_eq!(d.stroke_width, Some(3.0));
        assert_eq!(d.fill_color, None);
    }

    #[test]
    fn parses_common_color_forms() {
        assert_eq!(parse_color("#f00"), Some([255, 0, 0, 255]));
        assert_eq!(parse_color("#3399CC"), Some([0x33, 0x99, 0xcc, 255]));
        assert_eq!(parse_color("#00000080"), Some([0, 0, 0, 128]));
        assert_eq!(parse_color("rgba(255,255,255,0.4)"), Some([255, 255, 255, 102]));
        assert_eq!(parse_color("rgb(1, 2, 3)"), Some([1, 2, 3, 255]));
        assert_eq!(parse_color("Red"), Some([255, 0, 0, 255]));
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }
}
