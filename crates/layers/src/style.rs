//! Renderer-facing style layer descriptors.
//!
//! A shape resolves to an ordered list of [`StyleLayer`]s; each is one
//! native style object combining optional fill, stroke, image and text parts.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub color: String,
}

impl Fill {
    pub fn new(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub width: f64,
}

impl Stroke {
    pub fn new(color: impl Into<String>, width: f64) -> Self {
        Self {
            color: color.into(),
            width,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnchorUnits {
    #[default]
    Fraction,
    Pixels,
}

/// RGBA8 pixels, row-major, `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    #[serde(with = "rgba_base64")]
    pub rgba: Vec<u8>,
}

impl RasterImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.rgba[i..i + 4].copy_from_slice(&color);
    }
}

mod rgba_base64 {
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD
            .decode(s)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageSource {
    Url(String),
    Raster(RasterImage),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconStyle {
    pub src: ImageSource,
    pub anchor: [f64; 2],
    #[serde(default)]
    pub anchor_units: AnchorUnits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<[f64; 2]>,
    #[serde(default)]
    pub rotation: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleStyle {
    /// Pixels.
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ImageStyle {
    Icon(IconStyle),
    Circle(CircleStyle),
}

impl ImageStyle {
    pub fn scale(&self) -> Option<f64> {
        match self {
            ImageStyle::Icon(icon) => Some(icon.scale),
            ImageStyle::Circle(_) => None,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextPlacement {
    #[default]
    Point,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub text: String,
    pub font: String,
    pub scale: f64,
    #[serde(default)]
    pub offset_x: f64,
    #[serde(default)]
    pub offset_y: f64,
    #[serde(default)]
    pub placement: TextPlacement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_stroke: Option<Stroke>,
    /// `[top, right, bottom, left]` pixels around the background box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<[f64; 4]>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleLayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
}

impl StyleLayer {
    pub fn image(image: ImageStyle) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    pub fn text(text: TextStyle) -> Self {
        Self {
            text: Some(text),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Fill, ImageSource, ImageStyle, IconStyle, RasterImage, StyleLayer, AnchorUnits};
    use serde_json::json;

    #[test]
    fn omits_unset_parts() {
        let layer = StyleLayer {
            fill: Some(Fill::new("#fff")),
            ..StyleLayer::default()
        };
        assert_eq!(
            serde_json::to_value(&layer).unwrap(),
            json!({"fill": {"color": "#fff"}})
        );
    }

    #[test]
    fn raster_pixels_travel_as_base64() {
        let mut raster = RasterImage::new(1, 1);
        raster.set_pixel(0, 0, [255, 0, 0, 255]);
        let layer = StyleLayer::image(ImageStyle::Icon(IconStyle {
            src: ImageSource::Raster(raster.clone()),
            anchor: [0.0, 1.0],
            anchor_units: AnchorUnits::Fraction,
            size: None,
            rotation: 0.0,
            scale: 1.0,
        }));
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(value["image"]["kind"], json!("icon"));
        assert_eq!(value["image"]["src"]["raster"]["rgba"], json!("/wAA/w=="));
        let back: StyleLayer = serde_json::from_value(value).unwrap();
        assert_eq!(back, layer);
    }
}
