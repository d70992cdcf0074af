use layers::{ImageStyle, StyleLayer};
use scene::Shape;
use serde_json::Value;

use crate::error::BridgeError;

/// Style values read back from a native style.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtractedStyle {
    pub stroke_color: Option<String>,
    pub stroke_width: Option<f64>,
    pub fill_color: Option<String>,
    pub text_color: Option<String>,
    pub text_scale: Option<f64>,
    pub image_scale: Option<f64>,
}

impl ExtractedStyle {
    /// Reads a native style: `null`, one layer object, or an array of layers.
    ///
    /// Each value comes from the first layer that defines it.
    pub fn from_native(style: &Value) -> Result<Self, BridgeError> {
        let layers: Vec<StyleLayer> = match style {
            Value::Null => return Ok(Self::default()),
            Value::Array(_) => serde_json::from_value(style.clone()),
            Value::Object(_) => {
                serde_json::from_value::<StyleLayer>(style.clone()).map(|l| vec![l])
            }
            other => {
                return Err(BridgeError::StyleIntrospectionFailure(format!(
                    "expected style object or array, got {other}"
                )));
            }
        }
        .map_err(|e| BridgeError::StyleIntrospectionFailure(e.to_string()))?;

        let mut out = Self::default();
        for layer in &layers {
            if let Some(stroke) = &layer.stroke {
                out.stroke_color.get_or_insert_with(|| stroke.color.clone());
                out.stroke_width.get_or_insert(stroke.width);
            }
            if let Some(fill) = &layer.fill {
                out.fill_color.get_or_insert_with(|| fill.color.clone());
            }
            if let Some(text) = &layer.text {
                if let Some(fill) = &text.fill {
                    out.text_color.get_or_insert_with(|| fill.color.clone());
                }
                out.text_scale.get_or_insert(text.scale);
            }
            match &layer.image {
                Some(ImageStyle::Icon(icon)) => {
                    out.image_scale.get_or_insert(icon.scale);
                }
                // Point markers carry their fill and stroke inside the circle.
                Some(ImageStyle::Circle(circle)) => {
                    if let Some(stroke) = &circle.stroke {
                        out.stroke_color.get_or_insert_with(|| stroke.color.clone());
                        out.stroke_width.get_or_insert(stroke.width);
                    }
                    if let Some(fill) = &circle.fill {
                        out.fill_color.get_or_insert_with(|| fill.color.clone());
                    }
                }
                None => {}
            }
        }
        Ok(out)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Writes the extracted values onto the shape's style fields.
    pub fn apply(self, shape: &mut Shape) {
        shape.border_color = self.stroke_color;
        shape.border_size = self.stroke_width;
        shape.background_color = self.fill_color;
        shape.color = self.text_color;
        shape.text_scale = self.text_scale;
        shape.scale = self.image_scale;
    }
}

#[cfg(test)]
mod tests {
    use super::ExtractedStyle;
    use crate::error::BridgeError;
    use serde_json::json;

    #[test]
    fn reads_first_definition_of_each_value() {
        let style = json!([
            {"image": {"kind": "icon", "src": {"url": "a.png"}, "anchor": [0.5, 1.0], "scale": 0.3}},
            {"stroke": {"color": "#111111", "width": 2.0}, "fill": {"color": "#222222"}},
            {"text": {"text": "x", "font": "12px sans", "scale": 1.5, "fill": {"color": "#333333"}}},
            {"stroke": {"color": "#999999", "width": 9.0}}
        ]);
        let out = ExtractedStyle::from_native(&style).unwrap();
        assert_eq!(out.stroke_color.as_deref(), Some("#111111"));
        assert_eq!(out.stroke_width, Some(2.0));
        assert_eq!(out.fill_color.as_deref(), Some("#222222"));
        assert_eq!(out.text_color.as_deref(), Some("#333333"));
        assert_eq!(out.text_scale, Some(1.5));
        assert_eq!(out.image_scale, Some(0.3));
    }

    #[test]
    fn null_is_no_style() {
        assert!(ExtractedStyle::from_native(&json!(null)).unwrap().is_empty());
    }

    #[test]
    fn single_object_is_accepted() {
        let out = ExtractedStyle::from_native(&json!({"fill": {"color": "red"}})).unwrap();
        assert_eq!(out.fill_color.as_deref(), Some("red"));
    }

    #[test]
    fn malformed_style_fails() {
        let err = ExtractedStyle::from_native(&json!("bold")).unwrap_err();
        assert!(matches!(err, BridgeError::StyleIntrospectionFailure(_)));
        let err = ExtractedStyle::from_native(&json!([{"stroke": {"color": 5}}])).unwrap_err();
        assert!(matches!(err, BridgeError::StyleIntrospectionFailure(_)));
    }
}
