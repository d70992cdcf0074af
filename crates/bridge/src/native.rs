//! The renderer's own feature model, as exchanged over the bridge.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeGeometry {
    /// Renderer geometry type name, e.g. `"LineString"`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Coordinates in the renderer projection, nested per the coordinate codec.
    pub coordinates: Value,
    /// Circle radius in native units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeFeature {
    pub id: String,
    pub geometry: NativeGeometry,
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Serialized style layers; `null` means the renderer's default style.
    #[serde(default)]
    pub style: Value,
}

impl NativeFeature {
    pub fn coordinate_count(&self) -> usize {
        count_leaves(&self.geometry.coordinates)
    }
}

/// Counts coordinate leaves (arrays whose first element is a number).
fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Array(items) => match items.first() {
            Some(Value::Number(_)) => 1,
            _ => items.iter().map(count_leaves).sum(),
        },
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::{NativeFeature, NativeGeometry};
    use serde_json::json;

    fn feature(coordinates: serde_json::Value) -> NativeFeature {
        NativeFeature {
            id: "f".into(),
            geometry: NativeGeometry {
                type_name: "LineString".into(),
                coordinates,
                radius: None,
            },
            properties: Default::default(),
            style: serde_json::Value::Null,
        }
    }

    #[test]
    fn counts_coordinates_at_any_depth() {
        assert_eq!(feature(json!([1, 2])).coordinate_count(), 1);
        assert_eq!(feature(json!([[1, 2], [3, 4]])).coordinate_count(), 2);
        assert_eq!(feature(json!([[[1, 2]], [[3, 4], [5, 6]]])).coordinate_count(), 3);
        assert_eq!(feature(json!([])).coordinate_count(), 0);
    }

    #[test]
    fn geometry_type_is_renamed_on_the_wire() {
        let value = serde_json::to_value(feature(json!([1, 2]))).unwrap();
        assert_eq!(value["geometry"]["type"], json!("LineString"));
        assert!(value["geometry"].get("radius").is_none());
    }
}
