//! Wire types crossing the host/renderer boundary.
//!
//! - `ShapeRecord`: a shape as the host UI receives it, with resolved style values.
//! - `NativeEvent`: renderer notifications flowing into the bridge.

use foundation::{Coordinate, CoordinateSet, LayerId};
use layers::{ShapeStyle, StyleDefaults};
use scene::{GeometryKind, PropertyBag, Shape};
use serde::{Deserialize, Serialize};

use crate::native::NativeFeature;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub id: String,
    pub geometry_kind: GeometryKind,
    pub coordinates: CoordinateSet,
    #[serde(default)]
    pub properties: PropertyBag,
    pub border_color: String,
    pub border_size: f64,
    pub background_color: String,
    pub color: String,
    pub text_scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl ShapeRecord {
    pub fn from_shape(shape: &Shape, defaults: &StyleDefaults) -> Self {
        let style = ShapeStyle::new(shape, defaults);
        Self {
            id: shape.id().to_string(),
            geometry_kind: shape.geometry_kind(),
            coordinates: shape.coordinates().clone(),
            properties: shape.properties().clone(),
            border_color: style.stroke_color().to_string(),
            border_size: style.stroke_width(),
            background_color: style.fill_color().to_string(),
            color: style.text_color().to_string(),
            text_scale: style.text_scale(),
            radius: shape.radius(),
            scale: shape.scale,
        }
    }

    /// Rebuilds a shape; record style values become explicit shape fields.
    pub fn into_shape(self) -> Shape {
        let mut shape = Shape::with_id(self.id);
        shape
            .feature_mut()
            .set_geometry(self.geometry_kind, self.coordinates);
        shape.feature_mut().set_properties(self.properties);
        if self.radius.is_some() {
            shape.set_radius(self.radius);
        }
        shape.border_color = Some(self.border_color);
        shape.border_size = Some(self.border_size);
        shape.background_color = Some(self.background_color);
        shape.color = Some(self.color);
        shape.text_scale = Some(self.text_scale);
        shape.scale = self.scale;
        shape
    }
}

/// Renderer notification. Coordinates are in the renderer projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NativeEvent {
    FeatureAdded {
        layer: LayerId,
        feature: NativeFeature,
    },
    FeatureChanged {
        layer: LayerId,
        feature: NativeFeature,
    },
    FeatureRemoved {
        layer: LayerId,
        id: String,
    },
    FeatureClick {
        layer: LayerId,
        id: String,
    },
    MapClick {
        coordinate: Coordinate,
    },
    PointerMove {
        coordinate: Coordinate,
    },
    ZoomChanged {
        zoom: f64,
        resolution: f64,
    },
    CenterChanged {
        center: Coordinate,
    },
    StyleRequest {
        request_id: u64,
        layer: LayerId,
        feature: NativeFeature,
    },
}

impl NativeEvent {
    pub fn layer(&self) -> Option<LayerId> {
        match self {
            NativeEvent::FeatureAdded { layer, .. }
            | NativeEvent::FeatureChanged { layer, .. }
            | NativeEvent::FeatureRemoved { layer, .. }
            | NativeEvent::FeatureClick { layer, .. }
            | NativeEvent::StyleRequest { layer, .. } => Some(*layer),
            _ => None,
        }
    }

    pub fn feature_id(&self) -> Option<&str> {
        match self {
            NativeEvent::FeatureAdded { feature, .. }
            | NativeEvent::FeatureChanged { feature, .. }
            | NativeEvent::StyleRequest { feature, .. } => Some(&feature.id),
            NativeEvent::FeatureRemoved { id, .. } | NativeEvent::FeatureClick { id, .. } => {
                Some(id)
            }
            _ => None,
        }
    }
}
