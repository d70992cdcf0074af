use foundation::{Coordinate, CoordinateSet, FeatureId, LayerId};
use serde::{Deserialize, Serialize};

use crate::components::{GeometryKind, PropertyBag};
use crate::error::ModelError;
use crate::feature::Feature;
use crate::keys;

/// Which marker style branch applies; stored under the `type` property.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    #[serde(rename = "MarkerPin")]
    Pin,
    #[serde(rename = "MarkerFlag")]
    Flag,
    #[serde(rename = "MarkerAwesome")]
    Awesome,
    #[serde(rename = "MarkerImage")]
    Image,
}

impl MarkerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MarkerKind::Pin => "MarkerPin",
            MarkerKind::Flag => "MarkerFlag",
            MarkerKind::Awesome => "MarkerAwesome",
            MarkerKind::Image => "MarkerImage",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MarkerPin" => Some(MarkerKind::Pin),
            "MarkerFlag" => Some(MarkerKind::Flag),
            "MarkerAwesome" => Some(MarkerKind::Awesome),
            "MarkerImage" => Some(MarkerKind::Image),
            _ => None,
        }
    }
}

/// A feature with the style-relevant fields the host sets.
///
/// Unset style fields fall back to the caller's style defaults at render time.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Shape {
    feature: Feature,
    layer: Option<LayerId>,
    pub border_color: Option<String>,
    pub border_size: Option<f64>,
    pub background_color: Option<String>,
    pub color: Option<String>,
    pub text_scale: Option<f64>,
    pub scale: Option<f64>,
}

impl Shape {
    pub fn new() -> Self {
        Self::from_feature(Feature::new())
    }

    pub fn with_id(id: impl Into<FeatureId>) -> Self {
        Self::from_feature(Feature::with_id(id))
    }

    pub fn from_feature(feature: Feature) -> Self {
        Self {
            feature,
            layer: None,
            border_color: None,
            border_size: None,
            background_color: None,
            color: None,
            text_scale: None,
            scale: None,
        }
    }

    pub fn point(at: Coordinate) -> Self {
        let mut shape = Self::new();
        shape.feature.set_geometry(GeometryKind::Point, at);
        shape
    }

    pub fn line(points: Vec<Coordinate>) -> Self {
        let mut shape = Self::new();
        shape.feature.set_geometry(GeometryKind::LineString, points);
        shape
    }

    pub fn polygon(rings: Vec<Vec<Coordinate>>) -> Self {
        let mut shape = Self::new();
        shape.feature.set_geometry(GeometryKind::Polygon, rings);
        shape
    }

    pub fn circle(center: Coordinate, radius: f64) -> Self {
        let mut shape = Self::new();
        shape.feature.set_geometry(GeometryKind::Circle, center);
        shape.set_radius(Some(radius));
        shape
    }

    pub fn marker(kind: MarkerKind, at: Coordinate) -> Self {
        let mut shape = Self::point(at);
        shape.set_marker_kind(Some(kind));
        shape
    }

    pub fn pin(at: Coordinate) -> Self {
        Self::marker(MarkerKind::Pin, at)
    }

    pub fn flag(at: Coordinate, title: impl Into<String>) -> Self {
        let mut shape = Self::marker(MarkerKind::Flag, at);
        shape.set_title(Some(title.into()));
        shape
    }

    pub fn awesome(at: Coordinate, glyph: char) -> Self {
        let mut shape = Self::marker(MarkerKind::Awesome, at);
        shape.set_glyph(Some(glyph));
        shape
    }

    pub fn image(at: Coordinate, src: impl Into<String>) -> Self {
        let mut shape = Self::marker(MarkerKind::Image, at);
        shape.feature.properties_mut().set(keys::SRC, src.into());
        shape
    }

    pub fn feature(&self) -> &Feature {
        &self.feature
    }

    pub fn feature_mut(&mut self) -> &mut Feature {
        &mut self.feature
    }

    pub fn into_feature(self) -> Feature {
        self.feature
    }

    pub fn id(&self) -> &FeatureId {
        self.feature.id()
    }

    pub fn geometry_kind(&self) -> GeometryKind {
        self.feature.geometry_kind()
    }

    pub fn coordinates(&self) -> &CoordinateSet {
        self.feature.coordinates()
    }

    pub fn set_coordinates(&mut self, coordinates: impl Into<CoordinateSet>) {
        self.feature.set_coordinates(coordinates);
    }

    pub fn properties(&self) -> &PropertyBag {
        self.feature.properties()
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        self.feature.properties_mut()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        self.feature.validate()
    }

    /// Layer currently owning this shape.
    pub fn layer(&self) -> Option<LayerId> {
        self.layer
    }

    pub fn attach(&mut self, layer: LayerId) {
        self.layer = Some(layer);
    }

    pub fn detach(&mut self) -> Option<LayerId> {
        self.layer.take()
    }

    pub fn marker_kind(&self) -> Option<MarkerKind> {
        self.properties().get_str(keys::TYPE).and_then(MarkerKind::parse)
    }

    pub fn set_marker_kind(&mut self, kind: Option<MarkerKind>) {
        self.properties_mut()
            .set_opt(keys::TYPE, kind.map(MarkerKind::as_str));
    }

    pub fn radius(&self) -> Option<f64> {
        self.feature.radius()
    }

    pub fn set_radius(&mut self, radius: Option<f64>) {
        self.properties_mut().set_opt(keys::RADIUS, radius);
    }

    pub fn title(&self) -> Option<&str> {
        self.properties().get_str(keys::TITLE)
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.properties_mut().set_opt(keys::TITLE, title);
    }

    pub fn label(&self) -> Option<&str> {
        self.properties().get_str(keys::LABEL)
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.properties_mut().set_opt(keys::LABEL, label);
    }

    pub fn content(&self) -> Option<&str> {
        self.properties().get_str(keys::CONTENT)
    }

    pub fn set_content(&mut self, content: Option<String>) {
        self.properties_mut().set_opt(keys::CONTENT, content);
    }

    pub fn popup(&self) -> bool {
        self.properties().get_bool(keys::POPUP).unwrap_or(false)
    }

    pub fn set_popup(&mut self, popup: bool) {
        self.properties_mut().set(keys::POPUP, popup);
    }

    pub fn glyph(&self) -> Option<char> {
        self.properties()
            .get_str(keys::GLYPH)
            .and_then(|s| s.chars().next())
    }

    pub fn set_glyph(&mut self, glyph: Option<char>) {
        self.properties_mut()
            .set_opt(keys::GLYPH, glyph.map(|g| g.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::{MarkerKind, Shape};
    use crate::components::GeometryKind;
    use foundation::{Coordinate, LayerId};
    use serde_json::json;

    #[test]
    fn marker_kind_round_trips_through_type_property() {
        let mut shape = Shape::pin(Coordinate::new(1.0, 2.0));
        assert_eq!(shape.marker_kind(), Some(MarkerKind::Pin));
        assert_eq!(shape.properties().get("type"), Some(&json!("MarkerPin")));

        shape.set_marker_kind(Some(MarkerKind::Flag));
        assert_eq!(shape.marker_kind(), Some(MarkerKind::Flag));

        shape.set_marker_kind(None);
        assert_eq!(shape.marker_kind(), None);
        assert!(!shape.properties().contains("type"));
    }

    #[test]
    fn unknown_type_is_not_a_marker() {
        let mut shape = Shape::point(Coordinate::new(0.0, 0.0));
        shape.properties_mut().set("type", "Marker");
        assert_eq!(shape.marker_kind(), None);
    }

    #[test]
    fn builders_produce_valid_features() {
        let shapes = [
            Shape::point(Coordinate::new(0.0, 0.0)),
            Shape::line(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0)]),
            Shape::polygon(vec![vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 0.0),
                Coordinate::new(0.0, 1.0),
            ]]),
            Shape::circle(Coordinate::new(0.0, 0.0), 100.0),
            Shape::flag(Coordinate::new(0.0, 0.0), "Start"),
            Shape::awesome(Coordinate::new(0.0, 0.0), '\u{f041}'),
            Shape::image(Coordinate::new(0.0, 0.0), "img/car.png"),
        ];
        for shape in &shapes {
            assert_eq!(shape.validate(), Ok(()), "{:?}", shape.geometry_kind());
        }
        assert_eq!(shapes[3].geometry_kind(), GeometryKind::Circle);
        assert_eq!(shapes[3].radius(), Some(100.0));
        assert_eq!(shapes[4].title(), Some("Start"));
        assert_eq!(shapes[5].glyph(), Some('\u{f041}'));
    }

    #[test]
    fn layer_ownership() {
        let mut shape = Shape::new();
        assert_eq!(shape.layer(), None);
        shape.attach(LayerId(3));
        assert_eq!(shape.layer(), Some(LayerId(3)));
        assert_eq!(shape.detach(), Some(LayerId(3)));
        assert_eq!(shape.layer(), None);
    }
}
