//! Shape ⇄ native feature translation.

use foundation::{Coordinate, CoordinateKind, CoordinateSet, View, decode, encode};
use layers::{StyleDefaults, StyleLayer, resolve};
use scene::{GeometryKind, PropertyBag, Shape};
use tracing::debug;

use crate::error::BridgeError;
use crate::introspect::ExtractedStyle;
use crate::native::{NativeFeature, NativeGeometry};

/// What a translation needs besides the feature itself.
#[derive(Debug, Clone, Copy)]
pub struct ConversionContext<'a> {
    pub view: &'a View,
    pub defaults: &'a StyleDefaults,
    pub serialization_limit: usize,
}

/// A shape rebuilt from a native feature, plus everything that degraded on
/// the way. An empty `issues` list means a lossless translation.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTranslation {
    pub shape: Shape,
    pub issues: Vec<BridgeError>,
}

impl NativeTranslation {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Converts a shape to a renderer feature with its resolved style.
pub fn shape_to_native(
    shape: &Shape,
    ctx: &ConversionContext<'_>,
) -> Result<NativeFeature, BridgeError> {
    let layers = resolve(shape, ctx.defaults, ctx.view)?;
    shape_to_native_styled(shape, ctx, &layers)
}

/// Like [`shape_to_native`] but with caller-supplied style layers.
pub fn shape_to_native_styled(
    shape: &Shape,
    ctx: &ConversionContext<'_>,
    layers: &[StyleLayer],
) -> Result<NativeFeature, BridgeError> {
    shape.validate()?;

    let native = shape.coordinates().map(|c| ctx.view.to_native(c));
    let radius = match shape.geometry_kind() {
        GeometryKind::Circle => {
            let radius = shape.radius().ok_or(BridgeError::MissingRadius)?;
            let center = native
                .as_point()
                .ok_or(BridgeError::GeometryCoordinateMismatch {
                    geometry: GeometryKind::Circle,
                    coordinates: native.kind(),
                })?;
            Some(radius / unit_resolution(ctx.view, center))
        }
        _ => None,
    };

    Ok(NativeFeature {
        id: shape.id().to_string(),
        geometry: NativeGeometry {
            type_name: shape.geometry_kind().as_str().to_string(),
            coordinates: encode(&native),
            radius,
        },
        properties: shape.properties().as_map().clone(),
        style: serde_json::to_value(layers).unwrap_or_default(),
    })
}

/// Rebuilds a shape from a renderer feature. Never fails; problems are
/// reported in [`NativeTranslation::issues`].
pub fn native_to_shape(native: &NativeFeature, ctx: &ConversionContext<'_>) -> NativeTranslation {
    let mut issues = Vec::new();
    let mut shape = Shape::with_id(native.id.as_str());

    let type_name = &native.geometry.type_name;
    let kind = GeometryKind::parse(type_name).unwrap_or_else(|| {
        issues.push(BridgeError::UnknownGeometryKind(type_name.clone()));
        GeometryKind::None
    });

    let count = native.coordinate_count();
    let decoded = if count > ctx.serialization_limit {
        issues.push(BridgeError::SerializationLimitExceeded {
            count,
            limit: ctx.serialization_limit,
        });
        None
    } else {
        match decode(&native.geometry.coordinates) {
            Ok(set) => Some(set),
            Err(e) => {
                issues.push(e.into());
                None
            }
        }
    };
    let coordinates_ok = decoded.is_some();
    let native_coords = decoded.unwrap_or_else(|| empty_for(kind));

    shape.feature_mut().set_geometry(
        kind,
        native_coords.map(|c| ctx.view.from_native(c)),
    );
    shape
        .feature_mut()
        .set_properties(PropertyBag::from(native.properties.clone()));

    if kind == GeometryKind::Circle
        && let (Some(radius), Some(center)) = (native.geometry.radius, native_coords.as_point())
    {
        shape.set_radius(Some(radius * unit_resolution(ctx.view, center)));
    }

    match ExtractedStyle::from_native(&native.style) {
        Ok(style) => style.apply(&mut shape),
        Err(e) => issues.push(e),
    }

    if coordinates_ok && let Err(e) = shape.validate() {
        issues.push(e.into());
    }

    if !issues.is_empty() {
        debug!(id = %native.id, issues = issues.len(), "degraded native translation");
    }
    NativeTranslation { shape, issues }
}

/// Placeholder coordinates for an omitted geometry, nested the way `kind`
/// expects. Points have no empty form and fall back to the empty list.
fn empty_for(kind: GeometryKind) -> CoordinateSet {
    match kind.coordinate_kind() {
        Some(CoordinateKind::MultiList) => CoordinateSet::multi_list(Vec::new()),
        _ => CoordinateSet::empty(),
    }
}

/// Ground units per native unit at `center`, guarded against degenerate projections.
fn unit_resolution(view: &View, center: Coordinate) -> f64 {
    let res = view.unit_point_resolution(center);
    if res > 0.0 && res.is_finite() {
        res
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{ConversionContext, native_to_shape, shape_to_native};
    use crate::error::BridgeError;
    use crate::native::{NativeFeature, NativeGeometry};
    use crate::protocol::ShapeRecord;
    use foundation::{Coordinate, CoordinateKind, FnProjection, View};
    use layers::StyleDefaults;
    use pretty_assertions::assert_eq;
    use scene::{GeometryKind, Shape};
    use serde_json::json;

    fn scaled_view() -> View {
        let projection = FnProjection::new(
            |c| Coordinate::new(c.x() * 2.0, c.y() * 2.0),
            |c| Coordinate::new(c.x() / 2.0, c.y() / 2.0),
        )
        .with_point_resolution(|res, _| res * 0.5);
        View::new(Arc::new(projection), 4.0)
    }

    fn ctx<'a>(view: &'a View, defaults: &'a StyleDefaults) -> ConversionContext<'a> {
        ConversionContext {
            view,
            defaults,
            serialization_limit: 1000,
        }
    }

    fn round_trip(shape: &Shape) {
        let view = scaled_view();
        let defaults = StyleDefaults::default();
        let ctx = ctx(&view, &defaults);
        let native = shape_to_native(shape, &ctx).unwrap();
        let back = native_to_shape(&native, &ctx);
        assert!(back.is_clean(), "issues: {:?}", back.issues);
        assert_eq!(
            ShapeRecord::from_shape(&back.shape, &defaults),
            ShapeRecord::from_shape(shape, &defaults)
        );
    }

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn point_round_trips() {
        let mut shape = Shape::point(c(3.0, 4.0));
        shape.border_color = Some("#abcdef".into());
        round_trip(&shape);
    }

    #[test]
    fn line_round_trips() {
        let mut shape = Shape::line(vec![c(0.0, 0.0), c(1.5, 2.5), c(3.0, -1.0)]);
        shape.border_size = Some(3.0);
        round_trip(&shape);
    }

    #[test]
    fn polygon_round_trips() {
        let mut shape = Shape::polygon(vec![vec![c(0.0, 0.0), c(4.0, 0.0), c(4.0, 4.0)]]);
        shape.background_color = Some("rgba(0,0,255,0.5)".into());
        round_trip(&shape);
    }

    #[test]
    fn circle_round_trips() {
        round_trip(&Shape::circle(c(10.0, 20.0), 250.0));
    }

    #[test]
    fn projects_and_scales_circle_radius() {
        let view = scaled_view();
        let defaults = StyleDefaults::default();
        let native = shape_to_native(&Shape::circle(c(1.0, 2.0), 100.0), &ctx(&view, &defaults))
            .unwrap();
        assert_eq!(native.geometry.type_name, "Circle");
        assert_eq!(native.geometry.coordinates, json!([2.0, 4.0]));
        assert_eq!(native.geometry.radius, Some(200.0));
    }

    #[test]
    fn stamps_id_and_style() {
        let view = View::default();
        let defaults = StyleDefaults::default();
        let shape = Shape::pin(c(0.0, 0.0));
        let native = shape_to_native(&shape, &ctx(&view, &defaults)).unwrap();
        assert_eq!(native.id, shape.id().as_str());
        assert_eq!(native.style.as_array().map(Vec::len), Some(2));
        assert_eq!(native.properties["type"], json!("MarkerPin"));
    }

    #[test]
    fn invalid_shape_is_rejected() {
        let view = View::default();
        let defaults = StyleDefaults::default();
        let mut shape = Shape::circle(c(0.0, 0.0), 1.0);
        shape.set_radius(None);
        let err = shape_to_native(&shape, &ctx(&view, &defaults)).unwrap_err();
        assert_eq!(err, BridgeError::MissingRadius);
    }

    fn native(type_name: &str, coordinates: serde_json::Value) -> NativeFeature {
        NativeFeature {
            id: "n1".into(),
            geometry: NativeGeometry {
                type_name: type_name.into(),
                coordinates,
                radius: None,
            },
            properties: Default::default(),
            style: serde_json::Value::Null,
        }
    }

    #[test]
    fn unknown_geometry_degrades_to_none() {
        let view = View::default();
        let defaults = StyleDefaults::default();
        let t = native_to_shape(&native("Spline", json!([[0, 0], [1, 1]])), &ctx(&view, &defaults));
        assert_eq!(t.shape.geometry_kind(), GeometryKind::None);
        assert_eq!(t.shape.coordinates().coordinate_count(), 2);
        assert_eq!(t.issues, vec![BridgeError::UnknownGeometryKind("Spline".into())]);
    }

    #[test]
    fn oversized_geometry_omits_coordinates() {
        let view = View::default();
        let defaults = StyleDefaults::default();
        let ctx = ConversionContext {
            serialization_limit: 2,
            ..ctx(&view, &defaults)
        };
        let t = native_to_shape(&native("LineString", json!([[0, 0], [1, 1], [2, 2]])), &ctx);
        assert_eq!(t.shape.geometry_kind(), GeometryKind::LineString);
        assert!(t.shape.coordinates().is_empty());
        assert_eq!(
            t.issues,
            vec![BridgeError::SerializationLimitExceeded { count: 3, limit: 2 }]
        );
    }

    #[test]
    fn omitted_coordinates_keep_the_geometry_nesting() {
        let view = View::default();
        let defaults = StyleDefaults::default();
        let ctx = ConversionContext {
            serialization_limit: 2,
            ..ctx(&view, &defaults)
        };
        let t = native_to_shape(
            &native("Polygon", json!([[[0, 0], [1, 0], [1, 1], [0, 0]]])),
            &ctx,
        );
        assert_eq!(t.shape.geometry_kind(), GeometryKind::Polygon);
        assert_eq!(t.shape.coordinates().kind(), CoordinateKind::MultiList);
        assert!(t.shape.coordinates().is_empty());
        assert!(t.shape.validate().is_ok());

        let t = native_to_shape(&native("MultiLineString", json!([[[[1, 2]]]])), &ctx);
        assert!(matches!(t.issues.as_slice(), [BridgeError::Codec(_)]));
        assert_eq!(t.shape.coordinates().kind(), CoordinateKind::MultiList);
    }

    #[test]
    fn broken_style_keeps_geometry() {
        let view = View::default();
        let defaults = StyleDefaults::default();
        let mut f = native("Point", json!([5, 6]));
        f.style = json!(42);
        let t = native_to_shape(&f, &ctx(&view, &defaults));
        assert_eq!(t.shape.feature().point(), Some(c(5.0, 6.0)));
        assert_eq!(t.shape.border_color, None);
        assert!(matches!(
            t.issues.as_slice(),
            [BridgeError::StyleIntrospectionFailure(_)]
        ));
    }

    #[test]
    fn bad_coordinates_are_reported() {
        let view = View::default();
        let defaults = StyleDefaults::default();
        let t = native_to_shape(&native("Point", json!([[[[1, 2]]]])), &ctx(&view, &defaults));
        assert!(matches!(t.issues.as_slice(), [BridgeError::Codec(_)]));
    }

    #[test]
    fn mismatched_nesting_is_reported() {
        let view = View::default();
        let defaults = StyleDefaults::default();
        let t = native_to_shape(&native("Polygon", json!([1, 2])), &ctx(&view, &defaults));
        assert!(matches!(
            t.issues.as_slice(),
            [BridgeError::GeometryCoordinateMismatch { .. }]
        ));
    }
}
