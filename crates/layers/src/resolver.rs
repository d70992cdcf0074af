use foundation::{CoordinateKind, View};
use scene::{GeometryKind, MarkerKind, ModelError, Shape};

use crate::labels::label_text;
use crate::markers::{awesome_layers, flag_layers, image_layers, pin_layers};
use crate::style::{CircleStyle, Fill, ImageStyle, Stroke, StyleLayer, TextPlacement};
use crate::symbology::{ShapeStyle, StyleDefaults};

/// Which synthesizer a shape goes through. Chosen only by the marker kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StyleState {
    Pin,
    Flag,
    Awesome,
    Image,
    Default,
}

impl StyleState {
    pub fn of(shape: &Shape) -> Self {
        match shape.marker_kind() {
            Some(MarkerKind::Pin) => StyleState::Pin,
            Some(MarkerKind::Flag) => StyleState::Flag,
            Some(MarkerKind::Awesome) => StyleState::Awesome,
            Some(MarkerKind::Image) => StyleState::Image,
            None => StyleState::Default,
        }
    }

    pub fn is_marker(self) -> bool {
        self != StyleState::Default
    }
}

/// Builds the ordered style layers of `shape` from scratch.
pub fn resolve(
    shape: &Shape,
    defaults: &StyleDefaults,
    view: &View,
) -> Result<Vec<StyleLayer>, ModelError> {
    let style = ShapeStyle::new(shape, defaults);
    let state = StyleState::of(shape);

    if state.is_marker() && shape.feature().point().is_none() {
        return Err(ModelError::GeometryCoordinateMismatch {
            geometry: shape.geometry_kind(),
            coordinates: shape.coordinates().kind(),
        });
    }

    let layers = match state {
        StyleState::Pin => pin_layers(shape, &style),
        StyleState::Flag => flag_layers(shape, &style),
        StyleState::Awesome => awesome_layers(shape, &style),
        StyleState::Image => image_layers(shape),
        StyleState::Default => default_layers(shape, &style, view)?,
    };
    Ok(layers)
}

fn default_layers(
    shape: &Shape,
    style: &ShapeStyle<'_>,
    view: &View,
) -> Result<Vec<StyleLayer>, ModelError> {
    shape.validate()?;

    let fill = Fill::new(style.fill_color());
    let stroke = Stroke::new(style.stroke_color(), style.stroke_width());

    let is_point = shape.geometry_kind() == GeometryKind::Point
        || (shape.geometry_kind() == GeometryKind::None
            && shape.coordinates().kind() == CoordinateKind::Point);

    let mut layer = if is_point {
        let Some(center) = shape.feature().point() else {
            return Err(ModelError::GeometryCoordinateMismatch {
                geometry: shape.geometry_kind(),
                coordinates: shape.coordinates().kind(),
            });
        };
        StyleLayer::image(ImageStyle::Circle(CircleStyle {
            radius: pixel_radius(style.point_radius(), center, view),
            fill: Some(fill),
            stroke: Some(stroke),
        }))
    } else {
        StyleLayer {
            fill: Some(fill),
            stroke: Some(stroke),
            ..StyleLayer::default()
        }
    };

    if let Some(label) = style.label() {
        let placement = match shape.geometry_kind() {
            GeometryKind::LineString | GeometryKind::MultiLineString => TextPlacement::Line,
            _ => TextPlacement::Point,
        };
        layer.text = Some(label_text(label, style, placement));
    }

    Ok(vec![layer])
}

/// Converts a ground radius at `center` (declarative) to screen pixels.
fn pixel_radius(radius: f64, center: foundation::Coordinate, view: &View) -> f64 {
    let per_pixel = view.point_resolution(view.to_native(center));
    if per_pixel > 0.0 && per_pixel.is_finite() {
        radius / per_pixel
    } else {
        radius
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{StyleState, resolve};
    use crate::style::{ImageStyle, TextPlacement};
    use crate::symbology::{FALLBACK_STROKE_COLOR, StyleDefaults};
    use foundation::{Coordinate, CoordinateSet, FnProjection, View};
    use pretty_assertions::assert_eq;
    use scene::{GeometryKind, MarkerKind, ModelError, Shape};

    fn view() -> View {
        View::default()
    }

    #[test]
    fn state_follows_marker_kind() {
        let at = Coordinate::new(1.0, 2.0);
        assert_eq!(StyleState::of(&Shape::point(at)), StyleState::Default);
        assert_eq!(StyleState::of(&Shape::pin(at)), StyleState::Pin);
        assert_eq!(StyleState::of(&Shape::flag(at, "x")), StyleState::Flag);
        assert_eq!(StyleState::of(&Shape::awesome(at, 'a')), StyleState::Awesome);
        assert_eq!(StyleState::of(&Shape::image(at, "a.png")), StyleState::Image);
    }

    #[test]
    fn layer_counts_per_state() {
        let at = Coordinate::new(1.0, 2.0);
        let defaults = StyleDefaults::default();
        let count = |s: &Shape| resolve(s, &defaults, &view()).unwrap().len();
        assert_eq!(count(&Shape::pin(at)), 2);
        assert_eq!(count(&Shape::flag(at, "Start")), 2);
        assert_eq!(count(&Shape::awesome(at, 'a')), 3);
        assert_eq!(count(&Shape::image(at, "a.png")), 1);
        assert_eq!(count(&Shape::point(at)), 1);
    }

    #[test]
    fn resolving_twice_gives_equal_layers() {
        let defaults = StyleDefaults::default();
        let mut shape = Shape::flag(Coordinate::new(5.0, 6.0), "Camp");
        shape.background_color = Some("#00ff00".into());
        let first = resolve(&shape, &defaults, &view()).unwrap();
        let second = resolve(&shape, &defaults, &view()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn point_radius_is_divided_by_point_resolution() {
        let projection = FnProjection::new(|c| c, |c| c).with_point_resolution(|res, _| res * 2.0);
        let view = View::new(Arc::new(projection), 5.0);
        let mut shape = Shape::point(Coordinate::new(0.0, 0.0));
        shape.set_radius(Some(100.0));

        let layers = resolve(&shape, &StyleDefaults::default(), &view).unwrap();
        match layers[0].image.as_ref() {
            Some(ImageStyle::Circle(circle)) => {
                assert_eq!(circle.radius, 10.0);
                assert_eq!(circle.stroke.as_ref().unwrap().color, FALLBACK_STROKE_COLOR);
            }
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn outline_shapes_get_fill_stroke_and_line_labels() {
        let mut line = Shape::line(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)]);
        line.set_label(Some("Rhine".into()));
        line.border_size = Some(4.0);
        let layers = resolve(&line, &StyleDefaults::default(), &view()).unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].stroke.as_ref().unwrap().width, 4.0);
        let text = layers[0].text.as_ref().unwrap();
        assert_eq!(text.text, "Rhine");
        assert_eq!(text.placement, TextPlacement::Line);

        let polygon = Shape::polygon(vec![vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 1.0),
        ]]);
        let layers = resolve(&polygon, &StyleDefaults::default(), &view()).unwrap();
        assert!(layers[0].fill.is_some());
        assert!(layers[0].text.is_none());
    }

    #[test]
    fn defaults_apply_when_shape_is_silent() {
        let defaults = StyleDefaults {
            stroke_color: Some("#123456".into()),
            ..StyleDefaults::default()
        };
        let line = Shape::line(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)]);
        let layers = resolve(&line, &defaults, &view()).unwrap();
        assert_eq!(layers[0].stroke.as_ref().unwrap().color, "#123456");
    }

    #[test]
    fn marker_without_point_is_rejected() {
        let mut shape = Shape::line(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)]);
        shape.set_marker_kind(Some(MarkerKind::Pin));
        let err = resolve(&shape, &StyleDefaults::default(), &view()).unwrap_err();
        assert!(matches!(err, ModelError::GeometryCoordinateMismatch { .. }));
    }

    #[test]
    fn mismatched_default_geometry_is_rejected() {
        let mut shape = Shape::new();
        shape
            .feature_mut()
            .set_geometry(GeometryKind::Polygon, CoordinateSet::point(Coordinate::new(0.0, 0.0)));
        assert!(resolve(&shape, &StyleDefaults::default(), &view()).is_err());
    }
}
