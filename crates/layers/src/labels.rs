use crate::style::{Fill, Stroke, TextPlacement, TextStyle};
use crate::symbology::ShapeStyle;

/// Halo drawn behind plain labels so they stay legible over any fill.
pub const LABEL_HALO_COLOR: &str = "#FFFFFF";
pub const LABEL_HALO_WIDTH: f64 = 3.0;

/// A haloed label in the shape's resolved text colour and scale.
pub fn label_text(text: &str, style: &ShapeStyle<'_>, placement: TextPlacement) -> TextStyle {
    TextStyle {
        text: text.to_string(),
        font: style.font().to_string(),
        scale: style.text_scale(),
        offset_x: 0.0,
        offset_y: 0.0,
        placement,
        text_align: None,
        fill: Some(Fill::new(style.text_color())),
        stroke: Some(Stroke::new(LABEL_HALO_COLOR, LABEL_HALO_WIDTH)),
        background_fill: None,
        background_stroke: None,
        padding: None,
    }
}

#[cfg(test)]
mod tests {
    use super::label_text;
    use crate::style::TextPlacement;
    use crate::symbology::{ShapeStyle, StyleDefaults};
    use foundation::Coordinate;
    use scene::Shape;

    #[test]
    fn label_uses_resolved_text_color() {
        let mut shape = Shape::line(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)]);
        shape.color = Some("#112233".into());
        shape.text_scale = Some(1.5);
        let defaults = StyleDefaults::default();
        let text = label_text("River", &ShapeStyle::new(&shape, &defaults), TextPlacement::Line);
        assert_eq!(text.fill.unwrap().color, "#112233");
        assert_eq!(text.scale, 1.5);
        assert_eq!(text.placement, TextPlacement::Line);
    }
}
