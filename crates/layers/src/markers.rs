//! Style synthesis for each marker kind.

use scene::{Shape, keys};

use crate::labels::label_text;
use crate::raster::{FLAG_HEIGHT, rasterize_flag};
use crate::style::{
    AnchorUnits, Fill, IconStyle, ImageSource, ImageStyle, Stroke, StyleLayer, TextPlacement,
    TextStyle,
};
use crate::symbology::{ShapeStyle, parse_color};

pub const PIN_BACK_SRC: &str = "img/pin-back.png";
pub const PIN_BACK_ANCHOR: [f64; 2] = [100.0, 306.0];
pub const PIN_ANCHOR: [f64; 2] = [100.0, 300.0];
pub const PIN_DEFAULT_SCALE: f64 = 0.2;

/// Pixel offset of the flag tip relative to the pole foot.
pub const FLAG_TEXT_OFFSET: [f64; 2] = [22.0, -(FLAG_HEIGHT as f64) + 6.0];
pub const FLAG_TEXT_PADDING: [f64; 4] = [3.0, 5.0, 3.0, 5.0];

pub const AWESOME_BACK_SRC: &str = "img/marker-awesome.png";
pub const AWESOME_GLYPH_FONT: &str = "normal 18px FontAwesome";
pub const AWESOME_DEFAULT_GLYPH: char = '\u{f041}';
pub const AWESOME_GLYPH_OFFSET_Y: f64 = -24.0;
pub const AWESOME_CAPTION_OFFSET_Y: f64 = -48.0;

pub fn pin_src(color: &str) -> String {
    format!("img/pin-{color}.png")
}

/// Pins shrink the large source images; an unset scale or 1 means the default.
fn pin_scale(shape: &Shape) -> f64 {
    match shape.scale {
        Some(s) if (s - 1.0).abs() > f64::EPSILON => s,
        _ => PIN_DEFAULT_SCALE,
    }
}

fn icon(src: ImageSource, anchor: [f64; 2], units: AnchorUnits, scale: f64) -> IconStyle {
    IconStyle {
        src,
        anchor,
        anchor_units: units,
        size: None,
        rotation: 0.0,
        scale,
    }
}

pub fn pin_layers(shape: &Shape, style: &ShapeStyle<'_>) -> Vec<StyleLayer> {
    let scale = pin_scale(shape);
    vec![
        StyleLayer::image(ImageStyle::Icon(icon(
            ImageSource::Url(PIN_BACK_SRC.to_string()),
            PIN_BACK_ANCHOR,
            AnchorUnits::Pixels,
            scale,
        ))),
        StyleLayer::image(ImageStyle::Icon(icon(
            ImageSource::Url(pin_src(style.pin_color())),
            PIN_ANCHOR,
            AnchorUnits::Pixels,
            scale,
        ))),
    ]
}

pub fn flag_layers(shape: &Shape, style: &ShapeStyle<'_>) -> Vec<StyleLayer> {
    let fill = parse_color(style.fill_color()).unwrap_or([255, 255, 255, 255]);
    let stroke = parse_color(style.stroke_color()).unwrap_or([0, 0, 0, 255]);
    let raster = rasterize_flag(fill, stroke, style.stroke_width());
    let scale = shape.scale.unwrap_or(1.0);

    let props = shape.properties();
    let offset_x = props
        .get_f64(keys::TEXT_OFFSET_X)
        .unwrap_or(FLAG_TEXT_OFFSET[0]);
    let offset_y = props
        .get_f64(keys::TEXT_OFFSET_Y)
        .unwrap_or(FLAG_TEXT_OFFSET[1]);
    let padding = props
        .get_as::<[f64; 4]>(keys::PADDING)
        .unwrap_or(FLAG_TEXT_PADDING);

    let text = TextStyle {
        text: style.label().unwrap_or_default().to_string(),
        font: style.font().to_string(),
        scale: style.text_scale(),
        offset_x,
        offset_y,
        placement: TextPlacement::Point,
        text_align: Some("left".to_string()),
        fill: Some(Fill::new(style.text_color())),
        stroke: None,
        background_fill: Some(Fill::new(style.fill_color())),
        background_stroke: Some(Stroke::new(style.stroke_color(), style.stroke_width())),
        padding: Some(padding),
    };

    vec![
        StyleLayer::image(ImageStyle::Icon(icon(
            ImageSource::Raster(raster),
            [0.0, 1.0],
            AnchorUnits::Fraction,
            scale,
        ))),
        StyleLayer::text(text),
    ]
}

pub fn awesome_layers(shape: &Shape, style: &ShapeStyle<'_>) -> Vec<StyleLayer> {
    let scale = shape.scale.unwrap_or(1.0);
    let glyph = shape.glyph().unwrap_or(AWESOME_DEFAULT_GLYPH);

    let glyph_text = TextStyle {
        text: glyph.to_string(),
        font: AWESOME_GLYPH_FONT.to_string(),
        scale,
        offset_x: 0.0,
        offset_y: AWESOME_GLYPH_OFFSET_Y * scale,
        placement: TextPlacement::Point,
        text_align: None,
        fill: Some(Fill::new(style.text_color())),
        stroke: None,
        background_fill: None,
        background_stroke: None,
        padding: None,
    };

    let mut caption = label_text(
        style.label().unwrap_or_default(),
        style,
        TextPlacement::Point,
    );
    caption.offset_y = AWESOME_CAPTION_OFFSET_Y * scale;

    vec![
        StyleLayer::image(ImageStyle::Icon(icon(
            ImageSource::Url(AWESOME_BACK_SRC.to_string()),
            [0.5, 1.0],
            AnchorUnits::Fraction,
            scale,
        ))),
        StyleLayer::text(glyph_text),
        StyleLayer::text(caption),
    ]
}

pub fn image_layers(shape: &Shape) -> Vec<StyleLayer> {
    let props = shape.properties();
    let icon = IconStyle {
        src: ImageSource::Url(props.get_str(keys::SRC).unwrap_or_default().to_string()),
        anchor: props.get_as::<[f64; 2]>(keys::ANCHOR).unwrap_or([0.5, 0.5]),
        anchor_units: AnchorUnits::Fraction,
        size: props.get_as::<[f64; 2]>(keys::SIZE),
        rotation: props.get_f64(keys::ROTATION).unwrap_or(0.0),
        scale: shape.scale.unwrap_or(1.0),
    };
    vec![StyleLayer::image(ImageStyle::Icon(icon))]
}
