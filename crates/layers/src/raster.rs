//! Small software rasterizer for synthesized marker images.

use crate::style::RasterImage;

/// Flag image dimensions in pixels.
pub const FLAG_WIDTH: u32 = 32;
pub const FLAG_HEIGHT: u32 = 32;

/// Flag outline in pixel space: a pole on the left with a triangular pennant
/// pointing right. The pole foot is the last vertex.
pub fn flag_polygon(width: f64, height: f64) -> Vec<[f64; 2]> {
    vec![
        [1.0, 1.0],
        [width - 1.0, height * 0.3],
        [3.0, height * 0.6],
        [3.0, height - 1.0],
        [1.0, height - 1.0],
    ]
}

/// Rasterizes the flag polygon, filled with `fill` and outlined with `stroke`.
pub fn rasterize_flag(fill: [u8; 4], stroke: [u8; 4], stroke_width: f64) -> RasterImage {
    let polygon = flag_polygon(FLAG_WIDTH as f64, FLAG_HEIGHT as f64);
    rasterize_polygon(FLAG_WIDTH, FLAG_HEIGHT, &polygon, fill, stroke, stroke_width)
}

pub fn rasterize_polygon(
    width: u32,
    height: u32,
    polygon: &[[f64; 2]],
    fill: [u8; 4],
    stroke: [u8; 4],
    stroke_width: f64,
) -> RasterImage {
    let mut image = RasterImage::new(width, height);
    if polygon.len() < 3 {
        return image;
    }
    let half = (stroke_width * 0.5).max(0.0);

    for y in 0..height {
        for x in 0..width {
            // Sample at the pixel center.
            let p = [x as f64 + 0.5, y as f64 + 0.5];
            if half > 0.0 && distance_to_outline(p, polygon) <= half {
                image.set_pixel(x, y, stroke);
            } else if contains(polygon, p) {
                image.set_pixel(x, y, fill);
            }
        }
    }
    image
}

/// Even-odd point-in-polygon test.
fn contains(polygon: &[[f64; 2]], p: [f64; 2]) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a[1] > p[1]) != (b[1] > p[1]) {
            let x_cross = a[0] + (p[1] - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
            if p[0] < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn distance_to_outline(p: [f64; 2], polygon: &[[f64; 2]]) -> f64 {
    let mut best = f64::INFINITY;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        best = best.min(distance_to_segment(p, polygon[j], polygon[i]));
        j = i;
    }
    best
}

fn distance_to_segment(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let len2 = dx * dx + dy * dy;
    let t = if len2 <= 0.0 {
        0.0
    } else {
        (((p[0] - a[0]) * dx + (p[1] - a[1]) * dy) / len2).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a[0] + t * dx, a[1] + t * dy);
    ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::{FLAG_HEIGHT, FLAG_WIDTH, rasterize_flag, rasterize_polygon};

    const FILL: [u8; 4] = [0, 0, 255, 255];
    const STROKE: [u8; 4] = [255, 0, 0, 255];

    #[test]
    fn fills_interior_and_strokes_edges() {
        let square = [[2.0, 2.0], [18.0, 2.0], [18.0, 18.0], [2.0, 18.0]];
        let img = rasterize_polygon(20, 20, &square, FILL, STROKE, 2.0);
        assert_eq!(img.pixel(10, 10), Some(FILL));
        assert_eq!(img.pixel(2, 10), Some(STROKE));
        assert_eq!(img.pixel(0, 0), Some([0, 0, 0, 0]));
    }

    #[test]
    fn flag_pennant_is_filled_and_tail_is_transparent() {
        let img = rasterize_flag(FILL, STROKE, 1.0);
        assert_eq!(img.width, FLAG_WIDTH);
        assert_eq!(img.height, FLAG_HEIGHT);
        // Inside the pennant, near the pole.
        assert_eq!(img.pixel(8, 9), Some(FILL));
        // Right of the pole, below the pennant.
        assert_eq!(img.pixel(20, 28), Some([0, 0, 0, 0]));
    }

    #[test]
    fn rasterizing_is_deterministic() {
        assert_eq!(
            rasterize_flag(FILL, STROKE, 1.0),
            rasterize_flag(FILL, STROKE, 1.0)
        );
    }
}
