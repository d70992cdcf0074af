use std::fmt;
use std::sync::Arc;

use crate::coord::Coordinate;

/// Pluggable transform between the declarative projection (what shapes are
/// written in) and the renderer's internal projection.
///
/// Implementations are pure functions; `from_native(to_native(c))` must
/// return `c` up to float rounding.
pub trait Projection: Send + Sync {
    fn to_native(&self, c: Coordinate) -> Coordinate;

    fn from_native(&self, c: Coordinate) -> Coordinate;

    /// Ground distance covered by `resolution` native units at `at` (a native coordinate).
    fn point_resolution(&self, resolution: f64, _at: Coordinate) -> f64 {
        resolution
    }
}

/// Declarative and native coordinates are the same.
#[derive(Debug, Default, Copy, Clone)]
pub struct Identity;

impl Projection for Identity {
    fn to_native(&self, c: Coordinate) -> Coordinate {
        c
    }

    fn from_native(&self, c: Coordinate) -> Coordinate {
        c
    }
}

type TransformFn = Box<dyn Fn(Coordinate) -> Coordinate + Send + Sync>;
type ResolutionFn = Box<dyn Fn(f64, Coordinate) -> f64 + Send + Sync>;

/// A projection assembled from injected transform functions.
pub struct FnProjection {
    forward: TransformFn,
    inverse: TransformFn,
    point_resolution: Option<ResolutionFn>,
}

impl FnProjection {
    pub fn new(
        forward: impl Fn(Coordinate) -> Coordinate + Send + Sync + 'static,
        inverse: impl Fn(Coordinate) -> Coordinate + Send + Sync + 'static,
    ) -> Self {
        Self {
            forward: Box::new(forward),
            inverse: Box::new(inverse),
            point_resolution: None,
        }
    }

    pub fn with_point_resolution(
        mut self,
        f: impl Fn(f64, Coordinate) -> f64 + Send + Sync + 'static,
    ) -> Self {
        self.point_resolution = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for FnProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProjection")
            .field("point_resolution", &self.point_resolution.is_some())
            .finish_non_exhaustive()
    }
}

impl Projection for FnProjection {
    fn to_native(&self, c: Coordinate) -> Coordinate {
        (self.forward)(c)
    }

    fn from_native(&self, c: Coordinate) -> Coordinate {
        (self.inverse)(c)
    }

    fn point_resolution(&self, resolution: f64, at: Coordinate) -> f64 {
        match &self.point_resolution {
            Some(f) => f(resolution, at),
            None => resolution,
        }
    }
}

/// Current map view: projection plus resolution, zoom and center.
#[derive(Clone)]
pub struct View {
    pub projection: Arc<dyn Projection>,
    /// Native units per pixel.
    pub resolution: f64,
    pub zoom: f64,
    /// Center in declarative coordinates.
    pub center: Coordinate,
}

impl View {
    pub fn new(projection: Arc<dyn Projection>, resolution: f64) -> Self {
        Self {
            projection,
            resolution,
            zoom: 0.0,
            center: Coordinate::default(),
        }
    }

    /// Ground units per pixel at native coordinate `at`.
    pub fn point_resolution(&self, at: Coordinate) -> f64 {
        self.projection.point_resolution(self.resolution, at)
    }

    /// Ground units per native unit at native coordinate `at`.
    pub fn unit_point_resolution(&self, at: Coordinate) -> f64 {
        self.projection.point_resolution(1.0, at)
    }

    pub fn to_native(&self, c: Coordinate) -> Coordinate {
        self.projection.to_native(c)
    }

    pub fn from_native(&self, c: Coordinate) -> Coordinate {
        self.projection.from_native(c)
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new(Arc::new(Identity), 1.0)
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("resolution", &self.resolution)
            .field("zoom", &self.zoom)
            .field("center", &self.center)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{FnProjection, Projection, View};
    use crate::coord::Coordinate;
    use std::sync::Arc;

    #[test]
    fn fn_projection_round_trips() {
        let p = FnProjection::new(
            |c| Coordinate::new(c.x() * 100.0, c.y() * 100.0),
            |c| Coordinate::new(c.x() / 100.0, c.y() / 100.0),
        );
        let c = Coordinate::new(1.25, -3.5);
        assert_eq!(p.from_native(p.to_native(c)), c);
        assert_eq!(p.point_resolution(2.0, c), 2.0);
    }

    #[test]
    fn view_point_resolution_uses_projection() {
        let p = FnProjection::new(|c| c, |c| c).with_point_resolution(|r, at| r * (1.0 + at.y()));
        let view = View::new(Arc::new(p), 4.0);
        let at = Coordinate::new(0.0, 1.0);
        assert_eq!(view.point_resolution(at), 8.0);
        assert_eq!(view.unit_point_resolution(at), 2.0);
    }
}
