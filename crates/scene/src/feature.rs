use foundation::{Coordinate, CoordinateKind, CoordinateSet, FeatureId};

use crate::components::{GeometryKind, PropertyBag};
use crate::error::ModelError;
use crate::keys;

/// Identity, geometry kind, coordinates and free-form properties.
///
/// Changing the geometry kind never reshapes the coordinates; use
/// [`Feature::validate`] to check that the two agree.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: FeatureId,
    geometry_kind: GeometryKind,
    coordinates: CoordinateSet,
    properties: PropertyBag,
}

impl Default for Feature {
    fn default() -> Self {
        Self::new()
    }
}

impl Feature {
    /// A feature with a fresh random id, no geometry and an empty list of coordinates.
    pub fn new() -> Self {
        Self::with_id(FeatureId::random())
    }

    pub fn with_id(id: impl Into<FeatureId>) -> Self {
        Self {
            id: id.into(),
            geometry_kind: GeometryKind::None,
            coordinates: CoordinateSet::empty(),
            properties: PropertyBag::new(),
        }
    }

    pub fn id(&self) -> &FeatureId {
        &self.id
    }

    pub fn geometry_kind(&self) -> GeometryKind {
        self.geometry_kind
    }

    pub fn set_geometry_kind(&mut self, kind: GeometryKind) {
        self.geometry_kind = kind;
    }

    pub fn coordinates(&self) -> &CoordinateSet {
        &self.coordinates
    }

    /// Replaces the coordinate set wholesale.
    pub fn set_coordinates(&mut self, coordinates: impl Into<CoordinateSet>) {
        self.coordinates = coordinates.into();
    }

    /// Replaces geometry kind and coordinates together.
    pub fn set_geometry(&mut self, kind: GeometryKind, coordinates: impl Into<CoordinateSet>) {
        self.geometry_kind = kind;
        self.coordinates = coordinates.into();
    }

    pub fn properties(&self) -> &PropertyBag {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyBag {
        &mut self.properties
    }

    pub fn set_properties(&mut self, properties: PropertyBag) {
        self.properties = properties;
    }

    /// The single coordinate of a Point set or a one-element List.
    pub fn point(&self) -> Option<Coordinate> {
        match self.coordinates.kind() {
            CoordinateKind::Point => self.coordinates.as_point(),
            CoordinateKind::List => match self.coordinates.as_list() {
                Some([only]) => Some(*only),
                _ => None,
            },
            CoordinateKind::MultiList => None,
        }
    }

    pub fn coordinate_list(&self) -> Option<&[Coordinate]> {
        self.coordinates.as_list()
    }

    pub fn coordinate_multi_list(&self) -> Option<&[Vec<Coordinate>]> {
        self.coordinates.as_multi_list()
    }

    pub fn radius(&self) -> Option<f64> {
        self.properties.get_f64(keys::RADIUS)
    }

    /// Checks that the stored coordinates fit the geometry kind.
    pub fn validate(&self) -> Result<(), ModelError> {
        let Some(expected) = self.geometry_kind.coordinate_kind() else {
            return Ok(());
        };
        if self.coordinates.kind() != expected {
            return Err(ModelError::GeometryCoordinateMismatch {
                geometry: self.geometry_kind,
                coordinates: self.coordinates.kind(),
            });
        }
        if self.geometry_kind == GeometryKind::Circle && self.radius().is_none() {
            return Err(ModelError::MissingRadius);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Feature;
    use crate::components::GeometryKind;
    use crate::error::ModelError;
    use foundation::{Coordinate, CoordinateKind, CoordinateSet};

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    #[test]
    fn new_feature_has_id_and_empty_list() {
        let f = Feature::new();
        assert!(!f.id().as_str().is_empty());
        assert_eq!(f.geometry_kind(), GeometryKind::None);
        assert_eq!(f.coordinates().kind(), CoordinateKind::List);
        assert!(f.coordinates().is_empty());
        assert_ne!(Feature::new().id(), f.id());
    }

    #[test]
    fn point_accessor() {
        let mut f = Feature::new();
        f.set_coordinates(c(1.0, 2.0));
        assert_eq!(f.point(), Some(c(1.0, 2.0)));

        f.set_coordinates(vec![c(3.0, 4.0)]);
        assert_eq!(f.point(), Some(c(3.0, 4.0)));

        f.set_coordinates(vec![c(3.0, 4.0), c(5.0, 6.0)]);
        assert_eq!(f.point(), None);

        f.set_coordinates(vec![vec![c(3.0, 4.0)]]);
        assert_eq!(f.point(), None);
    }

    #[test]
    fn changing_kind_does_not_reshape() {
        let mut f = Feature::new();
        f.set_geometry(GeometryKind::LineString, vec![c(0.0, 0.0), c(1.0, 1.0)]);
        assert_eq!(f.validate(), Ok(()));

        f.set_geometry_kind(GeometryKind::Polygon);
        assert_eq!(f.coordinates().kind(), CoordinateKind::List);
        assert_eq!(
            f.validate(),
            Err(ModelError::GeometryCoordinateMismatch {
                geometry: GeometryKind::Polygon,
                coordinates: CoordinateKind::List,
            })
        );
    }

    #[test]
    fn circle_needs_radius() {
        let mut f = Feature::new();
        f.set_geometry(GeometryKind::Circle, CoordinateSet::point(c(0.0, 0.0)));
        assert_eq!(f.validate(), Err(ModelError::MissingRadius));
        f.properties_mut().set("radius", 250.0);
        assert_eq!(f.validate(), Ok(()));
    }

    #[test]
    fn equality_covers_all_fields() {
        let mut a = Feature::with_id("a");
        a.set_geometry(GeometryKind::Point, c(1.0, 1.0));
        let mut b = a.clone();
        assert_eq!(a, b);

        b.properties_mut().set("label", "x");
        assert_ne!(a, b);

        let mut other_id = Feature::with_id("b");
        other_id.set_geometry(GeometryKind::Point, c(1.0, 1.0));
        assert_ne!(a, other_id);

        a.set_coordinates(c(1.0, 2.0));
        b = a.clone();
        b.set_geometry_kind(GeometryKind::Circle);
        assert_ne!(a, b);
    }
}
