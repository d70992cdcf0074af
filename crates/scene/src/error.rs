use foundation::CoordinateKind;

use crate::components::GeometryKind;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The geometry kind needs a different coordinate nesting than is stored.
    GeometryCoordinateMismatch {
        geometry: GeometryKind,
        coordinates: CoordinateKind,
    },
    /// A circle without a numeric `radius` property.
    MissingRadius,
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::GeometryCoordinateMismatch {
                geometry,
                coordinates,
            } => write!(
                f,
                "geometry {geometry} does not accept {coordinates:?} coordinates"
            ),
            ModelError::MissingRadius => write!(f, "circle geometry requires a radius"),
        }
    }
}

impl std::error::Error for ModelError {}
