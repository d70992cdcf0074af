use foundation::{CodecError, CoordinateKind, FeatureId, LayerId};
use scene::{GeometryKind, ModelError};

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeError {
    /// The renderer reported a geometry type name this model does not know.
    UnknownGeometryKind(String),
    GeometryCoordinateMismatch {
        geometry: GeometryKind,
        coordinates: CoordinateKind,
    },
    MissingRadius,
    StyleIntrospectionFailure(String),
    SerializationLimitExceeded { count: usize, limit: usize },
    Codec(CodecError),
    UnknownLayer(LayerId),
    UnknownShape { layer: LayerId, id: FeatureId },
}

impl std::fmt::Display for BridgeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeError::UnknownGeometryKind(name) => write!(f, "unknown geometry type: {name}"),
            BridgeError::GeometryCoordinateMismatch {
                geometry,
                coordinates,
            } => write!(
                f,
                "geometry {geometry} does not accept {coordinates:?} coordinates"
            ),
            BridgeError::MissingRadius => write!(f, "circle geometry requires a radius"),
            BridgeError::StyleIntrospectionFailure(msg) => {
                write!(f, "could not read native style: {msg}")
            }
            BridgeError::SerializationLimitExceeded { count, limit } => write!(
                f,
                "geometry has {count} coordinates, over the serialization limit of {limit}"
            ),
            BridgeError::Codec(e) => write!(f, "coordinate codec: {e}"),
            BridgeError::UnknownLayer(layer) => write!(f, "unknown layer: {layer}"),
            BridgeError::UnknownShape { layer, id } => {
                write!(f, "shape {id} is not in {layer}")
            }
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for BridgeError {
    fn from(e: CodecError) -> Self {
        BridgeError::Codec(e)
    }
}

impl From<ModelError> for BridgeError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::GeometryCoordinateMismatch {
                geometry,
                coordinates,
            } => BridgeError::GeometryCoordinateMismatch {
                geometry,
                coordinates,
            },
            ModelError::MissingRadius => BridgeError::MissingRadius,
        }
    }
}
