use foundation::CoordinateKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    #[default]
    None,
    Point,
    LineString,
    Polygon,
    Circle,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            GeometryKind::None => "None",
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::Circle => "Circle",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
        }
    }

    /// Parses a renderer geometry type name; unknown names are `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "None" => Some(GeometryKind::None),
            "Point" => Some(GeometryKind::Point),
            "LineString" => Some(GeometryKind::LineString),
            "Polygon" => Some(GeometryKind::Polygon),
            "Circle" => Some(GeometryKind::Circle),
            "MultiPoint" => Some(GeometryKind::MultiPoint),
            "MultiLineString" => Some(GeometryKind::MultiLineString),
            "MultiPolygon" => Some(GeometryKind::MultiPolygon),
            _ => None,
        }
    }

    /// Coordinate nesting this geometry requires. `None` accepts any.
    ///
    /// MultiPolygon carries one exterior ring per polygon.
    pub fn coordinate_kind(self) -> Option<CoordinateKind> {
        match self {
            GeometryKind::None => None,
            GeometryKind::Point | GeometryKind::Circle => Some(CoordinateKind::Point),
            GeometryKind::LineString | GeometryKind::MultiPoint => Some(CoordinateKind::List),
            GeometryKind::Polygon | GeometryKind::MultiLineString | GeometryKind::MultiPolygon => {
                Some(CoordinateKind::MultiList)
            }
        }
    }
}

impl std::fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::GeometryKind;
    use foundation::CoordinateKind;

    #[test]
    fn parse_matches_as_str() {
        for kind in [
            GeometryKind::None,
            GeometryKind::Point,
            GeometryKind::LineString,
            GeometryKind::Polygon,
            GeometryKind::Circle,
            GeometryKind::MultiPoint,
            GeometryKind::MultiLineString,
            GeometryKind::MultiPolygon,
        ] {
            assert_eq!(GeometryKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(GeometryKind::parse("GeometryCollection"), None);
    }

    #[test]
    fn circle_uses_point_coordinates() {
        assert_eq!(
            GeometryKind::Circle.coordinate_kind(),
            Some(CoordinateKind::Point)
        );
        assert_eq!(
            GeometryKind::Polygon.coordinate_kind(),
            Some(CoordinateKind::MultiList)
        );
    }
}
