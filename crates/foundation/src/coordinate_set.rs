use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::bounds::Extent;
use crate::codec::{decode, encode};
use crate::coord::Coordinate;

/// Which projection of a [`CoordinateSet`] is valid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateKind {
    Point,
    List,
    MultiList,
}

impl CoordinateKind {
    /// Array nesting depth of the wire encoding.
    pub fn depth(self) -> usize {
        match self {
            CoordinateKind::Point => 1,
            CoordinateKind::List => 2,
            CoordinateKind::MultiList => 3,
        }
    }
}

/// One coordinate, a list of coordinates, or a list of lists.
///
/// Storage is always a list of lists; `Point` and `List` are projections of
/// index 0. The projection accessors return `None` when read through the
/// wrong kind.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSet {
    kind: CoordinateKind,
    data: Vec<Vec<Coordinate>>,
}

impl Default for CoordinateSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl CoordinateSet {
    /// The empty `List`.
    pub fn empty() -> Self {
        Self {
            kind: CoordinateKind::List,
            data: vec![Vec::new()],
        }
    }

    pub fn point(c: Coordinate) -> Self {
        Self {
            kind: CoordinateKind::Point,
            data: vec![vec![c]],
        }
    }

    pub fn list(coords: Vec<Coordinate>) -> Self {
        Self {
            kind: CoordinateKind::List,
            data: vec![coords],
        }
    }

    pub fn multi_list(lists: Vec<Vec<Coordinate>>) -> Self {
        Self {
            kind: CoordinateKind::MultiList,
            data: lists,
        }
    }

    pub fn kind(&self) -> CoordinateKind {
        self.kind
    }

    pub fn as_point(&self) -> Option<Coordinate> {
        match self.kind {
            CoordinateKind::Point => self.data.first().and_then(|l| l.first()).copied(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Coordinate]> {
        match self.kind {
            CoordinateKind::List => Some(self.data.first().map(Vec::as_slice).unwrap_or(&[])),
            _ => None,
        }
    }

    pub fn as_multi_list(&self) -> Option<&[Vec<Coordinate>]> {
        match self.kind {
            CoordinateKind::MultiList => Some(&self.data),
            _ => None,
        }
    }

    /// Every coordinate in storage order, regardless of kind.
    pub fn iter(&self) -> impl Iterator<Item = &Coordinate> + '_ {
        self.data.iter().flatten()
    }

    pub fn coordinate_count(&self) -> usize {
        self.data.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinate_count() == 0
    }

    /// Applies `f` to every coordinate, keeping the kind and nesting.
    pub fn map<F: FnMut(Coordinate) -> Coordinate>(&self, mut f: F) -> Self {
        Self {
            kind: self.kind,
            data: self
                .data
                .iter()
                .map(|l| l.iter().map(|c| f(*c)).collect())
                .collect(),
        }
    }

    pub fn extent(&self) -> Option<Extent> {
        Extent::from_coordinates(self.iter().copied())
    }

    pub fn to_json(&self) -> serde_json::Value {
        encode(self)
    }
}

impl From<Coordinate> for CoordinateSet {
    fn from(c: Coordinate) -> Self {
        Self::point(c)
    }
}

impl From<Vec<Coordinate>> for CoordinateSet {
    fn from(v: Vec<Coordinate>) -> Self {
        Self::list(v)
    }
}

impl From<Vec<Vec<Coordinate>>> for CoordinateSet {
    fn from(v: Vec<Vec<Coordinate>>) -> Self {
        Self::multi_list(v)
    }
}

impl Serialize for CoordinateSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CoordinateSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        decode(&value).map_err(serde::de::Error::custom)
    }
}
