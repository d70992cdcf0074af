use crate::coord::Coordinate;

/// Axis-aligned bounding box over coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Extent {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Extent {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Extent { min, max }
    }

    pub fn from_coordinates(coords: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut extent = Extent::new(first.to_array(), first.to_array());
        for c in iter {
            extent.extend(c);
        }
        Some(extent)
    }

    pub fn extend(&mut self, c: Coordinate) {
        self.min[0] = self.min[0].min(c.x());
        self.min[1] = self.min[1].min(c.y());
        self.max[0] = self.max[0].max(c.x());
        self.max[1] = self.max[1].max(c.y());
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        )
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        c.x() >= self.min[0] && c.x() <= self.max[0] && c.y() >= self.min[1] && c.y() <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::Extent;
    use crate::coord::Coordinate;

    #[test]
    fn center_and_contains() {
        let extent = Extent::from_coordinates([Coordinate::new(0.0, 0.0), Coordinate::new(4.0, 2.0)])
            .unwrap();
        assert_eq!(extent.center(), Coordinate::new(2.0, 1.0));
        assert!(extent.contains(Coordinate::new(1.0, 1.0)));
        assert!(!extent.contains(Coordinate::new(5.0, 1.0)));
    }
}
