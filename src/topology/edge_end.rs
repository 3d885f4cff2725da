use std::cmp::Ordering;

use crate::error::TopologyError;
use crate::math::{orientation_index, Coord, Orientation};

/// Quadrant of a direction vector, numbered counter-clockwise from north-east.
///
/// Axis-aligned directions fall into the quadrant counter-clockwise of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quadrant {
    NorthEast,
    NorthWest,
    SouthWest,
    SouthEast,
}

impl Quadrant {
    /// Quadrant of the vector `(dx, dy)`.
    #[must_use]
    pub fn from_delta(dx: f64, dy: f64) -> Self {
        match (dx >= 0.0, dy >= 0.0) {
            (true, true) => Self::NorthEast,
            (false, true) => Self::NorthWest,
            (false, false) => Self::SouthWest,
            (true, false) => Self::SouthEast,
        }
    }

    #[must_use]
    pub fn is_northern(self) -> bool {
        matches!(self, Self::NorthEast | Self::NorthWest)
    }
}

/// The start of an edge as seen from a node: origin, a point giving the
/// direction, and the precomputed direction vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEnd {
    p0: Coord,
    p1: Coord,
    dx: f64,
    dy: f64,
    quadrant: Quadrant,
}

impl EdgeEnd {
    /// Creates an edge end leaving `p0` towards `p1`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DegenerateEdgeEnd`] if the points coincide.
    pub fn new(p0: Coord, p1: Coord) -> Result<Self, TopologyError> {
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        if dx == 0.0 && dy == 0.0 {
            return Err(TopologyError::DegenerateEdgeEnd { at: p0 });
        }
        Ok(Self {
            p0,
            p1,
            dx,
            dy,
            quadrant: Quadrant::from_delta(dx, dy),
        })
    }

    /// The node coordinate this end starts at.
    #[must_use]
    pub fn coord(&self) -> &Coord {
        &self.p0
    }

    /// The point defining the direction of the end.
    #[must_use]
    pub fn directed_coord(&self) -> &Coord {
        &self.p1
    }

    #[must_use]
    pub fn dx(&self) -> f64 {
        self.dx
    }

    #[must_use]
    pub fn dy(&self) -> f64 {
        self.dy
    }

    #[must_use]
    pub fn quadrant(&self) -> Quadrant {
        self.quadrant
    }

    /// Orders edge ends counter-clockwise around their common origin,
    /// starting from the positive x axis.
    ///
    /// Ends with identical direction vectors compare equal.
    #[must_use]
    pub fn compare_direction(&self, other: &EdgeEnd) -> Ordering {
        if self.dx == other.dx && self.dy == other.dy {
            return Ordering::Equal;
        }
        match self.quadrant.cmp(&other.quadrant) {
            Ordering::Equal => {}
            ord => return ord,
        }
        match orientation_index(&other.p0, &other.p1, &self.p1) {
            Orientation::CounterClockwise => Ordering::Greater,
            Orientation::Clockwise => Ordering::Less,
            Orientation::Collinear => Ordering::Equal,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn end(dx: f64, dy: f64) -> EdgeEnd {
        EdgeEnd::new(Coord::new(0.0, 0.0), Coord::new(dx, dy)).unwrap()
    }

    #[test]
    fn quadrants() {
        assert_eq!(Quadrant::from_delta(1.0, 0.0), Quadrant::NorthEast);
        assert_eq!(Quadrant::from_delta(0.0, 1.0), Quadrant::NorthEast);
        assert_eq!(Quadrant::from_delta(-1.0, 0.0), Quadrant::NorthWest);
        assert_eq!(Quadrant::from_delta(-1.0, -1.0), Quadrant::SouthWest);
        assert_eq!(Quadrant::from_delta(0.0, -1.0), Quadrant::SouthEast);
        assert!(Quadrant::NorthWest.is_northern());
        assert!(!Quadrant::SouthEast.is_northern());
    }

    #[test]
    fn ends_sort_counter_clockwise() {
        let mut ends = vec![end(1.0, -1.0), end(-1.0, 0.5), end(1.0, 2.0), end(1.0, 0.5)];
        ends.sort_by(EdgeEnd::compare_direction);
        let dirs: Vec<(f64, f64)> = ends.iter().map(|e| (e.dx(), e.dy())).collect();
        assert_eq!(dirs, vec![(1.0, 0.5), (1.0, 2.0), (-1.0, 0.5), (1.0, -1.0)]);
    }

    #[test]
    fn same_direction_compares_equal() {
        let a = end(2.0, 2.0);
        let b = EdgeEnd::new(Coord::new(0.0, 0.0), Coord::new(1.0, 1.0)).unwrap();
        assert_eq!(a.compare_direction(&b), Ordering::Equal);
    }

    #[test]
    fn zero_length_end_is_rejected() {
        let p = Coord::new(3.0, 4.0);
        assert!(matches!(
            EdgeEnd::new(p, p),
            Err(TopologyError::DegenerateEdgeEnd { .. })
        ));
    }
}
