mod edge_end_builder;
mod edge_end_bundle;
mod matrix;
pub mod predicates;
mod relate_computer;
mod relate_node_graph;

pub use edge_end_builder::{compute_edge_ends, RelateEdgeEnd};
pub use edge_end_bundle::{update_im_from_label, EdgeEndBundle, EdgeEndBundleStar};
pub use matrix::IntersectionMatrix;
pub use relate_computer::RelateComputer;
pub use relate_node_graph::{RelateNode, RelateNodeGraph};

use crate::error::Result;
use crate::geometry::{BoundaryNodeRule, Geometry};
use crate::topology::EdgeSetIntersectorKind;

/// Computes the DE-9IM intersection matrix of two geometries.
pub struct RelateOp<'a> {
    a: &'a Geometry,
    b: &'a Geometry,
    rule: BoundaryNodeRule,
    esi: EdgeSetIntersectorKind,
}

impl<'a> RelateOp<'a> {
    /// Creates a new `RelateOp` with the `Mod2` boundary rule and the simple
    /// edge-set intersector.
    #[must_use]
    pub fn new(a: &'a Geometry, b: &'a Geometry) -> Self {
        Self {
            a,
            b,
            rule: BoundaryNodeRule::default(),
            esi: EdgeSetIntersectorKind::default(),
        }
    }

    /// Sets the rule deciding which line endpoints are boundary points.
    #[must_use]
    pub fn with_boundary_rule(mut self, rule: BoundaryNodeRule) -> Self {
        self.rule = rule;
        self
    }

    /// Chooses how candidate edge pairs are found during noding: `Simple`
    /// tests every pair, `SweepLine` only pairs whose x-extents overlap.
    #[must_use]
    pub fn with_edge_set_intersector(mut self, esi: EdgeSetIntersectorKind) -> Self {
        self.esi = esi;
        self
    }

    /// Executes the relate computation.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`](crate::error::GeometryError) for malformed
    /// input and a [`TopologyError`](crate::error::TopologyError) if the
    /// noded graph is inconsistent.
    pub fn execute(&self) -> Result<IntersectionMatrix> {
        RelateComputer::new(self.a, self.b, self.rule, self.esi)?.compute_im()
    }
}

/// Computes the intersection matrix of `a` and `b` with default settings.
///
/// # Errors
///
/// See [`RelateOp::execute`].
pub fn relate(a: &Geometry, b: &Geometry) -> Result<IntersectionMatrix> {
    RelateOp::new(a, b).execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::Dimension;
    use crate::math::Coord;
    use crate::topology::Location;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::polygon(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)])
    }

    #[test]
    fn nested_squares() {
        let outer = square(0.0, 0.0, 10.0, 10.0);
        let inner = square(2.0, 2.0, 8.0, 8.0);
        let im = relate(&outer, &inner).unwrap();
        assert_eq!(im.to_string(), "212FF1FF2");
        assert_eq!(im.get(Location::Interior, Location::Interior), Dimension::Area);
        assert!(im.is_contains());
        assert!(relate(&inner, &outer).unwrap().is_within());
    }

    #[test]
    fn squares_sharing_an_edge() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = square(10.0, 0.0, 20.0, 10.0);
        let im = relate(&a, &b).unwrap();
        assert_eq!(im.to_string(), "FF2F11212");
        assert!(im.is_touches(Dimension::Area, Dimension::Area));
        assert!(im.is_intersects());
        assert!(!im.is_overlaps(Dimension::Area, Dimension::Area));
    }

    #[test]
    fn line_crossing_square() {
        let line = Geometry::line_string(&[(0.0, 5.0), (10.0, 5.0)]);
        let sq = square(2.0, 2.0, 8.0, 8.0);
        let im = relate(&line, &sq).unwrap();
        assert_eq!(im.to_string(), "101FF0212");
        assert!(im.is_crosses(Dimension::Curve, Dimension::Area));
        assert_eq!(relate(&sq, &line).unwrap(), im.transpose());
    }

    #[test]
    fn point_inside_square() {
        let p = Geometry::point(5.0, 5.0);
        let sq = square(0.0, 0.0, 10.0, 10.0);
        let im = relate(&p, &sq).unwrap();
        assert_eq!(im.to_string(), "0FFFFF212");
        assert!(im.is_within());
        for b in [Location::Interior, Location::Boundary, Location::Exterior] {
            assert_eq!(im.get(Location::Boundary, b), Dimension::Empty);
        }
    }

    #[test]
    fn disjoint_squares() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(5.0, 5.0, 6.0, 6.0);
        let im = relate(&a, &b).unwrap();
        assert_eq!(im.to_string(), "FF2FF1212");
        assert!(im.is_disjoint());
        let swept = RelateOp::new(&a, &b)
            .with_edge_set_intersector(EdgeSetIntersectorKind::SweepLine)
            .execute()
            .unwrap();
        assert_eq!(swept, im);
    }

    #[test]
    fn boundary_rule_changes_shared_endpoint() {
        // Two lines meeting end to end at (1, 0).
        let a = Geometry::MultiLineString(vec![
            vec![crate::math::Coord::new(0.0, 0.0), crate::math::Coord::new(1.0, 0.0)],
            vec![crate::math::Coord::new(1.0, 0.0), crate::math::Coord::new(2.0, 0.0)],
        ]);
        let p = Geometry::point(1.0, 0.0);
        let mod2 = relate(&p, &a).unwrap();
        assert_eq!(mod2.get(Location::Interior, Location::Interior), Dimension::Point);
        let endpoint = RelateOp::new(&p, &a)
            .with_boundary_rule(BoundaryNodeRule::Endpoint)
            .execute()
            .unwrap();
        assert_eq!(endpoint.get(Location::Interior, Location::Boundary), Dimension::Point);
    }

    #[test]
    fn sweep_line_agrees_with_simple() {
        let line = Geometry::line_string(&[(0.0, 0.0), (4.0, 4.0), (8.0, 0.0), (8.0, 8.0)]);
        let sq = square(2.0, 1.0, 9.0, 5.0);
        let simple = relate(&line, &sq).unwrap();
        let swept = RelateOp::new(&line, &sq)
            .with_edge_set_intersector(EdgeSetIntersectorKind::SweepLine)
            .execute()
            .unwrap();
        assert_eq!(simple, swept);
    }

    #[test]
    fn point_on_edge_shared_by_adjacent_polygons() {
        let ring = |x0: f64| {
            vec![
                Coord::new(x0, 0.0),
                Coord::new(x0 + 10.0, 0.0),
                Coord::new(x0 + 10.0, 10.0),
                Coord::new(x0, 10.0),
                Coord::new(x0, 0.0),
            ]
        };
        let multi = Geometry::MultiPolygon(vec![
            crate::geometry::Polygon::new(ring(0.0), vec![]),
            crate::geometry::Polygon::new(ring(10.0), vec![]),
        ]);
        // Both shells pass through the point, so Mod2 puts it in the interior.
        let p = Geometry::point(10.0, 5.0);
        let im = relate(&p, &multi).unwrap();
        assert_eq!(im.to_string(), "0FFFFF212");
        assert_eq!(relate(&multi, &p).unwrap(), im.transpose());
    }

    #[test]
    fn collection_of_polygon_and_line() {
        let gc = Geometry::GeometryCollection(vec![
            square(0.0, 0.0, 10.0, 10.0),
            Geometry::line_string(&[(20.0, 0.0), (30.0, 0.0)]),
        ]);
        let p = Geometry::point(5.0, 5.0);
        let im = relate(&gc, &p).unwrap();
        assert_eq!(im.to_string(), "0F2FF1FF2");
        assert!(im.is_contains());
    }

    #[test]
    fn looped_lines_have_no_boundary_under_mod2() {
        let looped = Geometry::MultiLineString(vec![
            vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0), Coord::new(1.0, 1.0)],
            vec![Coord::new(1.0, 1.0), Coord::new(0.0, 1.0), Coord::new(0.0, 0.0)],
        ]);
        let joint = Geometry::point(1.0, 1.0);
        assert_eq!(relate(&joint, &looped).unwrap().to_string(), "0FFFFF1F2");
        let endpoint = RelateOp::new(&joint, &looped)
            .with_boundary_rule(BoundaryNodeRule::Endpoint)
            .execute()
            .unwrap();
        assert_eq!(endpoint.to_string(), "F0FFFF102");

        let self_im = relate(&looped, &looped).unwrap();
        assert_eq!(self_im.get(Location::Boundary, Location::Boundary), Dimension::Empty);
        assert_eq!(self_im.get(Location::Interior, Location::Interior), Dimension::Curve);
    }
}
