use std::collections::BTreeMap;

use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::{BoundaryNodeRule, Dimension, Geometry, Polygon};
use crate::math::polygon_2d::{is_ccw, remove_repeated_points};
use crate::math::{is_finite, Coord, LineIntersector};

use super::edge::{Edge, EdgeId};
use super::edge_star::DirectedEdgeStar;
use super::label::{Label, Location};
use super::node::NodeMap;
use super::planar_graph::PlanarGraph;
use super::segment_intersector::{
    EdgeHandle, EdgeSetIntersector, IntersectionSummary, NodingOutcome, SegmentIntersector,
};

/// Position of a linear component inside its geometry: the index of the
/// line string or polygon in traversal order, and the ring within a polygon
/// (0 for the shell and for line strings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentIndex {
    pub part: usize,
    pub ring: usize,
}

impl ComponentIndex {
    #[must_use]
    pub fn new(part: usize, ring: usize) -> Self {
        Self { part, ring }
    }
}

/// The planar graph of one relate operand.
///
/// Holds one edge per linear component and nodes for points, component
/// endpoints and, after noding, intersection points.
#[derive(Debug)]
pub struct GeometryGraph<'a> {
    geometry: &'a Geometry,
    arg_index: usize,
    rule: BoundaryNodeRule,
    use_boundary_determination_rule: bool,
    graph: PlanarGraph,
    component_edges: BTreeMap<ComponentIndex, EdgeId>,
}

impl<'a> GeometryGraph<'a> {
    /// Builds the graph of `geometry` as operand `arg_index`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::TooFewPoints`] for a line string with fewer
    /// than two distinct points or a ring with fewer than four, and
    /// [`GeometryError::NonFiniteCoordinate`] for NaN or infinite ordinates.
    pub fn build(geometry: &'a Geometry, arg_index: usize, rule: BoundaryNodeRule) -> Result<Self> {
        let mut gg = Self {
            geometry,
            arg_index,
            rule,
            use_boundary_determination_rule: true,
            graph: PlanarGraph::new(),
            component_edges: BTreeMap::new(),
        };
        let mut part = 0;
        gg.add(geometry, &mut part)?;
        tracing::trace!(
            arg_index,
            edges = gg.graph.edge_count(),
            nodes = gg.graph.nodes().len(),
            "geometry graph built"
        );
        Ok(gg)
    }

    fn add(&mut self, geometry: &Geometry, part: &mut usize) -> Result<()> {
        if geometry.is_empty() {
            return Ok(());
        }
        match geometry {
            Geometry::Point(p) => self.add_point(p)?,
            Geometry::MultiPoint(pts) => {
                for p in pts {
                    self.add_point(p)?;
                }
            }
            Geometry::LineString(pts) => self.add_line_string(pts, part)?,
            Geometry::MultiLineString(lines) => {
                for line in lines.iter().filter(|l| !l.is_empty()) {
                    self.add_line_string(line, part)?;
                }
            }
            Geometry::Polygon(poly) => self.add_polygon(poly, part)?,
            Geometry::MultiPolygon(polys) => {
                // Adjacent shells share boundary edges, which must stay boundary.
                self.use_boundary_determination_rule = false;
                for poly in polys.iter().filter(|p| !p.is_empty()) {
                    self.add_polygon(poly, part)?;
                }
            }
            Geometry::GeometryCollection(geoms) => {
                for g in geoms {
                    self.add(g, part)?;
                }
            }
        }
        Ok(())
    }

    fn add_point(&mut self, p: &Coord) -> Result<()> {
        check_finite(std::slice::from_ref(p))?;
        self.insert_point(p, Location::Interior);
        Ok(())
    }

    fn add_line_string(&mut self, pts: &[Coord], part: &mut usize) -> Result<()> {
        check_finite(pts)?;
        let coords = remove_repeated_points(pts);
        let (Some(first), Some(last)) = (coords.first().copied(), coords.last().copied()) else {
            return Ok(());
        };
        if coords.len() < 2 {
            return Err(GeometryError::TooFewPoints { at: first }.into());
        }

        let edge = Edge::new(coords, Label::line(self.arg_index, Location::Interior));
        let id = self.graph.insert_edge(edge);
        self.component_edges.insert(ComponentIndex::new(*part, 0), id);
        *part += 1;

        self.insert_boundary_point(&first);
        self.insert_boundary_point(&last);
        Ok(())
    }

    fn add_polygon(&mut self, poly: &Polygon, part: &mut usize) -> Result<()> {
        let index = *part;
        *part += 1;
        self.add_polygon_ring(&poly.shell, Location::Exterior, Location::Interior, ComponentIndex::new(index, 0))?;
        for (i, hole) in poly.holes.iter().enumerate() {
            // Holes are inverted: the polygon interior lies outside them.
            self.add_polygon_ring(hole, Location::Interior, Location::Exterior, ComponentIndex::new(index, i + 1))?;
        }
        Ok(())
    }

    /// Adds a ring with `cw_left`/`cw_right` as its side locations when the
    /// ring is clockwise.
    fn add_polygon_ring(
        &mut self,
        ring: &[Coord],
        cw_left: Location,
        cw_right: Location,
        component: ComponentIndex,
    ) -> Result<()> {
        if ring.is_empty() {
            return Ok(());
        }
        check_finite(ring)?;
        let coords = remove_repeated_points(ring);
        let start = coords[0];
        if coords.len() < 4 {
            return Err(GeometryError::TooFewPoints { at: start }.into());
        }

        let (left, right) = if is_ccw(&coords) {
            (cw_right, cw_left)
        } else {
            (cw_left, cw_right)
        };
        let edge = Edge::new(coords, Label::area(self.arg_index, Location::Boundary, left, right));
        let id = self.graph.insert_edge(edge);
        self.component_edges.insert(component, id);

        self.insert_point(&start, Location::Boundary);
        Ok(())
    }

    fn insert_point(&mut self, coord: &Coord, loc: Location) {
        self.graph.add_node(coord).set_location(self.arg_index, loc);
    }

    fn insert_boundary_point(&mut self, coord: &Coord) {
        self.graph
            .add_node(coord)
            .add_boundary_occurrence(self.arg_index, self.rule);
    }

    /// Nodes the edges of this graph at their self-intersections.
    ///
    /// Intersections between segments of the same ring are only computed for
    /// polygonal input when `compute_ring_self_nodes` is set.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::BadEdgeDistance`] if an intersection cannot
    /// be placed on an edge.
    pub fn compute_self_nodes(
        &mut self,
        li: &dyn LineIntersector,
        compute_ring_self_nodes: bool,
        esi: &dyn EdgeSetIntersector,
    ) -> std::result::Result<IntersectionSummary, TopologyError> {
        let test_all = compute_ring_self_nodes || !self.geometry.is_polygonal();
        let outcome = {
            let edges = self.handles();
            let mut si = SegmentIntersector::new(li, true, false);
            esi.compute_self(&edges, &mut si, test_all)?;
            si.finish()
        };
        self.apply(&outcome);
        self.add_self_intersection_nodes();
        Ok(outcome.summary)
    }

    /// Nodes the edges of this graph and `other` at their mutual intersections.
    ///
    /// Edges that touch an edge of the other graph are marked non-isolated.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::BadEdgeDistance`] if an intersection cannot
    /// be placed on an edge.
    pub fn compute_edge_intersections(
        &mut self,
        other: &mut GeometryGraph<'_>,
        li: &dyn LineIntersector,
        include_proper: bool,
        esi: &dyn EdgeSetIntersector,
    ) -> std::result::Result<IntersectionSummary, TopologyError> {
        let outcome = {
            let edges0 = self.handles();
            let edges1 = other.handles();
            let mut si = SegmentIntersector::new(li, include_proper, true);
            si.set_boundary_nodes(self.boundary_nodes(), other.boundary_nodes());
            esi.compute_mutual(&edges0, &edges1, &mut si)?;
            si.finish()
        };
        self.apply(&outcome);
        other.apply(&outcome);
        Ok(outcome.summary)
    }

    fn handles(&self) -> Vec<(EdgeHandle, &Edge)> {
        self.graph
            .edges()
            .map(|(id, e)| (EdgeHandle::new(self.arg_index, id), e))
            .collect()
    }

    fn apply(&mut self, outcome: &NodingOutcome) {
        for (handle, ei) in &outcome.hits {
            if handle.graph != self.arg_index {
                continue;
            }
            if let Some(edge) = self.graph.edge_mut(handle.id) {
                edge.intersections_mut().add(*ei);
            }
        }
        for handle in &outcome.non_isolated {
            if handle.graph != self.arg_index {
                continue;
            }
            if let Some(edge) = self.graph.edge_mut(handle.id) {
                edge.set_isolated(false);
            }
        }
    }

    fn add_self_intersection_nodes(&mut self) {
        let points: Vec<(Coord, Option<Location>)> = self
            .graph
            .edges()
            .flat_map(|(_, e)| {
                let loc = e.location(self.arg_index);
                e.intersections().iter().map(move |ei| (ei.coord, loc))
            })
            .collect();

        for (coord, loc) in points {
            if self.graph.is_boundary_node(self.arg_index, &coord) {
                continue;
            }
            match loc {
                Some(Location::Boundary) if self.use_boundary_determination_rule => {
                    self.insert_boundary_point(&coord);
                }
                Some(loc) => self.insert_point(&coord, loc),
                None => {}
            }
        }
    }

    #[must_use]
    pub fn geometry(&self) -> &'a Geometry {
        self.geometry
    }

    #[must_use]
    pub fn arg_index(&self) -> usize {
        self.arg_index
    }

    #[must_use]
    pub fn boundary_rule(&self) -> BoundaryNodeRule {
        self.rule
    }

    /// Edge derived from a linear component.
    #[must_use]
    pub fn find_edge(&self, component: ComponentIndex) -> Option<&Edge> {
        self.component_edges
            .get(&component)
            .and_then(|id| self.graph.edge(*id))
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.graph.edge(id)
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.graph.edges()
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = (EdgeId, &mut Edge)> {
        self.graph.edges_mut()
    }

    #[must_use]
    pub fn nodes(&self) -> &NodeMap<DirectedEdgeStar> {
        self.graph.nodes()
    }

    /// Dimension of this operand's boundary as the graph sees it: curves if
    /// any edge is an area edge, points if any node lies on the boundary
    /// under the graph's rule.
    #[must_use]
    pub fn boundary_dimension(&self) -> Dimension {
        if self.graph.edges().any(|(_, e)| e.label().is_area_of(self.arg_index)) {
            Dimension::Curve
        } else if self.graph.nodes().boundary_nodes(self.arg_index).next().is_some() {
            Dimension::Point
        } else {
            Dimension::Empty
        }
    }

    /// Coordinates of the nodes on this operand's boundary.
    #[must_use]
    pub fn boundary_nodes(&self) -> Vec<Coord> {
        self.graph
            .nodes()
            .boundary_nodes(self.arg_index)
            .map(|n| *n.coord())
            .collect()
    }
}

fn check_finite(pts: &[Coord]) -> Result<()> {
    if pts.iter().all(is_finite) {
        Ok(())
    } else {
        Err(GeometryError::NonFiniteCoordinate.into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::GeotopoError;
    use crate::math::RobustLineIntersector;
    use crate::topology::label::Position;
    use crate::topology::segment_intersector::EdgeSetIntersectorKind;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    fn location_at(gg: &GeometryGraph<'_>, p: Coord) -> Option<Location> {
        gg.nodes().find(&p).and_then(|n| n.label().location(gg.arg_index()))
    }

    #[test]
    fn line_endpoints_are_boundary() {
        let line = Geometry::line_string(&[(0.0, 0.0), (1.0, 1.0), (1.0, 1.0), (2.0, 0.0)]);
        let gg = GeometryGraph::build(&line, 0, BoundaryNodeRule::Mod2).unwrap();
        assert_eq!(gg.boundary_nodes(), vec![c(0.0, 0.0), c(2.0, 0.0)]);
        let edge = gg.find_edge(ComponentIndex::new(0, 0)).unwrap();
        assert_eq!(edge.num_points(), 3);
        assert_eq!(edge.location(0), Some(Location::Interior));
    }

    #[test]
    fn closed_line_has_no_boundary_under_mod2() {
        let ring = Geometry::line_string(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let gg = GeometryGraph::build(&ring, 1, BoundaryNodeRule::Mod2).unwrap();
        assert!(gg.boundary_nodes().is_empty());
        assert_eq!(location_at(&gg, c(0.0, 0.0)), Some(Location::Interior));

        let gg = GeometryGraph::build(&ring, 1, BoundaryNodeRule::Endpoint).unwrap();
        assert_eq!(gg.boundary_nodes(), vec![c(0.0, 0.0)]);
    }

    #[test]
    fn ring_sides_follow_orientation() {
        let cw = Geometry::polygon(&[(0.0, 0.0), (0.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0)]);
        let ccw = Geometry::polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        for (geom, right) in [(&cw, Location::Interior), (&ccw, Location::Exterior)] {
            let gg = GeometryGraph::build(geom, 0, BoundaryNodeRule::Mod2).unwrap();
            let edge = gg.find_edge(ComponentIndex::new(0, 0)).unwrap();
            assert_eq!(edge.label().get(0, Position::Right), Some(right));
            assert_eq!(edge.location(0), Some(Location::Boundary));
            assert_eq!(location_at(&gg, c(0.0, 0.0)), Some(Location::Boundary));
        }
    }

    #[test]
    fn hole_sides_are_inverted() {
        let poly = Geometry::polygon_with_holes(
            &[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0), (0.0, 0.0)],
            &[&[(2.0, 2.0), (2.0, 8.0), (8.0, 8.0), (8.0, 2.0), (2.0, 2.0)]],
        );
        let gg = GeometryGraph::build(&poly, 0, BoundaryNodeRule::Mod2).unwrap();
        let hole = gg.find_edge(ComponentIndex::new(0, 1)).unwrap();
        assert_eq!(hole.label().get(0, Position::Left), Some(Location::Interior));
        assert_eq!(hole.label().get(0, Position::Right), Some(Location::Exterior));
    }

    #[test]
    fn degenerate_components_are_rejected() {
        let line = Geometry::line_string(&[(1.0, 1.0), (1.0, 1.0)]);
        assert!(matches!(
            GeometryGraph::build(&line, 0, BoundaryNodeRule::Mod2),
            Err(GeotopoError::Geometry(GeometryError::TooFewPoints { .. }))
        ));
        let ring = Geometry::polygon(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        assert!(matches!(
            GeometryGraph::build(&ring, 0, BoundaryNodeRule::Mod2),
            Err(GeotopoError::Geometry(GeometryError::TooFewPoints { .. }))
        ));
        let nan = Geometry::point(f64::NAN, 0.0);
        assert!(matches!(
            GeometryGraph::build(&nan, 0, BoundaryNodeRule::Mod2),
            Err(GeotopoError::Geometry(GeometryError::NonFiniteCoordinate))
        ));
    }

    #[test]
    fn self_crossing_line_gets_interior_node() {
        let line = Geometry::line_string(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
        let mut gg = GeometryGraph::build(&line, 0, BoundaryNodeRule::Mod2).unwrap();
        let li = RobustLineIntersector::new();
        let summary = gg
            .compute_self_nodes(&li, false, &EdgeSetIntersectorKind::Simple)
            .unwrap();
        assert!(summary.has_proper);
        assert_eq!(location_at(&gg, c(1.0, 1.0)), Some(Location::Interior));
    }

    #[test]
    fn mutual_noding_marks_touching_edges() {
        let a = Geometry::line_string(&[(0.0, 0.0), (2.0, 2.0)]);
        let b = Geometry::MultiLineString(vec![
            vec![c(0.0, 2.0), c(2.0, 0.0)],
            vec![c(5.0, 5.0), c(6.0, 6.0)],
        ]);
        let mut ga = GeometryGraph::build(&a, 0, BoundaryNodeRule::Mod2).unwrap();
        let mut gb = GeometryGraph::build(&b, 1, BoundaryNodeRule::Mod2).unwrap();
        let li = RobustLineIntersector::new();
        let summary = ga
            .compute_edge_intersections(&mut gb, &li, false, &EdgeSetIntersectorKind::SweepLine)
            .unwrap();
        assert!(summary.has_proper_interior);

        assert!(!ga.find_edge(ComponentIndex::new(0, 0)).unwrap().is_isolated());
        assert!(!gb.find_edge(ComponentIndex::new(0, 0)).unwrap().is_isolated());
        assert!(gb.find_edge(ComponentIndex::new(1, 0)).unwrap().is_isolated());
    }

    #[test]
    fn boundary_dimension_counts_endpoints() {
        let looped = Geometry::MultiLineString(vec![
            vec![c(0.0, 0.0), c(1.0, 0.0), c(1.0, 1.0)],
            vec![c(1.0, 1.0), c(0.0, 1.0), c(0.0, 0.0)],
        ]);
        let gg = GeometryGraph::build(&looped, 0, BoundaryNodeRule::Mod2).unwrap();
        assert_eq!(gg.boundary_dimension(), Dimension::Empty);
        let gg = GeometryGraph::build(&looped, 0, BoundaryNodeRule::Endpoint).unwrap();
        assert_eq!(gg.boundary_dimension(), Dimension::Point);

        let square = Geometry::polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        let gg = GeometryGraph::build(&square, 1, BoundaryNodeRule::Mod2).unwrap();
        assert_eq!(gg.boundary_dimension(), Dimension::Curve);

        let points = Geometry::MultiPoint(vec![c(0.0, 0.0), c(3.0, 1.0)]);
        let gg = GeometryGraph::build(&points, 0, BoundaryNodeRule::Mod2).unwrap();
        assert_eq!(gg.boundary_dimension(), Dimension::Empty);
    }
}
