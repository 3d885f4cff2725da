use crate::error::{GeometryError, Result, TopologyError};
use crate::geometry::{BoundaryNodeRule, Dimension, Geometry};
use crate::math::RobustLineIntersector;
use crate::operations::query::PointLocator;
use crate::topology::{EdgeHandle, EdgeSetIntersectorKind, GeometryGraph, IntersectionSummary, Location};

use super::edge_end_builder::compute_edge_ends;
use super::edge_end_bundle::update_im_from_label;
use super::matrix::IntersectionMatrix;
use super::relate_node_graph::RelateNodeGraph;

/// Computes the intersection matrix of two geometries by noding their graphs
/// against each other and labelling every node and edge end.
#[derive(Debug)]
pub struct RelateComputer<'a> {
    arg: [GeometryGraph<'a>; 2],
    li: RobustLineIntersector,
    esi: EdgeSetIntersectorKind,
    locator: PointLocator,
    graph: RelateNodeGraph,
    isolated_edges: Vec<EdgeHandle>,
}

impl<'a> RelateComputer<'a> {
    /// Builds the geometry graphs of both operands.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`](crate::error::GeometryError) if either
    /// operand has a degenerate component or a non-finite coordinate.
    pub fn new(
        a: &'a Geometry,
        b: &'a Geometry,
        rule: BoundaryNodeRule,
        esi: EdgeSetIntersectorKind,
    ) -> Result<Self> {
        Ok(Self {
            arg: [GeometryGraph::build(a, 0, rule)?, GeometryGraph::build(b, 1, rule)?],
            li: RobustLineIntersector::new(),
            esi,
            locator: PointLocator::new(rule),
            graph: RelateNodeGraph::new(),
            isolated_edges: Vec::new(),
        })
    }

    /// Computes the matrix.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if the combined graph is inconsistent,
    /// which happens for self-overlapping input.
    pub fn compute_im(&mut self) -> Result<IntersectionMatrix> {
        let mut im = IntersectionMatrix::new();
        im.set(Location::Exterior, Location::Exterior, Dimension::Area);

        let [ga, gb] = [self.arg[0].geometry(), self.arg[1].geometry()];
        let overlap = match (ga.envelope(), gb.envelope()) {
            (Some(ea), Some(eb)) => ea.intersects(&eb),
            _ => false,
        };
        if !overlap {
            tracing::debug!("envelopes disjoint, skipping noding");
            compute_disjoint_im(&mut im, &self.arg);
            return Ok(im);
        }
        self.compute_noded_im(im)
    }

    /// Computes the matrix by full noding, even for disjoint envelopes.
    pub(crate) fn compute_noded_im(&mut self, mut im: IntersectionMatrix) -> Result<IntersectionMatrix> {
        im.set(Location::Exterior, Location::Exterior, Dimension::Area);
        let [ga, gb] = [self.arg[0].geometry(), self.arg[1].geometry()];
        let (li, esi) = (self.li, self.esi);
        let [g0, g1] = &mut self.arg;
        g0.compute_self_nodes(&li, false, &esi)?;
        g1.compute_self_nodes(&li, false, &esi)?;
        // Proper intersections are not noded; they are accounted for below.
        let summary = g0.compute_edge_intersections(g1, &li, false, &esi)?;
        tracing::debug!(
            tests = summary.num_tests,
            intersections = summary.num_intersections,
            proper = summary.has_proper,
            proper_interior = summary.has_proper_interior,
            "operands noded"
        );

        for gg in &self.arg {
            self.graph.compute_intersection_nodes(gg);
        }
        for gg in &self.arg {
            self.graph.copy_nodes_and_labels(gg);
        }
        self.label_isolated_nodes()?;
        compute_proper_intersection_im(&summary, ga.dimension(), gb.dimension(), &mut im)?;

        for gg in &mut self.arg {
            let ends = compute_edge_ends(gg.edges_mut().map(|(_, e)| e))?;
            self.graph.insert_edge_ends(ends);
        }
        self.label_node_edges()?;

        self.label_isolated_edges(0, 1);
        self.label_isolated_edges(1, 0);

        self.update_im(&mut im);
        tracing::debug!(matrix = %im, "relate computed");
        Ok(im)
    }

    /// Locates nodes seen by one operand only against the other operand.
    fn label_isolated_nodes(&mut self) -> std::result::Result<(), TopologyError> {
        let geometries = [self.arg[0].geometry(), self.arg[1].geometry()];
        for node in self.graph.nodes_mut().iter_mut() {
            let label = node.label();
            if label.geometry_count() == 0 {
                return Err(TopologyError::UnlabelledNode { at: *node.coord() });
            }
            if node.is_isolated() {
                let target = if label.is_null(0) { 0 } else { 1 };
                let loc = self.locator.locate(node.coord(), geometries[target]);
                node.label_mut().set_all_locations(target, loc);
            }
        }
        Ok(())
    }

    fn label_node_edges(&mut self) -> std::result::Result<(), TopologyError> {
        let geometries = [self.arg[0].geometry(), self.arg[1].geometry()];
        let rule = self.arg[0].boundary_rule();
        for node in self.graph.nodes_mut().iter_mut() {
            let at = *node.coord();
            node.star_mut().compute_labelling(&at, rule, geometries)?;
            tracing::trace!(x = at.x, y = at.y, label = %node.label(), "node labelled");
        }
        Ok(())
    }

    /// Labels the edges of operand `this` that meet no edge of operand
    /// `target`. Such an edge lies wholly in one location of the target.
    fn label_isolated_edges(&mut self, this: usize, target: usize) {
        let target_geom = self.arg[target].geometry();
        let locator = self.locator;
        for (id, edge) in self.arg[this].edges_mut() {
            if !edge.is_isolated() {
                continue;
            }
            let loc = if target_geom.dimension() > Dimension::Point {
                locator.locate(&edge.start(), target_geom)
            } else {
                Location::Exterior
            };
            edge.label_mut().set_all_locations(target, loc);
            self.isolated_edges.push(EdgeHandle::new(this, id));
        }
    }

    fn update_im(&self, im: &mut IntersectionMatrix) {
        for handle in &self.isolated_edges {
            if let Some(edge) = self.arg[handle.graph].edge(handle.id) {
                update_im_from_label(edge.label(), im);
            }
        }
        for node in self.graph.nodes().iter() {
            let label = node.label();
            im.set_at_least_if_valid(label.location(0), label.location(1), Dimension::Point);
            node.star().update_im(im);
        }
    }
}

/// Fills the matrix of two geometries known not to meet: each one's interior
/// and boundary lie in the other's exterior.
///
/// Boundary dimensions come from the unnoded graphs, so line endpoints are
/// counted with the same boundary rule as full noding would use.
fn compute_disjoint_im(im: &mut IntersectionMatrix, arg: &[GeometryGraph<'_>; 2]) {
    use Location::{Boundary, Exterior, Interior};
    let [a, b] = arg;
    if !a.geometry().is_empty() {
        im.set(Interior, Exterior, a.geometry().dimension());
        im.set(Boundary, Exterior, a.boundary_dimension());
    }
    if !b.geometry().is_empty() {
        im.set(Exterior, Interior, b.geometry().dimension());
        im.set(Exterior, Boundary, b.boundary_dimension());
    }
}

/// Lower bounds implied by proper intersections, which are not noded.
///
/// A proper intersection of two areas means their interiors overlap. For an
/// area and a line, the line's interior crosses the area's boundary, and
/// unless the crossing is at a boundary node it also enters both the area's
/// interior and exterior.
fn compute_proper_intersection_im(
    summary: &IntersectionSummary,
    dim_a: Dimension,
    dim_b: Dimension,
    im: &mut IntersectionMatrix,
) -> std::result::Result<(), GeometryError> {
    use Dimension::{Area, Curve};
    let patterns: &[(bool, &str)] = match (dim_a, dim_b) {
        (Area, Area) => &[(summary.has_proper, "212101212")],
        (Area, Curve) => &[
            (summary.has_proper, "FFF0FFFF2"),
            (summary.has_proper_interior, "1FFFFF1FF"),
        ],
        (Curve, Area) => &[
            (summary.has_proper, "F0FFFFFF2"),
            (summary.has_proper_interior, "1F1FFFFFF"),
        ],
        (Curve, Curve) => &[(summary.has_proper_interior, "0FFFFFFFF")],
        _ => &[],
    };
    for (applies, pattern) in patterns {
        if *applies {
            im.set_at_least_pattern(pattern)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Coord;

    fn compute(a: &Geometry, b: &Geometry) -> IntersectionMatrix {
        RelateComputer::new(a, b, BoundaryNodeRule::Mod2, EdgeSetIntersectorKind::Simple)
            .unwrap()
            .compute_im()
            .unwrap()
    }

    #[test]
    fn proper_patterns_by_dimension() {
        let summary = IntersectionSummary {
            has_proper: true,
            has_proper_interior: true,
            ..IntersectionSummary::default()
        };
        let mut im = IntersectionMatrix::new();
        compute_proper_intersection_im(&summary, Dimension::Curve, Dimension::Area, &mut im).unwrap();
        assert_eq!(im.to_string(), "101FFFFF2");

        let mut im = IntersectionMatrix::new();
        compute_proper_intersection_im(&summary, Dimension::Point, Dimension::Area, &mut im).unwrap();
        assert_eq!(im, IntersectionMatrix::new());
    }

    #[test]
    fn disjoint_matrix_uses_dimensions() {
        let line = Geometry::line_string(&[(0.0, 0.0), (1.0, 0.0)]);
        let square = Geometry::polygon(&[(5.0, 5.0), (6.0, 5.0), (6.0, 6.0), (5.0, 6.0), (5.0, 5.0)]);
        assert_eq!(compute(&line, &square).to_string(), "FF1FF0212");
        let empty = Geometry::GeometryCollection(vec![]);
        assert_eq!(compute(&empty, &square).to_string(), "FFFFFF212");
    }

    #[test]
    fn disjoint_shortcut_matches_full_noding() {
        let a = Geometry::polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        let b = Geometry::line_string(&[(3.0, 3.0), (4.0, 4.0), (5.0, 3.0)]);
        let mut rc = RelateComputer::new(&a, &b, BoundaryNodeRule::Mod2, EdgeSetIntersectorKind::Simple).unwrap();
        let full = rc.compute_noded_im(IntersectionMatrix::new()).unwrap();
        assert_eq!(full, compute(&a, &b));
        assert_eq!(full.to_string(), "FF2FF1102");
    }

    #[test]
    fn crossing_lines_meet_in_a_point() {
        let a = Geometry::line_string(&[(0.0, 0.0), (2.0, 2.0)]);
        let b = Geometry::line_string(&[(0.0, 2.0), (2.0, 0.0)]);
        assert_eq!(compute(&a, &b).to_string(), "0F1FF0102");
    }

    #[test]
    fn point_on_line_endpoint() {
        let p = Geometry::point(0.0, 0.0);
        let line = Geometry::line_string(&[(0.0, 0.0), (2.0, 0.0)]);
        assert_eq!(compute(&p, &line).to_string(), "F0FFFF102");
    }

    fn compute_with(a: &Geometry, b: &Geometry, rule: BoundaryNodeRule) -> IntersectionMatrix {
        RelateComputer::new(a, b, rule, EdgeSetIntersectorKind::Simple)
            .unwrap()
            .compute_im()
            .unwrap()
    }

    fn noded_with(a: &Geometry, b: &Geometry, rule: BoundaryNodeRule) -> IntersectionMatrix {
        RelateComputer::new(a, b, rule, EdgeSetIntersectorKind::Simple)
            .unwrap()
            .compute_noded_im(IntersectionMatrix::new())
            .unwrap()
    }

    #[test]
    fn shortcut_counts_line_endpoints() {
        let looped = Geometry::MultiLineString(vec![
            vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0), Coord::new(1.0, 1.0)],
            vec![Coord::new(1.0, 1.0), Coord::new(0.0, 1.0), Coord::new(0.0, 0.0)],
        ]);
        let far = Geometry::point(100.0, 100.0);
        let shortcut = compute_with(&looped, &far, BoundaryNodeRule::Mod2);
        assert_eq!(shortcut.to_string(), "FF1FFF0F2");
        assert_eq!(shortcut, noded_with(&looped, &far, BoundaryNodeRule::Mod2));
        let inside = Geometry::point(0.5, 0.5);
        assert_eq!(compute_with(&looped, &inside, BoundaryNodeRule::Mod2), shortcut);
    }

    #[test]
    fn shortcut_uses_boundary_rule() {
        let ring = Geometry::line_string(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        let far = Geometry::point(100.0, 100.0);
        let shortcut = compute_with(&ring, &far, BoundaryNodeRule::Endpoint);
        assert_eq!(shortcut.to_string(), "FF1FF00F2");
        assert_eq!(shortcut, noded_with(&ring, &far, BoundaryNodeRule::Endpoint));
        assert_eq!(compute_with(&ring, &far, BoundaryNodeRule::Mod2).to_string(), "FF1FFF0F2");
    }

    fn rule_of(i: u8) -> BoundaryNodeRule {
        match i {
            0 => BoundaryNodeRule::Mod2,
            1 => BoundaryNodeRule::Endpoint,
            2 => BoundaryNodeRule::MultivalentEndpoint,
            _ => BoundaryNodeRule::MonovalentEndpoint,
        }
    }

    /// One of several shapes on the rectangle `[x, x + w] x [y, y + h]`.
    fn shape_of(kind: u8, x: f64, y: f64, w: f64, h: f64) -> Geometry {
        let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h), (x, y)];
        let pts = |r: &[(f64, f64)]| r.iter().map(|&(px, py)| Coord::new(px, py)).collect::<Vec<_>>();
        match kind {
            0 => Geometry::polygon(&corners),
            1 => Geometry::MultiLineString(vec![pts(&corners[..3]), pts(&corners[2..])]),
            2 => Geometry::line_string(&corners),
            _ => Geometry::line_string(&corners[..4]),
        }
    }

    proptest::proptest! {
        #[test]
        fn shortcut_agrees_with_noding(
            x in -50i32..50, y in -50i32..50, w in 1i32..10, h in 1i32..10,
            dx in 11i32..40, len in 1i32..10,
            kind_a in 0u8..4, kind_b in 0u8..5, rule in 0u8..4,
        ) {
            let (x, y, w, h) = (f64::from(x), f64::from(y), f64::from(w), f64::from(h));
            let rule = rule_of(rule);
            let a = shape_of(kind_a, x, y, w, h);
            let sx = x + w + f64::from(dx);
            let b = if kind_b == 4 {
                Geometry::point(sx, y)
            } else {
                shape_of(kind_b, sx, y, f64::from(len), h)
            };
            proptest::prop_assert_eq!(compute_with(&a, &b, rule), noded_with(&a, &b, rule));
        }
    }
}
