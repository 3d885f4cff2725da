use crate::error::TopologyError;
use crate::topology::{GeometryGraph, Location, Node, NodeMap};

use super::edge_end_bundle::EdgeEndBundleStar;
use super::edge_end_builder::{compute_edge_ends, RelateEdgeEnd};

/// A node of the relate graph, holding bundles of edge ends.
pub type RelateNode = Node<EdgeEndBundleStar>;

/// Nodes and edge-end bundles derived from noded geometry graphs.
///
/// Only nodes and their incident edge ends are kept; edges themselves stay
/// in the geometry graphs.
#[derive(Debug, Default)]
pub struct RelateNodeGraph {
    nodes: NodeMap<EdgeEndBundleStar>,
}

impl RelateNodeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the node graph of a single self-noded geometry graph.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DegenerateEdgeEnd`] if an edge end has zero length.
    pub fn build(gg: &mut GeometryGraph<'_>) -> Result<Self, TopologyError> {
        let mut graph = Self::new();
        graph.compute_intersection_nodes(gg);
        graph.copy_nodes_and_labels(gg);
        let ends = compute_edge_ends(gg.edges_mut().map(|(_, e)| e))?;
        graph.insert_edge_ends(ends);
        Ok(graph)
    }

    /// Creates a node for every intersection on every edge of `gg`.
    ///
    /// A node on a boundary edge toggles between boundary and interior with
    /// each boundary edge passing through it; any other node is interior
    /// unless already labelled.
    pub fn compute_intersection_nodes(&mut self, gg: &GeometryGraph<'_>) {
        let arg = gg.arg_index();
        for (_, edge) in gg.edges() {
            let on_boundary = edge.location(arg) == Some(Location::Boundary);
            for ei in edge.intersections().iter() {
                let node = self.nodes.add_node(&ei.coord);
                if on_boundary {
                    node.toggle_boundary(arg);
                } else if node.label().is_null(arg) {
                    node.set_location(arg, Location::Interior);
                }
            }
        }
    }

    /// Copies every node of `gg` with its own location, overriding any
    /// location derived from intersections.
    pub fn copy_nodes_and_labels(&mut self, gg: &GeometryGraph<'_>) {
        let arg = gg.arg_index();
        for src in gg.nodes().iter() {
            let node = self.nodes.add_node(src.coord());
            if let Some(loc) = src.label().location(arg) {
                node.set_location(arg, loc);
            }
        }
    }

    /// Adds each edge end to the star of the node at its origin.
    pub fn insert_edge_ends(&mut self, ends: Vec<RelateEdgeEnd>) {
        for e in ends {
            self.nodes.add_node(e.end.coord()).star_mut().insert(e);
        }
    }

    #[must_use]
    pub fn nodes(&self) -> &NodeMap<EdgeEndBundleStar> {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut NodeMap<EdgeEndBundleStar> {
        &mut self.nodes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{BoundaryNodeRule, Geometry};
    use crate::math::{Coord, RobustLineIntersector};
    use crate::topology::EdgeSetIntersectorKind;

    #[test]
    fn square_ring_nodes() {
        let square = Geometry::polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
        let mut gg = GeometryGraph::build(&square, 0, BoundaryNodeRule::Mod2).unwrap();
        let graph = RelateNodeGraph::build(&mut gg).unwrap();
        assert_eq!(graph.nodes().len(), 1);
        let node = graph.nodes().find(&Coord::new(0.0, 0.0)).unwrap();
        assert_eq!(node.label().location(0), Some(Location::Boundary));
        assert_eq!(node.star().degree(), 2);
    }

    #[test]
    fn self_touching_ring_node_is_shared() {
        // Shell touching itself at (2, 0).
        let poly = Geometry::polygon(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (3.0, 2.0),
            (2.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (0.0, 4.0),
            (0.0, 0.0),
        ]);
        let mut gg = GeometryGraph::build(&poly, 0, BoundaryNodeRule::Mod2).unwrap();
        let li = RobustLineIntersector::new();
        gg.compute_self_nodes(&li, true, &EdgeSetIntersectorKind::Simple)
            .unwrap();
        let graph = RelateNodeGraph::build(&mut gg).unwrap();
        let node = graph.nodes().find(&Coord::new(2.0, 0.0)).unwrap();
        assert!(node.star().degree() >= 3);
    }
}
