use slotmap::SlotMap;

use crate::error::TopologyError;
use crate::geometry::Geometry;
use crate::math::Coord;

use super::directed_edge::{DirEdgeId, DirectedEdge};
use super::edge::{Edge, EdgeId};
use super::edge_star::DirectedEdgeStar;
use super::node::{Node, NodeMap};

/// Arena-backed planar graph of edges, directed edges and nodes.
///
/// Components refer to each other by slotmap keys, so the cyclic
/// `sym`/`next` structure never needs shared mutable references.
#[derive(Debug, Default)]
pub struct PlanarGraph {
    edges: SlotMap<EdgeId, Edge>,
    dir_edges: SlotMap<DirEdgeId, DirectedEdge>,
    nodes: NodeMap<DirectedEdgeStar>,
}

impl PlanarGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Edges ---

    /// Stores an edge without creating directed edges for it.
    pub fn insert_edge(&mut self, edge: Edge) -> EdgeId {
        self.edges.insert(edge)
    }

    /// Stores edges, creates both directed edges for each and inserts them
    /// into the stars of their origin nodes.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DegenerateEdgeEnd`] for an edge starting or
    /// ending with a zero-length segment.
    pub fn add_edges(&mut self, edges: impl IntoIterator<Item = Edge>) -> Result<Vec<EdgeId>, TopologyError> {
        let mut ids = Vec::new();
        for edge in edges {
            let id = self.edges.insert(edge);
            let pair = self
                .edges
                .get(id)
                .map(|e| Ok::<_, TopologyError>((DirectedEdge::new(id, e, true)?, DirectedEdge::new(id, e, false)?)));
            let (fwd, rev) = match pair {
                Some(Ok(pair)) => pair,
                Some(Err(err)) => {
                    self.edges.remove(id);
                    return Err(err);
                }
                None => continue,
            };
            let fwd_id = self.dir_edges.insert(fwd);
            let rev_id = self.dir_edges.insert(rev);
            for (de_id, sym_id) in [(fwd_id, rev_id), (rev_id, fwd_id)] {
                if let Some(de) = self.dir_edges.get_mut(de_id) {
                    de.sym = sym_id;
                }
            }
            self.add_to_node(fwd_id);
            self.add_to_node(rev_id);
            ids.push(id);
        }
        Ok(ids)
    }

    fn add_to_node(&mut self, id: DirEdgeId) {
        let Some(coord) = self.dir_edges.get(id).map(|de| *de.coord()) else {
            return;
        };
        self.nodes.add_node(&coord).star_mut().insert(id, &self.dir_edges);
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter()
    }

    pub fn edges_mut(&mut self) -> impl Iterator<Item = (EdgeId, &mut Edge)> {
        self.edges.iter_mut()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // --- Directed edges ---

    #[must_use]
    pub fn dir_edge(&self, id: DirEdgeId) -> Option<&DirectedEdge> {
        self.dir_edges.get(id)
    }

    pub fn dir_edge_mut(&mut self, id: DirEdgeId) -> Option<&mut DirectedEdge> {
        self.dir_edges.get_mut(id)
    }

    pub fn dir_edges(&self) -> impl Iterator<Item = (DirEdgeId, &DirectedEdge)> {
        self.dir_edges.iter()
    }

    /// Finds the forward directed edge of `edge`.
    #[must_use]
    pub fn find_edge_end(&self, edge: EdgeId) -> Option<DirEdgeId> {
        self.dir_edges
            .iter()
            .find(|(_, de)| de.edge() == edge && de.is_forward())
            .map(|(id, _)| id)
    }

    // --- Nodes ---

    /// Returns the node at `coord`, creating it if needed.
    pub fn add_node(&mut self, coord: &Coord) -> &mut Node<DirectedEdgeStar> {
        self.nodes.add_node(coord)
    }

    #[must_use]
    pub fn find_node(&self, coord: &Coord) -> Option<&Node<DirectedEdgeStar>> {
        self.nodes.find(coord)
    }

    #[must_use]
    pub fn nodes(&self) -> &NodeMap<DirectedEdgeStar> {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut NodeMap<DirectedEdgeStar> {
        &mut self.nodes
    }

    /// Returns `true` if a node at `coord` lies on the boundary of operand `geom_index`.
    #[must_use]
    pub fn is_boundary_node(&self, geom_index: usize, coord: &Coord) -> bool {
        self.nodes.is_boundary_node(geom_index, coord)
    }

    // --- Labelling and linking ---

    /// Labels the directed edges and nodes of every star.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if side locations are inconsistent.
    pub fn compute_labelling(&mut self, geometries: [&Geometry; 2]) -> Result<(), TopologyError> {
        for node in self.nodes.iter_mut() {
            let at = *node.coord();
            node.star_mut()
                .compute_labelling(&at, &mut self.dir_edges, &self.edges, geometries)?;
            if let Some(label) = node.star().label().copied() {
                node.label_mut().merge(&label);
            }
        }
        Ok(())
    }

    /// Links the result directed edges at every node into rings.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NoOutgoingEdge`] if a node has an incoming
    /// result edge and no outgoing one.
    pub fn link_result_directed_edges(&mut self) -> Result<(), TopologyError> {
        for node in self.nodes.iter() {
            node.star()
                .link_result_directed_edges(node.coord(), &mut self.dir_edges)?;
        }
        Ok(())
    }

    /// Propagates depths around the origin node of `start`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DepthMismatch`] or
    /// [`TopologyError::DepthConflict`] on inconsistent depths.
    pub fn compute_depths(&mut self, start: DirEdgeId) -> Result<(), TopologyError> {
        let Some(at) = self.dir_edges.get(start).map(|de| *de.coord()) else {
            return Ok(());
        };
        let Some(node) = self.nodes.find(&at) else {
            return Err(TopologyError::DepthMismatch { at });
        };
        node.star()
            .compute_depths(start, &at, &mut self.dir_edges, &self.edges)
    }

    /// Follows `next` links from every unvisited result edge and returns the
    /// coordinates of each ring traced.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::EdgeVisitedTwice`] if a ring revisits an edge
    /// before closing, or [`TopologyError::NoOutgoingEdge`] if a result edge
    /// was never linked.
    pub fn result_rings(&mut self) -> Result<Vec<Vec<Coord>>, TopologyError> {
        let starts: Vec<DirEdgeId> = self
            .dir_edges
            .iter()
            .filter(|(_, de)| de.is_in_result())
            .map(|(id, _)| id)
            .collect();

        let mut rings = Vec::new();
        for start in starts {
            if self.dir_edges.get(start).is_none_or(DirectedEdge::is_visited) {
                continue;
            }
            rings.push(self.trace_ring(start)?);
        }
        Ok(rings)
    }

    fn trace_ring(&mut self, start: DirEdgeId) -> Result<Vec<Coord>, TopologyError> {
        let mut pts: Vec<Coord> = Vec::new();
        let mut current = start;
        loop {
            let Some(de) = self.dir_edges.get_mut(current) else {
                let at = pts.last().copied().unwrap_or_else(Coord::origin);
                return Err(TopologyError::NoOutgoingEdge { at });
            };
            if de.is_visited() {
                return Err(TopologyError::EdgeVisitedTwice { at: *de.coord() });
            }
            de.set_visited(true);
            let forward = de.is_forward();
            let at = *de.coord();
            let next = de.next();

            if let Some(edge) = self.edges.get(de.edge()) {
                let coords = edge.coords();
                let skip = usize::from(!pts.is_empty());
                if forward {
                    pts.extend(coords.iter().skip(skip));
                } else {
                    pts.extend(coords.iter().rev().skip(skip));
                }
            }

            match next {
                Some(next) if next == start => return Ok(pts),
                Some(next) => current = next,
                None => return Err(TopologyError::NoOutgoingEdge { at }),
            }
        }
    }
}
