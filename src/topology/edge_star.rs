use slotmap::SlotMap;

use crate::error::TopologyError;
use crate::geometry::Geometry;
use crate::math::Coord;
use crate::operations::query::locate_in_area;

use super::directed_edge::{DirEdgeId, DirectedEdge};
use super::edge::{Edge, EdgeId};
use super::label::{Label, Location, Position};

/// Completes the labels of the edge ends around one node.
///
/// `labels` must be in counter-clockwise order. Side locations of area
/// ends are propagated around the node for each operand, then any location
/// still undetermined is filled in: `Exterior` if a collapsed area edge
/// (a line labelled `Boundary`) meets the node, otherwise the location of
/// the node in the operand's area.
///
/// # Errors
///
/// Returns [`TopologyError::SideLocationConflict`] or
/// [`TopologyError::SingleNullSide`] if the side labels are inconsistent.
pub fn label_edge_star(labels: &mut [&mut Label], at: &Coord, geometries: [&Geometry; 2]) -> Result<(), TopologyError> {
    propagate_side_labels(labels, 0, at)?;
    propagate_side_labels(labels, 1, at)?;

    let mut has_collapse = [false; 2];
    for label in labels.iter() {
        for (geom_index, collapse) in has_collapse.iter_mut().enumerate() {
            if label.is_line(geom_index) && label.location(geom_index) == Some(Location::Boundary) {
                *collapse = true;
            }
        }
    }

    let mut area_location: [Option<Location>; 2] = [None; 2];
    for label in labels.iter_mut() {
        for geom_index in 0..2 {
            if !label.is_any_null(geom_index) {
                continue;
            }
            let loc = if has_collapse[geom_index] {
                Location::Exterior
            } else {
                *area_location[geom_index].get_or_insert_with(|| locate_in_area(at, geometries[geom_index]))
            };
            label.set_all_locations_if_null(geom_index, loc);
        }
    }
    Ok(())
}

/// Walks the ends counter-clockwise, carrying the location between
/// consecutive ends across area edges.
fn propagate_side_labels(labels: &mut [&mut Label], geom_index: usize, at: &Coord) -> Result<(), TopologyError> {
    // Start from the left side of the last labelled area end.
    let start = labels
        .iter()
        .filter(|l| l.is_area_of(geom_index))
        .filter_map(|l| l.get(geom_index, Position::Left))
        .last();
    let Some(mut curr) = start else {
        return Ok(());
    };

    for label in labels.iter_mut() {
        if label.location(geom_index).is_none() {
            label.set(geom_index, Position::On, Some(curr));
        }
        if !label.is_area_of(geom_index) {
            continue;
        }
        let left = label.get(geom_index, Position::Left);
        let right = label.get(geom_index, Position::Right);
        match (left, right) {
            (Some(left), Some(right)) => {
                if right != curr {
                    return Err(TopologyError::SideLocationConflict { at: *at });
                }
                curr = left;
            }
            (None, None) => {
                label.set(geom_index, Position::Right, Some(curr));
                label.set(geom_index, Position::Left, Some(curr));
            }
            _ => return Err(TopologyError::SingleNullSide { at: *at }),
        }
    }
    Ok(())
}

/// Checks that area side locations alternate consistently around a node.
///
/// Every end must be an area end for `geom_index` with different left and
/// right locations, and each right location must match the left location of
/// the previous end.
#[must_use]
pub fn is_area_labelling_consistent(labels: &[&Label], geom_index: usize) -> bool {
    let Some(last) = labels.last() else {
        return true;
    };
    let Some(mut curr) = last.get(geom_index, Position::Left) else {
        return false;
    };
    for label in labels {
        if !label.is_area_of(geom_index) {
            return false;
        }
        let left = label.get(geom_index, Position::Left);
        let right = label.get(geom_index, Position::Right);
        if left == right || right != Some(curr) {
            return false;
        }
        match left {
            Some(left) => curr = left,
            None => return false,
        }
    }
    true
}

/// The directed edges leaving one node, in counter-clockwise order.
#[derive(Debug, Clone, Default)]
pub struct DirectedEdgeStar {
    edges: Vec<DirEdgeId>,
    label: Option<Label>,
}

impl DirectedEdgeStar {
    /// Inserts a directed edge in counter-clockwise position.
    ///
    /// A directed edge with the same direction as an existing one replaces it.
    pub fn insert(&mut self, id: DirEdgeId, dir_edges: &SlotMap<DirEdgeId, DirectedEdge>) {
        let Some(de) = dir_edges.get(id) else {
            return;
        };
        let search = self.edges.binary_search_by(|existing| {
            dir_edges
                .get(*existing)
                .map_or(std::cmp::Ordering::Less, |p| p.end().compare_direction(de.end()))
        });
        match search {
            Ok(i) => self.edges[i] = id,
            Err(i) => self.edges.insert(i, id),
        }
    }

    /// Directed edges in counter-clockwise order.
    #[must_use]
    pub fn edges(&self) -> &[DirEdgeId] {
        &self.edges
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// Overall node label computed by [`DirectedEdgeStar::compute_labelling`].
    #[must_use]
    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    /// Number of outgoing edges marked as in the result.
    #[must_use]
    pub fn outgoing_degree(&self, dir_edges: &SlotMap<DirEdgeId, DirectedEdge>) -> usize {
        self.edges
            .iter()
            .filter(|id| dir_edges.get(**id).is_some_and(DirectedEdge::is_in_result))
            .count()
    }

    /// Returns the edge with the rightmost direction at this node.
    ///
    /// Returns `None` for an empty star, or if the only candidates are two
    /// horizontal edges in different hemispheres.
    #[must_use]
    pub fn rightmost_edge(&self, dir_edges: &SlotMap<DirEdgeId, DirectedEdge>) -> Option<DirEdgeId> {
        let first = *self.edges.first()?;
        if self.edges.len() == 1 {
            return Some(first);
        }
        let last = *self.edges.last()?;
        let e0 = dir_edges.get(first)?.end();
        let e1 = dir_edges.get(last)?.end();
        let (n0, n1) = (e0.quadrant().is_northern(), e1.quadrant().is_northern());
        if n0 && n1 {
            Some(first)
        } else if !n0 && !n1 {
            Some(last)
        } else if e0.dy() != 0.0 {
            Some(first)
        } else if e1.dy() != 0.0 {
            Some(last)
        } else {
            None
        }
    }

    /// Labels every directed edge around the node, then derives the node
    /// label: a node is in the interior of an operand if any incident edge
    /// lies in its interior or on its boundary.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if side locations are inconsistent.
    pub fn compute_labelling(
        &mut self,
        at: &Coord,
        dir_edges: &mut SlotMap<DirEdgeId, DirectedEdge>,
        edges: &SlotMap<EdgeId, Edge>,
        geometries: [&Geometry; 2],
    ) -> Result<(), TopologyError> {
        let mut labelled: Vec<(DirEdgeId, Label)> = self
            .edges
            .iter()
            .filter_map(|id| dir_edges.get(*id).map(|de| (*id, *de.label())))
            .collect();
        {
            let mut refs: Vec<&mut Label> = labelled.iter_mut().map(|(_, label)| label).collect();
            label_edge_star(&mut refs, at, geometries)?;
        }
        for (id, label) in labelled {
            if let Some(de) = dir_edges.get_mut(id) {
                *de.label_mut() = label;
            }
        }

        let mut node_label = Label::empty();
        for id in &self.edges {
            let Some(edge) = dir_edges.get(*id).and_then(|de| edges.get(de.edge())) else {
                continue;
            };
            for geom_index in 0..2 {
                if matches!(
                    edge.location(geom_index),
                    Some(Location::Interior | Location::Boundary)
                ) {
                    node_label.set_location(geom_index, Location::Interior);
                }
            }
        }
        self.label = Some(node_label);
        Ok(())
    }

    /// Merges the label of each directed edge's opposite into its own.
    pub fn merge_sym_labels(&self, dir_edges: &mut SlotMap<DirEdgeId, DirectedEdge>) {
        for id in &self.edges {
            let Some(sym_label) = dir_edges
                .get(*id)
                .and_then(|de| dir_edges.get(de.sym()))
                .map(|sym| *sym.label())
            else {
                continue;
            };
            if let Some(de) = dir_edges.get_mut(*id) {
                de.label_mut().merge(&sym_label);
            }
        }
    }

    /// Fills undetermined directed edge locations from the node label.
    pub fn update_labelling(&self, node_label: &Label, dir_edges: &mut SlotMap<DirEdgeId, DirectedEdge>) {
        for id in &self.edges {
            let Some(de) = dir_edges.get_mut(*id) else {
                continue;
            };
            for geom_index in 0..2 {
                if let Some(loc) = node_label.location(geom_index) {
                    de.label_mut().set_all_locations_if_null(geom_index, loc);
                }
            }
        }
    }

    /// Directed edges at this node where either direction is in the result.
    fn result_area_edges(&self, dir_edges: &SlotMap<DirEdgeId, DirectedEdge>) -> Vec<DirEdgeId> {
        self.edges
            .iter()
            .copied()
            .filter(|id| {
                dir_edges.get(*id).is_some_and(|de| {
                    de.is_in_result() || dir_edges.get(de.sym()).is_some_and(DirectedEdge::is_in_result)
                })
            })
            .collect()
    }

    /// Links each incoming result edge to the next outgoing result edge in
    /// counter-clockwise order, so result rings keep the area on one side.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NoOutgoingEdge`] if an incoming result edge
    /// has no outgoing edge to link to.
    pub fn link_result_directed_edges(
        &self,
        at: &Coord,
        dir_edges: &mut SlotMap<DirEdgeId, DirectedEdge>,
    ) -> Result<(), TopologyError> {
        enum State {
            ScanningForIncoming,
            LinkingToOutgoing(DirEdgeId),
        }

        let mut first_out: Option<DirEdgeId> = None;
        let mut state = State::ScanningForIncoming;

        for next_out in self.result_area_edges(dir_edges) {
            let Some(out) = dir_edges.get(next_out) else {
                continue;
            };
            if !out.label().is_area() {
                continue;
            }
            let next_in = out.sym();
            let out_in_result = out.is_in_result();
            let in_in_result = dir_edges.get(next_in).is_some_and(DirectedEdge::is_in_result);

            if first_out.is_none() && out_in_result {
                first_out = Some(next_out);
            }
            state = match state {
                State::ScanningForIncoming if in_in_result => State::LinkingToOutgoing(next_in),
                State::LinkingToOutgoing(incoming) if out_in_result => {
                    if let Some(de) = dir_edges.get_mut(incoming) {
                        de.set_next(next_out);
                    }
                    State::ScanningForIncoming
                }
                other => other,
            };
        }

        if let State::LinkingToOutgoing(incoming) = state {
            let first_out = first_out.ok_or(TopologyError::NoOutgoingEdge { at: *at })?;
            if let Some(de) = dir_edges.get_mut(incoming) {
                de.set_next(first_out);
            }
        }
        Ok(())
    }

    /// Propagates depths counter-clockwise around the node starting from
    /// `start`, whose depths must already be known.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DepthMismatch`] if the depth reached on
    /// returning to `start` differs from its known right depth, or
    /// [`TopologyError::DepthConflict`] on a conflicting assignment.
    pub fn compute_depths(
        &self,
        start: DirEdgeId,
        at: &Coord,
        dir_edges: &mut SlotMap<DirEdgeId, DirectedEdge>,
        edges: &SlotMap<EdgeId, Edge>,
    ) -> Result<(), TopologyError> {
        let index = self
            .edges
            .iter()
            .position(|id| *id == start)
            .ok_or(TopologyError::DepthMismatch { at: *at })?;
        let start_de = dir_edges.get(start).ok_or(TopologyError::DepthMismatch { at: *at })?;
        let start_depth = start_de
            .depth(Position::Left)
            .ok_or(TopologyError::DepthMismatch { at: *at })?;
        let target = start_de.depth(Position::Right);

        let order = self.edges[index + 1..].iter().chain(&self.edges[..index]);
        let mut curr = start_depth;
        for id in order {
            let Some(de) = dir_edges.get_mut(*id) else {
                continue;
            };
            let delta = edges.get(de.edge()).map_or(0, Edge::depth_delta);
            de.set_edge_depths(Position::Right, curr, delta)?;
            curr = de
                .depth(Position::Left)
                .ok_or(TopologyError::DepthMismatch { at: *at })?;
        }

        if target != Some(curr) {
            return Err(TopologyError::DepthMismatch { at: *at });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn area(left: Location, right: Location) -> Label {
        Label::area(0, Location::Boundary, left, right)
    }

    #[test]
    fn consistent_alternation() {
        let a = area(Location::Interior, Location::Exterior);
        let b = area(Location::Exterior, Location::Interior);
        assert!(is_area_labelling_consistent(&[&a, &b], 0));
        assert!(!is_area_labelling_consistent(&[&a, &a], 0));
        assert!(is_area_labelling_consistent(&[], 0));
    }

    #[test]
    fn propagation_fills_null_sides() {
        let at = Coord::new(0.0, 0.0);
        let mut unknown = Label::empty_area();
        let mut a = area(Location::Interior, Location::Exterior);
        let mut b = area(Location::Exterior, Location::Interior);
        {
            let mut labels = vec![&mut unknown, &mut a, &mut b];
            propagate_side_labels(&mut labels, 0, &at).unwrap();
        }
        assert_eq!(unknown.get(0, Position::Left), Some(Location::Exterior));
        assert_eq!(unknown.get(0, Position::Right), Some(Location::Exterior));
        assert_eq!(unknown.location(0), Some(Location::Exterior));
    }

    #[test]
    fn conflicting_sides_are_reported() {
        let at = Coord::new(0.0, 0.0);
        let mut a = area(Location::Interior, Location::Exterior);
        let mut b = area(Location::Interior, Location::Exterior);
        let mut labels = vec![&mut a, &mut b];
        assert!(matches!(
            propagate_side_labels(&mut labels, 0, &at),
            Err(TopologyError::SideLocationConflict { .. })
        ));
    }

    fn depth_star(delta: i32) -> (DirectedEdgeStar, DirEdgeId, SlotMap<DirEdgeId, DirectedEdge>, SlotMap<EdgeId, Edge>) {
        let origin = Coord::new(0.0, 0.0);
        let label = area(Location::Interior, Location::Exterior);
        let mut edges: SlotMap<EdgeId, Edge> = SlotMap::with_key();
        let east = edges.insert(Edge::new(vec![origin, Coord::new(1.0, 0.0)], label));
        let north = edges.insert(Edge::new(vec![origin, Coord::new(0.0, 1.0)], label));
        edges[north].set_depth_delta(delta);

        let mut dir_edges: SlotMap<DirEdgeId, DirectedEdge> = SlotMap::with_key();
        let start = dir_edges.insert(DirectedEdge::new(east, &edges[east], true).unwrap());
        let up = dir_edges.insert(DirectedEdge::new(north, &edges[north], true).unwrap());
        dir_edges[start].set_depth(Position::Left, 1).unwrap();
        dir_edges[start].set_depth(Position::Right, 0).unwrap();

        let mut star = DirectedEdgeStar::default();
        star.insert(start, &dir_edges);
        star.insert(up, &dir_edges);
        (star, start, dir_edges, edges)
    }

    #[test]
    fn depths_close_around_the_node() {
        let (star, start, mut dir_edges, edges) = depth_star(-1);
        star.compute_depths(start, &Coord::new(0.0, 0.0), &mut dir_edges, &edges).unwrap();
        let up = star.edges()[1];
        assert_eq!(dir_edges[up].depth(Position::Right), Some(1));
        assert_eq!(dir_edges[up].depth(Position::Left), Some(0));
    }

    #[test]
    fn unbalanced_depths_are_a_mismatch() {
        let (star, start, mut dir_edges, edges) = depth_star(0);
        let at = Coord::new(0.0, 0.0);
        assert!(matches!(
            star.compute_depths(start, &at, &mut dir_edges, &edges),
            Err(TopologyError::DepthMismatch { at: reported }) if reported == at
        ));
    }
}
