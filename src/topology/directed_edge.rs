use crate::error::TopologyError;
use crate::math::Coord;

use super::edge::{Edge, EdgeId};
use super::edge_end::EdgeEnd;
use super::label::{Label, Position};

slotmap::new_key_type! {
    /// Unique identifier for a directed edge in a planar graph.
    pub struct DirEdgeId;
}

/// One of the two traversal directions of an [`Edge`].
///
/// The label is a copy of the edge label, flipped for the reverse
/// direction. `sym` and `next` are arena keys.
#[derive(Debug, Clone)]
pub struct DirectedEdge {
    edge: EdgeId,
    end: EdgeEnd,
    label: Label,
    forward: bool,
    pub(super) sym: DirEdgeId,
    next: Option<DirEdgeId>,
    in_result: bool,
    visited: bool,
    depth: [Option<i32>; 3],
}

impl DirectedEdge {
    /// Creates the forward or reverse traversal of `edge`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DegenerateEdgeEnd`] if the edge has fewer
    /// than two points or starts with a zero-length segment in the chosen
    /// direction.
    pub fn new(id: EdgeId, edge: &Edge, forward: bool) -> Result<Self, TopologyError> {
        let end = match (forward, edge.coords()) {
            (true, [p0, p1, ..]) => EdgeEnd::new(*p0, *p1)?,
            (false, [.., p1, p0]) => EdgeEnd::new(*p0, *p1)?,
            (_, pts) => {
                let at = pts.first().copied().unwrap_or_else(Coord::origin);
                return Err(TopologyError::DegenerateEdgeEnd { at });
            }
        };
        let label = if forward {
            *edge.label()
        } else {
            edge.label().flipped()
        };
        Ok(Self {
            edge: id,
            end,
            label,
            forward,
            sym: DirEdgeId::default(),
            next: None,
            in_result: false,
            visited: false,
            depth: [Some(0), None, None],
        })
    }

    #[must_use]
    pub fn edge(&self) -> EdgeId {
        self.edge
    }

    #[must_use]
    pub fn end(&self) -> &EdgeEnd {
        &self.end
    }

    /// The node coordinate this directed edge leaves from.
    #[must_use]
    pub fn coord(&self) -> &Coord {
        self.end.coord()
    }

    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    #[must_use]
    pub fn is_forward(&self) -> bool {
        self.forward
    }

    /// The directed edge running the opposite way along the same edge.
    #[must_use]
    pub fn sym(&self) -> DirEdgeId {
        self.sym
    }

    #[must_use]
    pub fn next(&self) -> Option<DirEdgeId> {
        self.next
    }

    pub fn set_next(&mut self, next: DirEdgeId) {
        self.next = Some(next);
    }

    #[must_use]
    pub fn is_in_result(&self) -> bool {
        self.in_result
    }

    pub fn set_in_result(&mut self, in_result: bool) {
        self.in_result = in_result;
    }

    #[must_use]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn set_visited(&mut self, visited: bool) {
        self.visited = visited;
    }

    #[must_use]
    pub fn depth(&self, pos: Position) -> Option<i32> {
        self.depth[pos_index(pos)]
    }

    /// Assigns a depth.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DepthConflict`] if a different depth was
    /// already assigned to `pos`.
    pub fn set_depth(&mut self, pos: Position, depth: i32) -> Result<(), TopologyError> {
        let slot = &mut self.depth[pos_index(pos)];
        match *slot {
            Some(existing) if existing != depth => Err(TopologyError::DepthConflict { at: *self.end.coord() }),
            _ => {
                *slot = Some(depth);
                Ok(())
            }
        }
    }

    /// Sets the depth on `pos` and derives the opposite side from the edge's
    /// depth delta, taking the traversal direction into account.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DepthConflict`] on conflicting assignments.
    pub fn set_edge_depths(&mut self, pos: Position, depth: i32, edge_depth_delta: i32) -> Result<(), TopologyError> {
        let mut delta = if self.forward {
            edge_depth_delta
        } else {
            -edge_depth_delta
        };
        if pos == Position::Left {
            delta = -delta;
        }
        self.set_depth(pos, depth)?;
        self.set_depth(pos.opposite(), depth + delta)
    }
}

fn pos_index(pos: Position) -> usize {
    match pos {
        Position::On => 0,
        Position::Left => 1,
        Position::Right => 2,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use slotmap::SlotMap;

    use super::*;
    use crate::topology::label::Location;

    fn ring_edge() -> (EdgeId, Edge) {
        let mut arena: SlotMap<EdgeId, ()> = SlotMap::with_key();
        let id = arena.insert(());
        let pts = vec![
            Coord::new(0.0, 0.0),
            Coord::new(4.0, 0.0),
            Coord::new(4.0, 4.0),
        ];
        let label = Label::area(0, Location::Boundary, Location::Exterior, Location::Interior);
        (id, Edge::new(pts, label))
    }

    #[test]
    fn reverse_direction_flips_label() {
        let (id, edge) = ring_edge();
        let fwd = DirectedEdge::new(id, &edge, true).unwrap();
        let rev = DirectedEdge::new(id, &edge, false).unwrap();
        assert_eq!(*fwd.coord(), Coord::new(0.0, 0.0));
        assert_eq!(*rev.coord(), Coord::new(4.0, 4.0));
        assert_eq!(*rev.end().directed_coord(), Coord::new(4.0, 0.0));
        assert_eq!(fwd.label().get(0, Position::Right), Some(Location::Interior));
        assert_eq!(rev.label().get(0, Position::Left), Some(Location::Interior));
    }

    #[test]
    fn edge_depths_use_direction() {
        let (id, edge) = ring_edge();
        let mut fwd = DirectedEdge::new(id, &edge, true).unwrap();
        fwd.set_edge_depths(Position::Right, 1, 1).unwrap();
        assert_eq!(fwd.depth(Position::Left), Some(2));

        let mut rev = DirectedEdge::new(id, &edge, false).unwrap();
        rev.set_edge_depths(Position::Right, 1, 1).unwrap();
        assert_eq!(rev.depth(Position::Left), Some(0));
    }

    #[test]
    fn conflicting_depth_is_an_error() {
        let (id, edge) = ring_edge();
        let mut de = DirectedEdge::new(id, &edge, true).unwrap();
        de.set_depth(Position::Left, 3).unwrap();
        de.set_depth(Position::Left, 3).unwrap();
        assert!(matches!(
            de.set_depth(Position::Left, 4),
            Err(TopologyError::DepthConflict { .. })
        ));
    }

    #[test]
    fn single_point_edge_is_degenerate() {
        let (id, _) = ring_edge();
        let label = Label::area(0, Location::Boundary, Location::Exterior, Location::Interior);
        let stub = Edge::new(vec![Coord::new(2.0, 3.0)], label);
        for forward in [true, false] {
            assert!(matches!(
                DirectedEdge::new(id, &stub, forward),
                Err(TopologyError::DegenerateEdgeEnd { at }) if at == Coord::new(2.0, 3.0)
            ));
        }
        let empty = Edge::new(vec![], label);
        assert!(matches!(
            DirectedEdge::new(id, &empty, true),
            Err(TopologyError::DegenerateEdgeEnd { .. })
        ));
    }
}
