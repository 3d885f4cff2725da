use crate::error::TopologyError;
use crate::topology::{Edge, EdgeEnd, EdgeIntersection, Label};

/// An edge end at a node, labelled with the locations of the edge it
/// belongs to (flipped for ends pointing backwards along the edge).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelateEdgeEnd {
    pub end: EdgeEnd,
    pub label: Label,
}

/// Creates the edge ends on both sides of every intersection of every edge.
///
/// Each edge first gets its endpoints added as intersections, so the ends of
/// unnoded edges are included.
///
/// # Errors
///
/// Returns [`TopologyError::DegenerateEdgeEnd`] if an end would have zero length.
pub fn compute_edge_ends<'e>(edges: impl IntoIterator<Item = &'e mut Edge>) -> Result<Vec<RelateEdgeEnd>, TopologyError> {
    let mut ends = Vec::new();
    for edge in edges {
        edge.add_endpoint_intersections();
        compute_edge_ends_for(edge, &mut ends)?;
    }
    Ok(ends)
}

fn compute_edge_ends_for(edge: &Edge, ends: &mut Vec<RelateEdgeEnd>) -> Result<(), TopologyError> {
    let ints: Vec<&EdgeIntersection> = edge.intersections().iter().collect();
    for (i, curr) in ints.iter().enumerate() {
        let prev = i.checked_sub(1).map(|j| ints[j]);
        let next = ints.get(i + 1).copied();
        if let Some(end) = end_for_prev(edge, curr, prev)? {
            ends.push(end);
        }
        if let Some(end) = end_for_next(edge, curr, next)? {
            ends.push(end);
        }
    }
    Ok(())
}

/// The end pointing back along the edge from `curr`, if `curr` is not the
/// edge start.
fn end_for_prev(
    edge: &Edge,
    curr: &EdgeIntersection,
    prev: Option<&EdgeIntersection>,
) -> Result<Option<RelateEdgeEnd>, TopologyError> {
    let mut i_prev = curr.segment_index;
    if curr.dist == 0.0 {
        if i_prev == 0 {
            return Ok(None);
        }
        i_prev -= 1;
    }
    let p_prev = match prev {
        Some(prev) if prev.segment_index >= i_prev => prev.coord,
        _ => edge.coord(i_prev),
    };
    let end = EdgeEnd::new(curr.coord, p_prev)?;
    Ok(Some(RelateEdgeEnd {
        end,
        label: edge.label().flipped(),
    }))
}

/// The end pointing forward along the edge from `curr`, if `curr` is not
/// the edge end.
fn end_for_next(
    edge: &Edge,
    curr: &EdgeIntersection,
    next: Option<&EdgeIntersection>,
) -> Result<Option<RelateEdgeEnd>, TopologyError> {
    let i_next = curr.segment_index + 1;
    let p_next = match next {
        Some(next) if next.segment_index == curr.segment_index => next.coord,
        _ => match edge.coords().get(i_next) {
            Some(p) => *p,
            None => return Ok(None),
        },
    };
    let end = EdgeEnd::new(curr.coord, p_next)?;
    Ok(Some(RelateEdgeEnd {
        end,
        label: *edge.label(),
    }))
}
