use std::cmp::Ordering;

use crate::error::TopologyError;
use crate::math::{Coord, Envelope, SegmentIntersection};

use super::label::{Label, Location};

slotmap::new_key_type! {
    /// Unique identifier for an edge in a planar graph.
    pub struct EdgeId;
}

/// A point where an edge is intersected, located by segment and distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeIntersection {
    /// The intersection point.
    pub coord: Coord,
    /// Index of the segment containing the point.
    pub segment_index: usize,
    /// Distance of the point along the segment.
    pub dist: f64,
}

impl EdgeIntersection {
    #[must_use]
    pub fn new(coord: Coord, segment_index: usize, dist: f64) -> Self {
        Self {
            coord,
            segment_index,
            dist,
        }
    }

    /// Orders intersections along the edge.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        self.segment_index
            .cmp(&other.segment_index)
            .then_with(|| self.dist.total_cmp(&other.dist))
    }
}

/// The intersections of one edge, ordered along the edge and deduplicated.
#[derive(Debug, Clone, Default)]
pub struct EdgeIntersectionList {
    items: Vec<EdgeIntersection>,
}

impl EdgeIntersectionList {
    /// Adds an intersection unless one with the same position already exists.
    pub fn add(&mut self, ei: EdgeIntersection) {
        if let Err(i) = self.items.binary_search_by(|item| item.compare(&ei)) {
            self.items.insert(i, ei);
        }
    }

    /// Adds the first and last points of `pts` as intersections.
    pub fn add_endpoints(&mut self, pts: &[Coord]) {
        let (Some(first), Some(last)) = (pts.first(), pts.last()) else {
            return;
        };
        let max_seg_index = pts.len() - 1;
        self.add(EdgeIntersection::new(*first, 0, 0.0));
        self.add(EdgeIntersection::new(*last, max_seg_index, 0.0));
    }

    pub fn iter(&self) -> impl Iterator<Item = &EdgeIntersection> {
        self.items.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if some intersection lies at `pt`.
    #[must_use]
    pub fn is_intersection(&self, pt: &Coord) -> bool {
        self.items.iter().any(|ei| ei.coord == *pt)
    }
}

/// A noded linear component of a geometry graph.
///
/// Carries its coordinates, its label, the intersections found on it and
/// whether it met the other operand at all.
#[derive(Debug, Clone)]
pub struct Edge {
    pts: Vec<Coord>,
    env: Envelope,
    label: Label,
    intersections: EdgeIntersectionList,
    isolated: bool,
    depth_delta: i32,
}

impl Edge {
    /// Creates an edge. `pts` must contain at least two points.
    #[must_use]
    pub fn new(pts: Vec<Coord>, label: Label) -> Self {
        let env = Envelope::from_points(&pts)
            .unwrap_or_else(|| Envelope::new(&Coord::origin(), &Coord::origin()));
        Self {
            pts,
            env,
            label,
            intersections: EdgeIntersectionList::default(),
            isolated: true,
            depth_delta: 0,
        }
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.pts
    }

    #[must_use]
    pub fn coord(&self, i: usize) -> Coord {
        self.pts[i]
    }

    /// The first point of the edge.
    #[must_use]
    pub fn start(&self) -> Coord {
        self.pts[0]
    }

    #[must_use]
    pub fn num_points(&self) -> usize {
        self.pts.len()
    }

    #[must_use]
    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.pts.first() == self.pts.last()
    }

    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    /// The `On` location of this edge relative to operand `geom_index`.
    #[must_use]
    pub fn location(&self, geom_index: usize) -> Option<Location> {
        self.label.location(geom_index)
    }

    #[must_use]
    pub fn intersections(&self) -> &EdgeIntersectionList {
        &self.intersections
    }

    pub fn intersections_mut(&mut self) -> &mut EdgeIntersectionList {
        &mut self.intersections
    }

    /// Adds the edge's own endpoints to its intersection list.
    pub fn add_endpoint_intersections(&mut self) {
        self.intersections.add_endpoints(&self.pts);
    }

    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.isolated
    }

    pub fn set_isolated(&mut self, isolated: bool) {
        self.isolated = isolated;
    }

    /// Change in depth from the right side to the left side of the edge.
    #[must_use]
    pub fn depth_delta(&self) -> i32 {
        self.depth_delta
    }

    pub fn set_depth_delta(&mut self, depth_delta: i32) {
        self.depth_delta = depth_delta;
    }

    /// Locates intersection `int_index` of `result` on this edge.
    ///
    /// `segment_index` is the segment of this edge that was intersected and
    /// `geom_index` says which input of `result` that segment was. A point
    /// lying exactly on the next vertex is moved to the start of the next
    /// segment so every vertex has one canonical position.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::BadEdgeDistance`] if the distance degenerates.
    pub fn intersection_at(
        &self,
        result: &SegmentIntersection,
        segment_index: usize,
        geom_index: usize,
        int_index: usize,
    ) -> Result<EdgeIntersection, TopologyError> {
        let pt = result.intersection(int_index);
        let mut dist = result.edge_distance(geom_index, int_index)?;
        let mut index = segment_index;

        let next = segment_index + 1;
        if self.pts.get(next) == Some(&pt) {
            index = next;
            dist = 0.0;
        }
        Ok(EdgeIntersection::new(pt, index, dist))
    }

    /// Adds every intersection point of `result` to this edge.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::BadEdgeDistance`] if a distance degenerates.
    pub fn add_intersections(
        &mut self,
        result: &SegmentIntersection,
        segment_index: usize,
        geom_index: usize,
    ) -> Result<(), TopologyError> {
        for i in 0..result.intersection_num() {
            let ei = self.intersection_at(result, segment_index, geom_index, i)?;
            self.intersections.add(ei);
        }
        Ok(())
    }
}
