use crate::error::TopologyError;
use crate::math::{Coord, LineIntersector, SegmentIntersection};

use super::edge::{Edge, EdgeId, EdgeIntersection};

/// Identifies an edge across graphs: the owning graph's operand index and
/// the edge's key in that graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeHandle {
    pub graph: usize,
    pub id: EdgeId,
}

impl EdgeHandle {
    #[must_use]
    pub fn new(graph: usize, id: EdgeId) -> Self {
        Self { graph, id }
    }
}

/// What a noding pass found.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntersectionSummary {
    /// Some non-trivial intersection was found.
    pub has_intersection: bool,
    /// Some intersection lies in the interior of both segments.
    pub has_proper: bool,
    /// Some proper intersection is also not on a boundary node.
    pub has_proper_interior: bool,
    /// The last proper intersection point found.
    pub proper_intersection_point: Option<Coord>,
    pub num_tests: usize,
    pub num_intersections: usize,
}

/// Result of a noding pass, to be applied to the edges it was computed on.
#[derive(Debug, Clone, Default)]
pub struct NodingOutcome {
    pub summary: IntersectionSummary,
    /// Intersection points to add to each edge.
    pub hits: Vec<(EdgeHandle, EdgeIntersection)>,
    /// Edges found to touch another edge.
    pub non_isolated: Vec<EdgeHandle>,
}

/// Intersects pairs of segments and records the resulting edge intersections.
///
/// Intersections are collected rather than written into the edges directly,
/// so that edges of two different graphs can be intersected through shared
/// references.
pub struct SegmentIntersector<'a> {
    li: &'a dyn LineIntersector,
    include_proper: bool,
    record_isolated: bool,
    boundary_nodes: [Vec<Coord>; 2],
    summary: IntersectionSummary,
    hits: Vec<(EdgeHandle, EdgeIntersection)>,
    non_isolated: Vec<EdgeHandle>,
}

impl<'a> SegmentIntersector<'a> {
    /// Creates an intersector.
    ///
    /// With `include_proper` unset, proper intersections are detected and
    /// summarised but not added to the edges. With `record_isolated` set,
    /// intersecting edges are reported as non-isolated.
    #[must_use]
    pub fn new(li: &'a dyn LineIntersector, include_proper: bool, record_isolated: bool) -> Self {
        Self {
            li,
            include_proper,
            record_isolated,
            boundary_nodes: [Vec::new(), Vec::new()],
            summary: IntersectionSummary::default(),
            hits: Vec::new(),
            non_isolated: Vec::new(),
        }
    }

    /// Sets the boundary node coordinates of both operands, used to decide
    /// whether a proper intersection is interior.
    pub fn set_boundary_nodes(&mut self, bdy0: Vec<Coord>, bdy1: Vec<Coord>) {
        self.boundary_nodes = [bdy0, bdy1];
    }

    #[must_use]
    pub fn summary(&self) -> &IntersectionSummary {
        &self.summary
    }

    /// Intersects segment `seg0` of `e0` with segment `seg1` of `e1`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::BadEdgeDistance`] if an intersection cannot
    /// be placed on an edge.
    pub fn add_intersections(
        &mut self,
        h0: EdgeHandle,
        e0: &Edge,
        seg0: usize,
        h1: EdgeHandle,
        e1: &Edge,
        seg1: usize,
    ) -> Result<(), TopologyError> {
        if h0 == h1 && seg0 == seg1 {
            return Ok(());
        }
        self.summary.num_tests += 1;
        let (p00, p01) = (e0.coord(seg0), e0.coord(seg0 + 1));
        let (p10, p11) = (e1.coord(seg1), e1.coord(seg1 + 1));
        let result = self.li.compute_intersection_of_lines(&p00, &p01, &p10, &p11);
        if !result.has_intersection() {
            return Ok(());
        }

        if self.record_isolated {
            self.non_isolated.push(h0);
            self.non_isolated.push(h1);
        }
        self.summary.num_intersections += 1;

        if is_trivial_intersection(&result, h0, e0, seg0, h1, seg1) {
            return Ok(());
        }
        self.summary.has_intersection = true;

        if self.include_proper || !result.is_proper() {
            for i in 0..result.intersection_num() {
                self.hits.push((h0, e0.intersection_at(&result, seg0, 0, i)?));
                self.hits.push((h1, e1.intersection_at(&result, seg1, 1, i)?));
            }
        }

        if result.is_proper() {
            let pt = result.intersection(0);
            tracing::trace!(x = pt.x, y = pt.y, "proper intersection");
            self.summary.proper_intersection_point = Some(pt);
            self.summary.has_proper = true;
            if !self.is_boundary_point(&result) {
                self.summary.has_proper_interior = true;
            }
        }
        Ok(())
    }

    fn is_boundary_point(&self, result: &SegmentIntersection) -> bool {
        self.boundary_nodes
            .iter()
            .flatten()
            .any(|node| result.is_intersection(node))
    }

    /// Consumes the intersector, returning what it found.
    #[must_use]
    pub fn finish(self) -> NodingOutcome {
        tracing::debug!(
            tests = self.summary.num_tests,
            intersections = self.summary.num_intersections,
            proper = self.summary.has_proper,
            "segment intersection finished"
        );
        NodingOutcome {
            summary: self.summary,
            hits: self.hits,
            non_isolated: self.non_isolated,
        }
    }
}

/// A single-point intersection between consecutive segments of one edge,
/// including the closing pair of a ring, is just the shared vertex.
fn is_trivial_intersection(
    result: &SegmentIntersection,
    h0: EdgeHandle,
    e0: &Edge,
    seg0: usize,
    h1: EdgeHandle,
    seg1: usize,
) -> bool {
    if h0 != h1 || result.intersection_num() != 1 {
        return false;
    }
    if seg0.abs_diff(seg1) == 1 {
        return true;
    }
    if e0.is_closed() {
        let last = e0.num_points().saturating_sub(2);
        if (seg0 == 0 && seg1 == last) || (seg1 == 0 && seg0 == last) {
            return true;
        }
    }
    false
}

/// Finds all intersections between segments of a set of edges.
pub trait EdgeSetIntersector {
    /// Intersects the edges of one set with each other. Segments of the same
    /// edge are only tested against each other when `test_all` is set.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if an intersection cannot be placed.
    fn compute_self(
        &self,
        edges: &[(EdgeHandle, &Edge)],
        si: &mut SegmentIntersector<'_>,
        test_all: bool,
    ) -> Result<(), TopologyError>;

    /// Intersects every edge of `edges0` with every edge of `edges1`.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if an intersection cannot be placed.
    fn compute_mutual(
        &self,
        edges0: &[(EdgeHandle, &Edge)],
        edges1: &[(EdgeHandle, &Edge)],
        si: &mut SegmentIntersector<'_>,
    ) -> Result<(), TopologyError>;
}

/// Tests every pair of edges whose envelopes overlap, segment by segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleEdgeSetIntersector;

impl SimpleEdgeSetIntersector {
    fn compute_pair(
        (h0, e0): (EdgeHandle, &Edge),
        (h1, e1): (EdgeHandle, &Edge),
        si: &mut SegmentIntersector<'_>,
    ) -> Result<(), TopologyError> {
        if !e0.envelope().intersects(e1.envelope()) {
            return Ok(());
        }
        let same = h0 == h1;
        for seg0 in 0..e0.num_points() - 1 {
            let first = if same { seg0 + 1 } else { 0 };
            for seg1 in first..e1.num_points() - 1 {
                si.add_intersections(h0, e0, seg0, h1, e1, seg1)?;
            }
        }
        Ok(())
    }
}

impl EdgeSetIntersector for SimpleEdgeSetIntersector {
    fn compute_self(
        &self,
        edges: &[(EdgeHandle, &Edge)],
        si: &mut SegmentIntersector<'_>,
        test_all: bool,
    ) -> Result<(), TopologyError> {
        for (i, e0) in edges.iter().enumerate() {
            let start = if test_all { i } else { i + 1 };
            for e1 in &edges[start..] {
                Self::compute_pair(*e0, *e1, si)?;
            }
        }
        Ok(())
    }

    fn compute_mutual(
        &self,
        edges0: &[(EdgeHandle, &Edge)],
        edges1: &[(EdgeHandle, &Edge)],
        si: &mut SegmentIntersector<'_>,
    ) -> Result<(), TopologyError> {
        for e0 in edges0 {
            for e1 in edges1 {
                Self::compute_pair(*e0, *e1, si)?;
            }
        }
        Ok(())
    }
}

/// One segment in the sweep, with the x-extent it occupies.
#[derive(Debug, Clone, Copy)]
struct SweepSegment {
    edge: usize,
    seg: usize,
    /// Segments sharing a set are never tested against each other.
    set: Option<usize>,
    min_x: f64,
    max_x: f64,
}

/// Sweeps a vertical line across the segments in x order and only tests
/// segments whose x-extents overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepLineEdgeSetIntersector;

impl SweepLineEdgeSetIntersector {
    fn segments(edges: &[(EdgeHandle, &Edge)], offset: usize, set: impl Fn(usize) -> Option<usize>) -> Vec<SweepSegment> {
        let mut segments = Vec::new();
        for (i, (_, edge)) in edges.iter().enumerate() {
            let pts = edge.coords();
            for (seg, pair) in pts.windows(2).enumerate() {
                segments.push(SweepSegment {
                    edge: offset + i,
                    seg,
                    set: set(i),
                    min_x: pair[0].x.min(pair[1].x),
                    max_x: pair[0].x.max(pair[1].x),
                });
            }
        }
        segments
    }

    fn sweep(
        mut segments: Vec<SweepSegment>,
        edges: &[(EdgeHandle, &Edge)],
        si: &mut SegmentIntersector<'_>,
    ) -> Result<(), TopologyError> {
        segments.sort_by(|a, b| a.min_x.total_cmp(&b.min_x));
        for (i, s0) in segments.iter().enumerate() {
            for s1 in &segments[i + 1..] {
                if s1.min_x > s0.max_x {
                    break;
                }
                if s0.set.is_some() && s0.set == s1.set {
                    continue;
                }
                let (h0, e0) = edges[s0.edge];
                let (h1, e1) = edges[s1.edge];
                si.add_intersections(h0, e0, s0.seg, h1, e1, s1.seg)?;
            }
        }
        Ok(())
    }
}

impl EdgeSetIntersector for SweepLineEdgeSetIntersector {
    fn compute_self(
        &self,
        edges: &[(EdgeHandle, &Edge)],
        si: &mut SegmentIntersector<'_>,
        test_all: bool,
    ) -> Result<(), TopologyError> {
        let segments = if test_all {
            Self::segments(edges, 0, |_| None)
        } else {
            Self::segments(edges, 0, Some)
        };
        Self::sweep(segments, edges, si)
    }

    fn compute_mutual(
        &self,
        edges0: &[(EdgeHandle, &Edge)],
        edges1: &[(EdgeHandle, &Edge)],
        si: &mut SegmentIntersector<'_>,
    ) -> Result<(), TopologyError> {
        let all: Vec<(EdgeHandle, &Edge)> = edges0.iter().chain(edges1).copied().collect();
        let mut segments = Self::segments(edges0, 0, |_| Some(0));
        segments.extend(Self::segments(edges1, edges0.len(), |_| Some(1)));
        Self::sweep(segments, &all, si)
    }
}

/// Selects the edge set intersection strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EdgeSetIntersectorKind {
    /// Pairwise tests with an envelope check.
    #[default]
    Simple,
    /// Sort-and-sweep over segment x-extents.
    SweepLine,
}

impl EdgeSetIntersector for EdgeSetIntersectorKind {
    fn compute_self(
        &self,
        edges: &[(EdgeHandle, &Edge)],
        si: &mut SegmentIntersector<'_>,
        test_all: bool,
    ) -> Result<(), TopologyError> {
        match self {
            Self::Simple => SimpleEdgeSetIntersector.compute_self(edges, si, test_all),
            Self::SweepLine => SweepLineEdgeSetIntersector.compute_self(edges, si, test_all),
        }
    }

    fn compute_mutual(
        &self,
        edges0: &[(EdgeHandle, &Edge)],
        edges1: &[(EdgeHandle, &Edge)],
        si: &mut SegmentIntersector<'_>,
    ) -> Result<(), TopologyError> {
        match self {
            Self::Simple => SimpleEdgeSetIntersector.compute_mutual(edges0, edges1, si),
            Self::SweepLine => SweepLineEdgeSetIntersector.compute_mutual(edges0, edges1, si),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use slotmap::SlotMap;

    use super::*;
    use crate::math::RobustLineIntersector;
    use crate::topology::label::{Label, Location};

    fn edges_of(lines: &[&[(f64, f64)]], graph: usize) -> (Vec<EdgeHandle>, Vec<Edge>) {
        let mut arena: SlotMap<EdgeId, ()> = SlotMap::with_key();
        let mut handles = Vec::new();
        let mut edges = Vec::new();
        for line in lines {
            handles.push(EdgeHandle::new(graph, arena.insert(())));
            let pts = line.iter().map(|&(x, y)| Coord::new(x, y)).collect();
            edges.push(Edge::new(pts, Label::line(graph, Location::Interior)));
        }
        (handles, edges)
    }

    fn pairs<'e>(handles: &[EdgeHandle], edges: &'e [Edge]) -> Vec<(EdgeHandle, &'e Edge)> {
        handles.iter().copied().zip(edges.iter()).collect()
    }

    #[test]
    fn crossing_lines_give_proper_interior_intersection() {
        let li = RobustLineIntersector::new();
        let (h0, e0) = edges_of(&[&[(0.0, 0.0), (2.0, 2.0)]], 0);
        let (h1, e1) = edges_of(&[&[(0.0, 2.0), (2.0, 0.0)]], 1);
        for kind in [EdgeSetIntersectorKind::Simple, EdgeSetIntersectorKind::SweepLine] {
            let mut si = SegmentIntersector::new(&li, true, true);
            kind.compute_mutual(&pairs(&h0, &e0), &pairs(&h1, &e1), &mut si)
                .unwrap();
            let outcome = si.finish();
            assert!(outcome.summary.has_proper_interior);
            assert_eq!(outcome.summary.proper_intersection_point, Some(Coord::new(1.0, 1.0)));
            assert_eq!(outcome.hits.len(), 2);
            assert_eq!(outcome.non_isolated.len(), 2);
        }
    }

    #[test]
    fn proper_intersection_at_boundary_node_is_not_interior() {
        let li = RobustLineIntersector::new();
        let (h0, e0) = edges_of(&[&[(0.0, 0.0), (2.0, 2.0)]], 0);
        let (h1, e1) = edges_of(&[&[(0.0, 2.0), (2.0, 0.0)]], 1);
        let mut si = SegmentIntersector::new(&li, false, false);
        si.set_boundary_nodes(vec![Coord::new(1.0, 1.0)], Vec::new());
        SimpleEdgeSetIntersector
            .compute_mutual(&pairs(&h0, &e0), &pairs(&h1, &e1), &mut si)
            .unwrap();
        let outcome = si.finish();
        assert!(outcome.summary.has_proper);
        assert!(!outcome.summary.has_proper_interior);
        // Proper intersections are not added without `include_proper`.
        assert!(outcome.hits.is_empty());
        assert!(outcome.non_isolated.is_empty());
    }

    #[test]
    fn adjacent_segments_are_trivial() {
        let li = RobustLineIntersector::new();
        let (h, e) = edges_of(&[&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]], 0);
        for kind in [EdgeSetIntersectorKind::Simple, EdgeSetIntersectorKind::SweepLine] {
            let mut si = SegmentIntersector::new(&li, true, false);
            kind.compute_self(&pairs(&h, &e), &mut si, true).unwrap();
            let outcome = si.finish();
            assert!(!outcome.summary.has_intersection);
            assert!(outcome.hits.is_empty());
        }
    }

    #[test]
    fn self_crossing_line_is_found_only_when_testing_all() {
        let li = RobustLineIntersector::new();
        let (h, e) = edges_of(&[&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]], 0);
        for kind in [EdgeSetIntersectorKind::Simple, EdgeSetIntersectorKind::SweepLine] {
            let mut si = SegmentIntersector::new(&li, true, false);
            kind.compute_self(&pairs(&h, &e), &mut si, true).unwrap();
            let outcome = si.finish();
            assert!(outcome.summary.has_proper);
            assert!(outcome
                .hits
                .iter()
                .all(|(_, ei)| ei.coord == Coord::new(1.0, 1.0)));

            let mut si = SegmentIntersector::new(&li, true, false);
            kind.compute_self(&pairs(&h, &e), &mut si, false).unwrap();
            assert!(!si.finish().summary.has_intersection);
        }
    }

    #[test]
    fn disjoint_edges_are_not_touched() {
        let li = RobustLineIntersector::new();
        let (h0, e0) = edges_of(&[&[(0.0, 0.0), (1.0, 0.0)]], 0);
        let (h1, e1) = edges_of(&[&[(5.0, 5.0), (6.0, 5.0)]], 1);
        let mut si = SegmentIntersector::new(&li, true, true);
        SweepLineEdgeSetIntersector
            .compute_mutual(&pairs(&h0, &e0), &pairs(&h1, &e1), &mut si)
            .unwrap();
        let outcome = si.finish();
        assert_eq!(outcome.summary.num_tests, 0);
        assert!(outcome.non_isolated.is_empty());
    }
}
