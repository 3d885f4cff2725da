use crate::error::TopologyError;

use super::{orientation_index, Coord, Envelope, Orientation};

/// Kind of intersection between two segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntersectionKind {
    /// The segments do not intersect.
    None,
    /// The segments intersect in a single point.
    Point,
    /// The segments are collinear and overlap along a sub-segment.
    Collinear,
}

/// Result of intersecting two segments (or a point and a segment).
#[derive(Debug, Clone, Copy)]
pub struct SegmentIntersection {
    kind: IntersectionKind,
    points: [Coord; 2],
    proper: bool,
    input: [[Coord; 2]; 2],
}

impl SegmentIntersection {
    fn new(kind: IntersectionKind, points: [Coord; 2], proper: bool, input: [[Coord; 2]; 2]) -> Self {
        Self {
            kind,
            points,
            proper,
            input,
        }
    }

    fn none(input: [[Coord; 2]; 2]) -> Self {
        Self::new(IntersectionKind::None, [input[0][0]; 2], false, input)
    }

    /// Returns the intersection kind.
    #[must_use]
    pub fn kind(&self) -> IntersectionKind {
        self.kind
    }

    /// Returns `true` if the inputs intersect.
    #[must_use]
    pub fn has_intersection(&self) -> bool {
        self.kind != IntersectionKind::None
    }

    /// Returns `true` if the segments are collinear and overlap.
    #[must_use]
    pub fn is_collinear(&self) -> bool {
        self.kind == IntersectionKind::Collinear
    }

    /// Number of intersection points: 0, 1, or 2 for a collinear overlap.
    #[must_use]
    pub fn intersection_num(&self) -> usize {
        match self.kind {
            IntersectionKind::None => 0,
            IntersectionKind::Point => 1,
            IntersectionKind::Collinear => 2,
        }
    }

    /// Returns the computed intersection points.
    #[must_use]
    pub fn points(&self) -> &[Coord] {
        &self.points[..self.intersection_num()]
    }

    /// Returns the intersection point with the given index.
    #[must_use]
    pub fn intersection(&self, index: usize) -> Coord {
        self.points[index]
    }

    /// Returns `true` if the intersection is a single point strictly interior to both segments.
    #[must_use]
    pub fn is_proper(&self) -> bool {
        self.has_intersection() && self.proper
    }

    /// Returns `true` if `pt` is one of the computed intersection points.
    #[must_use]
    pub fn is_intersection(&self, pt: &Coord) -> bool {
        self.points().iter().any(|p| p == pt)
    }

    /// Returns `true` if some intersection point is not an endpoint of either input.
    #[must_use]
    pub fn is_interior_intersection(&self) -> bool {
        self.is_interior_intersection_of(0) || self.is_interior_intersection_of(1)
    }

    /// Returns `true` if some intersection point is not an endpoint of input `input_index`.
    #[must_use]
    pub fn is_interior_intersection_of(&self, input_index: usize) -> bool {
        let [a, b] = self.input[input_index];
        self.points().iter().any(|p| *p != a && *p != b)
    }

    /// Distance of intersection `int_index` along input segment `segment_index`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::BadEdgeDistance`] if the distance degenerates.
    pub fn edge_distance(&self, segment_index: usize, int_index: usize) -> Result<f64, TopologyError> {
        let [p0, p1] = self.input[segment_index];
        compute_edge_distance(&self.points[int_index], &p0, &p1)
    }
}

/// Computes a distance-like measure of `p` along the segment `p0 -> p1`.
///
/// The value is not the Euclidean distance but is monotone along the
/// segment, which is all that ordering intersections requires. It is exact
/// for points equal to either endpoint.
///
/// # Errors
///
/// Returns [`TopologyError::BadEdgeDistance`] if a point other than `p0`
/// is assigned distance zero.
pub fn compute_edge_distance(p: &Coord, p0: &Coord, p1: &Coord) -> Result<f64, TopologyError> {
    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();

    let dist = if p == p0 {
        0.0
    } else if p == p1 {
        dx.max(dy)
    } else {
        let pdx = (p.x - p0.x).abs();
        let pdy = (p.y - p0.y).abs();
        let dist = if dx > dy { pdx } else { pdy };
        // Handle the case where p is very close to p0 on a segment of the other axis.
        if dist == 0.0 {
            pdx.max(pdy)
        } else {
            dist
        }
    };

    if dist == 0.0 && p != p0 {
        return Err(TopologyError::BadEdgeDistance { at: *p });
    }
    Ok(dist)
}

/// Computes intersections between segments.
pub trait LineIntersector {
    /// Intersects segment `p1 -> p2` with segment `q1 -> q2`.
    fn compute_intersection_of_lines(
        &self,
        p1: &Coord,
        p2: &Coord,
        q1: &Coord,
        q2: &Coord,
    ) -> SegmentIntersection;

    /// Tests whether point `p` lies on segment `p1 -> p2`.
    fn compute_intersection_of_point_on_line(
        &self,
        p: &Coord,
        p1: &Coord,
        p2: &Coord,
    ) -> SegmentIntersection;

    /// Classifies two segments as disjoint, point-intersecting or collinear.
    fn classify(&self, p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> IntersectionKind {
        self.compute_intersection_of_lines(p1, p2, q1, q2).kind()
    }
}

/// A line intersector that stays correct under floating-point error.
///
/// Orientation tests use an exact fallback, endpoint intersections are copied
/// rather than recomputed, and computed points are kept within both segment
/// envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct RobustLineIntersector;

impl RobustLineIntersector {
    /// Creates a new intersector.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl LineIntersector for RobustLineIntersector {
    fn compute_intersection_of_lines(
        &self,
        p1: &Coord,
        p2: &Coord,
        q1: &Coord,
        q2: &Coord,
    ) -> SegmentIntersection {
        let input = [[*p1, *p2], [*q1, *q2]];

        if !Envelope::segments_intersect(p1, p2, q1, q2) {
            return SegmentIntersection::none(input);
        }

        // If both endpoints of one segment lie strictly on one side of the
        // other segment, the segments do not intersect.
        let pq1 = orientation_index(p1, p2, q1).signum();
        let pq2 = orientation_index(p1, p2, q2).signum();
        if (pq1 > 0 && pq2 > 0) || (pq1 < 0 && pq2 < 0) {
            return SegmentIntersection::none(input);
        }

        let qp1 = orientation_index(q1, q2, p1).signum();
        let qp2 = orientation_index(q1, q2, p2).signum();
        if (qp1 > 0 && qp2 > 0) || (qp1 < 0 && qp2 < 0) {
            return SegmentIntersection::none(input);
        }

        if pq1 == 0 && pq2 == 0 && qp1 == 0 && qp2 == 0 {
            return collinear_intersection(input);
        }

        // Exactly one intersection point. If it is an endpoint, copy it
        // exactly rather than computing it.
        if pq1 == 0 || pq2 == 0 || qp1 == 0 || qp2 == 0 {
            let pt = if p1 == q1 || p1 == q2 {
                *p1
            } else if p2 == q1 || p2 == q2 {
                *p2
            } else if pq1 == 0 {
                *q1
            } else if pq2 == 0 {
                *q2
            } else if qp1 == 0 {
                *p1
            } else {
                *p2
            };
            return SegmentIntersection::new(IntersectionKind::Point, [pt; 2], false, input);
        }

        let pt = proper_intersection(p1, p2, q1, q2);
        SegmentIntersection::new(IntersectionKind::Point, [pt; 2], true, input)
    }

    fn compute_intersection_of_point_on_line(
        &self,
        p: &Coord,
        p1: &Coord,
        p2: &Coord,
    ) -> SegmentIntersection {
        let input = [[*p1, *p2], [*p, *p]];
        if Envelope::segment_contains(p1, p2, p)
            && orientation_index(p1, p2, p) == Orientation::Collinear
            && orientation_index(p2, p1, p) == Orientation::Collinear
        {
            let proper = p != p1 && p != p2;
            return SegmentIntersection::new(IntersectionKind::Point, [*p; 2], proper, input);
        }
        SegmentIntersection::none(input)
    }
}

/// Classifies the overlap of two collinear segments.
fn collinear_intersection(input: [[Coord; 2]; 2]) -> SegmentIntersection {
    let [[p1, p2], [q1, q2]] = input;
    let p1q1p2 = Envelope::segment_contains(&p1, &p2, &q1);
    let p1q2p2 = Envelope::segment_contains(&p1, &p2, &q2);
    let q1p1q2 = Envelope::segment_contains(&q1, &q2, &p1);
    let q1p2q2 = Envelope::segment_contains(&q1, &q2, &p2);

    let collinear = |a: Coord, b: Coord| {
        SegmentIntersection::new(IntersectionKind::Collinear, [a, b], false, input)
    };
    let touching = |a: Coord, b: Coord, single: bool| {
        let kind = if single {
            IntersectionKind::Point
        } else {
            IntersectionKind::Collinear
        };
        SegmentIntersection::new(kind, [a, b], false, input)
    };

    if p1q1p2 && p1q2p2 {
        return collinear(q1, q2);
    }
    if q1p1q2 && q1p2q2 {
        return collinear(p1, p2);
    }
    if p1q1p2 && q1p1q2 {
        return touching(q1, p1, q1 == p1 && !p1q2p2 && !q1p2q2);
    }
    if p1q1p2 && q1p2q2 {
        return touching(q1, p2, q1 == p2 && !p1q2p2 && !q1p1q2);
    }
    if p1q2p2 && q1p1q2 {
        return touching(q2, p1, q2 == p1 && !p1q1p2 && !q1p2q2);
    }
    if p1q2p2 && q1p2q2 {
        return touching(q2, p2, q2 == p2 && !p1q1p2 && !q1p1q2);
    }
    SegmentIntersection::none(input)
}

/// Computes the intersection point of two properly crossing segments.
///
/// Falls back to the central endpoint if the computed point lies outside
/// either segment envelope.
fn proper_intersection(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
    let pt = intersection_with_normalization(p1, p2, q1, q2);
    let in_envelopes =
        Envelope::segment_contains(p1, p2, &pt) && Envelope::segment_contains(q1, q2, &pt);
    if in_envelopes {
        pt
    } else {
        tracing::trace!(x = pt.x, y = pt.y, "intersection outside segment envelopes");
        central_endpoint(p1, p2, q1, q2)
    }
}

/// Intersects the lines after translating all points to the centre of the
/// overlap of the two segment envelopes, removing common leading digits.
fn intersection_with_normalization(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
    let centre = Envelope::new(p1, p2)
        .intersection(&Envelope::new(q1, q2))
        .map_or_else(Coord::origin, |env| env.centre());
    let shift = |c: &Coord| Coord::new(c.x - centre.x, c.y - centre.y);
    let (n1, n2, n3, n4) = (shift(p1), shift(p2), shift(q1), shift(q2));

    let pt = match hcoordinate_intersection(&n1, &n2, &n3, &n4) {
        Ok(pt) => pt,
        Err(NotRepresentable) => {
            tracing::trace!("homogeneous intersection not representable");
            central_endpoint(&n1, &n2, &n3, &n4)
        }
    };
    Coord::new(pt.x + centre.x, pt.y + centre.y)
}

/// Marker for a homogeneous-coordinate result that has no finite Cartesian form.
#[derive(Debug, Clone, Copy)]
struct NotRepresentable;

/// Intersection of the infinite lines through `p1 p2` and `q1 q2` in homogeneous coordinates.
fn hcoordinate_intersection(
    p1: &Coord,
    p2: &Coord,
    q1: &Coord,
    q2: &Coord,
) -> Result<Coord, NotRepresentable> {
    let px = p1.y - p2.y;
    let py = p2.x - p1.x;
    let pw = p1.x * p2.y - p2.x * p1.y;

    let qx = q1.y - q2.y;
    let qy = q2.x - q1.x;
    let qw = q1.x * q2.y - q2.x * q1.y;

    let x = py * qw - qy * pw;
    let y = qx * pw - px * qw;
    let w = px * qy - qx * py;

    let x_int = x / w;
    let y_int = y / w;
    if !x_int.is_finite() || !y_int.is_finite() {
        return Err(NotRepresentable);
    }
    Ok(Coord::new(x_int, y_int))
}

/// Approximates an intersection by the input endpoint closest to the
/// average of all four endpoints.
fn central_endpoint(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> Coord {
    let pts = [p1, p2, q1, q2];
    let avg_x = pts.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let avg_y = pts.iter().map(|p| p.y).sum::<f64>() / 4.0;

    let mut best = *p1;
    let mut best_dist = f64::INFINITY;
    for p in pts {
        let dist = (p.x - avg_x).hypot(p.y - avg_y);
        if dist < best_dist {
            best_dist = dist;
            best = *p;
        }
    }
    best
}
