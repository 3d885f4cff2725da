use crate::topology::Location;

use super::{orientation_index, Coord, LineIntersector, Orientation, RobustLineIntersector};

/// Computes the signed area of a ring using the shoelace formula.
///
/// Positive for counter-clockwise rings, negative for clockwise rings.
/// The ring may be open or closed.
#[must_use]
pub fn signed_area(ring: &[Coord]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let n = ring.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i].x * ring[j].y - ring[j].x * ring[i].y;
    }
    area * 0.5
}

/// Tests whether a closed ring is oriented counter-clockwise.
///
/// Uses the highest vertex and its distinct neighbours so the answer stays
/// correct for rings with repeated points and flat tops. Rings with fewer
/// than three distinct vertices report `false`.
#[must_use]
pub fn is_ccw(ring: &[Coord]) -> bool {
    if ring.len() < 4 {
        return false;
    }
    // Number of points without the closing point.
    let n = ring.len() - 1;

    let mut hi_index = 0;
    for i in 1..=n {
        if ring[i].y > ring[hi_index].y {
            hi_index = i;
        }
    }
    let hi = ring[hi_index];

    let mut prev_index = hi_index;
    loop {
        prev_index = if prev_index == 0 { n } else { prev_index - 1 };
        if ring[prev_index] != hi || prev_index == hi_index {
            break;
        }
    }

    let mut next_index = hi_index;
    loop {
        next_index = (next_index + 1) % n;
        if ring[next_index] != hi || next_index == hi_index {
            break;
        }
    }

    let prev = ring[prev_index];
    let next = ring[next_index];
    if prev == hi || next == hi || prev == next {
        return false;
    }

    match orientation_index(&prev, &hi, &next) {
        // Flat top: prev and next lie on a horizontal line through the highest point.
        Orientation::Collinear => prev.x > next.x,
        o => o == Orientation::CounterClockwise,
    }
}

/// Locates a point relative to a closed ring.
///
/// Returns [`Location::Boundary`] if the point lies on a ring segment,
/// otherwise [`Location::Interior`] or [`Location::Exterior`].
#[must_use]
pub fn locate_point_in_ring(p: &Coord, ring: &[Coord]) -> Location {
    let mut counter = RayCrossingCounter::new(*p);
    for w in ring.windows(2) {
        counter.count_segment(&w[1], &w[0]);
        if counter.on_segment {
            return Location::Boundary;
        }
    }
    counter.location()
}

/// Tests whether `p` lies on any segment of the polyline `pts`.
#[must_use]
pub fn is_on_line(p: &Coord, pts: &[Coord]) -> bool {
    let li = RobustLineIntersector::new();
    pts.windows(2)
        .any(|w| li.compute_intersection_of_point_on_line(p, &w[0], &w[1]).has_intersection())
}

/// Removes consecutive duplicate points.
#[must_use]
pub fn remove_repeated_points(pts: &[Coord]) -> Vec<Coord> {
    let mut out: Vec<Coord> = Vec::with_capacity(pts.len());
    for p in pts {
        if out.last() != Some(p) {
            out.push(*p);
        }
    }
    out
}

/// Counts crossings of a rightward horizontal ray from a point.
struct RayCrossingCounter {
    p: Coord,
    crossings: usize,
    on_segment: bool,
}

impl RayCrossingCounter {
    fn new(p: Coord) -> Self {
        Self {
            p,
            crossings: 0,
            on_segment: false,
        }
    }

    fn count_segment(&mut self, p1: &Coord, p2: &Coord) {
        let p = self.p;
        if p1.x < p.x && p2.x < p.x {
            return;
        }
        if p == *p2 {
            self.on_segment = true;
            return;
        }
        if p1.y == p.y && p2.y == p.y {
            let min_x = p1.x.min(p2.x);
            let max_x = p1.x.max(p2.x);
            if p.x >= min_x && p.x <= max_x {
                self.on_segment = true;
            }
            return;
        }
        // Half-open rule: a segment counts if it straddles the ray's y, upper endpoint excluded.
        if (p1.y > p.y && p2.y <= p.y) || (p2.y > p.y && p1.y <= p.y) {
            let mut orient = orientation_index(p1, p2, &p).signum();
            if orient == 0 {
                self.on_segment = true;
                return;
            }
            if p2.y < p1.y {
                orient = -orient;
            }
            if orient > 0 {
                self.crossings += 1;
            }
        }
    }

    fn location(&self) -> Location {
        if self.on_segment {
            Location::Boundary
        } else if self.crossings % 2 == 1 {
            Location::Interior
        } else {
            Location::Exterior
        }
    }
}
