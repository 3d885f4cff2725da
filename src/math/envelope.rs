use super::Coord;

/// An axis-aligned bounding box in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Minimum corner of the bounding box.
    pub min: Coord,
    /// Maximum corner of the bounding box.
    pub max: Coord,
}

impl Envelope {
    /// Creates the envelope spanned by two points.
    #[must_use]
    pub fn new(a: &Coord, b: &Coord) -> Self {
        Self {
            min: Coord::new(a.x.min(b.x), a.y.min(b.y)),
            max: Coord::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates the envelope of a set of points, or `None` if the set is empty.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coord>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut env = Self::new(first, first);
        for p in iter {
            env.expand_to_include(p);
        }
        Some(env)
    }

    /// Grows the envelope to contain `p`.
    pub fn expand_to_include(&mut self, p: &Coord) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    /// Grows the envelope to contain `other`.
    pub fn expand_to_include_envelope(&mut self, other: &Envelope) {
        self.expand_to_include(&other.min);
        self.expand_to_include(&other.max);
    }

    /// Returns `true` if the two envelopes share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &Envelope) -> bool {
        other.min.x <= self.max.x
            && other.max.x >= self.min.x
            && other.min.y <= self.max.y
            && other.max.y >= self.min.y
    }

    /// Returns `true` if `p` lies inside or on the envelope.
    #[must_use]
    pub fn contains_point(&self, p: &Coord) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Returns `true` if `other` lies entirely inside or on this envelope.
    #[must_use]
    pub fn contains_envelope(&self, other: &Envelope) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    /// Returns the overlap of the two envelopes, if any.
    #[must_use]
    pub fn intersection(&self, other: &Envelope) -> Option<Envelope> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self {
            min: Coord::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Coord::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        })
    }

    /// Returns the centre point of the envelope.
    #[must_use]
    pub fn centre(&self) -> Coord {
        Coord::new((self.min.x + self.max.x) / 2.0, (self.min.y + self.max.y) / 2.0)
    }

    /// Tests whether `q` lies in the envelope of the segment `p1 -> p2`.
    #[must_use]
    pub fn segment_contains(p1: &Coord, p2: &Coord, q: &Coord) -> bool {
        q.x >= p1.x.min(p2.x)
            && q.x <= p1.x.max(p2.x)
            && q.y >= p1.y.min(p2.y)
            && q.y <= p1.y.max(p2.y)
    }

    /// Tests whether the envelopes of two segments overlap.
    #[must_use]
    pub fn segments_intersect(p1: &Coord, p2: &Coord, q1: &Coord, q2: &Coord) -> bool {
        let min_q = q1.x.min(q2.x);
        let max_q = q1.x.max(q2.x);
        let min_p = p1.x.min(p2.x);
        let max_p = p1.x.max(p2.x);
        if min_p > max_q || max_p < min_q {
            return false;
        }
        let min_q = q1.y.min(q2.y);
        let max_q = q1.y.max(q2.y);
        let min_p = p1.y.min(p2.y);
        let max_p = p1.y.max(p2.y);
        !(min_p > max_q || max_p < min_q)
    }
}
