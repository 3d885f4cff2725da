use std::ops::{Mul, Sub};

use super::{Coord, DP_SAFE_EPSILON};

/// Orientation of a point relative to a directed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// The point lies to the right of the segment.
    Clockwise,
    /// The point lies on the line through the segment.
    Collinear,
    /// The point lies to the left of the segment.
    CounterClockwise,
}

impl Orientation {
    /// Returns `-1`, `0` or `1`.
    #[must_use]
    pub fn signum(self) -> i32 {
        match self {
            Self::Clockwise => -1,
            Self::Collinear => 0,
            Self::CounterClockwise => 1,
        }
    }

    fn from_sign(sign: i32) -> Self {
        match sign.cmp(&0) {
            std::cmp::Ordering::Less => Self::Clockwise,
            std::cmp::Ordering::Equal => Self::Collinear,
            std::cmp::Ordering::Greater => Self::CounterClockwise,
        }
    }
}

/// Returns the orientation of point `q` relative to the directed segment `p1 -> p2`.
///
/// A fast floating-point filter decides almost every case. When the
/// determinant is too close to zero for the filter to be trusted, it is
/// recomputed in double-double arithmetic.
#[must_use]
pub fn orientation_index(p1: &Coord, p2: &Coord, q: &Coord) -> Orientation {
    if let Some(orientation) = orientation_filter(p1, p2, q) {
        return orientation;
    }

    let dx1 = DoubleDouble::from(p2.x) - p1.x;
    let dy1 = DoubleDouble::from(p2.y) - p1.y;
    let dx2 = DoubleDouble::from(q.x) - p2.x;
    let dy2 = DoubleDouble::from(q.y) - p2.y;
    let det = dx1 * dy2 - dy1 * dx2;
    Orientation::from_sign(det.signum())
}

/// Floating-point orientation with a conservative error bound.
///
/// Returns `None` if the sign of the determinant cannot be trusted.
fn orientation_filter(pa: &Coord, pb: &Coord, pc: &Coord) -> Option<Orientation> {
    let det_left = (pa.x - pc.x) * (pb.y - pc.y);
    let det_right = (pa.y - pc.y) * (pb.x - pc.x);
    let det = det_left - det_right;

    let det_sum = if det_left > 0.0 {
        if det_right <= 0.0 {
            return Some(sign_of(det));
        }
        det_left + det_right
    } else if det_left < 0.0 {
        if det_right >= 0.0 {
            return Some(sign_of(det));
        }
        -det_left - det_right
    } else {
        return Some(sign_of(det));
    };

    let err_bound = DP_SAFE_EPSILON * det_sum;
    if det >= err_bound || -det >= err_bound {
        return Some(sign_of(det));
    }
    None
}

fn sign_of(value: f64) -> Orientation {
    if value > 0.0 {
        Orientation::CounterClockwise
    } else if value < 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Unevaluated sum `hi + lo` giving roughly 106 bits of precision.
#[derive(Debug, Clone, Copy)]
struct DoubleDouble {
    hi: f64,
    lo: f64,
}

impl DoubleDouble {
    fn signum(self) -> i32 {
        if self.hi > 0.0 {
            1
        } else if self.hi < 0.0 {
            -1
        } else if self.lo > 0.0 {
            1
        } else if self.lo < 0.0 {
            -1
        } else {
            0
        }
    }
}

impl From<f64> for DoubleDouble {
    fn from(hi: f64) -> Self {
        Self { hi, lo: 0.0 }
    }
}

fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

fn quick_two_sum(a: f64, b: f64) -> DoubleDouble {
    let s = a + b;
    let err = b - (s - a);
    DoubleDouble { hi: s, lo: err }
}

impl Sub<f64> for DoubleDouble {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        let (s, e) = two_sum(self.hi, -rhs);
        quick_two_sum(s, e + self.lo)
    }
}

impl Sub for DoubleDouble {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        let (s, e) = two_sum(self.hi, -rhs.hi);
        let (t, f) = two_sum(self.lo, -rhs.lo);
        let r = quick_two_sum(s, e + t);
        quick_two_sum(r.hi, r.lo + f)
    }
}

impl Mul for DoubleDouble {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let p = self.hi * rhs.hi;
        let err = self.hi.mul_add(rhs.hi, -p);
        quick_two_sum(p, err + (self.hi * rhs.lo + self.lo * rhs.hi))
    }
}
