//! Named spatial predicates evaluated on the intersection matrix.
//!
//! Each predicate first compares envelopes where that alone decides the
//! answer, then falls back to a full [`relate`].

use crate::error::Result;
use crate::geometry::Geometry;
use crate::math::Envelope;

use super::relate;

fn envelopes(a: &Geometry, b: &Geometry) -> Option<(Envelope, Envelope)> {
    Some((a.envelope()?, b.envelope()?))
}

fn envelopes_intersect(a: &Geometry, b: &Geometry) -> bool {
    envelopes(a, b).is_some_and(|(ea, eb)| ea.intersects(&eb))
}

/// Returns `true` if the envelope of `a` can contain the envelope of `b`.
fn envelope_covers(a: &Geometry, b: &Geometry) -> bool {
    envelopes(a, b).is_some_and(|(ea, eb)| ea.contains_envelope(&eb))
}

/// True if the geometries share at least one point.
///
/// # Example
///
/// ```
/// use geotopo::operations::relate::predicates::intersects;
/// use geotopo::Geometry;
///
/// let sq = Geometry::polygon(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0), (0.0, 0.0)]);
/// assert!(intersects(&sq, &Geometry::point(1.0, 1.0)).unwrap());
/// ```
///
/// # Errors
///
/// Propagates errors from [`relate`].
pub fn intersects(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !envelopes_intersect(a, b) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_intersects())
}

/// # Errors
///
/// Propagates errors from [`relate`].
pub fn disjoint(a: &Geometry, b: &Geometry) -> Result<bool> {
    intersects(a, b).map(|i| !i)
}

/// True if every point of `b` lies in `a` and their interiors meet.
///
/// # Example
///
/// ```
/// use geotopo::operations::relate::predicates::contains;
/// use geotopo::Geometry;
///
/// let sq = Geometry::polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
/// assert!(contains(&sq, &Geometry::point(2.0, 2.0)).unwrap());
/// assert!(!contains(&sq, &Geometry::point(4.0, 2.0)).unwrap());
/// ```
///
/// # Errors
///
/// Propagates errors from [`relate`].
pub fn contains(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !envelope_covers(a, b) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_contains())
}

/// # Errors
///
/// Propagates errors from [`relate`].
pub fn within(a: &Geometry, b: &Geometry) -> Result<bool> {
    contains(b, a)
}

/// True if no point of `b` lies outside `a`.
///
/// # Errors
///
/// Propagates errors from [`relate`].
pub fn covers(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !envelope_covers(a, b) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_covers())
}

/// # Errors
///
/// Propagates errors from [`relate`].
pub fn covered_by(a: &Geometry, b: &Geometry) -> Result<bool> {
    covers(b, a)
}

/// True if the geometries meet only on their boundaries.
///
/// # Errors
///
/// Propagates errors from [`relate`].
pub fn touches(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !envelopes_intersect(a, b) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_touches(a.dimension(), b.dimension()))
}

/// # Errors
///
/// Propagates errors from [`relate`].
pub fn crosses(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !envelopes_intersect(a, b) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_crosses(a.dimension(), b.dimension()))
}

/// # Errors
///
/// Propagates errors from [`relate`].
pub fn overlaps(a: &Geometry, b: &Geometry) -> Result<bool> {
    if !envelopes_intersect(a, b) {
        return Ok(false);
    }
    Ok(relate(a, b)?.is_overlaps(a.dimension(), b.dimension()))
}

/// True if the geometries are the same point set, regardless of vertex
/// order or ring orientation.
///
/// # Example
///
/// ```
/// use geotopo::operations::relate::predicates::equals_topo;
/// use geotopo::Geometry;
///
/// let a = Geometry::polygon(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]);
/// let b = Geometry::polygon(&[(4.0, 4.0), (4.0, 0.0), (0.0, 0.0), (0.0, 4.0), (4.0, 4.0)]);
/// assert!(equals_topo(&a, &b).unwrap());
/// ```
///
/// # Errors
///
/// Propagates errors from [`relate`].
pub fn equals_topo(a: &Geometry, b: &Geometry) -> Result<bool> {
    match envelopes(a, b) {
        Some((ea, eb)) if ea == eb => {}
        _ => return Ok(false),
    }
    Ok(relate(a, b)?.is_equals(a.dimension(), b.dimension()))
}

/// Tests the matrix of `a` and `b` against a DE-9IM pattern such as
/// `"T*F**F***"`.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidPattern`](crate::error::GeometryError::InvalidPattern)
/// for a malformed pattern, and propagates errors from [`relate`].
pub fn relate_pattern(a: &Geometry, b: &Geometry, pattern: &str) -> Result<bool> {
    Ok(relate(a, b)?.matches(pattern)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{GeometryError, GeotopoError};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::polygon(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)])
    }

    #[test]
    fn containment_family() {
        let outer = square(0.0, 0.0, 10.0, 10.0);
        let inner = square(2.0, 2.0, 8.0, 8.0);
        assert!(contains(&outer, &inner).unwrap());
        assert!(within(&inner, &outer).unwrap());
        assert!(covers(&outer, &inner).unwrap());
        assert!(covered_by(&inner, &outer).unwrap());
        assert!(!contains(&inner, &outer).unwrap());
        assert!(!overlaps(&outer, &inner).unwrap());
    }

    #[test]
    fn covers_but_not_contains_boundary_point() {
        let sq = square(0.0, 0.0, 10.0, 10.0);
        let corner = Geometry::point(0.0, 0.0);
        assert!(covers(&sq, &corner).unwrap());
        assert!(!contains(&sq, &corner).unwrap());
        assert!(touches(&corner, &sq).unwrap());
    }

    #[test]
    fn overlapping_squares() {
        let a = square(0.0, 0.0, 4.0, 4.0);
        let b = square(2.0, 2.0, 6.0, 6.0);
        assert!(overlaps(&a, &b).unwrap());
        assert!(intersects(&a, &b).unwrap());
        assert!(!touches(&a, &b).unwrap());
        assert!(!equals_topo(&a, &b).unwrap());
    }

    #[test]
    fn line_crosses_square() {
        let line = Geometry::line_string(&[(0.0, 5.0), (10.0, 5.0)]);
        let sq = square(2.0, 2.0, 8.0, 8.0);
        assert!(crosses(&line, &sq).unwrap());
        assert!(crosses(&sq, &line).unwrap());
        assert!(relate_pattern(&line, &sq, "1*1******").unwrap());
    }

    #[test]
    fn far_apart_short_circuits() {
        let a = square(0.0, 0.0, 1.0, 1.0);
        let b = square(5.0, 5.0, 6.0, 6.0);
        assert!(disjoint(&a, &b).unwrap());
        assert!(!crosses(&a, &b).unwrap());
        assert!(!equals_topo(&a, &b).unwrap());
    }

    #[test]
    fn bad_pattern_is_rejected() {
        let a = Geometry::point(0.0, 0.0);
        let err = relate_pattern(&a, &a, "T*F").unwrap_err();
        assert!(matches!(err, GeotopoError::Geometry(GeometryError::InvalidPattern(_))));
    }
}
