pub mod envelope;
pub mod intersect_2d;
pub mod orientation;
pub mod polygon_2d;

pub use envelope::Envelope;
pub use intersect_2d::{
    IntersectionKind, LineIntersector, RobustLineIntersector, SegmentIntersection,
};
pub use orientation::{orientation_index, Orientation};

/// 2D coordinate type.
///
/// Coordinates are compared by exact equality; topology never snaps them.
pub type Coord = nalgebra::Point2<f64>;

/// Relative error bound used by the floating-point orientation filter.
pub const DP_SAFE_EPSILON: f64 = 1e-15;

/// Returns `true` if both ordinates are finite.
#[must_use]
pub fn is_finite(c: &Coord) -> bool {
    c.x.is_finite() && c.y.is_finite()
}
