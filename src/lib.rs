pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{GeotopoError, Result};
pub use geometry::{BoundaryNodeRule, Dimension, Geometry, Polygon};
pub use math::Coord;
pub use operations::relate::{relate, IntersectionMatrix, RelateOp};
