mod boundary_rule;
mod dimension;
mod shape;

pub use boundary_rule::BoundaryNodeRule;
pub use dimension::Dimension;
pub use shape::{is_closed, Geometry, Polygon};
