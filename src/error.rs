use thiserror::Error;

use crate::math::Coord;

/// Top-level error type for topological relate computations.
#[derive(Debug, Error)]
pub enum GeotopoError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),
}

/// Errors caused by invalid input geometry.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("too few distinct points in linear component starting at ({}, {})", at.x, at.y)]
    TooFewPoints { at: Coord },

    #[error("non-finite coordinate in input geometry")]
    NonFiniteCoordinate,

    #[error("invalid intersection matrix pattern: {0}")]
    InvalidPattern(String),
}

/// Violations of a topology graph invariant.
///
/// These indicate malformed or self-overlapping input, or a bug in the graph
/// algorithms. They are never recovered from.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("no outgoing directed edge found at ({}, {})", at.x, at.y)]
    NoOutgoingEdge { at: Coord },

    #[error("depth mismatch at ({}, {})", at.x, at.y)]
    DepthMismatch { at: Coord },

    #[error("assigned depths do not match at ({}, {})", at.x, at.y)]
    DepthConflict { at: Coord },

    #[error("directed edge visited twice during ring building at ({}, {})", at.x, at.y)]
    EdgeVisitedTwice { at: Coord },

    #[error("side location conflict at ({}, {})", at.x, at.y)]
    SideLocationConflict { at: Coord },

    #[error("found single null side at ({}, {})", at.x, at.y)]
    SingleNullSide { at: Coord },

    #[error("edge end with identical endpoints at ({}, {})", at.x, at.y)]
    DegenerateEdgeEnd { at: Coord },

    #[error("bad distance calculation for ({}, {})", at.x, at.y)]
    BadEdgeDistance { at: Coord },

    #[error("node with empty label at ({}, {})", at.x, at.y)]
    UnlabelledNode { at: Coord },
}

/// Convenience type alias for results using [`GeotopoError`].
pub type Result<T> = std::result::Result<T, GeotopoError>;
