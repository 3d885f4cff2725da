use crate::error::{GeometryError, GeotopoError, Result};
use crate::geometry::{BoundaryNodeRule, Geometry};
use crate::math::{Coord, RobustLineIntersector};
use crate::operations::relate::RelateNodeGraph;
use crate::topology::{EdgeSetIntersectorKind, GeometryGraph};

/// Why a geometry failed the consistent-area check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidReason {
    /// A ring has fewer than four distinct points.
    TooFewPoints,
    /// Two ring segments cross at a point interior to both.
    SelfIntersection,
    /// Side locations do not alternate around a node.
    InconsistentArea,
    /// Two rings share a segment.
    DuplicateRings,
}

/// Outcome of [`IsValid::execute`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Validity {
    Valid,
    Invalid { reason: InvalidReason, at: Coord },
}

impl Validity {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Checks that the rings of a polygonal geometry form a consistent area.
///
/// Every ring is noded against itself and every other ring. The geometry is
/// invalid if any rings cross properly, if the interior and exterior sides of
/// the edges do not alternate around every node, or if two edges overlap.
/// Non-polygonal geometries are always valid.
pub struct IsValid<'a> {
    geometry: &'a Geometry,
    esi: EdgeSetIntersectorKind,
}

impl<'a> IsValid<'a> {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(geometry: &'a Geometry) -> Self {
        Self {
            geometry,
            esi: EdgeSetIntersectorKind::default(),
        }
    }

    #[must_use]
    pub fn with_edge_set_intersector(mut self, esi: EdgeSetIntersectorKind) -> Self {
        self.esi = esi;
        self
    }

    /// Executes the check.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFiniteCoordinate`] for NaN or infinite
    /// input, and a [`TopologyError`](crate::error::TopologyError) if the
    /// noded graph cannot be built.
    pub fn execute(&self) -> Result<Validity> {
        let rule = BoundaryNodeRule::Mod2;
        let mut gg = match GeometryGraph::build(self.geometry, 0, rule) {
            Ok(gg) => gg,
            Err(GeotopoError::Geometry(GeometryError::TooFewPoints { at })) => {
                return Ok(invalid(InvalidReason::TooFewPoints, at));
            }
            Err(err) => return Err(err),
        };
        if !self.geometry.is_polygonal() {
            return Ok(Validity::Valid);
        }

        let li = RobustLineIntersector::new();
        let summary = gg.compute_self_nodes(&li, true, &self.esi)?;
        if summary.has_proper {
            if let Some(at) = summary.proper_intersection_point {
                return Ok(invalid(InvalidReason::SelfIntersection, at));
            }
        }

        let mut graph = RelateNodeGraph::build(&mut gg)?;
        for node in graph.nodes_mut().iter_mut() {
            if !node.star_mut().is_area_labels_consistent(rule, 0) {
                return Ok(invalid(InvalidReason::InconsistentArea, *node.coord()));
            }
        }
        for node in graph.nodes().iter() {
            if node.star().duplicate_bundle().is_some() {
                return Ok(invalid(InvalidReason::DuplicateRings, *node.coord()));
            }
        }
        Ok(Validity::Valid)
    }
}

fn invalid(reason: InvalidReason, at: Coord) -> Validity {
    tracing::debug!(?reason, x = at.x, y = at.y, "geometry is invalid");
    Validity::Invalid { reason, at }
}
