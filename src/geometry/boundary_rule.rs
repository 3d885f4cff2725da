/// Decides whether a point is on the boundary of a linear geometry from the
/// number of component endpoints that coincide with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoundaryNodeRule {
    /// OGC SFS rule: boundary iff the point is an endpoint an odd number of times.
    #[default]
    Mod2,
    /// Every endpoint is on the boundary.
    Endpoint,
    /// Only endpoints shared by more than one component are on the boundary.
    MultivalentEndpoint,
    /// Only endpoints of exactly one component are on the boundary.
    MonovalentEndpoint,
}

impl BoundaryNodeRule {
    /// Returns `true` if a point occurring `count` times as an endpoint lies on the boundary.
    #[must_use]
    pub fn is_in_boundary(self, count: usize) -> bool {
        match self {
            Self::Mod2 => count % 2 == 1,
            Self::Endpoint => count > 0,
            Self::MultivalentEndpoint => count > 1,
            Self::MonovalentEndpoint => count == 1,
        }
    }
}
