use std::fmt;

/// Topological dimension of a point set.
///
/// Ordered so that `Empty < Point < Curve < Area`, which lets intersection
/// matrix cells grow by taking the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Dimension {
    /// The empty set (`F` in a matrix pattern).
    #[default]
    Empty,
    /// Dimension 0.
    Point,
    /// Dimension 1.
    Curve,
    /// Dimension 2.
    Area,
}

impl Dimension {
    /// Returns the matrix symbol: `F`, `0`, `1` or `2`.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Empty => 'F',
            Self::Point => '0',
            Self::Curve => '1',
            Self::Area => '2',
        }
    }

    /// Parses a matrix symbol. Only `F`, `0`, `1` and `2` denote a dimension.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'F' | 'f' => Some(Self::Empty),
            '0' => Some(Self::Point),
            '1' => Some(Self::Curve),
            '2' => Some(Self::Area),
            _ => None,
        }
    }

    /// Returns `true` for any non-empty dimension.
    #[must_use]
    pub fn is_non_empty(self) -> bool {
        self != Self::Empty
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
