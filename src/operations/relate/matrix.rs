use std::fmt;
use std::str::FromStr;

use crate::error::GeometryError;
use crate::geometry::Dimension;
use crate::topology::Location;

const LOCATIONS: [Location; 3] = [Location::Interior, Location::Boundary, Location::Exterior];

/// Dimensionally extended nine-intersection matrix (DE-9IM).
///
/// Cell `(a, b)` holds the dimension of the intersection of location `a` of
/// the first geometry with location `b` of the second. Rows and columns are
/// ordered interior, boundary, exterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntersectionMatrix {
    cells: [[Dimension; 3]; 3],
}

impl IntersectionMatrix {
    /// Creates a matrix with every cell empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a matrix from a nine-symbol string of `F`, `0`, `1` and `2`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidPattern`] for any other symbol or length.
    pub fn from_pattern(pattern: &str) -> Result<Self, GeometryError> {
        let symbols = pattern_symbols(pattern)?;
        let mut im = Self::new();
        for (i, symbol) in symbols.into_iter().enumerate() {
            let dim = Dimension::from_symbol(symbol).ok_or_else(|| invalid(pattern))?;
            im.cells[i / 3][i % 3] = dim;
        }
        Ok(im)
    }

    #[must_use]
    pub fn get(&self, a: Location, b: Location) -> Dimension {
        self.cells[a.index()][b.index()]
    }

    pub fn set(&mut self, a: Location, b: Location, dim: Dimension) {
        self.cells[a.index()][b.index()] = dim;
    }

    /// Raises cell `(a, b)` to `dim`; a larger value is kept.
    pub fn set_at_least(&mut self, a: Location, b: Location, dim: Dimension) {
        let cell = &mut self.cells[a.index()][b.index()];
        *cell = (*cell).max(dim);
    }

    /// Like [`IntersectionMatrix::set_at_least`], doing nothing unless both
    /// locations are determined.
    pub fn set_at_least_if_valid(&mut self, a: Option<Location>, b: Option<Location>, dim: Dimension) {
        if let (Some(a), Some(b)) = (a, b) {
            self.set_at_least(a, b, dim);
        }
    }

    /// Raises every cell to the matching symbol of `pattern`.
    ///
    /// `*` and `F` leave a cell unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidPattern`] if a symbol is not one of
    /// `F * 0 1 2` or the pattern is not nine symbols long.
    pub fn set_at_least_pattern(&mut self, pattern: &str) -> Result<(), GeometryError> {
        let symbols = pattern_symbols(pattern)?;
        for (i, symbol) in symbols.into_iter().enumerate() {
            if symbol == '*' {
                continue;
            }
            let dim = Dimension::from_symbol(symbol).ok_or_else(|| invalid(pattern))?;
            let cell = &mut self.cells[i / 3][i % 3];
            *cell = (*cell).max(dim);
        }
        Ok(())
    }

    /// Swaps the roles of the two geometries.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut t = Self::new();
        for (i, row) in self.cells.iter().enumerate() {
            for (j, dim) in row.iter().enumerate() {
                t.cells[j][i] = *dim;
            }
        }
        t
    }

    /// Tests the matrix against a pattern of `T F * 0 1 2` symbols.
    ///
    /// `T` matches any non-empty cell, `*` matches anything.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidPattern`] for any other symbol or length.
    pub fn matches(&self, pattern: &str) -> Result<bool, GeometryError> {
        let symbols = pattern_symbols(pattern)?;
        let mut all = true;
        for (i, symbol) in symbols.into_iter().enumerate() {
            let dim = self.cells[i / 3][i % 3];
            let ok = match symbol {
                '*' => true,
                'T' | 't' => dim.is_non_empty(),
                other => dim == Dimension::from_symbol(other).ok_or_else(|| invalid(pattern))?,
            };
            all &= ok;
        }
        Ok(all)
    }

    fn cell(&self, a: Location, b: Location) -> bool {
        self.get(a, b).is_non_empty()
    }

    /// The geometries have no point in common.
    #[must_use]
    pub fn is_disjoint(&self) -> bool {
        !self.is_intersects()
    }

    /// The geometries have at least one point in common.
    #[must_use]
    pub fn is_intersects(&self) -> bool {
        use Location::{Boundary, Interior};
        self.cell(Interior, Interior)
            || self.cell(Interior, Boundary)
            || self.cell(Boundary, Interior)
            || self.cell(Boundary, Boundary)
    }

    /// The geometries touch only at their boundaries.
    ///
    /// Never true when both geometries are points.
    #[must_use]
    pub fn is_touches(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Dimension::{Area, Curve, Point};
        use Location::{Boundary, Interior};
        if dim_a > dim_b {
            return self.transpose().is_touches(dim_b, dim_a);
        }
        let applies = matches!(
            (dim_a, dim_b),
            (Area, Area) | (Curve, Curve) | (Curve, Area) | (Point, Area) | (Point, Curve)
        );
        applies
            && !self.cell(Interior, Interior)
            && (self.cell(Interior, Boundary) || self.cell(Boundary, Interior) || self.cell(Boundary, Boundary))
    }

    /// The interiors intersect in a set of lower dimension than the larger
    /// operand, and each operand has interior points outside the other where
    /// that is possible.
    #[must_use]
    pub fn is_crosses(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Dimension::{Area, Curve, Point};
        use Location::{Exterior, Interior};
        match (dim_a, dim_b) {
            (Point, Curve) | (Point, Area) | (Curve, Area) => {
                self.cell(Interior, Interior) && self.cell(Interior, Exterior)
            }
            (Curve, Point) | (Area, Point) | (Area, Curve) => {
                self.cell(Interior, Interior) && self.cell(Exterior, Interior)
            }
            (Curve, Curve) => self.get(Interior, Interior) == Point,
            _ => false,
        }
    }

    /// Every point of the first geometry lies in the second, and the
    /// interiors meet. Pattern `T*F**F***`.
    #[must_use]
    pub fn is_within(&self) -> bool {
        use Location::{Boundary, Exterior, Interior};
        self.cell(Interior, Interior) && !self.cell(Interior, Exterior) && !self.cell(Boundary, Exterior)
    }

    /// Pattern `T*****FF*`.
    #[must_use]
    pub fn is_contains(&self) -> bool {
        use Location::{Boundary, Exterior, Interior};
        self.cell(Interior, Interior) && !self.cell(Exterior, Interior) && !self.cell(Exterior, Boundary)
    }

    /// No point of the second geometry lies outside the first.
    #[must_use]
    pub fn is_covers(&self) -> bool {
        use Location::{Boundary, Exterior, Interior};
        self.is_intersects() && !self.cell(Exterior, Interior) && !self.cell(Exterior, Boundary)
    }

    /// No point of the first geometry lies outside the second.
    #[must_use]
    pub fn is_covered_by(&self) -> bool {
        use Location::{Boundary, Exterior, Interior};
        self.is_intersects() && !self.cell(Interior, Exterior) && !self.cell(Boundary, Exterior)
    }

    /// The geometries are topologically equal. Pattern `T*F**FFF*` with equal
    /// dimensions.
    #[must_use]
    pub fn is_equals(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Location::{Boundary, Exterior, Interior};
        dim_a == dim_b
            && self.cell(Interior, Interior)
            && !self.cell(Interior, Exterior)
            && !self.cell(Boundary, Exterior)
            && !self.cell(Exterior, Interior)
            && !self.cell(Exterior, Boundary)
    }

    /// The geometries have the same dimension, share interior points of that
    /// dimension, and each has interior points outside the other.
    #[must_use]
    pub fn is_overlaps(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Dimension::{Area, Curve, Point};
        use Location::{Exterior, Interior};
        let outside = self.cell(Interior, Exterior) && self.cell(Exterior, Interior);
        match (dim_a, dim_b) {
            (Point, Point) | (Area, Area) => self.cell(Interior, Interior) && outside,
            (Curve, Curve) => self.get(Interior, Interior) == Curve && outside,
            _ => false,
        }
    }
}

fn invalid(pattern: &str) -> GeometryError {
    GeometryError::InvalidPattern(pattern.to_string())
}

fn pattern_symbols(pattern: &str) -> Result<[char; 9], GeometryError> {
    let mut symbols = ['*'; 9];
    let mut count = 0;
    for c in pattern.chars() {
        if count == 9 {
            return Err(invalid(pattern));
        }
        symbols[count] = c;
        count += 1;
    }
    if count != 9 {
        return Err(invalid(pattern));
    }
    Ok(symbols)
}

impl fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for a in LOCATIONS {
            for b in LOCATIONS {
                write!(f, "{}", self.get(a, b))?;
            }
        }
        Ok(())
    }
}

impl FromStr for IntersectionMatrix {
    type Err = GeometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_pattern(s)
    }
}
