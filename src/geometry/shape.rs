use std::collections::BTreeMap;

use crate::math::polygon_2d::signed_area;
use crate::math::{Coord, Envelope};
use crate::topology::CoordKey;

use super::{BoundaryNodeRule, Dimension};

/// A polygon: one shell ring and zero or more hole rings.
///
/// Rings are closed coordinate sequences (first point equals last point).
/// Orientation is free; the graph builder derives it.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub shell: Vec<Coord>,
    pub holes: Vec<Vec<Coord>>,
}

impl Polygon {
    /// Creates a polygon from a shell and holes.
    #[must_use]
    pub fn new(shell: Vec<Coord>, holes: Vec<Vec<Coord>>) -> Self {
        Self { shell, holes }
    }

    /// Returns `true` if the shell has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shell.is_empty()
    }

    /// Unsigned area of the shell minus the holes, whatever their orientation.
    #[must_use]
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        signed_area(&self.shell).abs() - holes
    }

    /// Iterates over the shell followed by the holes.
    pub fn rings(&self) -> impl Iterator<Item = &[Coord]> {
        std::iter::once(self.shell.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }
}

/// A planar vector geometry.
///
/// Empty geometries are represented by empty coordinate lists or empty
/// collections; a [`Geometry::Point`] is never empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    Polygon(Polygon),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// Creates a point.
    #[must_use]
    pub fn point(x: f64, y: f64) -> Self {
        Self::Point(Coord::new(x, y))
    }

    /// Creates a line string from `(x, y)` pairs.
    #[must_use]
    pub fn line_string(coords: &[(f64, f64)]) -> Self {
        Self::LineString(to_coords(coords))
    }

    /// Creates a polygon without holes from `(x, y)` pairs of a closed ring.
    #[must_use]
    pub fn polygon(shell: &[(f64, f64)]) -> Self {
        Self::Polygon(Polygon::new(to_coords(shell), Vec::new()))
    }

    /// Creates a polygon with holes from `(x, y)` pairs of closed rings.
    #[must_use]
    pub fn polygon_with_holes(shell: &[(f64, f64)], holes: &[&[(f64, f64)]]) -> Self {
        let holes = holes.iter().map(|h| to_coords(h)).collect();
        Self::Polygon(Polygon::new(to_coords(shell), holes))
    }

    /// Returns `true` if the geometry contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(_) => false,
            Self::LineString(pts) | Self::MultiPoint(pts) => pts.is_empty(),
            Self::Polygon(poly) => poly.is_empty(),
            Self::MultiLineString(lines) => lines.iter().all(Vec::is_empty),
            Self::MultiPolygon(polys) => polys.iter().all(Polygon::is_empty),
            Self::GeometryCollection(geoms) => geoms.iter().all(Geometry::is_empty),
        }
    }

    /// Returns `true` for polygons and multi-polygons.
    #[must_use]
    pub fn is_polygonal(&self) -> bool {
        matches!(self, Self::Polygon(_) | Self::MultiPolygon(_))
    }

    /// Topological dimension of the geometry.
    ///
    /// Collections take the largest dimension of their members; an empty
    /// collection has dimension [`Dimension::Empty`].
    #[must_use]
    pub fn dimension(&self) -> Dimension {
        match self {
            Self::Point(_) | Self::MultiPoint(_) => Dimension::Point,
            Self::LineString(_) | Self::MultiLineString(_) => Dimension::Curve,
            Self::Polygon(_) | Self::MultiPolygon(_) => Dimension::Area,
            Self::GeometryCollection(geoms) => geoms
                .iter()
                .map(Geometry::dimension)
                .max()
                .unwrap_or(Dimension::Empty),
        }
    }

    /// Dimension of the geometry's boundary under the `Mod2` rule.
    ///
    /// See [`Geometry::boundary_dimension_with`].
    #[must_use]
    pub fn boundary_dimension(&self) -> Dimension {
        self.boundary_dimension_with(BoundaryNodeRule::Mod2)
    }

    /// Dimension of the geometry's boundary under `rule`.
    ///
    /// Areas are bounded by curves. Otherwise the boundary is the set of line
    /// endpoints whose occurrence count across all components `rule` accepts,
    /// so two lines joined end to end have no boundary under `Mod2`.
    #[must_use]
    pub fn boundary_dimension_with(&self, rule: BoundaryNodeRule) -> Dimension {
        if self.dimension() == Dimension::Area {
            return Dimension::Curve;
        }
        let mut counts: BTreeMap<CoordKey, usize> = BTreeMap::new();
        self.count_endpoints(&mut counts);
        if counts.values().any(|&n| rule.is_in_boundary(n)) {
            Dimension::Point
        } else {
            Dimension::Empty
        }
    }

    fn count_endpoints(&self, counts: &mut BTreeMap<CoordKey, usize>) {
        match self {
            Self::LineString(pts) => count_line_endpoints(pts, counts),
            Self::MultiLineString(lines) => {
                for line in lines {
                    count_line_endpoints(line, counts);
                }
            }
            Self::GeometryCollection(geoms) => {
                for g in geoms {
                    g.count_endpoints(counts);
                }
            }
            Self::Point(_) | Self::MultiPoint(_) | Self::Polygon(_) | Self::MultiPolygon(_) => {}
        }
    }

    /// Bounding box of all coordinates, or `None` if the geometry is empty.
    #[must_use]
    pub fn envelope(&self) -> Option<Envelope> {
        match self {
            Self::Point(p) => Some(Envelope::new(p, p)),
            Self::LineString(pts) | Self::MultiPoint(pts) => Envelope::from_points(pts),
            // Holes lie inside the shell.
            Self::Polygon(poly) => Envelope::from_points(&poly.shell),
            Self::MultiLineString(lines) => merge_envelopes(lines.iter().map(|l| Envelope::from_points(l))),
            Self::MultiPolygon(polys) => {
                merge_envelopes(polys.iter().map(|p| Envelope::from_points(&p.shell)))
            }
            Self::GeometryCollection(geoms) => merge_envelopes(geoms.iter().map(Geometry::envelope)),
        }
    }
}

/// Returns `true` if a non-empty coordinate list starts and ends at the same point.
#[must_use]
pub fn is_closed(pts: &[Coord]) -> bool {
    match (pts.first(), pts.last()) {
        (Some(first), Some(last)) => first == last,
        _ => false,
    }
}

fn count_line_endpoints(pts: &[Coord], counts: &mut BTreeMap<CoordKey, usize>) {
    if let (Some(first), Some(last)) = (pts.first(), pts.last()) {
        *counts.entry(CoordKey::from(first)).or_default() += 1;
        *counts.entry(CoordKey::from(last)).or_default() += 1;
    }
}

fn to_coords(pairs: &[(f64, f64)]) -> Vec<Coord> {
    pairs.iter().map(|&(x, y)| Coord::new(x, y)).collect()
}

fn merge_envelopes(envs: impl Iterator<Item = Option<Envelope>>) -> Option<Envelope> {
    envs.flatten().reduce(|mut acc, env| {
        acc.expand_to_include_envelope(&env);
        acc
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<(f64, f64)> {
        vec![
            (x0, y0),
            (x0, y0 + size),
            (x0 + size, y0 + size),
            (x0 + size, y0),
            (x0, y0),
        ]
    }

    #[test]
    fn dimensions() {
        assert_eq!(Geometry::point(1.0, 2.0).dimension(), Dimension::Point);
        assert_eq!(Geometry::point(1.0, 2.0).boundary_dimension(), Dimension::Empty);

        let open = Geometry::line_string(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(open.dimension(), Dimension::Curve);
        assert_eq!(open.boundary_dimension(), Dimension::Point);

        let closed = Geometry::line_string(&square(0.0, 0.0, 1.0));
        assert_eq!(closed.boundary_dimension(), Dimension::Empty);

        let poly = Geometry::polygon(&square(0.0, 0.0, 1.0));
        assert_eq!(poly.dimension(), Dimension::Area);
        assert_eq!(poly.boundary_dimension(), Dimension::Curve);
    }

    #[test]
    fn collection_takes_max_dimension() {
        let gc = Geometry::GeometryCollection(vec![
            Geometry::point(0.0, 0.0),
            Geometry::line_string(&[(0.0, 0.0), (1.0, 0.0)]),
        ]);
        assert_eq!(gc.dimension(), Dimension::Curve);
        assert_eq!(gc.boundary_dimension(), Dimension::Point);
        assert_eq!(Geometry::GeometryCollection(vec![]).dimension(), Dimension::Empty);
    }

    #[test]
    fn emptiness() {
        assert!(Geometry::LineString(vec![]).is_empty());
        assert!(Geometry::GeometryCollection(vec![Geometry::MultiPoint(vec![])]).is_empty());
        assert!(!Geometry::point(0.0, 0.0).is_empty());
        assert!(Geometry::GeometryCollection(vec![]).envelope().is_none());
    }

    #[test]
    fn envelope_of_collection() {
        let gc = Geometry::GeometryCollection(vec![
            Geometry::point(-1.0, 5.0),
            Geometry::polygon(&square(0.0, 0.0, 2.0)),
        ]);
        let env = gc.envelope().unwrap();
        assert_eq!(env.min, Coord::new(-1.0, 0.0));
        assert_eq!(env.max, Coord::new(2.0, 5.0));
    }

    #[test]
    fn boundary_dimension_counts_shared_endpoints() {
        let looped = Geometry::MultiLineString(vec![
            to_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
            to_coords(&[(1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]),
        ]);
        assert_eq!(looped.boundary_dimension(), Dimension::Empty);
        assert_eq!(looped.boundary_dimension_with(BoundaryNodeRule::Endpoint), Dimension::Point);

        let closed = Geometry::line_string(&square(0.0, 0.0, 1.0));
        assert_eq!(closed.boundary_dimension_with(BoundaryNodeRule::Endpoint), Dimension::Point);
        assert_eq!(
            closed.boundary_dimension_with(BoundaryNodeRule::MonovalentEndpoint),
            Dimension::Empty
        );
    }

    #[test]
    fn polygon_area_ignores_orientation() {
        let mut hole = to_coords(&square(1.0, 1.0, 2.0));
        hole.reverse();
        let poly = Polygon::new(to_coords(&square(0.0, 0.0, 4.0)), vec![hole]);
        assert_relative_eq!(poly.area(), 12.0);
        assert_relative_eq!(Polygon::new(vec![], vec![]).area(), 0.0);
    }
}
