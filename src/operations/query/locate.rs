use crate::geometry::{is_closed, BoundaryNodeRule, Geometry, Polygon};
use crate::math::polygon_2d::{is_on_line, locate_point_in_ring};
use crate::math::{Coord, Envelope};
use crate::topology::Location;

/// Locates a point relative to a geometry of any type.
///
/// For collections the locations against each member are combined: the
/// number of members whose boundary contains the point is checked against
/// the boundary rule, otherwise the point is interior if it lies in or on
/// any member.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointLocator {
    rule: BoundaryNodeRule,
}

impl PointLocator {
    /// Creates a locator using `rule` to decide collection boundaries.
    #[must_use]
    pub fn new(rule: BoundaryNodeRule) -> Self {
        Self { rule }
    }

    /// Returns the location of `p` in `geometry`.
    #[must_use]
    pub fn locate(&self, p: &Coord, geometry: &Geometry) -> Location {
        if geometry.is_empty() {
            return Location::Exterior;
        }
        match geometry {
            Geometry::LineString(pts) => return locate_on_line_string(p, pts),
            Geometry::Polygon(poly) => return locate_in_polygon(p, poly),
            _ => {}
        }

        let mut acc = LocationCount::default();
        acc.compute(p, geometry);
        if self.rule.is_in_boundary(acc.boundaries) {
            Location::Boundary
        } else if acc.boundaries > 0 || acc.inside {
            Location::Interior
        } else {
            Location::Exterior
        }
    }

    /// Returns `true` if `p` is in the interior or on the boundary of `geometry`.
    #[must_use]
    pub fn intersects(&self, p: &Coord, geometry: &Geometry) -> bool {
        self.locate(p, geometry) != Location::Exterior
    }
}

#[derive(Debug, Default)]
struct LocationCount {
    inside: bool,
    boundaries: usize,
}

impl LocationCount {
    fn compute(&mut self, p: &Coord, geometry: &Geometry) {
        match geometry {
            Geometry::Point(pt) => self.update(locate_on_point(p, pt)),
            Geometry::MultiPoint(pts) => {
                for pt in pts {
                    self.update(locate_on_point(p, pt));
                }
            }
            Geometry::LineString(pts) => self.update(locate_on_line_string(p, pts)),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    self.update(locate_on_line_string(p, line));
                }
            }
            Geometry::Polygon(poly) => self.update(locate_in_polygon(p, poly)),
            Geometry::MultiPolygon(polys) => {
                for poly in polys {
                    self.update(locate_in_polygon(p, poly));
                }
            }
            Geometry::GeometryCollection(geoms) => {
                for g in geoms {
                    self.compute(p, g);
                }
            }
        }
    }

    fn update(&mut self, loc: Location) {
        match loc {
            Location::Interior => self.inside = true,
            Location::Boundary => self.boundaries += 1,
            Location::Exterior => {}
        }
    }
}

fn locate_on_point(p: &Coord, pt: &Coord) -> Location {
    if p == pt {
        Location::Interior
    } else {
        Location::Exterior
    }
}

fn locate_on_line_string(p: &Coord, pts: &[Coord]) -> Location {
    if !Envelope::from_points(pts).is_some_and(|env| env.contains_point(p)) {
        return Location::Exterior;
    }
    if !is_closed(pts) && (pts.first() == Some(p) || pts.last() == Some(p)) {
        return Location::Boundary;
    }
    if is_on_line(p, pts) {
        Location::Interior
    } else {
        Location::Exterior
    }
}

fn locate_in_ring(p: &Coord, ring: &[Coord]) -> Location {
    if !Envelope::from_points(ring).is_some_and(|env| env.contains_point(p)) {
        return Location::Exterior;
    }
    locate_point_in_ring(p, ring)
}

fn locate_in_polygon(p: &Coord, poly: &Polygon) -> Location {
    if poly.is_empty() {
        return Location::Exterior;
    }
    match locate_in_ring(p, &poly.shell) {
        Location::Interior => {}
        other => return other,
    }
    for hole in &poly.holes {
        match locate_in_ring(p, hole) {
            Location::Interior => return Location::Exterior,
            Location::Boundary => return Location::Boundary,
            Location::Exterior => {}
        }
    }
    Location::Interior
}

/// Locates a point in the areal components of `geometry`.
///
/// Returns [`Location::Interior`] if the point lies inside or on the
/// boundary of some polygon and [`Location::Exterior`] otherwise, including
/// for points on or inside a hole. Points and lines are ignored.
#[must_use]
pub fn locate_in_area(p: &Coord, geometry: &Geometry) -> Location {
    if contains_point(p, geometry) {
        Location::Interior
    } else {
        Location::Exterior
    }
}

fn contains_point(p: &Coord, geometry: &Geometry) -> bool {
    match geometry {
        Geometry::Polygon(poly) => contains_point_in_polygon(p, poly),
        Geometry::MultiPolygon(polys) => polys.iter().any(|poly| contains_point_in_polygon(p, poly)),
        Geometry::GeometryCollection(geoms) => geoms.iter().any(|g| contains_point(p, g)),
        _ => false,
    }
}

fn contains_point_in_polygon(p: &Coord, poly: &Polygon) -> bool {
    if poly.is_empty() || locate_in_ring(p, &poly.shell) == Location::Exterior {
        return false;
    }
    poly.holes
        .iter()
        .all(|hole| locate_in_ring(p, hole) == Location::Exterior)
}
