use crate::error::TopologyError;
use crate::geometry::{BoundaryNodeRule, Dimension, Geometry};
use crate::math::Coord;
use crate::topology::{is_area_labelling_consistent, label_edge_star, EdgeEnd, Label, Location, Position};

use super::edge_end_builder::RelateEdgeEnd;
use super::matrix::IntersectionMatrix;

/// Adds the contribution of a labelled edge to `im`: the `On` locations
/// meet in a curve, and for area labels each side meets in an area.
pub fn update_im_from_label(label: &Label, im: &mut IntersectionMatrix) {
    im.set_at_least_if_valid(label.location(0), label.location(1), Dimension::Curve);
    if label.is_area() {
        for pos in [Position::Left, Position::Right] {
            im.set_at_least_if_valid(label.get(0, pos), label.get(1, pos), Dimension::Area);
        }
    }
}

/// All edge ends leaving a node in the same direction.
#[derive(Debug, Clone)]
pub struct EdgeEndBundle {
    end: EdgeEnd,
    ends: Vec<RelateEdgeEnd>,
    label: Label,
}

impl EdgeEndBundle {
    fn new(first: RelateEdgeEnd) -> Self {
        Self {
            end: first.end,
            ends: vec![first],
            label: first.label,
        }
    }

    #[must_use]
    pub fn end(&self) -> &EdgeEnd {
        &self.end
    }

    #[must_use]
    pub fn ends(&self) -> &[RelateEdgeEnd] {
        &self.ends
    }

    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Combines the labels of the bundled ends.
    ///
    /// The bundle is an area bundle if any end is. Its `On` location is
    /// decided by `rule` from the number of boundary ends, otherwise it is
    /// interior if any end is. Each side is interior if any area end has an
    /// interior side there, else exterior if any has an exterior side.
    pub fn compute_label(&mut self, rule: BoundaryNodeRule) {
        let is_area = self.ends.iter().any(|e| e.label.is_area());
        self.label = if is_area { Label::empty_area() } else { Label::empty() };
        for geom_index in 0..2 {
            self.compute_label_on(geom_index, rule);
            if is_area {
                self.compute_label_side(geom_index, Position::Left);
                self.compute_label_side(geom_index, Position::Right);
            }
        }
    }

    fn compute_label_on(&mut self, geom_index: usize, rule: BoundaryNodeRule) {
        let boundary_count = self
            .ends
            .iter()
            .filter(|e| e.label.location(geom_index) == Some(Location::Boundary))
            .count();
        let found_interior = self
            .ends
            .iter()
            .any(|e| e.label.location(geom_index) == Some(Location::Interior));

        let loc = if boundary_count > 0 {
            if rule.is_in_boundary(boundary_count) {
                Some(Location::Boundary)
            } else {
                Some(Location::Interior)
            }
        } else if found_interior {
            Some(Location::Interior)
        } else {
            None
        };
        self.label.set(geom_index, Position::On, loc);
    }

    fn compute_label_side(&mut self, geom_index: usize, side: Position) {
        for e in self.ends.iter().filter(|e| e.label.is_area()) {
            match e.label.get(geom_index, side) {
                Some(Location::Interior) => {
                    self.label.set(geom_index, side, Some(Location::Interior));
                    return;
                }
                Some(Location::Exterior) => {
                    self.label.set(geom_index, side, Some(Location::Exterior));
                }
                _ => {}
            }
        }
    }

    pub fn update_im(&self, im: &mut IntersectionMatrix) {
        update_im_from_label(&self.label, im);
    }
}

/// Edge-end bundles around one node, in counter-clockwise order.
#[derive(Debug, Clone, Default)]
pub struct EdgeEndBundleStar {
    bundles: Vec<EdgeEndBundle>,
}

impl EdgeEndBundleStar {
    /// Adds an edge end to the bundle with its direction, creating one if needed.
    pub fn insert(&mut self, e: RelateEdgeEnd) {
        match self
            .bundles
            .binary_search_by(|b| b.end.compare_direction(&e.end))
        {
            Ok(i) => self.bundles[i].ends.push(e),
            Err(i) => self.bundles.insert(i, EdgeEndBundle::new(e)),
        }
    }

    #[must_use]
    pub fn bundles(&self) -> &[EdgeEndBundle] {
        &self.bundles
    }

    #[must_use]
    pub fn degree(&self) -> usize {
        self.bundles.len()
    }

    fn compute_bundle_labels(&mut self, rule: BoundaryNodeRule) {
        for bundle in &mut self.bundles {
            bundle.compute_label(rule);
        }
    }

    /// Labels every bundle at the node `at`.
    ///
    /// # Errors
    ///
    /// Returns a [`TopologyError`] if side locations are inconsistent.
    pub fn compute_labelling(
        &mut self,
        at: &Coord,
        rule: BoundaryNodeRule,
        geometries: [&Geometry; 2],
    ) -> Result<(), TopologyError> {
        self.compute_bundle_labels(rule);
        let mut labels: Vec<&mut Label> = self.bundles.iter_mut().map(|b| &mut b.label).collect();
        label_edge_star(&mut labels, at, geometries)
    }

    pub fn update_im(&self, im: &mut IntersectionMatrix) {
        for bundle in &self.bundles {
            bundle.update_im(im);
        }
    }

    /// Checks that side locations of operand `geom_index` alternate around
    /// the node.
    pub fn is_area_labels_consistent(&mut self, rule: BoundaryNodeRule, geom_index: usize) -> bool {
        self.compute_bundle_labels(rule);
        let labels: Vec<&Label> = self.bundles.iter().map(EdgeEndBundle::label).collect();
        is_area_labelling_consistent(&labels, geom_index)
    }

    /// Returns a bundle holding more than one end, which means two edges
    /// overlap along their first segment.
    #[must_use]
    pub fn duplicate_bundle(&self) -> Option<&EdgeEndBundle> {
        self.bundles.iter().find(|b| b.ends.len() > 1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord {
        Coord::new(x, y)
    }

    fn end_to(x: f64, y: f64, label: Label) -> RelateEdgeEnd {
        RelateEdgeEnd {
            end: EdgeEnd::new(c(0.0, 0.0), c(x, y)).unwrap(),
            label,
        }
    }

    #[test]
    fn ends_with_same_direction_share_a_bundle() {
        let mut star = EdgeEndBundleStar::default();
        star.insert(end_to(1.0, 1.0, Label::line(0, Location::Interior)));
        star.insert(end_to(-1.0, 0.0, Label::line(0, Location::Interior)));
        star.insert(end_to(2.0, 2.0, Label::line(1, Location::Interior)));
        assert_eq!(star.degree(), 2);
        let dup = star.duplicate_bundle().unwrap();
        assert_eq!(dup.ends().len(), 2);
        assert_eq!(*dup.end().directed_coord(), c(1.0, 1.0));
    }

    #[test]
    fn bundle_on_location_uses_boundary_rule() {
        let mut star = EdgeEndBundleStar::default();
        star.insert(end_to(1.0, 0.0, Label::line(0, Location::Boundary)));
        star.insert(end_to(2.0, 0.0, Label::line(0, Location::Boundary)));
        let mut bundle = star.bundles()[0].clone();
        bundle.compute_label(BoundaryNodeRule::Mod2);
        assert_eq!(bundle.label().location(0), Some(Location::Interior));
        bundle.compute_label(BoundaryNodeRule::Endpoint);
        assert_eq!(bundle.label().location(0), Some(Location::Boundary));
        assert_eq!(bundle.label().location(1), None);
        assert!(!bundle.label().is_area());
    }

    #[test]
    fn interior_side_wins() {
        let mut star = EdgeEndBundleStar::default();
        star.insert(end_to(1.0, 0.0, Label::area(0, Location::Boundary, Location::Exterior, Location::Exterior)));
        star.insert(end_to(3.0, 0.0, Label::area(0, Location::Boundary, Location::Interior, Location::Exterior)));
        let mut bundle = star.bundles()[0].clone();
        bundle.compute_label(BoundaryNodeRule::Mod2);
        assert_eq!(bundle.label().get(0, Position::Left), Some(Location::Interior));
        assert_eq!(bundle.label().get(0, Position::Right), Some(Location::Exterior));
    }

    #[test]
    fn labels_contribute_to_matrix() {
        let mut label = Label::area(0, Location::Boundary, Location::Exterior, Location::Interior);
        label.set_all_locations(1, Location::Interior);
        let mut im = IntersectionMatrix::new();
        update_im_from_label(&label, &mut im);
        assert_eq!(im.to_string(), "2FF1FF2FF");
    }
}
