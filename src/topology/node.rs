use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::geometry::BoundaryNodeRule;
use crate::math::Coord;

use super::label::{Label, Location};

/// Total-order map key for a coordinate: `x` first, then `y`.
///
/// Negative zero is folded into positive zero so both compare equal.
#[derive(Debug, Clone, Copy)]
pub struct CoordKey {
    x: f64,
    y: f64,
}

impl From<&Coord> for CoordKey {
    fn from(c: &Coord) -> Self {
        Self {
            x: c.x + 0.0,
            y: c.y + 0.0,
        }
    }
}

impl PartialEq for CoordKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for CoordKey {}

impl PartialOrd for CoordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CoordKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

/// A graph node: a coordinate, its label and the star of edges around it.
///
/// The star type varies with the graph: geometry graphs keep directed
/// edge stars, the relate graph keeps bundles of edge ends.
#[derive(Debug, Clone)]
pub struct Node<S> {
    coord: Coord,
    label: Label,
    boundary_count: [usize; 2],
    star: S,
}

impl<S: Default> Node<S> {
    /// Creates an unlabelled node with an empty star.
    #[must_use]
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            label: Label::empty(),
            boundary_count: [0; 2],
            star: S::default(),
        }
    }
}

impl<S> Node<S> {
    #[must_use]
    pub fn coord(&self) -> &Coord {
        &self.coord
    }

    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    #[must_use]
    pub fn star(&self) -> &S {
        &self.star
    }

    pub fn star_mut(&mut self) -> &mut S {
        &mut self.star
    }

    /// Sets the `On` location for operand `geom_index`.
    pub fn set_location(&mut self, geom_index: usize, loc: Location) {
        self.label.set_location(geom_index, loc);
    }

    /// Records one more component endpoint at this node and re-derives its
    /// location from `rule`.
    pub fn add_boundary_occurrence(&mut self, geom_index: usize, rule: BoundaryNodeRule) {
        self.boundary_count[geom_index] += 1;
        let loc = if rule.is_in_boundary(self.boundary_count[geom_index]) {
            Location::Boundary
        } else {
            Location::Interior
        };
        self.label.set_location(geom_index, loc);
    }

    /// Toggles the node between boundary and interior, starting from boundary.
    ///
    /// Used where the node's boundary membership is decided by the parity of
    /// the boundary edges meeting it.
    pub fn toggle_boundary(&mut self, geom_index: usize) {
        let loc = match self.label.location(geom_index) {
            Some(Location::Boundary) => Location::Interior,
            _ => Location::Boundary,
        };
        self.label.set_location(geom_index, loc);
    }

    /// Returns `true` if the node is labelled for exactly one operand.
    #[must_use]
    pub fn is_isolated(&self) -> bool {
        self.label.geometry_count() == 1
    }
}

/// Nodes keyed by coordinate, iterated in coordinate order.
#[derive(Debug, Clone)]
pub struct NodeMap<S> {
    nodes: BTreeMap<CoordKey, Node<S>>,
}

impl<S> Default for NodeMap<S> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
        }
    }
}

impl<S: Default> NodeMap<S> {
    /// Returns the node at `coord`, creating it if needed.
    pub fn add_node(&mut self, coord: &Coord) -> &mut Node<S> {
        self.nodes
            .entry(CoordKey::from(coord))
            .or_insert_with(|| Node::new(*coord))
    }
}

impl<S> NodeMap<S> {
    #[must_use]
    pub fn find(&self, coord: &Coord) -> Option<&Node<S>> {
        self.nodes.get(&CoordKey::from(coord))
    }

    pub fn find_mut(&mut self, coord: &Coord) -> Option<&mut Node<S>> {
        self.nodes.get_mut(&CoordKey::from(coord))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node<S>> {
        self.nodes.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node<S>> {
        self.nodes.values_mut()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes on the boundary of operand `geom_index`.
    pub fn boundary_nodes(&self, geom_index: usize) -> impl Iterator<Item = &Node<S>> {
        self.nodes
            .values()
            .filter(move |n| n.label.location(geom_index) == Some(Location::Boundary))
    }

    /// Returns `true` if a node at `coord` lies on the boundary of operand `geom_index`.
    #[must_use]
    pub fn is_boundary_node(&self, geom_index: usize, coord: &Coord) -> bool {
        self.find(coord)
            .is_some_and(|n| n.label.location(geom_index) == Some(Location::Boundary))
    }
}
