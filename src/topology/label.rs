use std::fmt;

/// Location of a point relative to a geometry.
///
/// "Not yet determined" is expressed as `Option<Location>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

impl Location {
    /// Row or column index in an intersection matrix.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Interior => 0,
            Self::Boundary => 1,
            Self::Exterior => 2,
        }
    }

    /// Single-character symbol: `i`, `b` or `e`.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Interior => 'i',
            Self::Boundary => 'b',
            Self::Exterior => 'e',
        }
    }
}

/// Position relative to a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    On,
    Left,
    Right,
}

impl Position {
    fn index(self) -> usize {
        match self {
            Self::On => 0,
            Self::Left => 1,
            Self::Right => 2,
        }
    }

    /// Returns the position on the other side of the edge; `On` maps to itself.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::On => Self::On,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Locations of an edge or node relative to one geometry.
///
/// A line location records only `On`; an area location also records the
/// `Left` and `Right` sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopologyLocation {
    locs: [Option<Location>; 3],
    area: bool,
}

impl TopologyLocation {
    /// Creates a line location.
    #[must_use]
    pub fn line(on: Option<Location>) -> Self {
        Self {
            locs: [on, None, None],
            area: false,
        }
    }

    /// Creates an area location.
    #[must_use]
    pub fn area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Self {
        Self {
            locs: [on, left, right],
            area: true,
        }
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Location> {
        self.locs[pos.index()]
    }

    /// Sets one position. Side positions of a line location are ignored.
    pub fn set(&mut self, pos: Position, loc: Option<Location>) {
        if pos == Position::On || self.area {
            self.locs[pos.index()] = loc;
        }
    }

    #[must_use]
    pub fn is_area(&self) -> bool {
        self.area
    }

    #[must_use]
    pub fn is_line(&self) -> bool {
        !self.area
    }

    fn positions(&self) -> &[Option<Location>] {
        if self.area {
            &self.locs
        } else {
            &self.locs[..1]
        }
    }

    fn positions_mut(&mut self) -> &mut [Option<Location>] {
        if self.area {
            &mut self.locs
        } else {
            &mut self.locs[..1]
        }
    }

    /// Returns `true` if no position is determined.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.positions().iter().all(Option::is_none)
    }

    /// Returns `true` if some position is undetermined.
    #[must_use]
    pub fn is_any_null(&self) -> bool {
        self.positions().iter().any(Option::is_none)
    }

    /// Returns `true` if every position equals `loc`.
    #[must_use]
    pub fn all_positions_equal(&self, loc: Location) -> bool {
        self.positions().iter().all(|l| *l == Some(loc))
    }

    pub fn set_all(&mut self, loc: Location) {
        for l in self.positions_mut() {
            *l = Some(loc);
        }
    }

    pub fn set_all_if_null(&mut self, loc: Location) {
        for l in self.positions_mut().iter_mut().filter(|l| l.is_none()) {
            *l = Some(loc);
        }
    }

    /// Swaps the left and right sides.
    pub fn flip(&mut self) {
        if self.area {
            self.locs.swap(1, 2);
        }
    }

    /// Fills undetermined positions from `other`, widening a line location to
    /// an area location if `other` is one.
    pub fn merge(&mut self, other: &TopologyLocation) {
        if other.area && !self.area {
            self.area = true;
        }
        for (mine, theirs) in self.locs.iter_mut().zip(other.locs) {
            if mine.is_none() {
                *mine = theirs;
            }
        }
    }

    /// Drops the side positions.
    pub fn to_line(&mut self) {
        *self = Self::line(self.locs[0]);
    }
}

impl fmt::Display for TopologyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = |l: Option<Location>| l.map_or('-', Location::symbol);
        if self.area {
            write!(f, "{}", sym(self.locs[1]))?;
        }
        write!(f, "{}", sym(self.locs[0]))?;
        if self.area {
            write!(f, "{}", sym(self.locs[2]))?;
        }
        Ok(())
    }
}

/// Topological locations of a graph component relative to both operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Label {
    elt: [TopologyLocation; 2],
}

impl Label {
    /// A label with every location undetermined.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A line label with `on` for `geom_index` and nothing for the other operand.
    #[must_use]
    pub fn line(geom_index: usize, on: Location) -> Self {
        let mut label = Self::default();
        label.elt[geom_index] = TopologyLocation::line(Some(on));
        label
    }

    /// An area label for `geom_index`; the other operand gets an empty area location.
    #[must_use]
    pub fn area(geom_index: usize, on: Location, left: Location, right: Location) -> Self {
        let mut label = Self {
            elt: [TopologyLocation::area(None, None, None); 2],
        };
        label.elt[geom_index] = TopologyLocation::area(Some(on), Some(left), Some(right));
        label
    }

    /// An area label with every location undetermined.
    #[must_use]
    pub fn empty_area() -> Self {
        Self {
            elt: [TopologyLocation::area(None, None, None); 2],
        }
    }

    /// Locations relative to operand `geom_index`.
    #[must_use]
    pub fn topology_location(&self, geom_index: usize) -> &TopologyLocation {
        &self.elt[geom_index]
    }

    #[must_use]
    pub fn get(&self, geom_index: usize, pos: Position) -> Option<Location> {
        self.elt[geom_index].get(pos)
    }

    /// The `On` location for operand `geom_index`.
    #[must_use]
    pub fn location(&self, geom_index: usize) -> Option<Location> {
        self.elt[geom_index].get(Position::On)
    }

    pub fn set(&mut self, geom_index: usize, pos: Position, loc: Option<Location>) {
        self.elt[geom_index].set(pos, loc);
    }

    /// Sets the `On` location for operand `geom_index`.
    pub fn set_location(&mut self, geom_index: usize, loc: Location) {
        self.elt[geom_index].set(Position::On, Some(loc));
    }

    pub fn set_all_locations(&mut self, geom_index: usize, loc: Location) {
        self.elt[geom_index].set_all(loc);
    }

    pub fn set_all_locations_if_null(&mut self, geom_index: usize, loc: Location) {
        self.elt[geom_index].set_all_if_null(loc);
    }

    /// Merges `other` into this label without overwriting determined locations.
    pub fn merge(&mut self, other: &Label) {
        for (mine, theirs) in self.elt.iter_mut().zip(&other.elt) {
            mine.merge(theirs);
        }
    }

    /// Swaps left and right for both operands.
    pub fn flip(&mut self) {
        for tl in &mut self.elt {
            tl.flip();
        }
    }

    /// Returns a copy with left and right swapped.
    #[must_use]
    pub fn flipped(&self) -> Self {
        let mut label = *self;
        label.flip();
        label
    }

    /// Number of operands with at least one determined location.
    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.elt.iter().filter(|tl| !tl.is_null()).count()
    }

    #[must_use]
    pub fn is_null(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_null()
    }

    #[must_use]
    pub fn is_any_null(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_any_null()
    }

    /// Returns `true` if either operand's location is an area location.
    #[must_use]
    pub fn is_area(&self) -> bool {
        self.elt.iter().any(TopologyLocation::is_area)
    }

    #[must_use]
    pub fn is_area_of(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_area()
    }

    #[must_use]
    pub fn is_line(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_line()
    }

    #[must_use]
    pub fn all_positions_equal(&self, geom_index: usize, loc: Location) -> bool {
        self.elt[geom_index].all_positions_equal(loc)
    }

    /// Converts operand `geom_index` to a line location.
    pub fn to_line(&mut self, geom_index: usize) {
        self.elt[geom_index].to_line();
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A:{} B:{}", self.elt[0], self.elt[1])
    }
}
