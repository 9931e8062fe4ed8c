//! Sparse board representation for Game of Life patterns.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A cell coordinate on the grid.
///
/// Ordered by `x` first, then `y`, which is the canonical iteration order of
/// a [`Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The 3x3 block centered on this coordinate, including itself.
    pub fn neighborhood(self) -> impl Iterator<Item = Coord> {
        (-1..=1).flat_map(move |dx| (-1..=1).map(move |dy| Coord::new(self.x + dx, self.y + dy)))
    }

    /// Whether the coordinate lies in `[0, size)` on both axes.
    #[inline]
    pub fn in_bounds(self, size: usize) -> bool {
        let size = size as i64;
        (0..size).contains(&(self.x as i64)) && (0..size).contains(&(self.y as i64))
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// A set of live cells. Absent coordinates are dead.
///
/// Cells are kept in an ordered set, so two boards holding the same live
/// cells compare and hash equal no matter how they were built. That makes
/// a `Board` directly usable as a cache key and as a history snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: BTreeSet<Coord>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn is_alive(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    /// Mark a cell alive. Returns `false` if it already was.
    pub fn insert(&mut self, coord: Coord) -> bool {
        self.cells.insert(coord)
    }

    /// Mark a cell dead. Returns `false` if it already was.
    pub fn remove(&mut self, coord: Coord) -> bool {
        self.cells.remove(&coord)
    }

    /// Live cells in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().copied()
    }

    /// The live cell at position `index` of the canonical order.
    pub fn nth(&self, index: usize) -> Option<Coord> {
        self.cells.iter().nth(index).copied()
    }

    /// Parse a text pattern where `#` marks a live cell and any other
    /// character a dead one. Lines are rows (`y`), columns are `x`, and the
    /// pattern is placed with its top-left corner at `origin`.
    pub fn from_pattern(pattern: &str, origin: Coord) -> Self {
        let mut board = Self::new();
        for (y, line) in pattern.lines().enumerate() {
            for (x, c) in line.chars().enumerate() {
                if c == '#' {
                    board.insert(Coord::new(origin.x + x as i32, origin.y + y as i32));
                }
            }
        }
        board
    }

    /// The same cells shifted by `(dx, dy)`.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        self.iter()
            .map(|c| Coord::new(c.x + dx, c.y + dy))
            .collect()
    }
}

impl FromIterator<Coord> for Board {
    fn from_iter<I: IntoIterator<Item = Coord>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Extend<Coord> for Board {
    fn extend<I: IntoIterator<Item = Coord>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Board {
    type Item = &'a Coord;
    type IntoIter = std::collections::btree_set::Iter<'a, Coord>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", c.x, c.y)?;
        }
        write!(f, "]")
    }
}
