//! # Grid Module
//!
//! The square tile matrix that every generator produces and every validator
//! consumes, together with the coordinate and direction primitives.

pub mod tiles;

pub use tiles::{TileConfig, TileKind};

use crate::{DelveError, DelveResult};
use serde::{Deserialize, Serialize};

/// A (row, column) coordinate in a grid, 0-indexed from the top-left corner.
///
/// # Examples
///
/// ```
/// use delve::Position;
///
/// let pos = Position::new(3, 7);
/// assert_eq!(pos.row, 3);
/// assert_eq!(pos.col, 7);
/// assert_eq!(pos.manhattan_distance(Position::new(0, 0)), 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// Creates a new position with the given row and column.
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Calculates the Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.row - other.row).abs() + (self.col - other.col).abs()) as u32
    }

    /// Returns the 4 cardinal neighbors in the fixed search order
    /// up, down, left, right. The order is part of the BFS tie-break
    /// contract, so do not reorder.
    pub fn cardinal_neighbors(self) -> [Position; 4] {
        [
            Position::new(self.row - 1, self.col),
            Position::new(self.row + 1, self.col),
            Position::new(self.row, self.col - 1),
            Position::new(self.row, self.col + 1),
        ]
    }
}

/// One of the four sides a room can open toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The geometric inverse, used to turn one room's exit into the next
    /// room's entrance.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        write!(f, "{name}")
    }
}

/// A square matrix of tile kinds.
///
/// Grids are mutated only during generation; once handed to the validator
/// they are read-only. Equality is cell-by-cell, which is what the
/// determinism and round-trip tests rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<TileKind>>,
}

impl Grid {
    /// Creates a grid of the given side length with every cell set to `kind`.
    pub fn filled(size: usize, kind: TileKind) -> Self {
        Self {
            size,
            cells: vec![vec![kind; size]; size],
        }
    }

    /// Builds a grid from parsed rows, rejecting ragged or non-square input.
    pub fn from_rows(rows: Vec<Vec<TileKind>>) -> DelveResult<Self> {
        let size = rows.len();
        if size == 0 {
            return Err(DelveError::InvalidParameter(
                "grid must have at least one row".to_string(),
            ));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(DelveError::InvalidParameter(format!(
                    "row {i} has {} cells, expected {size}",
                    row.len()
                )));
            }
        }
        Ok(Self { size, cells: rows })
    }

    /// Side length of the grid.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether the position lies inside the grid bounds.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0
            && pos.col >= 0
            && (pos.row as usize) < self.size
            && (pos.col as usize) < self.size
    }

    /// Returns the tile at `pos`, or `None` when out of bounds.
    pub fn get(&self, pos: Position) -> Option<TileKind> {
        if self.contains(pos) {
            Some(self.cells[pos.row as usize][pos.col as usize])
        } else {
            None
        }
    }

    /// Overwrites the tile at `pos`.
    pub fn set(&mut self, pos: Position, kind: TileKind) -> DelveResult<()> {
        if !self.contains(pos) {
            return Err(DelveError::InvalidParameter(format!(
                "position ({}, {}) outside {}x{} grid",
                pos.row, pos.col, self.size, self.size
            )));
        }
        self.cells[pos.row as usize][pos.col as usize] = kind;
        Ok(())
    }

    /// Whether a search may stand on `pos`: in bounds and not a wall.
    pub fn is_traversable(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(kind) if kind.is_traversable())
    }

    /// First position holding `kind` in row-major order, if any.
    pub fn find_first(&self, kind: TileKind) -> Option<Position> {
        self.positions().find(|&pos| self.get(pos) == Some(kind))
    }

    /// Every position holding `kind`, in row-major order.
    pub fn find_all(&self, kind: TileKind) -> Vec<Position> {
        self.positions()
            .filter(|&pos| self.get(pos) == Some(kind))
            .collect()
    }

    /// Number of cells holding `kind`.
    pub fn count(&self, kind: TileKind) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell == kind)
            .count()
    }

    /// Iterator over the grid rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[TileKind]> {
        self.cells.iter().map(|row| row.as_slice())
    }

    /// Iterator over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size as i32;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    /// Whether `pos` lies on the outermost ring of the grid.
    pub fn is_border(&self, pos: Position) -> bool {
        self.contains(pos)
            && (pos.row == 0
                || pos.col == 0
                || pos.row == self.size as i32 - 1
                || pos.col == self.size as i32 - 1)
    }
}
