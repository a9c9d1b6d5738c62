//! Square grid coordinate system.
//!
//! This module provides the coordinate types for the breach board:
//! - `Coord`: Identifies individual cells by (row, col)
//! - `Direction`: The four orthogonal steps a player token can take
//!
//! Rows grow downward and columns grow to the right, so (0, 0) is the
//! top-left cell. Adjacency is orthogonal only: diagonal cells are two
//! steps apart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Orthogonal direction on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0
    Up,
    /// Towards the last row
    Down,
    /// Towards column 0
    Left,
    /// Towards the last column
    Right,
}

impl Direction {
    /// All directions in clockwise order starting from Up
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Row and column delta for one step in this direction
    pub const fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Cell coordinate on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Coord {
    /// Row (increases going down)
    pub row: u8,
    /// Column (increases going right)
    pub col: u8,
}

impl Coord {
    /// Create a new coordinate
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another cell (in orthogonal steps)
    pub fn manhattan_distance(&self, other: &Coord) -> u32 {
        let dr = (i32::from(self.row) - i32::from(other.row)).unsigned_abs();
        let dc = (i32::from(self.col) - i32::from(other.col)).unsigned_abs();
        dr + dc
    }

    /// Whether `other` is exactly one orthogonal step away
    pub fn is_adjacent_to(&self, other: &Coord) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// The cell one step away in `direction`, if it stays within `size`
    pub fn neighbor(&self, direction: Direction, size: u8) -> Option<Coord> {
        let (dr, dc) = direction.delta();
        let row = i32::from(self.row) + dr;
        let col = i32::from(self.col) + dc;
        let bound = i32::from(size);

        if (0..bound).contains(&row) && (0..bound).contains(&col) {
            Some(Coord::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// All in-bounds orthogonal neighbours, clockwise from Up
    pub fn neighbors(&self, size: u8) -> Vec<Coord> {
        Direction::ALL
            .iter()
            .filter_map(|dir| self.neighbor(*dir, size))
            .collect()
    }

    /// Whether this coordinate lies on a `size` x `size` board
    pub fn in_bounds(&self, size: u8) -> bool {
        self.row < size && self.col < size
    }

    /// Row-major index on a `size` x `size` board
    pub fn index(&self, size: u8) -> usize {
        usize::from(self.row) * usize::from(size) + usize::from(self.col)
    }

    /// Every coordinate of a `size` x `size` board in row-major order
    pub fn all(size: u8) -> impl Iterator<Item = Coord> {
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        let a = Coord::new(3, 0);
        assert_eq!(a.manhattan_distance(&Coord::new(3, 0)), 0);
        assert_eq!(a.manhattan_distance(&Coord::new(2, 0)), 1);
        assert_eq!(a.manhattan_distance(&Coord::new(2, 1)), 2);
        assert_eq!(a.manhattan_distance(&Coord::new(0, 3)), 6);
    }

    #[test]
    fn test_diagonal_is_not_adjacent() {
        let a = Coord::new(1, 1);
        assert!(a.is_adjacent_to(&Coord::new(0, 1)));
        assert!(a.is_adjacent_to(&Coord::new(1, 2)));
        assert!(!a.is_adjacent_to(&Coord::new(0, 0)));
        assert!(!a.is_adjacent_to(&a));
    }

    #[test]
    fn test_neighbors_clip_at_edges() {
        let corner = Coord::new(3, 0);
        let neighbors = corner.neighbors(4);
        assert_eq!(neighbors, vec![Coord::new(2, 0), Coord::new(3, 1)]);

        let center = Coord::new(1, 2);
        assert_eq!(center.neighbors(4).len(), 4);
        assert!(center.neighbors(4).iter().all(|n| n.is_adjacent_to(&center)));
    }

    #[test]
    fn test_neighbor_off_board() {
        assert_eq!(Coord::new(0, 0).neighbor(Direction::Up, 4), None);
        assert_eq!(Coord::new(0, 3).neighbor(Direction::Right, 4), None);
        assert_eq!(
            Coord::new(0, 2).neighbor(Direction::Right, 4),
            Some(Coord::new(0, 3))
        );
    }

    #[test]
    fn test_all_is_row_major() {
        let cells: Vec<Coord> = Coord::all(3).collect();
        assert_eq!(cells.len(), 9);
        for (i, c) in cells.iter().enumerate() {
            assert_eq!(c.index(3), i);
        }
    }
}
