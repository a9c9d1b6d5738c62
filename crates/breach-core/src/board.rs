//! Game board representation.
//!
//! This module contains:
//! - `Cell`: one shielded grid cell and its breach state
//! - `Board`: the full grid with its start, exit and lore locations
//! - The fill order used by the lose animation
//!
//! The exit is never shielded: it is reached by adjacency alone.

use crate::config::GameConfig;
use crate::grid::Coord;
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Position on the grid
    pub coord: Coord,
    /// Strength needed to breach (None for the exit)
    pub shield: Option<u8>,
    /// Whether the cell has been breached. Never reverts.
    pub breached: bool,
}

impl Cell {
    /// Create an unbreached shielded cell
    pub fn shielded(coord: Coord, shield: u8) -> Self {
        Self {
            coord,
            shield: Some(shield),
            breached: false,
        }
    }

    /// Create the unshielded exit cell
    pub fn exit(coord: Coord) -> Self {
        Self {
            coord,
            shield: None,
            breached: false,
        }
    }
}

/// The game board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    size: u8,
    /// Cells in row-major order
    cells: Vec<Cell>,
    start: Coord,
    exit: Coord,
    /// Unclaimed lore locations
    lore: BTreeSet<Coord>,
    /// Order in which the lose animation fills the grid
    fill_order: Vec<Coord>,
}

impl Board {
    /// Generate a fresh random board
    pub fn generate(config: &GameConfig, rng: &mut GameRng) -> Self {
        let size = config.grid_size;

        let cells: Vec<Cell> = Coord::all(size)
            .map(|coord| {
                if coord == config.exit {
                    Cell::exit(coord)
                } else {
                    let mut cell =
                        Cell::shielded(coord, rng.shield(config.shield_min, config.shield_max));
                    cell.breached = coord == config.start;
                    cell
                }
            })
            .collect();

        let eligible: Vec<Coord> = Coord::all(size)
            .filter(|c| *c != config.start && *c != config.exit)
            .collect();
        let lore_count = rng.lore_count(config.max_lore);
        let lore = rng.sample(&eligible, lore_count).into_iter().collect();

        let mut fill_order: Vec<Coord> = Coord::all(size).collect();
        rng.shuffle(&mut fill_order);

        Self {
            size,
            cells,
            start: config.start,
            exit: config.exit,
            lore,
            fill_order,
        }
    }

    /// Board width and height
    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    pub fn exit(&self) -> Coord {
        self.exit
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// All cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, coord: &Coord) -> bool {
        coord.in_bounds(self.size)
    }

    /// Get the cell at a coordinate
    pub fn cell(&self, coord: &Coord) -> Option<&Cell> {
        if !self.contains(coord) {
            return None;
        }
        self.cells.get(coord.index(self.size))
    }

    fn cell_mut(&mut self, coord: &Coord) -> Option<&mut Cell> {
        if !self.contains(coord) {
            return None;
        }
        let index = coord.index(self.size);
        self.cells.get_mut(index)
    }

    /// Shield value at a coordinate (None for the exit or off-board)
    pub fn shield_at(&self, coord: &Coord) -> Option<u8> {
        self.cell(coord).and_then(|c| c.shield)
    }

    /// Override a cell's shield value
    pub fn set_shield(&mut self, coord: &Coord, shield: u8) {
        if *coord == self.exit {
            return;
        }
        if let Some(cell) = self.cell_mut(coord) {
            cell.shield = Some(shield);
        }
    }

    pub fn is_breached(&self, coord: &Coord) -> bool {
        self.cell(coord).is_some_and(|c| c.breached)
    }

    /// Mark a cell breached. Returns true if it was not breached before.
    pub fn mark_breached(&mut self, coord: &Coord) -> bool {
        match self.cell_mut(coord) {
            Some(cell) if !cell.breached => {
                cell.breached = true;
                true
            }
            _ => false,
        }
    }

    /// Number of breached cells
    pub fn breached_count(&self) -> usize {
        self.cells.iter().filter(|c| c.breached).count()
    }

    pub fn is_lore(&self, coord: &Coord) -> bool {
        self.lore.contains(coord)
    }

    /// Claim the lore at a coordinate. Returns true exactly once per location.
    pub fn take_lore(&mut self, coord: &Coord) -> bool {
        self.lore.remove(coord)
    }

    /// Unclaimed lore locations
    pub fn lore_locations(&self) -> impl Iterator<Item = &Coord> {
        self.lore.iter()
    }

    /// Replace the lore locations, dropping any that are invalid
    pub fn set_lore<I>(&mut self, locations: I)
    where
        I: IntoIterator<Item = Coord>,
    {
        let (start, exit, size) = (self.start, self.exit, self.size);
        self.lore = locations
            .into_iter()
            .filter(|c| *c != start && *c != exit && c.in_bounds(size))
            .collect();
    }

    /// Shuffled order of every cell for the lose animation
    pub fn fill_order(&self) -> &[Coord] {
        &self.fill_order
    }
}
