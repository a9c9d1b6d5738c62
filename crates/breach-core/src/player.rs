//! Player token and resources.
//!
//! This module contains:
//! - `PlayerToken`: where the player currently stands
//! - `ResourcePool`: signal strength (health), chrono (ability currency)
//!   and the lore counter

use crate::grid::Coord;
use serde::{Deserialize, Serialize};

/// The player's position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerToken {
    pub position: Coord,
}

impl PlayerToken {
    pub fn new(position: Coord) -> Self {
        Self { position }
    }

    /// Distance from the token to a cell
    pub fn distance_to(&self, coord: &Coord) -> u32 {
        self.position.manhattan_distance(coord)
    }
}

/// The player's spendable and scoring resources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    /// Health. The game is lost once this reaches zero.
    pub signal: i32,
    /// Currency for chrono abilities
    pub chrono: u32,
    /// Lore collected so far
    pub lore: u32,
}

impl ResourcePool {
    /// A fresh pool with the given starting signal
    pub fn new(starting_signal: i32) -> Self {
        Self {
            signal: starting_signal,
            chrono: 0,
            lore: 0,
        }
    }

    /// Check if chrono covers a cost
    pub fn can_afford(&self, cost: u32) -> bool {
        self.chrono >= cost
    }

    /// Try to spend chrono, returning false if insufficient
    pub fn try_spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.chrono -= cost;
        true
    }

    pub fn gain_chrono(&mut self, amount: u32) {
        self.chrono += amount;
    }

    /// Lose signal strength. May go below zero.
    pub fn lose_signal(&mut self, amount: u32) {
        self.signal -= amount as i32;
    }

    /// Signal is exhausted
    pub fn is_depleted(&self) -> bool {
        self.signal <= 0
    }
}
