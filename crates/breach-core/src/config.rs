//! Game configuration.
//!
//! Board geometry, the die face set, ability costs, animation timings and
//! scoring are all data rather than literals so tests can run on smaller
//! boards or with alternate dice. `GameConfig::default()` is the standard
//! 4x4 game.

use crate::dice::DieFace;
use crate::grid::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Grid must be at least 2x2, got {0}")]
    GridTooSmall(u8),

    #[error("{name} cell {coord} is outside a {size}x{size} grid")]
    OutOfBounds {
        name: &'static str,
        coord: Coord,
        size: u8,
    },

    #[error("Start and exit must be different cells")]
    StartIsExit,

    #[error("Starting signal must be positive, got {0}")]
    NoSignal(i32),

    #[error("Die must have at least one face")]
    NoFaces,

    #[error("Shield range {min}..={max} is empty")]
    EmptyShieldRange { min: u8, max: u8 },

    #[error("Cannot place {max_lore} lore on {eligible} eligible cells")]
    TooMuchLore { max_lore: usize, eligible: usize },

    #[error("Log capacity must be non-zero")]
    ZeroLogCapacity,

    #[error("Name length cap must be non-zero")]
    ZeroNameLength,

    #[error("Invalid config JSON: {0}")]
    Parse(String),
}

/// Chrono cost of each ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityCosts {
    pub rewind: u32,
    pub overload: u32,
    pub skip: u32,
}

impl Default for AbilityCosts {
    fn default() -> Self {
        Self {
            rewind: 1,
            overload: 2,
            skip: 3,
        }
    }
}

/// Durations of the timed phases, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTimings {
    /// How long the lore flash holds the board
    pub lore_ms: u64,
    /// How long the win flash lasts before name entry
    pub win_ms: u64,
    /// Delay between lose-animation fill steps
    pub fill_step_ms: u64,
    /// Hold after the board is fully filled before name entry
    pub lose_hold_ms: u64,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        Self {
            lore_ms: 3000,
            win_ms: 3000,
            fill_step_ms: 50,
            lose_hold_ms: 2000,
        }
    }
}

/// Final score weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoring {
    pub win_bonus: u32,
    pub per_lore: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            win_bonus: 1000,
            per_lore: 100,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width and height of the square board
    pub grid_size: u8,
    /// Where the player token starts
    pub start: Coord,
    /// The cell that ends the game when reached
    pub exit: Coord,
    /// Lowest shield value (inclusive)
    pub shield_min: u8,
    /// Highest shield value (inclusive)
    pub shield_max: u8,
    /// Upper bound on the number of lore cells
    pub max_lore: usize,
    /// Signal strength at the start of a game
    pub starting_signal: i32,
    /// Faces drawn uniformly on every roll
    pub faces: Vec<DieFace>,
    /// Strength of a BREACH face
    pub breach_face_strength: u32,
    pub costs: AbilityCosts,
    /// Strength added by one overload
    pub overload_bonus: u32,
    pub timings: PhaseTimings,
    pub scoring: Scoring,
    /// Number of log lines retained
    pub log_capacity: usize,
    /// Maximum player name length in characters
    pub max_name_len: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            start: Coord::new(3, 0),
            exit: Coord::new(0, 3),
            shield_min: 3,
            shield_max: 8,
            max_lore: 4,
            starting_signal: 7,
            faces: DieFace::STANDARD.to_vec(),
            breach_face_strength: 3,
            costs: AbilityCosts::default(),
            overload_bonus: 1,
            timings: PhaseTimings::default(),
            scoring: Scoring::default(),
            log_capacity: 32,
            max_name_len: 10,
        }
    }
}

impl GameConfig {
    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Number of cells on the board
    pub fn cell_count(&self) -> usize {
        usize::from(self.grid_size) * usize::from(self.grid_size)
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < 2 {
            return Err(ConfigError::GridTooSmall(self.grid_size));
        }

        for (name, coord) in [("Start", self.start), ("Exit", self.exit)] {
            if !coord.in_bounds(self.grid_size) {
                return Err(ConfigError::OutOfBounds {
                    name,
                    coord,
                    size: self.grid_size,
                });
            }
        }

        if self.start == self.exit {
            return Err(ConfigError::StartIsExit);
        }

        if self.starting_signal <= 0 {
            return Err(ConfigError::NoSignal(self.starting_signal));
        }

        if self.faces.is_empty() {
            return Err(ConfigError::NoFaces);
        }

        if self.shield_min > self.shield_max {
            return Err(ConfigError::EmptyShieldRange {
                min: self.shield_min,
                max: self.shield_max,
            });
        }

        // Start and exit can never hold lore
        let eligible = self.cell_count() - 2;
        if self.max_lore > eligible {
            return Err(ConfigError::TooMuchLore {
                max_lore: self.max_lore,
                eligible,
            });
        }

        if self.log_capacity == 0 {
            return Err(ConfigError::ZeroLogCapacity);
        }

        if self.max_name_len == 0 {
            return Err(ConfigError::ZeroNameLength);
        }

        Ok(())
    }
}
