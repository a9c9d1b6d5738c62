//! Static Breach - a dice-driven grid breach puzzle engine
//!
//! This crate provides the core game logic for Static Breach, including:
//! - Square grid coordinates and the shielded board
//! - Breach dice and their strength rules
//! - Signal, chrono and lore resources
//! - The game phase state machine with full rule enforcement
//!
//! # Architecture
//!
//! The engine knows nothing about rendering, input devices or clocks. A host
//! translates input into [`Intent`]s, reports wall-clock time through
//! [`Game::tick`], and reads the public state to draw. It can be compiled to:
//! - Native Rust for the terminal client
//! - WebAssembly for a browser host
//!
//! # Modules
//!
//! - [`grid`]: Coordinates and orthogonal adjacency
//! - [`board`]: Cells, shields, lore locations
//! - [`dice`]: Die faces and strength tallies
//! - [`game`]: Game state machine
//! - [`session`]: Game lifecycle across restarts and score submission

pub mod actions;
pub mod board;
pub mod config;
pub mod dice;
pub mod game;
pub mod grid;
pub mod player;
pub mod rng;
pub mod score;
pub mod session;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::{GameEvent, Intent};
pub use board::{Board, Cell};
pub use config::{AbilityCosts, ConfigError, GameConfig, PhaseTimings, Scoring};
pub use dice::{tally, DicePair, DieFace, RollOutcome};
pub use game::{Game, GameError, GamePhase, Millis, TurnState};
pub use grid::{Coord, Direction};
pub use player::{PlayerToken, ResourcePool};
pub use rng::GameRng;
pub use score::{final_score, NullSink, ScoreEntry, ScoreSink};
pub use session::Session;
