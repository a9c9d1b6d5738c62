//! Core game state machine.
//!
//! This module contains the main `Game` struct and all turn resolution
//! rules: tile selection, dice, chrono abilities, breach resolution and the
//! timed phase transitions that gate input.
//!
//! The game never reads a clock. The host reports wall-clock milliseconds
//! through [`Game::tick`] and every phase entry is stamped with the latest
//! reported time, so animation lengths do not depend on frame rate.

use crate::actions::{GameEvent, Intent};
use crate::board::Board;
use crate::config::{ConfigError, GameConfig};
use crate::dice::{tally, DicePair};
use crate::grid::Coord;
use crate::player::{PlayerToken, ResourcePool};
use crate::rng::GameRng;
use crate::score::{final_score, ScoreEntry};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Milliseconds on the host clock
pub type Millis = u64;

/// Game phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play: the player may select, roll, use abilities and resolve
    Playing,

    /// A lore cell was breached; the token moves there when the flash ends
    LoreAnimation {
        /// The breached lore cell
        coord: Coord,
        started_at: Millis,
    },

    /// The exit was reached
    WinAnimation { started_at: Millis },

    /// Signal ran out; the board fills one cell per step
    LoseAnimation {
        /// Cells filled so far
        fill: usize,
        /// When the last fill step happened
        step_at: Millis,
    },

    /// Waiting for a name to submit the score under
    EnterName,
}

impl GamePhase {
    /// Short lowercase label for logs and UIs
    pub fn label(&self) -> &'static str {
        match self {
            GamePhase::Playing => "playing",
            GamePhase::LoreAnimation { .. } => "lore_animation",
            GamePhase::WinAnimation { .. } => "win_animation",
            GamePhase::LoseAnimation { .. } => "lose_animation",
            GamePhase::EnterName => "enter_name",
        }
    }
}

/// Errors that can occur when applying intents.
///
/// A rejected intent never changes the game.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Invalid action for current phase")]
    InvalidPhase,

    #[error("No tile selected")]
    NoTileSelected,

    #[error("Tile is not adjacent or already breached")]
    NotAdjacent,

    #[error("Dice already rolled this turn")]
    AlreadyRolled,

    #[error("Dice not rolled yet")]
    NotRolled,

    #[error("Not enough chrono")]
    CannotAfford,

    #[error("No such die")]
    InvalidDie,

    #[error("Tile is off the board")]
    OutOfBounds,

    #[error("Name is empty")]
    EmptyName,

    #[error("Name is full")]
    NameFull,

    #[error("Character cannot be typed")]
    UnprintableChar,
}

/// The in-progress breach attempt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    /// Targeted cell
    pub selected: Option<Coord>,
    /// Whether the dice have been committed this turn
    pub rolled: bool,
    /// Current breach strength
    pub strength: u32,
    /// Faces showing
    pub dice: DicePair,
}

impl TurnState {
    fn clear(&mut self) {
        *self = TurnState::default();
    }
}

/// The complete state of one game
#[derive(Debug, Clone, Serialize)]
pub struct Game {
    /// Rules this game was created with
    pub config: GameConfig,
    /// The game board
    pub board: Board,
    /// Signal, chrono and lore
    pub resources: ResourcePool,
    /// Current breach attempt
    pub turn: TurnState,
    /// Current game phase
    pub phase: GamePhase,
    /// Name typed during name entry
    pub player_name: String,
    /// Set when the end-of-game animation completes
    pub final_score: u32,
    /// Whether the exit was reached
    pub won: bool,
    player: PlayerToken,
    log: VecDeque<String>,
    now: Millis,
    #[serde(skip)]
    rng: GameRng,
}

impl Game {
    /// Create a new game, validating the configuration
    pub fn new(config: GameConfig, rng: GameRng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, rng))
    }

    /// Create a standard game from a seed
    pub fn standard(seed: u64) -> Self {
        Self::build(GameConfig::default(), GameRng::new(seed))
    }

    /// Build from a config that has already passed `validate`
    pub(crate) fn build(config: GameConfig, mut rng: GameRng) -> Self {
        let board = Board::generate(&config, &mut rng);
        let mut game = Self {
            resources: ResourcePool::new(config.starting_signal),
            player: PlayerToken::new(config.start),
            turn: TurnState::default(),
            phase: GamePhase::Playing,
            player_name: String::new(),
            final_score: 0,
            won: false,
            log: VecDeque::with_capacity(config.log_capacity),
            now: 0,
            board,
            config,
            rng,
        };
        game.push_log("Game started. Select an adjacent tile and roll!");
        game
    }

    /// Where the player token stands
    pub fn player_position(&self) -> Coord {
        self.player.position
    }

    /// Latest host time seen
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Log lines, oldest first
    pub fn log(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    /// The most recent `count` log lines, oldest first
    pub fn recent_log(&self, count: usize) -> Vec<&str> {
        let skip = self.log.len().saturating_sub(count);
        self.log.iter().skip(skip).map(String::as_str).collect()
    }

    /// Access to the randomness source, for queuing dice in tests and replays
    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    // ==================== Queries ====================

    /// Whether `coord` is one step from the player and not breached
    pub fn is_adjacent(&self, coord: &Coord) -> bool {
        self.board.contains(coord)
            && self.player.position.is_adjacent_to(coord)
            && !self.board.is_breached(coord)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// In a win/lose animation or name entry
    pub fn is_game_over(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::WinAnimation { .. } | GamePhase::LoseAnimation { .. } | GamePhase::EnterName
        )
    }

    pub fn can_roll(&self) -> bool {
        self.is_playing() && self.turn.selected.is_some() && !self.turn.rolled
    }

    pub fn can_resolve(&self) -> bool {
        self.is_playing() && self.turn.selected.is_some() && self.turn.rolled
    }

    pub fn can_rewind(&self) -> bool {
        self.is_playing() && self.turn.rolled && self.resources.can_afford(self.config.costs.rewind)
    }

    pub fn can_overload(&self) -> bool {
        self.is_playing()
            && self.turn.rolled
            && self.resources.can_afford(self.config.costs.overload)
    }

    pub fn can_skip(&self) -> bool {
        self.is_playing()
            && self.turn.selected.is_some()
            && !self.turn.rolled
            && self.resources.can_afford(self.config.costs.skip)
    }

    // ==================== Intents ====================

    /// Apply an intent to the game state
    pub fn apply(&mut self, intent: Intent) -> Result<Vec<GameEvent>, GameError> {
        match intent {
            Intent::SelectTile(coord) => self.select_tile(coord),
            Intent::Roll => self.roll_dice(),
            Intent::Resolve => self.resolve_breach(),
            Intent::Rewind(index) => self.use_rewind(index),
            Intent::Overload => self.use_overload(),
            Intent::Skip => self.use_skip(),
            Intent::SetPlayerName(name) => self.set_player_name(&name),
            Intent::TypeChar(c) => self.type_char(c),
            Intent::Backspace => self.backspace(),
            Intent::CommitName => self.commit_name(),
            Intent::RequestRestart => self.request_restart(),
        }
    }

    /// Target a cell. Targeting the exit from an adjacent cell wins at once.
    pub fn select_tile(&mut self, coord: Coord) -> Result<Vec<GameEvent>, GameError> {
        self.require_playing()?;

        if !self.board.contains(&coord) {
            return Err(GameError::OutOfBounds);
        }

        if coord == self.board.exit() {
            if self.player.position.is_adjacent_to(&coord) {
                return Ok(self.win_game());
            }
            return Err(GameError::NotAdjacent);
        }

        if !self.is_adjacent(&coord) {
            return Err(GameError::NotAdjacent);
        }

        let shield = self.board.shield_at(&coord).ok_or(GameError::OutOfBounds)?;
        self.turn.selected = Some(coord);
        self.push_log(format!("Selected tile {} with shield {}", coord, shield));

        Ok(vec![GameEvent::TileSelected { coord, shield }])
    }

    /// Roll both dice. Glitch and chrono faces take effect immediately.
    pub fn roll_dice(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.require_playing()?;
        if self.turn.selected.is_none() {
            return Err(GameError::NoTileSelected);
        }
        if self.turn.rolled {
            return Err(GameError::AlreadyRolled);
        }

        let faces = [
            self.rng.roll_face(&self.config.faces),
            self.rng.roll_face(&self.config.faces),
        ];
        let outcome = tally(faces, self.config.breach_face_strength);

        self.turn.dice = DicePair::rolled(faces[0], faces[1]);
        self.turn.strength = outcome.strength;
        self.turn.rolled = true;

        let mut events = vec![GameEvent::DiceRolled {
            faces,
            strength: outcome.strength,
            glitches: outcome.glitches,
            chrono_gained: outcome.chrono,
        }];

        if outcome.glitches > 0 {
            self.resources.lose_signal(outcome.glitches);
            self.push_log(format!("Glitch! Lost {} health.", outcome.glitches));
            events.push(GameEvent::SignalLost {
                amount: outcome.glitches,
                remaining: self.resources.signal,
            });
        }
        if outcome.chrono > 0 {
            self.resources.gain_chrono(outcome.chrono);
            self.push_log(format!("Gained {} Chrono.", outcome.chrono));
            events.push(GameEvent::ChronoGained {
                amount: outcome.chrono,
                total: self.resources.chrono,
            });
        }

        Ok(events)
    }

    /// Reroll one die for the rewind cost
    pub fn use_rewind(&mut self, index: usize) -> Result<Vec<GameEvent>, GameError> {
        self.require_playing()?;
        if index >= DicePair::LEN {
            return Err(GameError::InvalidDie);
        }
        if !self.turn.rolled {
            return Err(GameError::NotRolled);
        }
        let old = self.turn.dice.get(index).ok_or(GameError::NotRolled)?;
        if !self.resources.try_spend(self.config.costs.rewind) {
            return Err(GameError::CannotAfford);
        }

        let breach_value = self.config.breach_face_strength;
        let new = self.rng.roll_face(&self.config.faces);
        self.turn.strength = self.turn.strength.saturating_sub(old.strength(breach_value))
            + new.strength(breach_value);
        self.turn.dice.set(index, new);

        let mut events = vec![GameEvent::DieRewound {
            index,
            from: old,
            to: new,
            strength: self.turn.strength,
        }];

        // Rerolled glitches always cost signal, whatever the original face was
        if new.is_glitch() {
            self.resources.lose_signal(1);
            self.push_log("Rewound into a Glitch! -1 health.");
            events.push(GameEvent::SignalLost {
                amount: 1,
                remaining: self.resources.signal,
            });
        } else if new.is_chrono() {
            self.resources.gain_chrono(1);
            self.push_log("Rewound into Chrono! +1 Chrono.");
            events.push(GameEvent::ChronoGained {
                amount: 1,
                total: self.resources.chrono,
            });
        }

        self.push_log(format!("RE ROLLED die {} to {}.", index + 1, new));
        Ok(events)
    }

    /// Add the overload bonus to the current strength
    pub fn use_overload(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.require_playing()?;
        if !self.turn.rolled {
            return Err(GameError::NotRolled);
        }
        if !self.resources.try_spend(self.config.costs.overload) {
            return Err(GameError::CannotAfford);
        }

        self.turn.strength += self.config.overload_bonus;
        self.push_log(format!(
            "Overloaded: +{} strength.",
            self.config.overload_bonus
        ));

        Ok(vec![GameEvent::Overloaded {
            strength: self.turn.strength,
        }])
    }

    /// Breach the selected cell without a strength check, in place of rolling
    pub fn use_skip(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.require_playing()?;
        let coord = self.turn.selected.ok_or(GameError::NoTileSelected)?;
        if self.turn.rolled {
            return Err(GameError::AlreadyRolled);
        }
        if !self.resources.try_spend(self.config.costs.skip) {
            return Err(GameError::CannotAfford);
        }

        let mut events = vec![GameEvent::TileSkipped { coord }];
        events.extend(self.breach_cell(coord));
        self.push_log("Skipped: Auto-breached tile.");
        self.turn.clear();

        Ok(events)
    }

    /// Compare the current strength against the selected cell's shield
    pub fn resolve_breach(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.require_playing()?;
        let coord = self.turn.selected.ok_or(GameError::NoTileSelected)?;
        if !self.turn.rolled {
            return Err(GameError::NotRolled);
        }
        let shield = self.board.shield_at(&coord).ok_or(GameError::OutOfBounds)?;
        let strength = self.turn.strength;

        let mut events = Vec::new();

        if strength >= u32::from(shield) {
            events.push(GameEvent::BreachSucceeded {
                coord,
                shield,
                strength,
            });
            events.extend(self.breach_cell(coord));
            self.push_log(format!(
                "Success! Breached shield {} with {}.",
                shield, strength
            ));
        } else {
            self.resources.lose_signal(1);
            self.push_log(format!(
                "Failure. Lost 1 health. Needed {}, had {}.",
                shield, strength
            ));
            events.push(GameEvent::BreachFailed {
                coord,
                shield,
                strength,
            });
            events.push(GameEvent::SignalLost {
                amount: 1,
                remaining: self.resources.signal,
            });
        }

        self.turn.clear();

        if self.is_playing() {
            events.extend(self.check_lose());
        }

        Ok(events)
    }

    /// Replace the entered name, dropping unprintable characters
    pub fn set_player_name(&mut self, name: &str) -> Result<Vec<GameEvent>, GameError> {
        self.require_phase(GamePhase::EnterName)?;

        self.player_name = name
            .chars()
            .filter(|c| !c.is_control())
            .take(self.config.max_name_len)
            .collect();

        Ok(vec![GameEvent::NameChanged {
            name: self.player_name.clone(),
        }])
    }

    /// Append a character to the entered name
    pub fn type_char(&mut self, c: char) -> Result<Vec<GameEvent>, GameError> {
        self.require_phase(GamePhase::EnterName)?;
        if c.is_control() {
            return Err(GameError::UnprintableChar);
        }
        if self.player_name.chars().count() >= self.config.max_name_len {
            return Err(GameError::NameFull);
        }

        self.player_name.push(c);
        Ok(vec![GameEvent::NameChanged {
            name: self.player_name.clone(),
        }])
    }

    /// Remove the last character of the entered name
    pub fn backspace(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.require_phase(GamePhase::EnterName)?;
        if self.player_name.pop().is_none() {
            return Ok(Vec::new());
        }

        Ok(vec![GameEvent::NameChanged {
            name: self.player_name.clone(),
        }])
    }

    /// Commit the score under the entered name.
    ///
    /// The game stays in name entry; the owner is expected to submit the
    /// entry and replace this game with a new one.
    pub fn commit_name(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.require_phase(GamePhase::EnterName)?;
        if self.player_name.is_empty() {
            return Err(GameError::EmptyName);
        }

        Ok(vec![GameEvent::ScoreCommitted(self.score_entry())])
    }

    /// Ask to start over without submitting
    pub fn request_restart(&mut self) -> Result<Vec<GameEvent>, GameError> {
        self.require_phase(GamePhase::EnterName)?;
        Ok(vec![GameEvent::RestartRequested])
    }

    /// The score as it would be submitted now
    pub fn score_entry(&self) -> ScoreEntry {
        ScoreEntry {
            name: self.player_name.clone(),
            score: self.final_score,
            lore: self.resources.lore,
            win: self.won,
        }
    }

    // ==================== Timed Transitions ====================

    /// Advance the clock and complete any animation whose time is up
    pub fn tick(&mut self, now: Millis) -> Vec<GameEvent> {
        self.now = self.now.max(now);
        let now = self.now;
        let timings = self.config.timings;
        let mut events = Vec::new();

        match self.phase.clone() {
            GamePhase::Playing | GamePhase::EnterName => {}

            GamePhase::LoreAnimation { coord, started_at } => {
                if now.saturating_sub(started_at) >= timings.lore_ms {
                    self.phase = GamePhase::Playing;
                    self.player.position = coord;
                    self.resources.lore += 1;
                    events.push(GameEvent::LoreCollected {
                        coord,
                        total: self.resources.lore,
                    });
                    events.push(GameEvent::PlayerMoved { to: coord });
                }
            }

            GamePhase::WinAnimation { started_at } => {
                if now.saturating_sub(started_at) >= timings.win_ms {
                    events.push(self.finish_game());
                }
            }

            GamePhase::LoseAnimation {
                mut fill,
                mut step_at,
            } => {
                let total = self.board.cell_count();

                // Catch up on every step that has elapsed since the last tick
                while fill < total && now.saturating_sub(step_at) >= timings.fill_step_ms {
                    fill += 1;
                    step_at += timings.fill_step_ms;
                    events.push(GameEvent::FillAdvanced { step: fill });
                }

                if fill >= total && now.saturating_sub(step_at) >= timings.lose_hold_ms {
                    events.push(self.finish_game());
                } else {
                    self.phase = GamePhase::LoseAnimation { fill, step_at };
                }
            }
        }

        events
    }

    // ==================== Helper Methods ====================

    fn require_playing(&self) -> Result<(), GameError> {
        self.require_phase(GamePhase::Playing)
    }

    fn require_phase(&self, phase: GamePhase) -> Result<(), GameError> {
        if self.phase != phase {
            return Err(GameError::InvalidPhase);
        }
        Ok(())
    }

    fn push_log(&mut self, message: impl Into<String>) {
        while self.log.len() >= self.config.log_capacity {
            self.log.pop_front();
        }
        self.log.push_back(message.into());
    }

    fn reset_log(&mut self, message: &str) {
        self.log.clear();
        self.push_log(message);
    }

    /// Mark a cell breached, then either start the lore flash or move there
    fn breach_cell(&mut self, coord: Coord) -> Vec<GameEvent> {
        self.board.mark_breached(&coord);

        if self.board.take_lore(&coord) {
            self.phase = GamePhase::LoreAnimation {
                coord,
                started_at: self.now,
            };
            self.push_log("LORE FOUND!");
            vec![GameEvent::LoreFound { coord }]
        } else {
            self.player.position = coord;
            vec![GameEvent::PlayerMoved { to: coord }]
        }
    }

    fn win_game(&mut self) -> Vec<GameEvent> {
        let exit = self.board.exit();
        self.player.position = exit;
        self.phase = GamePhase::WinAnimation {
            started_at: self.now,
        };
        self.won = true;
        self.turn.clear();
        self.reset_log("SIGNAL BREACH SUCCESS!");

        vec![GameEvent::PlayerMoved { to: exit }, GameEvent::GameWon]
    }

    fn check_lose(&mut self) -> Vec<GameEvent> {
        if !self.resources.is_depleted() {
            return Vec::new();
        }

        self.phase = GamePhase::LoseAnimation {
            fill: 0,
            step_at: self.now,
        };
        self.won = false;
        self.reset_log("GAME OVER!");

        vec![GameEvent::GameLost]
    }

    fn finish_game(&mut self) -> GameEvent {
        self.phase = GamePhase::EnterName;
        self.final_score = final_score(self.won, self.resources.lore, &self.config.scoring);
        self.reset_log("RESTART GAME");

        GameEvent::GameFinished {
            won: self.won,
            final_score: self.final_score,
        }
    }
}
