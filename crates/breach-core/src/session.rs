//! A play session spanning many games.
//!
//! Name entry is terminal for a `Game`: committing a score or asking to
//! restart always replaces the whole game with a freshly generated one.
//! `Session` owns that lifecycle and hands committed scores to a
//! [`ScoreSink`].

use crate::actions::{GameEvent, Intent};
use crate::config::{ConfigError, GameConfig};
use crate::game::{Game, GameError, Millis};
use crate::rng::GameRng;
use crate::score::ScoreSink;

/// Owns the current game and recreates it between plays
pub struct Session<S: ScoreSink> {
    config: GameConfig,
    /// Seeds each new game
    seeds: GameRng,
    game: Game,
    sink: S,
    games_started: u32,
}

impl<S: ScoreSink> Session<S> {
    /// Start a session; the first game is created immediately
    pub fn new(config: GameConfig, seed: u64, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut seeds = GameRng::new(seed);
        let game = Game::new(config.clone(), GameRng::new(seeds.next_seed()))?;

        Ok(Self {
            config,
            seeds,
            game,
            sink,
            games_started: 1,
        })
    }

    /// The game being played
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Mutable access to the game being played
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Number of games created, including the current one
    pub fn games_started(&self) -> u32 {
        self.games_started
    }

    /// Apply an intent, submitting and restarting when the game asks to
    pub fn apply(&mut self, intent: Intent) -> Result<Vec<GameEvent>, GameError> {
        let events = self.game.apply(intent)?;

        let mut restart = false;
        for event in &events {
            match event {
                GameEvent::ScoreCommitted(entry) => {
                    self.sink.submit(entry.clone());
                    restart = true;
                }
                GameEvent::RestartRequested => restart = true,
                _ => {}
            }
        }

        if restart {
            self.restart();
        }

        Ok(events)
    }

    /// Advance timed transitions
    pub fn tick(&mut self, now: Millis) -> Vec<GameEvent> {
        self.game.tick(now)
    }

    /// Replace the current game with a fresh one on the same clock
    pub fn restart(&mut self) {
        let now = self.game.now();
        let rng = GameRng::new(self.seeds.next_seed());
        // `config` is private and was validated in `new`
        self.game = Game::build(self.config.clone(), rng);
        self.game.tick(now);
        self.games_started += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GamePhase;
    use crate::grid::Coord;
    use crate::score::ScoreEntry;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        entries: RefCell<Vec<ScoreEntry>>,
    }

    impl ScoreSink for RecordingSink {
        fn submit(&self, entry: ScoreEntry) {
            self.entries.borrow_mut().push(entry);
        }
    }

    fn session() -> Session<RecordingSink> {
        Session::new(GameConfig::default(), 7, RecordingSink::default()).expect("valid")
    }

    #[test]
    fn test_same_seed_same_board() {
        let a = session();
        let b = session();
        assert_eq!(a.game().board.cells(), b.game().board.cells());
    }

    #[test]
    fn test_commit_submits_and_recreates() {
        let mut session = session();
        session.tick(5_000);
        let game = session.game_mut();
        game.phase = GamePhase::EnterName;
        game.resources.chrono = 9;
        game.final_score = 300;
        game.resources.lore = 3;

        session
            .apply(Intent::SetPlayerName("TRINITY".into()))
            .expect("name");
        let events = session.apply(Intent::CommitName).expect("commit");
        assert!(matches!(events[0], GameEvent::ScoreCommitted(_)));

        assert_eq!(
            session.sink().entries.borrow().as_slice(),
            &[ScoreEntry {
                name: "TRINITY".into(),
                score: 300,
                lore: 3,
                win: false
            }]
        );

        let game = session.game();
        assert_eq!(game.phase, GamePhase::Playing);
        assert_eq!(game.resources.chrono, 0);
        assert_eq!(game.resources.lore, 0);
        assert!(game.player_name.is_empty());
        assert_eq!(game.now(), 5_000);
        assert_eq!(session.games_started(), 2);
    }

    #[test]
    fn test_empty_name_is_not_submitted() {
        let mut session = session();
        session.game_mut().phase = GamePhase::EnterName;
        assert_eq!(session.apply(Intent::CommitName), Err(GameError::EmptyName));
        assert!(session.sink().entries.borrow().is_empty());
        assert_eq!(session.games_started(), 1);
    }

    #[test]
    fn test_restart_skips_submission() {
        let mut session = session();
        session.game_mut().phase = GamePhase::EnterName;
        session.apply(Intent::RequestRestart).expect("restart");
        assert!(session.sink().entries.borrow().is_empty());
        assert_eq!(session.game().phase, GamePhase::Playing);
        assert_eq!(session.games_started(), 2);
    }

    #[test]
    fn test_restart_keeps_custom_rules() {
        let config = GameConfig {
            grid_size: 3,
            start: Coord::new(2, 0),
            exit: Coord::new(0, 2),
            starting_signal: 2,
            max_lore: 1,
            ..GameConfig::default()
        };
        let mut session = Session::new(config.clone(), 11, RecordingSink::default()).expect("valid");

        for _ in 0..3 {
            session.game_mut().phase = GamePhase::EnterName;
            session.apply(Intent::RequestRestart).expect("restart");

            let game = session.game();
            assert_eq!(game.config, config);
            assert_eq!(game.board.size(), 3);
            assert_eq!(game.board.cell_count(), 9);
            assert_eq!(game.resources.signal, 2);
            assert_eq!(game.player_position(), Coord::new(2, 0));
        }
        assert_eq!(session.games_started(), 4);
    }

    #[test]
    fn test_rejected_intent_keeps_game() {
        let mut session = session();
        assert_eq!(session.apply(Intent::Roll), Err(GameError::NoTileSelected));
        assert_eq!(session.games_started(), 1);
    }
}
