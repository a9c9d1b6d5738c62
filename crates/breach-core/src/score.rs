//! Final scoring and the score submission seam.

use crate::config::Scoring;
use serde::{Deserialize, Serialize};

/// A finished game's score as sent to the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    pub lore: u32,
    pub win: bool,
}

/// Win bonus (if won) plus a bonus per lore collected
pub fn final_score(won: bool, lore: u32, scoring: &Scoring) -> u32 {
    let base = if won { scoring.win_bonus } else { 0 };
    base + lore * scoring.per_lore
}

/// Receives committed scores.
///
/// Implementations must return immediately: the outcome of a submission
/// never affects the game.
pub trait ScoreSink {
    fn submit(&self, entry: ScoreEntry);
}

/// Discards every score
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ScoreSink for NullSink {
    fn submit(&self, _entry: ScoreEntry) {}
}

impl<S: ScoreSink + ?Sized> ScoreSink for Box<S> {
    fn submit(&self, entry: ScoreEntry) {
        (**self).submit(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_score() {
        let scoring = Scoring::default();
        assert_eq!(final_score(true, 0, &scoring), 1000);
        assert_eq!(final_score(true, 3, &scoring), 1300);
        assert_eq!(final_score(false, 2, &scoring), 200);
        assert_eq!(final_score(false, 0, &scoring), 0);
    }

    #[test]
    fn test_entry_json_shape() {
        let entry = ScoreEntry {
            name: "NEO".into(),
            score: 1200,
            lore: 2,
            win: true,
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(
            json,
            serde_json::json!({"name": "NEO", "score": 1200, "lore": 2, "win": true})
        );
    }
}
