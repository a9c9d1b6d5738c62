//! Player intents and the events they produce.
//!
//! The presentation layer translates raw input into an `Intent`; the game
//! answers with the `GameEvent`s describing what changed.

use crate::dice::DieFace;
use crate::grid::Coord;
use crate::score::ScoreEntry;
use serde::{Deserialize, Serialize};

/// Everything a player can ask the game to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    // ==================== Turn Actions ====================
    /// Target an adjacent cell (or step onto the exit)
    SelectTile(Coord),
    /// Roll both dice against the selected cell
    Roll,
    /// Resolve the breach attempt with the current strength
    Resolve,

    // ==================== Chrono Abilities ====================
    /// Reroll one die (index 0 or 1)
    Rewind(usize),
    /// Add strength to the current roll
    Overload,
    /// Breach the selected cell without rolling
    Skip,

    // ==================== Name Entry ====================
    /// Replace the whole name
    SetPlayerName(String),
    /// Append one character
    TypeChar(char),
    /// Delete the last character
    Backspace,
    /// Submit the score under the entered name
    CommitName,
    /// Start over without submitting
    RequestRestart,
}

/// Events that occur as a result of intents or timed transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A cell was targeted
    TileSelected { coord: Coord, shield: u8 },

    /// Dice were rolled
    DiceRolled {
        faces: [DieFace; 2],
        strength: u32,
        glitches: u32,
        chrono_gained: u32,
    },

    /// One die was rerolled
    DieRewound {
        index: usize,
        from: DieFace,
        to: DieFace,
        strength: u32,
    },

    /// Overload raised the strength
    Overloaded { strength: u32 },

    /// Skip force-breached a cell
    TileSkipped { coord: Coord },

    /// Signal strength was lost
    SignalLost { amount: u32, remaining: i32 },

    /// Chrono was gained
    ChronoGained { amount: u32, total: u32 },

    /// A breach attempt succeeded
    BreachSucceeded { coord: Coord, shield: u8, strength: u32 },

    /// A breach attempt failed
    BreachFailed { coord: Coord, shield: u8, strength: u32 },

    /// A breached cell held lore; its animation started
    LoreFound { coord: Coord },

    /// The lore animation finished and the lore was collected
    LoreCollected { coord: Coord, total: u32 },

    /// The player token moved
    PlayerMoved { to: Coord },

    /// The player reached the exit
    GameWon,

    /// Signal strength ran out
    GameLost,

    /// The lose animation filled another cell
    FillAdvanced { step: usize },

    /// The end-of-game animation finished
    GameFinished { won: bool, final_score: u32 },

    /// The entered name changed
    NameChanged { name: String },

    /// A score was committed for submission
    ScoreCommitted(ScoreEntry),

    /// The player asked to start over
    RestartRequested,
}
