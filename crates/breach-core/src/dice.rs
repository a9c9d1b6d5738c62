//! Breach dice.
//!
//! Each die has six faces. Numeric faces add their value to breach strength,
//! BREACH adds a fixed bonus, GLITCH costs signal and CHRONO grants chrono.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single die face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieFace {
    One,
    Two,
    Three,
    /// Costs one signal strength
    Glitch,
    /// Worth the configured breach bonus (3 by default)
    Breach,
    /// Grants one chrono
    Chrono,
}

impl DieFace {
    /// The standard six-face die
    pub const STANDARD: [DieFace; 6] = [
        DieFace::One,
        DieFace::Two,
        DieFace::Three,
        DieFace::Glitch,
        DieFace::Breach,
        DieFace::Chrono,
    ];

    /// Strength this face contributes to a breach attempt
    pub fn strength(&self, breach_value: u32) -> u32 {
        match self {
            DieFace::One => 1,
            DieFace::Two => 2,
            DieFace::Three => 3,
            DieFace::Breach => breach_value,
            DieFace::Glitch | DieFace::Chrono => 0,
        }
    }

    pub fn is_glitch(&self) -> bool {
        matches!(self, DieFace::Glitch)
    }

    pub fn is_chrono(&self) -> bool {
        matches!(self, DieFace::Chrono)
    }

    /// Label shown on the dice panel
    pub fn label(&self) -> &'static str {
        match self {
            DieFace::One => "1",
            DieFace::Two => "2",
            DieFace::Three => "3",
            DieFace::Glitch => "GLITCH",
            DieFace::Breach => "BREACH",
            DieFace::Chrono => "CHRONO",
        }
    }
}

impl fmt::Display for DieFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The pair of dice for the current turn. A slot is `None` until rolled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePair(pub [Option<DieFace>; 2]);

impl DicePair {
    /// Number of dice in a pair
    pub const LEN: usize = 2;

    /// A freshly rolled pair
    pub fn rolled(first: DieFace, second: DieFace) -> Self {
        Self([Some(first), Some(second)])
    }

    /// Both faces are present
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    pub fn get(&self, index: usize) -> Option<DieFace> {
        self.0.get(index).copied().flatten()
    }

    pub fn set(&mut self, index: usize, face: DieFace) {
        if let Some(slot) = self.0.get_mut(index) {
            *slot = Some(face);
        }
    }

    pub fn clear(&mut self) {
        self.0 = [None, None];
    }

    /// The faces currently showing
    pub fn faces(&self) -> impl Iterator<Item = DieFace> + '_ {
        self.0.iter().flatten().copied()
    }
}

/// Totals from a set of faces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Breach strength contributed
    pub strength: u32,
    /// Number of GLITCH faces
    pub glitches: u32,
    /// Number of CHRONO faces
    pub chrono: u32,
}

/// Tally strength, glitches and chrono for a set of faces
pub fn tally<I>(faces: I, breach_value: u32) -> RollOutcome
where
    I: IntoIterator<Item = DieFace>,
{
    faces
        .into_iter()
        .fold(RollOutcome::default(), |mut outcome, face| {
            outcome.strength += face.strength(breach_value);
            if face.is_glitch() {
                outcome.glitches += 1;
            }
            if face.is_chrono() {
                outcome.chrono += 1;
            }
            outcome
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_strength() {
        assert_eq!(DieFace::One.strength(3), 1);
        assert_eq!(DieFace::Two.strength(3), 2);
        assert_eq!(DieFace::Three.strength(3), 3);
        assert_eq!(DieFace::Breach.strength(3), 3);
        assert_eq!(DieFace::Breach.strength(5), 5);
        assert_eq!(DieFace::Glitch.strength(3), 0);
        assert_eq!(DieFace::Chrono.strength(3), 0);
    }

    #[test]
    fn test_tally_matches_sum_rule_for_every_pair() {
        for a in DieFace::STANDARD {
            for b in DieFace::STANDARD {
                let outcome = tally([a, b], 3);
                let numeric: u32 = [a, b]
                    .iter()
                    .map(|f| match f {
                        DieFace::One => 1,
                        DieFace::Two => 2,
                        DieFace::Three => 3,
                        _ => 0,
                    })
                    .sum();
                let breaches = [a, b].iter().filter(|f| **f == DieFace::Breach).count() as u32;
                assert_eq!(outcome.strength, numeric + 3 * breaches, "{a} + {b}");
            }
        }
    }

    #[test]
    fn test_tally_counts_glitch_and_chrono() {
        let outcome = tally([DieFace::Glitch, DieFace::Glitch], 3);
        assert_eq!(outcome.glitches, 2);
        assert_eq!(outcome.strength, 0);

        let outcome = tally([DieFace::Chrono, DieFace::Three], 3);
        assert_eq!(outcome.chrono, 1);
        assert_eq!(outcome.glitches, 0);
        assert_eq!(outcome.strength, 3);
    }

    #[test]
    fn test_dice_pair_slots() {
        let mut pair = DicePair::default();
        assert!(!pair.is_complete());
        assert_eq!(pair.get(0), None);

        pair = DicePair::rolled(DieFace::Three, DieFace::Breach);
        assert!(pair.is_complete());
        assert_eq!(pair.get(1), Some(DieFace::Breach));

        pair.set(1, DieFace::One);
        assert_eq!(pair.faces().collect::<Vec<_>>(), vec![DieFace::Three, DieFace::One]);

        pair.set(7, DieFace::Two);
        assert_eq!(pair.get(7), None);

        pair.clear();
        assert_eq!(pair, DicePair::default());
    }

    #[test]
    fn test_labels() {
        let labels: Vec<String> = DieFace::STANDARD.iter().map(|f| f.to_string()).collect();
        assert_eq!(labels, vec!["1", "2", "3", "GLITCH", "BREACH", "CHRONO"]);
    }
}
