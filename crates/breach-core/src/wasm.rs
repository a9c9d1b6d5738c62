//! WebAssembly bindings for the Static Breach engine.
//!
//! This module exposes a game session to JavaScript through wasm-bindgen.
//! The browser host owns the clock and the score POST: it calls `tick` every
//! animation frame and drains committed scores with `takeScores`.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::actions::Intent;
#[cfg(feature = "wasm")]
use crate::config::GameConfig;
#[cfg(feature = "wasm")]
use crate::rng::GameRng;
#[cfg(feature = "wasm")]
use crate::score::{ScoreEntry, ScoreSink};
#[cfg(feature = "wasm")]
use crate::session::Session;
#[cfg(feature = "wasm")]
use std::cell::RefCell;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Holds committed scores until JavaScript collects them
#[cfg(feature = "wasm")]
#[derive(Default)]
struct PendingScores(RefCell<Vec<ScoreEntry>>);

#[cfg(feature = "wasm")]
impl ScoreSink for PendingScores {
    fn submit(&self, entry: ScoreEntry) {
        self.0.borrow_mut().push(entry);
    }
}

/// WASM-exposed game session
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    session: Session<PendingScores>,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create a session, optionally from a fixed seed and a config JSON
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>, config_json: Option<String>) -> Result<WasmGame, JsValue> {
        let config = match config_json {
            Some(json) => GameConfig::from_json_str(&json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?,
            None => GameConfig::default(),
        };
        let seed = seed.unwrap_or_else(|| GameRng::from_entropy().seed());

        let session = Session::new(config, seed, PendingScores::default())
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;

        Ok(WasmGame { session })
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(self.session.game()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the current phase as a string
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        self.session.game().phase.label().to_string()
    }

    /// Get the player's position as `[row, col]`
    #[wasm_bindgen(js_name = getPlayerPosition)]
    pub fn get_player_position(&self) -> Vec<u8> {
        let pos = self.session.game().player_position();
        vec![pos.row, pos.col]
    }

    /// Apply an intent from JSON, returns events JSON or error
    #[wasm_bindgen(js_name = applyIntent)]
    pub fn apply_intent(&mut self, intent_json: &str) -> Result<String, JsValue> {
        let intent: Intent = serde_json::from_str(intent_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid intent JSON: {}", e)))?;

        match self.session.apply(intent) {
            Ok(events) => {
                Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
            }
            Err(e) => Err(JsValue::from_str(&format!("Intent rejected: {}", e))),
        }
    }

    /// Advance the clock (milliseconds), returns events JSON
    #[wasm_bindgen]
    pub fn tick(&mut self, now: f64) -> String {
        let events = self.session.tick(now.max(0.0) as u64);
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Drain committed scores as a JSON array
    #[wasm_bindgen(js_name = takeScores)]
    pub fn take_scores(&mut self) -> String {
        let scores = self.session.sink().0.take();
        serde_json::to_string(&scores).unwrap_or_else(|_| "[]".to_string())
    }
}
