//! WebAssembly bindings for the Handfoot game engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::game::{GamePhase, GameState};
use crate::rules::RuleSet;
use crate::strategy::Strategy;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    state: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game with the default rules.
    ///
    /// `players_json` is an array of `[name, precision, speed]` triples.
    #[wasm_bindgen(constructor)]
    pub fn new(players_json: &str) -> Result<WasmGame, JsValue> {
        let players: Vec<(String, usize, f64)> = serde_json::from_str(players_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid players: {}", e)))?;

        let mut state = GameState::new(RuleSet::default());
        for (name, precision, speed) in players {
            state
                .add_player(name, precision, speed, Strategy::default())
                .map_err(js_error)?;
        }
        Ok(WasmGame { state })
    }

    /// Set up the table and deal the first round, returns events JSON
    pub fn start(&mut self) -> Result<String, JsValue> {
        let events = self.state.start().map_err(js_error)?;
        Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
    }

    /// Play the current player's turn, returns events JSON.
    ///
    /// Running out of cards to draw ends the round instead of failing.
    #[wasm_bindgen(js_name = playTurn)]
    pub fn play_turn(&mut self) -> Result<String, JsValue> {
        let player = self.state.current_player;
        let events = match self.state.play_turn(player) {
            Err(crate::GameError::NoCardsAvailable { .. }) => self.state.close_round(),
            other => other,
        }
        .map_err(js_error)?;
        Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
    }

    /// Deal the next round, or finish the game after the last one
    #[wasm_bindgen(js_name = nextRound)]
    pub fn next_round(&mut self) -> Result<String, JsValue> {
        let events = self.state.next_round().map_err(js_error)?;
        Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
    }

    /// Get the current game state as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        self.state.to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the running score totals as a JSON array
    #[wasm_bindgen(js_name = getScores)]
    pub fn get_scores(&self) -> String {
        serde_json::to_string(&self.state.totals).unwrap_or_else(|_| "[]".to_string())
    }

    /// Get the current phase as JSON
    #[wasm_bindgen(js_name = getPhase)]
    pub fn get_phase(&self) -> String {
        serde_json::to_string(&self.state.phase).unwrap_or_else(|_| "\"Unknown\"".to_string())
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        matches!(self.state.phase, GamePhase::GameOver { .. })
    }

    /// Get the winner (if game is finished)
    #[wasm_bindgen(js_name = getWinner)]
    pub fn get_winner(&self) -> Option<u8> {
        self.state.get_winner()
    }
}
