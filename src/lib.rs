//! Flock Count core crate.
//!
//! A short perception game: a flock of birds crosses the screen, then the player
//! types how many there were. Five levels, one round each, scored on accuracy
//! with a streak bonus for consecutive exact answers.
//!
//! Gameplay (`levels`, `birds`, `trajectory`, `round`, `input`, `audio`) is
//! plain Rust driven by explicit events and runs under native `cargo test`.
//! The `web` module is the only part that touches the DOM.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod birds;
pub mod config;
pub mod error;
pub mod input;
pub mod labels;
pub mod levels;
pub mod logging;
pub mod round;
pub mod trajectory;
mod web;

pub use birds::{Bird, BirdSet, Point, Viewport};
pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use levels::{LEVELS, LevelConfig};
pub use round::{Event, Phase, RoundMachine, RoundResult, Verdict, score_round};
pub use trajectory::{BirdPose, is_complete, positions_at};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Mount the game with default settings.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start_game_with(GameConfig::default()).map_err(|e| {
        log::error!("start failed: {e}");
        e.into()
    })
}

/// Mount the game with a (partial) JSON config, e.g. `{"input_secs": 5}`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    web::start_game_with(config).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn stop_game() {
    web::stop_game();
}

#[wasm_bindgen]
pub fn level_count() -> usize {
    LEVELS.len()
}
