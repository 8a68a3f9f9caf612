//! Timing and audio tunables.
//!
//! Defaults reproduce the shipped game. With the `serde_json` feature a page can
//! pass a partial JSON object to `start_game_with_config`; missing keys keep
//! their default.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::trajectory::MIN_PRESENTATION_SECS;

/// Fastest tempo the beat scheduler accepts.
pub const MAX_TEMPO_BPM: f64 = 300.0;
/// Longest audio lookahead window, in seconds.
pub const MAX_LOOKAHEAD_SECS: f64 = 1.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub countdown_secs: u32,
    pub input_secs: u32,
    pub feedback_ms: f64,
    pub min_presentation_secs: f64,
    // --- Ambient music ---
    pub tempo_bpm: f64,
    pub lookahead_secs: f64,
    pub initial_gain: f32,
    pub idle_gain: f32,
    pub presenting_gain: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            countdown_secs: 3,
            input_secs: 3,
            feedback_ms: 2500.0,
            min_presentation_secs: MIN_PRESENTATION_SECS,
            tempo_bpm: 120.0,
            lookahead_secs: 0.2,
            initial_gain: 0.3,
            idle_gain: 0.2,
            presenting_gain: 0.5,
        }
    }
}

impl GameConfig {
    pub fn seconds_per_beat(&self) -> f64 {
        60.0 / self.tempo_bpm
    }

    pub fn validate(&self) -> GameResult<()> {
        if self.countdown_secs == 0 || self.input_secs == 0 {
            return Err(GameError::Config("timers must be at least one second".into()));
        }
        if self.feedback_ms.is_nan() || self.feedback_ms <= 0.0 {
            return Err(GameError::Config("feedback_ms must be positive".into()));
        }
        if self.tempo_bpm.is_nan() || self.tempo_bpm <= 0.0 || self.tempo_bpm > MAX_TEMPO_BPM {
            return Err(GameError::Config(format!("tempo_bpm must be in (0, {MAX_TEMPO_BPM}]")));
        }
        if !(0.0..=MAX_LOOKAHEAD_SECS).contains(&self.lookahead_secs) {
            return Err(GameError::Config(format!("lookahead_secs must be in [0, {MAX_LOOKAHEAD_SECS}]")));
        }
        if self.min_presentation_secs.is_nan() || self.min_presentation_secs < 0.0 {
            return Err(GameError::Config("min_presentation_secs must not be negative".into()));
        }
        Ok(())
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> GameResult<Self> {
        let cfg: GameConfig =
            serde_json::from_str(json).map_err(|e| GameError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
