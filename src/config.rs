//! Gameplay tuning
//!
//! Defaults come from [`crate::consts`]; any subset can be overridden from JSON.

use std::path::Path;

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tuning values read by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub game_width: f32,
    pub game_height: f32,
    pub ground_y_offset: f32,

    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub gravity: f32,
    pub jump_force: f32,

    pub base_speed: f32,
    pub speed_increment: f32,

    /// Run timer in whole seconds
    pub initial_timer: u32,
    pub completion_bonus: u64,
    pub score_item_bonus: u64,

    /// Frames
    pub game_over_duration: f32,
    pub invincibility_duration: f32,
    pub speed_up_duration: f32,
    pub jump_up_duration: f32,

    pub speed_up_multiplier: f32,
    pub jump_up_multiplier: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_width: GAME_WIDTH,
            game_height: GAME_HEIGHT,
            ground_y_offset: GROUND_Y_OFFSET,
            player_x: PLAYER_X,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            gravity: GRAVITY,
            jump_force: PLAYER_JUMP_FORCE,
            base_speed: BASE_GAME_SPEED,
            speed_increment: GAME_SPEED_INCREMENT,
            initial_timer: INITIAL_TIMER,
            completion_bonus: COMPLETION_BONUS,
            score_item_bonus: SCORE_ITEM_BONUS,
            game_over_duration: GAME_OVER_SEQUENCE_DURATION,
            invincibility_duration: INVINCIBILITY_DURATION,
            speed_up_duration: SPEED_UP_DURATION,
            jump_up_duration: JUMP_UP_DURATION,
            speed_up_multiplier: SPEED_UP_MULTIPLIER,
            jump_up_multiplier: JUMP_UP_MULTIPLIER,
        }
    }
}

impl GameConfig {
    /// Ground line, fixed for the whole run
    pub fn ground_y(&self) -> f32 {
        self.game_height - self.ground_y_offset
    }

    /// Parse a (possibly partial) JSON override. The play field must have a
    /// finite, positive size.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        for (name, value) in [
            ("game_width", config.game_width),
            ("game_height", config.game_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(serde_json::Error::custom(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(config)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a JSON file, falling back to defaults on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded game config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid game config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read game config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
