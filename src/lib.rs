//! Skyline Dash - a side-scrolling timed runner
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (physics, spawning, collisions, power-ups, game over)
//! - `run`: Run controller gating the frame and 1 Hz timer tasks behind a run token
//! - `render`: Draw-list description of the simulation for an external renderer
//! - `audio`: Sound cue and music capability consumed by the core
//! - `hud`: Score/timer/effect-message values published to the presentation layer
//! - `config` / `settings`: Data-driven tuning and player preferences

pub mod audio;
pub mod config;
pub mod hud;
pub mod render;
pub mod run;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::GameConfig;
pub use run::{FrameOutcome, Frontend, RunController, RunToken};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Milliseconds in one nominal 60 Hz frame (Δt = 1.0)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Nominal frames per second, used to turn frame counts into seconds
    pub const FRAMES_PER_SECOND: f32 = 60.0;

    /// Logical viewport
    pub const GAME_WIDTH: f32 = 900.0;
    pub const GAME_HEIGHT: f32 = 500.0;
    pub const GROUND_Y_OFFSET: f32 = 50.0;

    /// Player defaults
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 60.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const GRAVITY: f32 = 0.6;
    /// Negative = upward
    pub const PLAYER_JUMP_FORCE: f32 = -15.0;
    pub const MAX_JUMP_CHARGES: u8 = 2;

    /// Scrolling speed (pixels per nominal frame)
    pub const BASE_GAME_SPEED: f32 = 5.0;
    /// Base speed gain per second of play
    pub const GAME_SPEED_INCREMENT: f32 = 0.003;

    /// Run timer (whole seconds)
    pub const INITIAL_TIMER: u32 = 60;
    /// Bonus for surviving until the timer runs out
    pub const COMPLETION_BONUS: u64 = 2500;
    /// Bonus for a score item pickup
    pub const SCORE_ITEM_BONUS: u64 = 500;

    /// Game-over shake/flash sequence length (frames)
    pub const GAME_OVER_SEQUENCE_DURATION: f32 = 45.0;

    /// Power-up durations (frames)
    pub const INVINCIBILITY_DURATION: f32 = 300.0;
    pub const SPEED_UP_DURATION: f32 = 420.0;
    pub const JUMP_UP_DURATION: f32 = 600.0;
    pub const SPEED_UP_MULTIPLIER: f32 = 1.5;
    pub const JUMP_UP_MULTIPLIER: f32 = 1.3;

    /// Items
    pub const ITEM_SIZE: f32 = 45.0;
    pub const ITEM_SPAWN_ATTEMPTS: u32 = 10;
    pub const ITEM_SAFETY_PADDING: f32 = 50.0;

    /// Afterimages (speed boost trail)
    pub const AFTERIMAGE_LIFE: f32 = 20.0;
    pub const AFTERIMAGE_INTERVAL: u64 = 4;

    /// Background music loop volume
    pub const MUSIC_VOLUME: f32 = 0.3;
}

/// Whole seconds remaining for a countdown measured in nominal frames (rounded up)
#[inline]
pub fn frames_to_whole_seconds(frames: f32) -> u32 {
    (frames / consts::FRAMES_PER_SECOND).ceil().max(0.0) as u32
}

/// Seconds to nominal frames
#[inline]
pub fn seconds_to_frames(seconds: f32) -> f32 {
    seconds * consts::FRAMES_PER_SECOND
}
