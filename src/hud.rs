//! Values published to the presentation layer
//!
//! Score, whole seconds left and at most one effect message per frame. While
//! the run is in normal play a power-up's status line wins over a transient
//! message; once the run is over only transient messages are shown.

use serde::{Deserialize, Serialize};

use crate::seconds_to_frames;
use crate::sim::state::{RunPhase, SimulationState};

/// Frames the final score takes to count up (1.2 s at 60 Hz)
pub const FINAL_SCORE_COUNT_UP_FRAMES: u64 = 72;

/// Read-only view of a run for the HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub score: u64,
    /// Whole seconds left
    pub timer: u32,
    pub effect_message: Option<String>,
    pub phase: RunPhase,
}

impl HudSnapshot {
    pub fn capture(state: &SimulationState, board: &EffectMessageBoard) -> Self {
        // Power-ups stop counting down after normal play, so their status is stale
        let status = if state.is_running() {
            state.power_ups.status_message()
        } else {
            None
        };
        Self {
            score: state.score,
            timer: state.timer,
            effect_message: board.current(status),
            phase: state.phase,
        }
    }
}

/// Host-side display for HUD values
pub trait HudSink {
    /// Called once per presented frame
    fn publish(&mut self, hud: &HudSnapshot);
    /// Called once when the run has ended
    fn run_ended(&mut self, final_score: u64);
}

#[derive(Debug, Clone, PartialEq)]
struct TransientMessage {
    text: String,
    /// Frames left
    remaining: f32,
}

/// Holds the latest transient message until it expires. Expiry is counted in
/// frames so it follows the simulation rather than the wall clock.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectMessageBoard {
    transient: Option<TransientMessage>,
}

impl EffectMessageBoard {
    /// Show `text` for `seconds`, replacing any previous transient message
    pub fn post(&mut self, text: impl Into<String>, seconds: f32) {
        self.transient = Some(TransientMessage {
            text: text.into(),
            remaining: seconds_to_frames(seconds),
        });
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(message) = &mut self.transient {
            message.remaining -= dt;
            if message.remaining <= 0.0 {
                self.transient = None;
            }
        }
    }

    /// Message to display given the current power-up status line
    pub fn current(&self, status: Option<String>) -> Option<String> {
        status.or_else(|| self.transient.as_ref().map(|m| m.text.clone()))
    }
}

/// Values to show on successive frames while the final score counts up from
/// zero. Always ends on exactly `final_score`.
pub fn final_score_count_up(final_score: u64) -> impl Iterator<Item = u64> {
    (1..=FINAL_SCORE_COUNT_UP_FRAMES).map(move |frame| {
        (final_score as u128 * frame as u128 / FINAL_SCORE_COUNT_UP_FRAMES as u128) as u64
    })
}
