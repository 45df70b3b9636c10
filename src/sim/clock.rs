//! Frame clock
//!
//! Turns monotonic frame timestamps (milliseconds) into a dimensionless Δt where
//! 1.0 is one nominal 60 Hz frame.

use crate::consts::FRAME_MS;

#[derive(Debug, Clone)]
pub struct Clock {
    last_ms: f64,
}

impl Clock {
    /// Seed the clock with the run start time so the first frame does not spike
    pub fn start(now_ms: f64) -> Self {
        Self { last_ms: now_ms }
    }

    /// Advance to `now_ms` and return Δt, or `None` when the frame must be skipped
    /// (non-finite, zero or backwards time). Any finite timestamp is recorded.
    pub fn tick(&mut self, now_ms: f64) -> Option<f32> {
        let dt = ((now_ms - self.last_ms) / FRAME_MS) as f32;
        if now_ms.is_finite() {
            self.last_ms = now_ms;
        }
        if is_valid_dt(dt) {
            Some(dt)
        } else {
            log::debug!("Skipping frame with invalid dt {dt}");
            None
        }
    }

    pub fn last_ms(&self) -> f64 {
        self.last_ms
    }
}

/// Whether a Δt value may drive an update
#[inline]
pub fn is_valid_dt(dt: f32) -> bool {
    dt.is_finite() && dt > 0.0
}
