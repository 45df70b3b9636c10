//! Timed power-up effects
//!
//! Three independent countdowns measured in nominal frames. Picking up an
//! effect that is already running restarts its timer at the full duration.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::frames_to_whole_seconds;

/// The timed effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUp {
    Invincibility,
    SpeedBoost,
    JumpBoost,
}

impl PowerUp {
    /// Status message priority order (first wins)
    pub const PRIORITY: [PowerUp; 3] = [
        PowerUp::Invincibility,
        PowerUp::SpeedBoost,
        PowerUp::JumpBoost,
    ];

    /// Message shown when the effect wears off
    pub fn expired_message(&self) -> &'static str {
        match self {
            PowerUp::Invincibility => "Invincibility ended",
            PowerUp::SpeedBoost => "Speed boost ended",
            PowerUp::JumpBoost => "Jump boost ended",
        }
    }

    fn status_label(&self) -> &'static str {
        match self {
            PowerUp::Invincibility => "Invincible!",
            PowerUp::SpeedBoost => "Speed up!",
            PowerUp::JumpBoost => "Jump up!",
        }
    }
}

/// Countdowns for every timed effect (frames remaining, 0 = inactive)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUps {
    pub invincibility: f32,
    pub speed_boost: f32,
    pub jump_boost: f32,
}

impl PowerUps {
    pub fn remaining(&self, power_up: PowerUp) -> f32 {
        match power_up {
            PowerUp::Invincibility => self.invincibility,
            PowerUp::SpeedBoost => self.speed_boost,
            PowerUp::JumpBoost => self.jump_boost,
        }
    }

    fn timer_mut(&mut self, power_up: PowerUp) -> &mut f32 {
        match power_up {
            PowerUp::Invincibility => &mut self.invincibility,
            PowerUp::SpeedBoost => &mut self.speed_boost,
            PowerUp::JumpBoost => &mut self.jump_boost,
        }
    }

    pub fn is_active(&self, power_up: PowerUp) -> bool {
        self.remaining(power_up) > 0.0
    }

    pub fn duration(config: &GameConfig, power_up: PowerUp) -> f32 {
        match power_up {
            PowerUp::Invincibility => config.invincibility_duration,
            PowerUp::SpeedBoost => config.speed_up_duration,
            PowerUp::JumpBoost => config.jump_up_duration,
        }
    }

    /// Start (or restart) an effect at its full duration.
    /// Returns whether it was already running.
    pub fn activate(&mut self, config: &GameConfig, power_up: PowerUp) -> bool {
        let was_active = self.is_active(power_up);
        *self.timer_mut(power_up) = Self::duration(config, power_up);
        was_active
    }

    /// Count every active effect down by `dt`, returning the ones that expired this frame
    pub fn tick(&mut self, dt: f32) -> Vec<PowerUp> {
        let mut expired = Vec::new();
        for power_up in PowerUp::PRIORITY {
            let timer = self.timer_mut(power_up);
            if *timer > 0.0 {
                *timer -= dt;
                if *timer <= 0.0 {
                    *timer = 0.0;
                    expired.push(power_up);
                }
            }
        }
        expired
    }

    /// Status line for the highest-priority running effect
    pub fn status_message(&self) -> Option<String> {
        PowerUp::PRIORITY
            .into_iter()
            .find(|p| self.is_active(*p))
            .map(|p| {
                format!(
                    "{} {}s left",
                    p.status_label(),
                    frames_to_whole_seconds(self.remaining(p))
                )
            })
    }
}
