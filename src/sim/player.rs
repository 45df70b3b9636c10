//! The runner
//!
//! Horizontal position never changes; the world scrolls past. Vertical motion is
//! gravity plus a double jump that recharges on landing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::config::GameConfig;
use crate::consts::MAX_JUMP_CHARGES;

/// Side effects requested by a successful jump
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpEffect {
    /// Play the jump cue
    Sound,
    /// Spray boost particles from the player's feet
    BoostBurst { at: Vec2 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
    pub jumps_left: u8,
    /// Velocity applied on jump (negative = upward)
    pub jump_force: f32,
    base_jump_force: f32,
    gravity: f32,
    ground_y: f32,
}

impl Player {
    /// Player standing on the ground
    pub fn new(config: &GameConfig) -> Self {
        let ground_y = config.ground_y();
        Self {
            pos: Vec2::new(config.player_x, ground_y - config.player_height),
            size: Vec2::new(config.player_width, config.player_height),
            vel_y: 0.0,
            jumps_left: MAX_JUMP_CHARGES,
            jump_force: config.jump_force,
            base_jump_force: config.jump_force,
            gravity: config.gravity,
            ground_y,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Bottom-center point
    pub fn feet(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }

    /// Lowest allowed y (standing on the ground)
    pub fn max_y(&self) -> f32 {
        self.ground_y - self.size.y
    }

    pub fn is_grounded(&self) -> bool {
        self.pos.y >= self.max_y()
    }

    pub fn base_jump_force(&self) -> f32 {
        self.base_jump_force
    }

    /// Apply gravity and clamp to the ground
    pub fn update(&mut self, dt: f32) {
        self.vel_y += self.gravity * dt;
        self.pos.y += self.vel_y * dt;

        let max_y = self.max_y();
        if self.pos.y > max_y {
            self.pos.y = max_y;
            self.vel_y = 0.0;
            if self.jumps_left < MAX_JUMP_CHARGES {
                self.jumps_left = MAX_JUMP_CHARGES;
            }
        }
    }

    /// Jump if a charge is left. Returns the effects to emit (empty when denied).
    pub fn jump(&mut self, jump_boost_active: bool) -> Vec<JumpEffect> {
        if self.jumps_left == 0 {
            return Vec::new();
        }

        self.vel_y = self.jump_force;
        self.jumps_left -= 1;

        let mut effects = vec![JumpEffect::Sound];
        if jump_boost_active {
            effects.push(JumpEffect::BoostBurst { at: self.feet() });
        }
        effects
    }

    /// Boosted jump force
    pub fn boost_jump(&mut self, multiplier: f32) {
        self.jump_force = self.base_jump_force * multiplier;
    }

    pub fn reset_jump_force(&mut self) {
        self.jump_force = self.base_jump_force;
    }
}
