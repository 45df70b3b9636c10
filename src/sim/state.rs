//! Run state and core simulation types
//!
//! One [`SimulationState`] per run. It owns every entity collection and the
//! player; nothing outlives the run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Afterimage, Item, Obstacle, VisualEffect};
use super::particles;
use super::player::{JumpEffect, Player};
use super::powerups::{PowerUp, PowerUps};
use crate::audio::{MusicTrack, SoundCue};
use crate::config::GameConfig;

/// Where the run is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Normal play
    Running,
    /// Terminal shake/flash countdown (frames remaining)
    Sequencing { remaining: f32 },
    /// Run over, nothing updates any more
    Ended,
}

/// Side effects for collaborators, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    Music(MusicTrack),
    /// Transient effect message shown for `seconds`
    Message { text: String, seconds: f32 },
    RunEnded { final_score: u64 },
}

/// Initial obstacle cooldown (frames)
pub const INITIAL_OBSTACLE_COOLDOWN: f32 = 120.0;

/// Complete run state
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub items: Vec<Item>,
    pub effects: Vec<VisualEffect>,
    pub afterimages: Vec<Afterimage>,
    pub score: u64,
    /// Whole seconds left
    pub timer: u32,
    /// Current scroll speed
    pub speed: f32,
    /// Speed without boosts, grows slowly over the run
    pub base_speed: f32,
    pub frame_count: u64,
    pub background_scroll_x: f32,
    pub ground_scroll_x: f32,
    pub obstacle_cooldown: f32,
    pub item_cooldown: f32,
    pub power_ups: PowerUps,
    pub phase: RunPhase,
    /// Fixed for the run
    pub ground_y: f32,
    events: Vec<GameEvent>,
}

impl SimulationState {
    /// Create a fresh run with the given seed
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let item_cooldown = rng.random_range(300..=500) as f32;
        let player = Player::new(&config);
        Self {
            seed,
            rng,
            player,
            obstacles: Vec::new(),
            items: Vec::new(),
            effects: Vec::new(),
            afterimages: Vec::new(),
            score: 0,
            timer: config.initial_timer,
            speed: config.base_speed,
            base_speed: config.base_speed,
            frame_count: 0,
            background_scroll_x: 0.0,
            ground_scroll_x: 0.0,
            obstacle_cooldown: INITIAL_OBSTACLE_COOLDOWN,
            item_cooldown,
            power_ups: PowerUps::default(),
            phase: RunPhase::Running,
            ground_y: config.ground_y(),
            config,
            events: Vec::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn is_sequencing(&self) -> bool {
        matches!(self.phase, RunPhase::Sequencing { .. })
    }

    pub fn is_ended(&self) -> bool {
        self.phase == RunPhase::Ended
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn message(&mut self, text: impl Into<String>, seconds: f32) {
        self.emit(GameEvent::Message {
            text: text.into(),
            seconds,
        });
    }

    /// Pending side effects, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Speed the world should scroll at given the current boosts
    pub fn target_speed(&self) -> f32 {
        if self.power_ups.is_active(PowerUp::SpeedBoost) {
            self.base_speed * self.config.speed_up_multiplier
        } else {
            self.base_speed
        }
    }

    /// Jump command from the input layer. Ignored unless the run is in normal play.
    pub fn request_jump(&mut self) {
        if !self.is_running() {
            return;
        }
        let boosted = self.power_ups.is_active(PowerUp::JumpBoost);
        for effect in self.player.jump(boosted) {
            match effect {
                JumpEffect::Sound => self.emit(GameEvent::Sound(SoundCue::Jump)),
                JumpEffect::BoostBurst { at } => {
                    let burst = particles::jump_burst(&mut self.rng, at);
                    self.effects.extend(burst);
                }
            }
        }
    }

    pub fn spawn_effects(&mut self, effects: impl IntoIterator<Item = VisualEffect>) {
        self.effects.extend(effects);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_defaults() {
        let state = SimulationState::new(GameConfig::default(), 1);
        assert_eq!(state.timer, 60);
        assert_eq!(state.score, 0);
        assert_eq!(state.speed, 5.0);
        assert_eq!(state.ground_y, 450.0);
        assert_eq!(state.obstacle_cooldown, 120.0);
        assert!((300.0..=500.0).contains(&state.item_cooldown));
        assert!(state.is_running());
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_jump_emits_sound_event() {
        let mut state = SimulationState::new(GameConfig::default(), 1);
        state.request_jump();
        assert_eq!(state.drain_events(), vec![GameEvent::Sound(SoundCue::Jump)]);
        assert_eq!(state.player.jumps_left, 1);
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_boosted_jump_spawns_particles() {
        let mut state = SimulationState::new(GameConfig::default(), 1);
        let config = state.config.clone();
        state.power_ups.activate(&config, PowerUp::JumpBoost);
        state.request_jump();
        assert_eq!(state.effects.len(), 10);
    }

    #[test]
    fn test_jump_ignored_outside_running() {
        let mut state = SimulationState::new(GameConfig::default(), 1);
        state.phase = RunPhase::Sequencing { remaining: 45.0 };
        state.request_jump();
        assert_eq!(state.player.jumps_left, 2);
        assert!(state.events().is_empty());

        state.phase = RunPhase::Ended;
        state.request_jump();
        assert_eq!(state.player.jumps_left, 2);
    }
}
