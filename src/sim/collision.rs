//! Player collision resolution
//!
//! Obstacles end the run (unless invincible); items are consumed and applied.

use glam::Vec2;

use super::entities::{Entity, ItemKind};
use super::game_over;
use super::particles;
use super::powerups::PowerUp;
use super::state::{GameEvent, SimulationState};
use crate::audio::SoundCue;

/// Result of one collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    /// A fatal obstacle hit started the game-over sequence
    pub fatal_hit: bool,
    /// Items collected this frame, newest spawned first
    pub collected: Vec<ItemKind>,
}

/// Index of the first obstacle overlapping the player
pub fn first_obstacle_hit(state: &SimulationState) -> Option<usize> {
    let player = state.player.bounds();
    state
        .obstacles
        .iter()
        .position(|o| player.intersects(&o.bounds()))
}

/// Test the player against obstacles and items for this frame
pub fn resolve_collisions(state: &mut SimulationState) -> CollisionReport {
    let mut report = CollisionReport::default();
    if !state.is_running() {
        return report;
    }

    if !state.power_ups.is_active(PowerUp::Invincibility) && first_obstacle_hit(state).is_some() {
        game_over::trigger(state);
        report.fatal_hit = true;
        return report;
    }

    let player = state.player.bounds();
    let mut hits = Vec::new();
    state.items.retain(|item| {
        if player.intersects(&item.bounds()) {
            hits.push((item.kind, item.pos));
            false
        } else {
            true
        }
    });

    // Newest first, so the oldest pickup's message is the one left showing
    for (kind, at) in hits.into_iter().rev() {
        apply_item(state, kind, at);
        report.collected.push(kind);
    }
    report
}

/// Pickup message and how long it stays up (seconds)
fn pickup_message(kind: ItemKind, bonus: u64) -> (String, f32) {
    match kind {
        ItemKind::ScoreUp => (format!("Score up! +{bonus}"), 2.0),
        ItemKind::Invincible => ("Invincible!".to_string(), 5.0),
        ItemKind::SpeedUp => ("Speed up!".to_string(), 7.0),
        ItemKind::JumpUp => ("Jump up!".to_string(), 10.0),
    }
}

/// Apply an item's effect; `at` is where the item was picked up
pub fn apply_item(state: &mut SimulationState, kind: ItemKind, at: Vec2) {
    state.emit(GameEvent::Sound(SoundCue::ItemGet));
    let bonus = state.config.score_item_bonus;
    let (text, seconds) = pickup_message(kind, bonus);
    state.message(text, seconds);

    let config = state.config.clone();
    match kind {
        ItemKind::ScoreUp => {
            state.score += bonus;
            let burst = particles::score_burst(&mut state.rng, at, bonus);
            state.spawn_effects(burst);
        }
        ItemKind::Invincible => {
            state.power_ups.activate(&config, PowerUp::Invincibility);
        }
        ItemKind::SpeedUp => {
            state.power_ups.activate(&config, PowerUp::SpeedBoost);
            state.speed = state.target_speed();
            let burst = particles::speed_up_burst(&mut state.rng, state.player.center());
            state.spawn_effects(burst);
        }
        ItemKind::JumpUp => {
            state.power_ups.activate(&config, PowerUp::JumpBoost);
            state.player.boost_jump(config.jump_up_multiplier);
            let burst = particles::jump_up_burst(&mut state.rng, state.player.feet());
            state.spawn_effects(burst);
        }
    }
    log::debug!("Collected {:?}", kind);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::entities::{Item, Obstacle, ObstacleKind};
    use crate::sim::state::RunPhase;

    fn state() -> SimulationState {
        SimulationState::new(GameConfig::default(), 77)
    }

    /// Low obstacle right on top of the standing player
    fn obstacle_on_player(state: &SimulationState) -> Obstacle {
        Obstacle::on_ground(ObstacleKind::Low, state.player.pos.x + 10.0, state.ground_y)
    }

    fn item_on_player(state: &SimulationState, kind: ItemKind) -> Item {
        Item::new(kind, state.player.pos + Vec2::splat(5.0), 45.0)
    }

    #[test]
    fn test_obstacle_hit_starts_sequence() {
        let mut state = state();
        let o = obstacle_on_player(&state);
        state.obstacles.push(o);
        let report = resolve_collisions(&mut state);
        assert!(report.fatal_hit);
        assert!(state.is_sequencing());
    }

    #[test]
    fn test_invincibility_suppresses_hit() {
        let mut state = state();
        let config = state.config.clone();
        state.power_ups.activate(&config, PowerUp::Invincibility);
        let o = obstacle_on_player(&state);
        state.obstacles.push(o);
        for _ in 0..10 {
            let report = resolve_collisions(&mut state);
            assert!(!report.fatal_hit);
        }
        assert!(state.is_running());
    }

    #[test]
    fn test_fatal_hit_skips_items() {
        let mut state = state();
        let o = obstacle_on_player(&state);
        let item = item_on_player(&state, ItemKind::ScoreUp);
        state.obstacles.push(o);
        state.items.push(item);
        resolve_collisions(&mut state);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_all_overlapping_items_apply() {
        let mut state = state();
        let a = item_on_player(&state, ItemKind::ScoreUp);
        let b = item_on_player(&state, ItemKind::JumpUp);
        let far = Item::new(ItemKind::SpeedUp, Vec2::new(700.0, 200.0), 45.0);
        state.items.extend([a, b, far]);

        let report = resolve_collisions(&mut state);
        assert_eq!(report.collected, vec![ItemKind::JumpUp, ItemKind::ScoreUp]);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].kind, ItemKind::SpeedUp);
        assert_eq!(state.score, 500);
        assert!(state.power_ups.is_active(PowerUp::JumpBoost));
        assert!((state.player.jump_force - -19.5).abs() < 1e-4);
    }

    #[test]
    fn test_oldest_pickup_message_posted_last() {
        let mut state = state();
        let a = item_on_player(&state, ItemKind::SpeedUp);
        let b = item_on_player(&state, ItemKind::ScoreUp);
        state.items.extend([a, b]);

        resolve_collisions(&mut state);
        let texts: Vec<String> = state
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                GameEvent::Message { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["Score up! +500".to_string(), "Speed up!".to_string()]);
    }

    #[test]
    fn test_speed_pickup_boosts_immediately() {
        let mut state = state();
        apply_item(&mut state, ItemKind::SpeedUp, Vec2::ZERO);
        assert_eq!(state.speed, 7.5);
        assert_eq!(state.effects.len(), 20);
        let events = state.drain_events();
        assert_eq!(events[0], GameEvent::Sound(SoundCue::ItemGet));
        assert!(matches!(&events[1], GameEvent::Message { seconds, .. } if *seconds == 7.0));
    }

    #[test]
    fn test_no_collisions_while_sequencing() {
        let mut state = state();
        state.phase = RunPhase::Sequencing { remaining: 30.0 };
        let item = item_on_player(&state, ItemKind::ScoreUp);
        state.items.push(item);
        let report = resolve_collisions(&mut state);
        assert_eq!(report, CollisionReport::default());
        assert_eq!(state.items.len(), 1);
    }
}
