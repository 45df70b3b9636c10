//! Variable timestep simulation tick
//!
//! One call per display refresh with the frame's Δt (1.0 = one 60 Hz frame).
//! The run timer is driven separately by [`second_tick`] once per real second.

use super::clock::is_valid_dt;
use super::collision::resolve_collisions;
use super::entities::{Afterimage, advance_all};
use super::game_over;
use super::powerups::PowerUp;
use super::spawn::manage_spawning;
use super::state::{RunPhase, SimulationState};
use crate::consts::{AFTERIMAGE_INTERVAL, AFTERIMAGE_LIFE};

/// Seconds an expiry message stays up
const EXPIRY_MESSAGE_SECONDS: f32 = 2.0;

/// Advance the run by one frame
pub fn update(state: &mut SimulationState, dt: f32) {
    if !is_valid_dt(dt) {
        return;
    }

    match state.phase {
        RunPhase::Ended => return,
        RunPhase::Sequencing { .. } => {
            state.frame_count += 1;
            game_over::advance_sequence(state, dt);
            advance_all(&mut state.effects, 0.0, dt);
            return;
        }
        RunPhase::Running => {}
    }

    state.frame_count += 1;

    // Speed trail
    if state.power_ups.is_active(PowerUp::SpeedBoost)
        && state.frame_count % AFTERIMAGE_INTERVAL == 0
    {
        state.afterimages.push(Afterimage {
            pos: state.player.pos,
            size: state.player.size,
            life: AFTERIMAGE_LIFE,
        });
    }
    advance_all(&mut state.afterimages, state.speed, dt);

    state.background_scroll_x -= state.speed * 0.5 * dt;
    state.ground_scroll_x -= state.speed * dt;
    state.base_speed += state.config.speed_increment * (dt / 60.0);
    state.speed = state.target_speed();

    state.player.update(dt);
    let speed = state.speed;
    advance_all(&mut state.obstacles, speed, dt);
    advance_all(&mut state.items, speed, dt);
    advance_all(&mut state.effects, 0.0, dt);

    manage_spawning(state, dt);
    resolve_collisions(state);
    update_power_ups(state, dt);

    state.score += dt.round() as u64;
}

/// Count power-ups down and revert whatever expired this frame
fn update_power_ups(state: &mut SimulationState, dt: f32) {
    for expired in state.power_ups.tick(dt) {
        match expired {
            PowerUp::Invincibility => {}
            PowerUp::SpeedBoost => state.speed = state.base_speed,
            PowerUp::JumpBoost => state.player.reset_jump_force(),
        }
        state.message(expired.expired_message(), EXPIRY_MESSAGE_SECONDS);
        log::debug!("{:?} expired", expired);
    }
}

/// One real second elapsed. Counts the run timer down and finishes the run at
/// zero; does nothing unless the run is in normal play.
pub fn second_tick(state: &mut SimulationState) {
    if !state.is_running() {
        return;
    }
    state.timer = state.timer.saturating_sub(1);
    if state.timer == 0 {
        log::info!("Time up");
        game_over::complete_run(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::entities::{Obstacle, ObstacleKind};
    use crate::sim::state::GameEvent;
    use proptest::prelude::*;

    fn state(seed: u64) -> SimulationState {
        SimulationState::new(GameConfig::default(), seed)
    }

    /// Obstacles cannot end the run for the next 300 frames
    fn with_invincibility(state: &mut SimulationState) {
        let config = state.config.clone();
        state.power_ups.activate(&config, PowerUp::Invincibility);
    }

    #[test]
    fn test_invalid_dt_skips_frame() {
        let mut s = state(5);
        for _ in 0..30 {
            update(&mut s, 1.0);
        }
        let before = s.clone();
        for dt in [0.0, -1.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            update(&mut s, dt);
            assert_eq!(s, before);
        }
    }

    #[test]
    fn test_frame_advances_world() {
        let mut s = state(5);
        update(&mut s, 1.0);
        assert_eq!(s.frame_count, 1);
        assert_eq!(s.score, 1);
        assert_eq!(s.ground_scroll_x, -5.0);
        assert_eq!(s.background_scroll_x, -2.5);
        assert!(s.base_speed > 5.0);
        assert_eq!(s.speed, s.base_speed);
    }

    #[test]
    fn test_score_rounds_dt() {
        let mut s = state(5);
        update(&mut s, 2.4);
        assert_eq!(s.score, 2);
        update(&mut s, 0.4);
        assert_eq!(s.score, 2);
    }

    #[test]
    fn test_determinism() {
        let mut a = state(424242);
        let mut b = state(424242);
        for frame in 0..900 {
            if frame % 37 == 0 {
                a.request_jump();
                b.request_jump();
            }
            update(&mut a, 1.0);
            update(&mut b, 1.0);
            if frame % 60 == 59 {
                second_tick(&mut a);
                second_tick(&mut b);
            }
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_invincibility_lasts_exactly_300_frames() {
        let mut s = state(11);
        with_invincibility(&mut s);
        for frame in 0..300 {
            assert!(s.power_ups.is_active(PowerUp::Invincibility), "frame {frame}");
            let o = Obstacle::on_ground(ObstacleKind::Low, s.player.pos.x, s.ground_y);
            s.obstacles.push(o);
            update(&mut s, 1.0);
            assert!(s.is_running());
        }
        assert_eq!(s.power_ups.remaining(PowerUp::Invincibility), 0.0);
        assert!(s.drain_events().iter().any(
            |e| matches!(e, GameEvent::Message { text, .. } if text == "Invincibility ended")
        ));

        s.obstacles.clear();
        let o = Obstacle::on_ground(ObstacleKind::Low, s.player.pos.x, s.ground_y);
        s.obstacles.push(o);
        update(&mut s, 1.0);
        assert!(s.is_sequencing());
    }

    #[test]
    fn test_speed_boost_trail_and_revert() {
        let mut s = state(3);
        let config = s.config.clone();
        s.power_ups.activate(&config, PowerUp::SpeedBoost);
        for _ in 0..8 {
            update(&mut s, 1.0);
        }
        assert_eq!(s.afterimages.len(), 2);
        assert!((s.speed - s.base_speed * 1.5).abs() < 1e-4);

        s.power_ups.speed_boost = 0.5;
        update(&mut s, 1.0);
        assert_eq!(s.speed, s.base_speed);
        assert!(!s.power_ups.is_active(PowerUp::SpeedBoost));
    }

    #[test]
    fn test_jump_boost_expiry_restores_force() {
        let mut s = state(3);
        let config = s.config.clone();
        s.power_ups.activate(&config, PowerUp::JumpBoost);
        s.player.boost_jump(config.jump_up_multiplier);
        s.power_ups.jump_boost = 1.0;
        update(&mut s, 1.0);
        assert_eq!(s.player.jump_force, s.player.base_jump_force());
    }

    #[test]
    fn test_timer_completion_awards_bonus() {
        let mut s = state(8);
        s.timer = 1;
        s.score = 40;
        second_tick(&mut s);
        assert_eq!(s.timer, 0);
        assert_eq!(s.score, 40 + 2500);
        assert!(s.is_sequencing());

        // Frozen world, only effects move
        let obstacles = s.obstacles.clone();
        let score = s.score;
        update(&mut s, 1.0);
        assert_eq!(s.obstacles, obstacles);
        assert_eq!(s.score, score);

        // Timer does not tick again
        second_tick(&mut s);
        assert_eq!(s.score, score);
    }

    #[test]
    fn test_sequence_runs_to_end() {
        let mut s = state(8);
        game_over::trigger(&mut s);
        s.drain_events();
        let mut frames = 0;
        while !s.is_ended() {
            update(&mut s, 1.0);
            frames += 1;
            assert!(frames <= 45);
        }
        assert_eq!(frames, 45);
        assert_eq!(s.drain_events(), vec![GameEvent::RunEnded { final_score: s.score }]);

        let ended = s.clone();
        update(&mut s, 1.0);
        assert_eq!(s, ended);
    }

    proptest! {
        #[test]
        fn prop_invalid_dt_is_noop(seed in any::<u64>(), dt in prop_oneof![
            Just(f32::NAN),
            Just(f32::INFINITY),
            Just(0.0f32),
            -1000.0f32..=0.0,
        ]) {
            let mut s = state(seed);
            update(&mut s, 1.0);
            let before = s.clone();
            update(&mut s, dt);
            prop_assert_eq!(s, before);
        }

        #[test]
        fn prop_player_stays_above_ground(
            seed in any::<u64>(),
            frames in prop::collection::vec((0.2f32..3.0, any::<bool>()), 1..300)
        ) {
            let mut s = state(seed);
            with_invincibility(&mut s);
            for (dt, jump) in frames {
                if jump {
                    s.request_jump();
                }
                update(&mut s, dt);
                prop_assert!(s.player.pos.y <= s.ground_y - s.player.size.y);
                prop_assert!(s.speed >= s.base_speed);
            }
        }
    }
}
