//! Demo autopilot
//!
//! A crude jump heuristic good enough to play long runs headless. It only reads
//! the state; the caller issues the jump.

use super::entities::{Entity, ObstacleKind};
use super::state::SimulationState;

/// How far ahead to react, in frames of closing distance
const REACTION_FRAMES: f32 = 12.0;

/// Whether the autopilot wants to jump this frame
pub fn should_jump(state: &SimulationState) -> bool {
    if !state.is_running() || state.player.jumps_left == 0 {
        return false;
    }

    let player = state.player.bounds();
    let grounded = state.player.is_grounded();

    state.obstacles.iter().any(|o| {
        let bounds = o.bounds();
        if o.kind == ObstacleKind::Falling && bounds.bottom() < player.y {
            return false;
        }
        let closing = state.speed - o.vel.x;
        let gap = bounds.x - player.right();
        if grounded {
            (0.0..=closing * REACTION_FRAMES).contains(&gap)
        } else {
            // Second jump when coming down on top of something
            state.player.vel_y > 0.0
                && gap < closing * 2.0
                && bounds.right() > player.x
                && player.bottom() > bounds.y - 20.0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::entities::Obstacle;
    use crate::sim::tick::{second_tick, update};

    fn state() -> SimulationState {
        SimulationState::new(GameConfig::default(), 2024)
    }

    #[test]
    fn test_idle_on_empty_track() {
        assert!(!should_jump(&state()));
    }

    #[test]
    fn test_jumps_for_near_obstacle() {
        let mut s = state();
        let x = s.player.bounds().right() + 30.0;
        s.obstacles.push(Obstacle::on_ground(ObstacleKind::Low, x, s.ground_y));
        assert!(should_jump(&s));
    }

    #[test]
    fn test_ignores_far_obstacle() {
        let mut s = state();
        s.obstacles.push(Obstacle::on_ground(ObstacleKind::Low, 800.0, s.ground_y));
        assert!(!should_jump(&s));
    }

    #[test]
    fn test_ignores_obstacle_behind() {
        let mut s = state();
        s.obstacles.push(Obstacle::on_ground(ObstacleKind::Low, 0.0, s.ground_y));
        assert!(!should_jump(&s));
    }

    #[test]
    fn test_survives_warmup() {
        // Warmup band only spawns single low obstacles
        let mut s = state();
        for frame in 0..(15 * 60) {
            if should_jump(&s) {
                s.request_jump();
            }
            update(&mut s, 1.0);
            if frame % 60 == 59 {
                second_tick(&mut s);
            }
        }
        assert!(s.is_running());
        assert_eq!(s.timer, 45);
    }
}
