//! Game-over sequencing
//!
//! `Running -> Sequencing -> Ended`. While sequencing only visual effects keep
//! moving; shake and flash fade out with the countdown.

use super::particles;
use super::state::{GameEvent, RunPhase, SimulationState};
use crate::audio::{MusicTrack, SoundCue};

/// Enter the game-over sequence. Returns false (and does nothing) if the run is
/// already sequencing or over.
pub fn trigger(state: &mut SimulationState) -> bool {
    if !state.is_running() {
        return false;
    }

    state.emit(GameEvent::Music(MusicTrack::Menu));
    state.emit(GameEvent::Sound(SoundCue::GameOver));
    state.phase = RunPhase::Sequencing {
        remaining: state.config.game_over_duration,
    };
    let sparks = particles::collision_sparks(&mut state.rng, state.player.center());
    state.spawn_effects(sparks);
    log::info!("Game over sequence started (score {})", state.score);
    true
}

/// Count the sequence down. Returns true once the run has ended.
pub fn advance_sequence(state: &mut SimulationState, dt: f32) -> bool {
    let RunPhase::Sequencing { remaining } = state.phase else {
        return state.is_ended();
    };

    let remaining = remaining - dt;
    if remaining <= 0.0 {
        state.phase = RunPhase::Ended;
        let final_score = state.score;
        state.emit(GameEvent::RunEnded { final_score });
        log::info!("Run ended with final score {}", final_score);
        true
    } else {
        state.phase = RunPhase::Sequencing { remaining };
        false
    }
}

/// Timer ran out: award the completion bonus, then sequence
pub fn complete_run(state: &mut SimulationState) {
    if !state.is_running() {
        return;
    }
    let bonus = state.config.completion_bonus;
    state.score += bonus;
    state.message(format!("Finish bonus +{bonus}!"), 3.0);
    trigger(state);
}

/// Frames left in the sequence (0 outside of it)
pub fn remaining(state: &SimulationState) -> f32 {
    match state.phase {
        RunPhase::Sequencing { remaining } => remaining.max(0.0),
        _ => 0.0,
    }
}

/// Max shake offset in pixels
pub fn shake_magnitude(state: &SimulationState) -> f32 {
    remaining(state) / 3.0
}

/// Red overlay opacity
pub fn flash_alpha(state: &SimulationState) -> f32 {
    let duration = state.config.game_over_duration;
    if duration <= 0.0 {
        return 0.0;
    }
    (remaining(state) / duration).max(0.0) * 0.7
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn state() -> SimulationState {
        SimulationState::new(GameConfig::default(), 99)
    }

    #[test]
    fn test_trigger_emits_once() {
        let mut state = state();
        assert!(trigger(&mut state));
        assert_eq!(state.effects.len(), 30);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::Music(MusicTrack::Menu),
                GameEvent::Sound(SoundCue::GameOver)
            ]
        );

        advance_sequence(&mut state, 10.0);
        assert_eq!(remaining(&state), 35.0);

        // Second trigger changes nothing
        assert!(!trigger(&mut state));
        assert_eq!(remaining(&state), 35.0);
        assert_eq!(state.effects.len(), 30);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_sequence_ends_run() {
        let mut state = state();
        state.score = 1234;
        trigger(&mut state);
        state.drain_events();

        for _ in 0..44 {
            assert!(!advance_sequence(&mut state, 1.0));
        }
        assert!(advance_sequence(&mut state, 1.0));
        assert!(state.is_ended());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::RunEnded { final_score: 1234 }]
        );
        assert!(!trigger(&mut state));
    }

    #[test]
    fn test_completion_bonus() {
        let mut state = state();
        state.score = 100;
        complete_run(&mut state);
        assert_eq!(state.score, 2600);
        assert!(state.is_sequencing());
        let events = state.drain_events();
        assert!(matches!(
            &events[0],
            GameEvent::Message { text, seconds } if text == "Finish bonus +2500!" && *seconds == 3.0
        ));

        // No double bonus
        complete_run(&mut state);
        assert_eq!(state.score, 2600);
    }

    #[test]
    fn test_shake_and_flash_fade() {
        let mut state = state();
        assert_eq!(shake_magnitude(&state), 0.0);
        assert_eq!(flash_alpha(&state), 0.0);
        trigger(&mut state);
        assert_eq!(shake_magnitude(&state), 15.0);
        assert!((flash_alpha(&state) - 0.7).abs() < 1e-6);
        advance_sequence(&mut state, 22.5);
        assert!((flash_alpha(&state) - 0.35).abs() < 1e-6);
    }
}
