//! Run controller
//!
//! Owns at most one run. The host drives two tasks against it: a per-refresh
//! [`RunController::frame`] and a 1 Hz [`RunController::second_tick`]. Both
//! carry the [`RunToken`] handed out by [`RunController::start`]; a call with a
//! token from a cancelled or finished run does nothing.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioManager, AudioSink, MusicTrack, SoundCue};
use crate::config::GameConfig;
use crate::hud::{EffectMessageBoard, HudSink, HudSnapshot};
use crate::render::{self, Renderer};
use crate::settings::Settings;
use crate::sim::clock::Clock;
use crate::sim::state::{GameEvent, SimulationState};
use crate::sim::tick;

/// Everything a host provides to present a run
pub trait Frontend: Renderer + AudioSink + HudSink {}

impl<T: Renderer + AudioSink + HudSink> Frontend for T {}

/// Identifies one run; tokens are never reused within a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RunToken(u64);

impl RunToken {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// What a frame call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Token does not belong to the live run; nothing happened
    Stale,
    /// Bad timestamp; the frame was drawn but the simulation did not advance
    Skipped,
    /// Simulated and drawn; schedule the next frame
    Continue,
    /// The run just ended; no further frames will be accepted
    Ended { final_score: u64 },
}

impl FrameOutcome {
    /// Whether the host should schedule another frame
    pub fn keep_going(&self) -> bool {
        matches!(self, FrameOutcome::Skipped | FrameOutcome::Continue)
    }
}

/// Salt so the presentation shake never mirrors the simulation RNG stream
const SHAKE_SEED_SALT: u64 = 0x5eed_5a4e;

struct ActiveRun {
    token: RunToken,
    state: SimulationState,
    clock: Clock,
    messages: EffectMessageBoard,
    shake_rng: Pcg32,
}

pub struct RunController {
    config: GameConfig,
    settings: Settings,
    audio: AudioManager,
    next_token: u64,
    run: Option<ActiveRun>,
    last_final_score: Option<u64>,
}

impl RunController {
    pub fn new(config: GameConfig, settings: Settings) -> Self {
        let audio = AudioManager::from_settings(&settings);
        Self {
            config,
            settings,
            audio,
            next_token: 1,
            run: None,
            last_final_score: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.audio.set_master_volume(settings.master_volume);
        self.audio.set_sfx_volume(settings.sfx_volume);
        self.audio.set_music_volume(settings.music_volume);
        self.settings = settings;
    }

    /// Start a fresh run, cancelling any run already in progress
    pub fn start(&mut self, seed: u64, now_ms: f64, audio: &mut dyn AudioSink) -> RunToken {
        if self.cancel() {
            log::info!("Restart cancelled the previous run");
        }

        let token = RunToken(self.next_token);
        self.next_token += 1;
        self.run = Some(ActiveRun {
            token,
            state: SimulationState::new(self.config.clone(), seed),
            clock: Clock::start(now_ms),
            messages: EffectMessageBoard::default(),
            shake_rng: Pcg32::seed_from_u64(seed ^ SHAKE_SEED_SALT),
        });
        self.last_final_score = None;

        self.audio.play(audio, SoundCue::GameStart);
        self.audio.switch_music(audio, MusicTrack::Game);
        log::info!("Run {} started with seed {}", token.0, seed);
        token
    }

    /// Drop the live run. Returns whether there was one.
    pub fn cancel(&mut self) -> bool {
        match self.run.take() {
            Some(run) => {
                log::info!("Run {} cancelled", run.token.0);
                true
            }
            None => false,
        }
    }

    /// Leave the game screen: cancel the run and go back to menu music
    pub fn enter_menu(&mut self, audio: &mut dyn AudioSink) {
        self.cancel();
        self.audio.switch_music(audio, MusicTrack::Menu);
    }

    pub fn is_current(&self, token: RunToken) -> bool {
        self.run.as_ref().is_some_and(|run| run.token == token)
    }

    pub fn state(&self) -> Option<&SimulationState> {
        self.run.as_ref().map(|run| &run.state)
    }

    /// Score of the most recently finished run
    pub fn last_final_score(&self) -> Option<u64> {
        self.last_final_score
    }

    pub fn hud(&self) -> Option<HudSnapshot> {
        self.run
            .as_ref()
            .map(|run| HudSnapshot::capture(&run.state, &run.messages))
    }

    /// Jump input; ignored when no run is live or the run is not in normal play
    pub fn request_jump(&mut self) {
        if let Some(run) = &mut self.run {
            run.state.request_jump();
        }
    }

    /// 1 Hz timer task
    pub fn second_tick(&mut self, token: RunToken) -> bool {
        match &mut self.run {
            Some(run) if run.token == token => {
                tick::second_tick(&mut run.state);
                true
            }
            _ => false,
        }
    }

    /// Per-refresh task: simulate, dispatch side effects, present
    pub fn frame<F: Frontend>(
        &mut self,
        token: RunToken,
        now_ms: f64,
        frontend: &mut F,
    ) -> FrameOutcome {
        let Some(run) = self.run.as_mut().filter(|run| run.token == token) else {
            return FrameOutcome::Stale;
        };

        let dt = run.clock.tick(now_ms);
        if let Some(dt) = dt {
            tick::update(&mut run.state, dt);
            run.messages.tick(dt);
        }

        let mut final_score = None;
        for event in run.state.drain_events() {
            match event {
                GameEvent::Sound(cue) => self.audio.play(frontend, cue),
                GameEvent::Music(track) => self.audio.switch_music(frontend, track),
                GameEvent::Message { text, seconds } => run.messages.post(text, seconds),
                GameEvent::RunEnded { final_score: score } => final_score = Some(score),
            }
        }

        let frame = render::compose(&run.state, &self.settings, &mut run.shake_rng);
        render::present(&frame, frontend);
        frontend.publish(&HudSnapshot::capture(&run.state, &run.messages));

        if let Some(score) = final_score {
            self.run = None;
            self.last_final_score = Some(score);
            frontend.run_ended(score);
            return FrameOutcome::Ended { final_score: score };
        }

        if dt.is_some() {
            FrameOutcome::Continue
        } else {
            FrameOutcome::Skipped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_MS;
    use crate::render::DrawCommand;
    use crate::sim::autopilot;
    use glam::Vec2;

    #[derive(Default)]
    struct Host {
        frames: u32,
        draws: usize,
        cues: Vec<SoundCue>,
        music: Vec<MusicTrack>,
        huds: Vec<HudSnapshot>,
        ended: Vec<u64>,
    }

    impl Renderer for Host {
        fn begin_frame(&mut self, _shake: Vec2) {
            self.frames += 1;
        }
        fn draw(&mut self, _command: &DrawCommand) {
            self.draws += 1;
        }
        fn end_frame(&mut self, _flash_alpha: f32) {}
    }

    impl AudioSink for Host {
        fn play_cue(&mut self, cue: SoundCue, _volume: f32) {
            self.cues.push(cue);
        }
        fn play_music(&mut self, track: MusicTrack, _volume: f32) {
            self.music.push(track);
        }
    }

    impl HudSink for Host {
        fn publish(&mut self, hud: &HudSnapshot) {
            self.huds.push(hud.clone());
        }
        fn run_ended(&mut self, final_score: u64) {
            self.ended.push(final_score);
        }
    }

    fn controller() -> RunController {
        RunController::new(GameConfig::default(), Settings::default())
    }

    #[test]
    fn test_start_plays_cue_and_music() {
        let mut rc = controller();
        let mut host = Host::default();
        let token = rc.start(1, 0.0, &mut host);
        assert!(rc.is_current(token));
        assert_eq!(host.cues, vec![SoundCue::GameStart]);
        assert_eq!(host.music, vec![MusicTrack::Game]);
    }

    #[test]
    fn test_restart_invalidates_old_token() {
        let mut rc = controller();
        let mut host = Host::default();
        let old = rc.start(1, 0.0, &mut host);
        let new = rc.start(2, 0.0, &mut host);
        assert_ne!(old, new);

        assert_eq!(rc.frame(old, FRAME_MS, &mut host), FrameOutcome::Stale);
        assert!(!rc.second_tick(old));
        assert_eq!(host.frames, 0);
        assert_eq!(rc.state().map(|s| s.timer), Some(60));

        assert_eq!(rc.frame(new, FRAME_MS, &mut host), FrameOutcome::Continue);
        assert_eq!(host.frames, 1);
        // Two backdrops and the player at least
        assert!(host.draws >= 3);
        // Music was already the game track
        assert_eq!(host.music, vec![MusicTrack::Game]);
    }

    #[test]
    fn test_cancel_halts_both_tasks() {
        let mut rc = controller();
        let mut host = Host::default();
        let token = rc.start(1, 0.0, &mut host);
        rc.frame(token, FRAME_MS, &mut host);

        rc.enter_menu(&mut host);
        assert!(rc.state().is_none());
        assert_eq!(rc.frame(token, 2.0 * FRAME_MS, &mut host), FrameOutcome::Stale);
        assert!(!rc.second_tick(token));
        assert_eq!(host.frames, 1);
        assert_eq!(host.music, vec![MusicTrack::Game, MusicTrack::Menu]);
        assert!(!rc.cancel());
    }

    #[test]
    fn test_bad_timestamp_draws_without_simulating() {
        let mut rc = controller();
        let mut host = Host::default();
        let token = rc.start(1, 1000.0, &mut host);
        assert_eq!(rc.frame(token, 1000.0, &mut host), FrameOutcome::Skipped);
        assert_eq!(rc.frame(token, f64::NAN, &mut host), FrameOutcome::Skipped);
        assert_eq!(host.frames, 2);
        assert_eq!(rc.state().map(|s| s.frame_count), Some(0));
        assert!(FrameOutcome::Skipped.keep_going());
    }

    #[test]
    fn test_jump_sound_reaches_host() {
        let mut rc = controller();
        let mut host = Host::default();
        let token = rc.start(1, 0.0, &mut host);
        rc.request_jump();
        rc.frame(token, FRAME_MS, &mut host);
        assert_eq!(host.cues, vec![SoundCue::GameStart, SoundCue::Jump]);
    }

    #[test]
    fn test_full_run_reports_final_score_once() {
        let mut rc = controller();
        let mut host = Host::default();
        let token = rc.start(7, 0.0, &mut host);

        let mut now = 0.0;
        let mut outcome = FrameOutcome::Continue;
        for frame in 1..=(70 * 60) {
            now += FRAME_MS;
            if rc.state().is_some_and(autopilot::should_jump) {
                rc.request_jump();
            }
            outcome = rc.frame(token, now, &mut host);
            if !outcome.keep_going() {
                break;
            }
            if frame % 60 == 0 {
                rc.second_tick(token);
            }
        }

        let FrameOutcome::Ended { final_score } = outcome else {
            panic!("run did not end: {outcome:?}");
        };
        assert_eq!(host.ended, vec![final_score]);
        assert_eq!(rc.last_final_score(), Some(final_score));
        assert!(host.cues.contains(&SoundCue::GameOver));
        assert_eq!(host.music.last(), Some(&MusicTrack::Menu));
        assert!(rc.state().is_none());
        assert_eq!(rc.frame(token, now + FRAME_MS, &mut host), FrameOutcome::Stale);
        assert_eq!(host.huds.last().map(|h| h.score), Some(final_score));
    }
}
