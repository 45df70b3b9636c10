//! Skyline Dash - headless demo
//!
//! Plays one run on a synthetic 60 Hz clock with the autopilot and logs what
//! happens. The browser build is driven from the page through `web::WebRunner`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use skyline_dash::audio::{AudioSink, MusicTrack, SoundCue};
    use skyline_dash::consts::{FRAME_MS, FRAMES_PER_SECOND};
    use skyline_dash::hud::{HudSink, HudSnapshot, final_score_count_up};
    use skyline_dash::render::{DrawCommand, Renderer};
    use skyline_dash::sim::autopilot;
    use skyline_dash::{FrameOutcome, GameConfig, RunController, Settings};

    /// Logs instead of drawing or playing anything
    #[derive(Default)]
    struct LogFrontend {
        draw_calls: u64,
        last_message: Option<String>,
    }

    impl Renderer for LogFrontend {
        fn begin_frame(&mut self, _shake: Vec2) {}

        fn draw(&mut self, _command: &DrawCommand) {
            self.draw_calls += 1;
        }

        fn end_frame(&mut self, _flash_alpha: f32) {}
    }

    impl AudioSink for LogFrontend {
        fn play_cue(&mut self, cue: SoundCue, volume: f32) {
            log::debug!("Sound {} @ {:.2}", cue.asset_name(), volume);
        }

        fn play_music(&mut self, track: MusicTrack, volume: f32) {
            log::info!("Music {} @ {:.2}", track.asset_name(), volume);
        }
    }

    impl HudSink for LogFrontend {
        fn publish(&mut self, hud: &HudSnapshot) {
            if hud.effect_message != self.last_message {
                if let Some(message) = &hud.effect_message {
                    log::info!("[{:>2}s] {} (score {})", hud.timer, message, hud.score);
                }
                self.last_message = hud.effect_message.clone();
            }
        }

        fn run_ended(&mut self, final_score: u64) {
            let shown: Vec<u64> = final_score_count_up(final_score).collect();
            log::info!(
                "Final score {} (counted up over {} frames)",
                final_score,
                shown.len()
            );
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let seed = match std::env::args().nth(1) {
            Some(arg) => match arg.parse::<u64>() {
                Ok(seed) => seed,
                Err(e) => {
                    log::error!("Invalid seed {:?}: {}", arg, e);
                    std::process::exit(2);
                }
            },
            None => rand::random(),
        };

        let config = match std::env::var("SKYLINE_DASH_CONFIG") {
            Ok(path) => GameConfig::load(path),
            Err(_) => GameConfig::default(),
        };
        let settings = match std::env::var("SKYLINE_DASH_SETTINGS") {
            Ok(path) => Settings::load_from(path),
            Err(_) => Settings::default(),
        };

        log::info!("Skyline Dash (headless) starting with seed {}", seed);

        let mut controller = RunController::new(config, settings);
        let mut frontend = LogFrontend::default();
        let mut now = 0.0;
        let token = controller.start(seed, now, &mut frontend);

        let frames_per_second = FRAMES_PER_SECOND as u64;
        let mut frame: u64 = 0;
        loop {
            frame += 1;
            now += FRAME_MS;
            if controller.state().is_some_and(autopilot::should_jump) {
                controller.request_jump();
            }
            let outcome = controller.frame(token, now, &mut frontend);
            if let FrameOutcome::Ended { final_score } = outcome {
                log::info!(
                    "Run over after {} frames, {} draw calls, score {}",
                    frame,
                    frontend.draw_calls,
                    final_score
                );
                break;
            }
            if !outcome.keep_going() {
                log::warn!("Run stopped unexpectedly ({:?})", outcome);
                break;
            }
            if frame % frames_per_second == 0 {
                controller.second_tick(token);
            }
        }

        controller.enter_menu(&mut frontend);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::init, this is just to satisfy the compiler
}
