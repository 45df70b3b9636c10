//! Browser binding
//!
//! The page owns the requestAnimationFrame chain and the 1 Hz interval and
//! forwards both to a [`WebRunner`]. Drawing, sound and HUD updates go back to
//! the page through the callbacks passed to the constructor.

use glam::Vec2;
use js_sys::Function;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::audio::{AudioSink, MusicTrack, SoundCue};
use crate::config::GameConfig;
use crate::hud::{HudSink, HudSnapshot};
use crate::render::{DrawCommand, Renderer};
use crate::run::{FrameOutcome, RunController, RunToken};
use crate::settings::Settings;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Skyline Dash module loaded");
}

/// One frame as handed to the page's `draw_frame` callback
#[derive(Serialize)]
struct FramePayload<'a> {
    shake: Vec2,
    commands: &'a [DrawCommand],
    flash_alpha: f32,
}

/// Page callbacks
struct JsFrontend {
    draw_frame: Function,
    play_sound: Function,
    play_music: Function,
    update_hud: Function,
    run_ended: Function,
    shake: Vec2,
    commands: Vec<DrawCommand>,
}

fn report(result: Result<JsValue, JsValue>, what: &str) {
    if let Err(e) = result {
        log::warn!("{} callback failed: {:?}", what, e);
    }
}

fn to_json<T: Serialize>(value: &T) -> Option<JsValue> {
    match serde_json::to_string(value) {
        Ok(json) => Some(JsValue::from_str(&json)),
        Err(e) => {
            log::warn!("Failed to serialize for the page: {}", e);
            None
        }
    }
}

impl Renderer for JsFrontend {
    fn begin_frame(&mut self, shake: Vec2) {
        self.shake = shake;
        self.commands.clear();
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.commands.push(command.clone());
    }

    fn end_frame(&mut self, flash_alpha: f32) {
        let payload = FramePayload {
            shake: self.shake,
            commands: &self.commands,
            flash_alpha,
        };
        if let Some(json) = to_json(&payload) {
            report(self.draw_frame.call1(&JsValue::NULL, &json), "draw_frame");
        }
    }
}

impl AudioSink for JsFrontend {
    fn play_cue(&mut self, cue: SoundCue, volume: f32) {
        report(
            self.play_sound.call2(
                &JsValue::NULL,
                &JsValue::from_str(cue.asset_name()),
                &JsValue::from_f64(volume as f64),
            ),
            "play_sound",
        );
    }

    fn play_music(&mut self, track: MusicTrack, volume: f32) {
        report(
            self.play_music.call2(
                &JsValue::NULL,
                &JsValue::from_str(track.asset_name()),
                &JsValue::from_f64(volume as f64),
            ),
            "play_music",
        );
    }
}

impl HudSink for JsFrontend {
    fn publish(&mut self, hud: &HudSnapshot) {
        if let Some(json) = to_json(hud) {
            report(self.update_hud.call1(&JsValue::NULL, &json), "update_hud");
        }
    }

    fn run_ended(&mut self, final_score: u64) {
        report(
            self.run_ended
                .call1(&JsValue::NULL, &JsValue::from_f64(final_score as f64)),
            "run_ended",
        );
    }
}

#[wasm_bindgen]
pub struct WebRunner {
    controller: RunController,
    frontend: JsFrontend,
    token: Option<RunToken>,
}

impl WebRunner {
    /// The live token if `id` names it
    fn token_for(&self, id: u32) -> Option<RunToken> {
        self.token.filter(|t| t.id() == id as u64)
    }
}

#[wasm_bindgen]
impl WebRunner {
    #[wasm_bindgen(constructor)]
    pub fn new(
        draw_frame: Function,
        play_sound: Function,
        play_music: Function,
        update_hud: Function,
        run_ended: Function,
    ) -> WebRunner {
        let settings = Settings::load();
        WebRunner {
            controller: RunController::new(GameConfig::default(), settings),
            frontend: JsFrontend {
                draw_frame,
                play_sound,
                play_music,
                update_hud,
                run_ended,
                shake: Vec2::ZERO,
                commands: Vec::new(),
            },
            token: None,
        }
    }

    /// Start a run and return its token id. Any earlier run is cancelled.
    pub fn start(&mut self, now_ms: f64) -> u32 {
        let seed = js_sys::Date::now() as u64;
        let token = self.controller.start(seed, now_ms, &mut self.frontend);
        self.token = Some(token);
        token.id() as u32
    }

    /// requestAnimationFrame callback. Returns whether to schedule another frame.
    pub fn frame(&mut self, token_id: u32, timestamp_ms: f64) -> bool {
        let Some(token) = self.token_for(token_id) else {
            return false;
        };
        let outcome = self.controller.frame(token, timestamp_ms, &mut self.frontend);
        if let FrameOutcome::Ended { final_score } = outcome {
            log::info!("Final score {}", final_score);
            self.token = None;
        }
        outcome.keep_going()
    }

    /// 1 Hz interval callback. Returns false once the interval should be cleared.
    pub fn second_tick(&mut self, token_id: u32) -> bool {
        match self.token_for(token_id) {
            Some(token) => self.controller.second_tick(token),
            None => false,
        }
    }

    pub fn jump(&mut self) {
        self.controller.request_jump();
    }

    /// Back to the title screen
    pub fn cancel(&mut self) {
        self.token = None;
        self.controller.enter_menu(&mut self.frontend);
    }

    /// Current HUD values as JSON, or undefined with no live run
    pub fn hud(&self) -> Option<String> {
        self.controller
            .hud()
            .and_then(|hud| serde_json::to_string(&hud).ok())
    }

    pub fn last_final_score(&self) -> Option<f64> {
        self.controller.last_final_score().map(|s| s as f64)
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        self.controller
            .settings()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Replace and persist settings
    pub fn set_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings = Settings::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        settings.save();
        self.controller.set_settings(settings);
        Ok(())
    }
}
