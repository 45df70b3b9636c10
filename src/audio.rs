//! Audio capability
//!
//! The simulation only names cues; an [`AudioSink`] supplied by the host does the
//! actual playback. Playback is fire-and-forget: a sink that cannot play a cue
//! (missing asset, blocked autoplay) simply drops it.

use serde::{Deserialize, Serialize};

use crate::consts::MUSIC_VOLUME;
use crate::settings::Settings;

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Player jumped
    Jump,
    /// Item picked up
    ItemGet,
    /// Fatal hit or time up
    GameOver,
    /// Run started
    GameStart,
}

impl SoundCue {
    /// Asset name the host uses to look the sound up
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::ItemGet => "item_get",
            SoundCue::GameOver => "game_over",
            SoundCue::GameStart => "game_start",
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    Menu,
    Game,
}

impl MusicTrack {
    pub fn asset_name(&self) -> &'static str {
        match self {
            MusicTrack::Menu => "bgm_menu",
            MusicTrack::Game => "bgm_game",
        }
    }
}

/// Host-side playback
pub trait AudioSink {
    /// Play a cue once from the start
    fn play_cue(&mut self, cue: SoundCue, volume: f32);
    /// Stop the current loop and start `track` looping
    fn play_music(&mut self, track: MusicTrack, volume: f32);
}

/// Volume mixing and music switching in front of a sink
#[derive(Debug, Clone)]
pub struct AudioManager {
    current_music: Option<MusicTrack>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AudioManager {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            current_music: None,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn current_music(&self) -> Option<MusicTrack> {
        self.current_music
    }

    fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            MUSIC_VOLUME * self.master_volume * self.music_volume
        }
    }

    /// Play a one-shot cue
    pub fn play(&self, sink: &mut dyn AudioSink, cue: SoundCue) {
        let vol = self.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        sink.play_cue(cue, vol);
    }

    /// Switch the background loop; asking for the track already playing is a no-op
    pub fn switch_music(&mut self, sink: &mut dyn AudioSink, track: MusicTrack) {
        if self.current_music == Some(track) {
            return;
        }
        self.current_music = Some(track);
        log::debug!("Music -> {}", track.asset_name());
        sink.play_music(track, self.effective_music_volume());
    }
}
