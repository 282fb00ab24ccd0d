//! Audio collaborator interface
//!
//! The core never plays sound itself. It fires named cues at an injected
//! [`AudioSink`]; a failing sink degrades audio only and never the tick.

use std::path::PathBuf;

use crate::error::{GameError, GameResult};

/// Audio cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Start looping background music
    MusicStart,
    /// Stop background music
    MusicStop,
    /// Speed boost collected
    SpeedBoost,
    /// Slow enemies collected
    SlowPowerUp,
    /// Shield collected
    ShieldPowerUp,
    /// Player destroyed
    GameOver,
    /// Player explosion
    Explosion,
}

impl AudioCue {
    /// Asset name the host resolves to a sound file
    pub fn asset_name(&self) -> &'static str {
        match self {
            AudioCue::MusicStart | AudioCue::MusicStop => "game_music",
            AudioCue::SpeedBoost => "speed_boost",
            AudioCue::SlowPowerUp => "slow_powerup",
            AudioCue::ShieldPowerUp => "shield_powerup",
            AudioCue::GameOver => "game_over",
            AudioCue::Explosion => "explosion",
        }
    }

    pub fn is_music(&self) -> bool {
        matches!(self, AudioCue::MusicStart | AudioCue::MusicStop)
    }
}

/// Receiver of audio cues
pub trait AudioSink {
    /// Volumes from settings, sent once before the first cue
    fn set_volumes(&mut self, music: f32, sfx: f32);

    /// Fire a cue. Errors are logged by the caller and otherwise ignored.
    fn play(&mut self, cue: AudioCue) -> GameResult<()>;
}

/// Sink that drops every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn set_volumes(&mut self, _music: f32, _sfx: f32) {}

    fn play(&mut self, _cue: AudioCue) -> GameResult<()> {
        Ok(())
    }
}

/// Sink that logs cues, used by the headless runner.
///
/// With an asset directory set, a cue whose `<name>.mp3` is absent reports
/// [`GameError::ResourceMissing`].
#[derive(Debug, Default)]
pub struct LogAudio {
    music_volume: f32,
    sfx_volume: f32,
    muted: bool,
    music_playing: bool,
    asset_dir: Option<PathBuf>,
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            music_volume: 0.1,
            sfx_volume: 1.0,
            ..Default::default()
        }
    }

    /// Check cues against sound files in `dir`
    pub fn with_asset_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = Some(dir.into());
        self
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }

    fn effective_volume(&self, cue: AudioCue) -> f32 {
        if self.muted {
            0.0
        } else if cue.is_music() {
            self.music_volume
        } else {
            self.sfx_volume
        }
    }
}

impl AudioSink for LogAudio {
    fn set_volumes(&mut self, music: f32, sfx: f32) {
        self.music_volume = music;
        self.sfx_volume = sfx;
    }

    fn play(&mut self, cue: AudioCue) -> GameResult<()> {
        let name = cue.asset_name();
        if let Some(dir) = &self.asset_dir {
            let file = format!("{name}.mp3");
            if !dir.join(&file).is_file() {
                return Err(GameError::ResourceMissing { name: file });
            }
        }
        match cue {
            AudioCue::MusicStart => self.music_playing = true,
            AudioCue::MusicStop => self.music_playing = false,
            _ => {}
        }
        log::debug!(
            "audio: {:?} ({}) at volume {:.2}",
            cue,
            name,
            self.effective_volume(cue)
        );
        Ok(())
    }
}
