//! Player settings and preferences
//!
//! Persisted inside the save record next to the highscores.

use serde::{Deserialize, Serialize};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub fullscreen: bool,
    /// Integer scaling only
    pub pixel_perfect: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Progress ===
    /// Skip the tutorial on new sessions
    pub tutorial_done: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fullscreen: false,
            pixel_perfect: false,
            master_volume: 1.0,
            music_volume: 1.0,
            sfx_volume: 1.0,
            tutorial_done: false,
        }
    }
}

impl Settings {
    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Gain applied to a sound effect of base `volume`
    pub fn effective_sfx_volume(&self, volume: f32) -> f32 {
        (self.master_volume * self.sfx_volume * volume).clamp(0.0, 1.0)
    }
}
