//! Game settings and preferences
//!
//! Persisted as JSON separately from the high score.

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::difficulty::Difficulty;
use crate::platform::KeyValueStore;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tier highlighted when the difficulty dialog opens (last one played)
    pub difficulty: Difficulty,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Visual Effects ===
    /// Confetti on a new high score
    pub confetti: bool,
    /// Milestone banners during a round
    pub milestone_banners: bool,

    // === Accessibility ===
    /// Reduced motion (no confetti)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            master_volume: 0.8,
            sfx_volume: 0.45,
            muted: false,

            confetti: true,
            milestone_banners: true,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Volume actually sent to the speakers
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Effective confetti (respects reduced_motion)
    pub fn effective_confetti(&self) -> bool {
        self.confetti && !self.reduced_motion
    }

    /// Remember the tier the player picked. Returns true if it changed.
    pub fn remember_difficulty(&mut self, difficulty: Difficulty) -> bool {
        let changed = self.difficulty != difficulty;
        self.difficulty = difficulty;
        changed
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.get(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring corrupt settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings (best-effort)
    pub fn save<S: KeyValueStore>(&self, store: &mut S) {
        let json = match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Could not serialize settings: {}", e);
                return;
            }
        };
        match store.set(SETTINGS_KEY, &json) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}
