//! Water Quest - a 3x3 reaction game
//!
//! Core modules:
//! - `game`: Round state machine, spawn scheduling, timers (pure, seeded)
//! - `difficulty`: Per-tier tuning table
//! - `highscore`: Best score persistence
//! - `platform`: Browser/native storage abstraction
//! - `present`: Presentation and sound contracts fed by game events
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod difficulty;
pub mod game;
pub mod highscore;
pub mod platform;
pub mod present;
pub mod settings;

pub use difficulty::{Difficulty, DifficultyProfile, resolve};
pub use game::{GameEvent, IconId, IconKind, Input, RoundController, RoundPhase};
pub use highscore::HighScoreStore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Collectibles needed to "fill the well" (also a milestone)
    pub const GOAL_CANS: u32 = 25;

    /// Grid dimensions
    pub const GRID_SIZE: usize = 3;
    pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;

    /// Countdown tick period in milliseconds
    pub const COUNTDOWN_INTERVAL_MS: u64 = 1000;

    /// Seconds lost when a hazard is clicked
    pub const HAZARD_PENALTY_SECS: u32 = 3;
    /// Seconds gained when a bonus is clicked
    pub const BONUS_SECS: u32 = 2;
    /// Remaining time never exceeds this
    pub const MAX_TIME_SECS: u32 = 99;

    /// LocalStorage keys
    pub const HIGH_SCORE_KEY: &str = "waterquest-highscore";
    pub const SETTINGS_KEY: &str = "waterquest-settings";
}
