//! Difficulty tiers and their tuning
//!
//! Each tier maps to a fixed [`DifficultyProfile`]. Lookups are pure; unknown
//! tier names fall back to [`Difficulty::Normal`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{BONUS_SECS, HAZARD_PENALTY_SECS};

/// Difficulty tier selected before each round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Parse a tier name, falling back to Normal for anything unrecognized
    pub fn resolve(s: &str) -> Self {
        Self::from_str(s).unwrap_or_else(|| {
            log::debug!("Unknown difficulty {:?}, using normal", s);
            Difficulty::Normal
        })
    }

    /// Tuning for this tier
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                round_duration_secs: 35,
                spawn_interval_ms: 1100,
                icon_linger_ms: 1500,
                hazard_probability: 0.13,
                bonus_probability: 0.27,
                hazard_penalty_secs: HAZARD_PENALTY_SECS,
                bonus_secs: BONUS_SECS,
            },
            Difficulty::Normal => DifficultyProfile {
                round_duration_secs: 30,
                spawn_interval_ms: 1000,
                icon_linger_ms: 100,
                hazard_probability: 0.2,
                bonus_probability: 0.15,
                hazard_penalty_secs: HAZARD_PENALTY_SECS,
                bonus_secs: BONUS_SECS,
            },
            Difficulty::Hard => DifficultyProfile {
                round_duration_secs: 25,
                spawn_interval_ms: 600,
                icon_linger_ms: 30,
                hazard_probability: 0.32,
                bonus_probability: 0.10,
                hazard_penalty_secs: HAZARD_PENALTY_SECS,
                bonus_secs: BONUS_SECS,
            },
        }
    }
}

/// Resolve a tier name straight to its profile (unknown names give Normal)
pub fn resolve(tier: &str) -> DifficultyProfile {
    Difficulty::resolve(tier).profile()
}

/// Per-round tuning values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Starting countdown value
    pub round_duration_secs: u32,
    /// Time between spawns
    pub spawn_interval_ms: u64,
    /// How long a clicked icon stays before removal
    pub icon_linger_ms: u64,
    /// Chance a spawn is a hazard
    pub hazard_probability: f64,
    /// Chance a spawn is a bonus
    pub bonus_probability: f64,
    /// Seconds removed by a hazard click
    pub hazard_penalty_secs: u32,
    /// Seconds added by a bonus click
    pub bonus_secs: u32,
}

impl DifficultyProfile {
    pub fn spawn_interval(&self) -> Duration {
        Duration::from_millis(self.spawn_interval_ms)
    }

    pub fn icon_linger(&self) -> Duration {
        Duration::from_millis(self.icon_linger_ms)
    }

    /// Chance a spawn is a plain collectible
    pub fn collectible_probability(&self) -> f64 {
        (1.0 - self.hazard_probability - self.bonus_probability).max(0.0)
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Difficulty::Normal.profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_probabilities_fit_in_unit_interval() {
        for tier in Difficulty::ALL {
            let p = tier.profile();
            assert!(p.hazard_probability >= 0.0 && p.bonus_probability >= 0.0);
            assert!(
                p.hazard_probability + p.bonus_probability <= 1.0,
                "{} overflows",
                tier.as_str()
            );
        }
    }

    #[test]
    fn test_tier_table() {
        let easy = resolve("easy");
        assert_eq!(easy.round_duration_secs, 35);
        assert_eq!(easy.spawn_interval_ms, 1100);
        assert_eq!(easy.icon_linger_ms, 1500);

        let hard = resolve("hard");
        assert_eq!(hard.round_duration_secs, 25);
        assert_eq!(hard.spawn_interval(), Duration::from_millis(600));
        assert_eq!(hard.icon_linger(), Duration::from_millis(30));
        assert_eq!(hard.hazard_penalty_secs, 3);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Difficulty::from_str(" HARD "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_str("Easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_unknown_tier_falls_back_to_normal() {
        assert_eq!(resolve("nightmare"), Difficulty::Normal.profile());
        assert_eq!(resolve(""), DifficultyProfile::default());
    }

    proptest! {
        #[test]
        fn resolve_never_fails(tier in ".*") {
            let profile = resolve(&tier);
            prop_assert!(Difficulty::ALL.iter().any(|d| d.profile() == profile));
            prop_assert!(profile.collectible_probability() >= 0.0);
        }
    }
}
