//! Icon spawning
//!
//! Picks the kind and cell for each new icon from a seeded generator.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{IconId, IconKind, SpawnedIcon};
use crate::consts::GRID_CELLS;
use crate::difficulty::DifficultyProfile;

/// Produces icons with stable, increasing ids
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    rng: Pcg32,
    next_id: u32,
}

impl SpawnScheduler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Map a roll in `[0, 1)` to an icon kind using cumulative thresholds:
    /// hazard first, then bonus, everything else is a collectible.
    pub fn kind_for_roll(roll: f64, profile: &DifficultyProfile) -> IconKind {
        if roll < profile.hazard_probability {
            IconKind::Hazard
        } else if roll < profile.hazard_probability + profile.bonus_probability {
            IconKind::Bonus
        } else {
            IconKind::Collectible
        }
    }

    /// Draw the next icon
    pub fn next_icon(&mut self, profile: &DifficultyProfile, now_ms: u64) -> SpawnedIcon {
        let roll: f64 = self.rng.random();
        let cell = self.rng.random_range(0..GRID_CELLS);
        let id = IconId(self.next_id);
        self.next_id += 1;

        SpawnedIcon {
            id,
            kind: Self::kind_for_roll(roll, profile),
            cell,
            created_at_ms: now_ms,
            clicked: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use proptest::prelude::*;

    #[test]
    fn test_roll_thresholds() {
        let normal = Difficulty::Normal.profile();
        assert_eq!(SpawnScheduler::kind_for_roll(0.0, &normal), IconKind::Hazard);
        assert_eq!(SpawnScheduler::kind_for_roll(0.19, &normal), IconKind::Hazard);
        assert_eq!(SpawnScheduler::kind_for_roll(0.2, &normal), IconKind::Bonus);
        assert_eq!(SpawnScheduler::kind_for_roll(0.34, &normal), IconKind::Bonus);
        assert_eq!(SpawnScheduler::kind_for_roll(0.36, &normal), IconKind::Collectible);
        assert_eq!(SpawnScheduler::kind_for_roll(0.999, &normal), IconKind::Collectible);
    }

    #[test]
    fn test_ids_increase() {
        let profile = Difficulty::Hard.profile();
        let mut spawner = SpawnScheduler::new(7);
        let a = spawner.next_icon(&profile, 0);
        let b = spawner.next_icon(&profile, 600);
        assert!(b.id > a.id);
        assert_eq!(b.created_at_ms, 600);
        assert!(!a.clicked);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let profile = Difficulty::Easy.profile();
        let mut s1 = SpawnScheduler::new(12345);
        let mut s2 = SpawnScheduler::new(12345);
        for _ in 0..50 {
            assert_eq!(s1.next_icon(&profile, 0), s2.next_icon(&profile, 0));
        }
    }

    #[test]
    fn test_kind_mix_roughly_matches_profile() {
        let profile = Difficulty::Normal.profile();
        let mut spawner = SpawnScheduler::new(99);
        let n = 10_000;
        let hazards = (0..n)
            .filter(|_| spawner.next_icon(&profile, 0).kind == IconKind::Hazard)
            .count();
        let ratio = hazards as f64 / n as f64;
        assert!((ratio - profile.hazard_probability).abs() < 0.03, "ratio {ratio}");
    }

    proptest! {
        #[test]
        fn spawned_cell_in_grid(seed in any::<u64>()) {
            let profile = Difficulty::Normal.profile();
            let mut spawner = SpawnScheduler::new(seed);
            for _ in 0..20 {
                prop_assert!(spawner.next_icon(&profile, 0).cell < GRID_CELLS);
            }
        }
    }
}
