//! Round state and core gameplay types

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::difficulty::Difficulty;

/// Current phase of the round state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RoundPhase {
    /// Nothing running, waiting for the start button
    #[default]
    Idle,
    /// Difficulty dialog is open
    AwaitingDifficultyChoice,
    /// Timers ticking, icons spawning
    Running,
    /// Round finished, summary shown
    GameOver,
}

/// Icon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IconKind {
    /// Water can, +1 score
    Collectible,
    /// Biohazard, costs time
    Hazard,
    /// Plus icon, grants time
    Bonus,
}

impl IconKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKind::Collectible => "collectible",
            IconKind::Hazard => "hazard",
            IconKind::Bonus => "bonus",
        }
    }
}

/// Stable identifier of a spawned icon (never reused within a session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IconId(pub u32);

/// An icon placed on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedIcon {
    pub id: IconId,
    pub kind: IconKind,
    /// Grid cell index (0..9, row-major)
    pub cell: usize,
    /// Round clock when spawned
    pub created_at_ms: u64,
    /// Set by the first click; later clicks are ignored
    pub clicked: bool,
}

/// The 3x3 play field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Grid {
    cells: [Option<SpawnedIcon>; GRID_CELLS],
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every icon, returning what was removed (in cell order)
    pub fn clear(&mut self) -> Vec<SpawnedIcon> {
        self.cells.iter_mut().filter_map(Option::take).collect()
    }

    /// Put an icon in its cell, replacing whatever was there
    pub fn place(&mut self, icon: SpawnedIcon) -> Option<SpawnedIcon> {
        debug_assert!(icon.cell < GRID_CELLS);
        self.cells[icon.cell].replace(icon)
    }

    pub fn cell(&self, index: usize) -> Option<&SpawnedIcon> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    pub fn get(&self, id: IconId) -> Option<&SpawnedIcon> {
        self.icons().find(|icon| icon.id == id)
    }

    pub fn get_mut(&mut self, id: IconId) -> Option<&mut SpawnedIcon> {
        self.cells.iter_mut().flatten().find(|icon| icon.id == id)
    }

    /// Remove a specific icon if it is still on the grid
    pub fn remove(&mut self, id: IconId) -> Option<SpawnedIcon> {
        self.cells
            .iter_mut()
            .find(|slot| slot.is_some_and(|icon| icon.id == id))
            .and_then(Option::take)
    }

    pub fn icons(&self) -> impl Iterator<Item = &SpawnedIcon> {
        self.cells.iter().flatten()
    }

    pub fn occupied_count(&self) -> usize {
        self.icons().count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }
}

/// Score thresholds with their one-time messages
pub const MILESTONES: [(u32, &str); 8] = [
    (5, "Nice start! 5 cans collected."),
    (10, "10 cans! Keep the water flowing."),
    (15, "15 cans, halfway to a clean well!"),
    (20, "20 cans! Almost there."),
    (GOAL_CANS, "25 cans! You filled the well!"),
    (30, "30 cans! Overflowing!"),
    (40, "40 cans! Water hero!"),
    (50, "50 cans! Legendary!"),
];

/// Message for an exact milestone score
pub fn milestone_message(score: u32) -> Option<&'static str> {
    MILESTONES
        .iter()
        .find(|(threshold, _)| *threshold == score)
        .map(|(_, msg)| *msg)
}

/// Per-round mutable state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u32,
    /// Seconds left on the countdown
    pub time_remaining: u32,
    /// Milestone thresholds already announced this round
    pub milestones_shown: BTreeSet<u32>,
}

impl RoundState {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            score: 0,
            time_remaining: duration_secs,
            milestones_shown: BTreeSet::new(),
        }
    }

    /// Count a collectible; returns a milestone message the first time one is hit
    pub fn collect(&mut self) -> Option<&'static str> {
        self.score += 1;
        let message = milestone_message(self.score)?;
        self.milestones_shown
            .insert(self.score)
            .then_some(message)
    }

    /// Subtract time, flooring at zero
    pub fn apply_penalty(&mut self, secs: u32) {
        self.time_remaining = self.time_remaining.saturating_sub(secs);
    }

    /// Add time, capped at [`MAX_TIME_SECS`]
    pub fn apply_bonus(&mut self, secs: u32) {
        self.time_remaining = self.time_remaining.saturating_add(secs).min(MAX_TIME_SECS);
    }

    /// One countdown step; true once time has run out
    pub fn tick_down(&mut self) -> bool {
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.is_out_of_time()
    }

    pub fn is_out_of_time(&self) -> bool {
        self.time_remaining == 0
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new(Difficulty::Normal.profile().round_duration_secs)
    }
}

/// Everything the presentation layer needs to hear about
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Open the difficulty dialog
    DifficultyPrompt,
    /// A round began (hide dialogs)
    RoundStarted { difficulty: Difficulty },
    IconSpawned(SpawnedIcon),
    IconRemoved { id: IconId, cell: usize },
    /// Whole grid wiped (round start / reset)
    GridCleared,
    /// First click on an icon landed
    IconClicked { id: IconId, kind: IconKind, cell: usize },
    ScoreChanged(u32),
    TimeChanged(u32),
    HighScoreChanged(u32),
    Milestone(&'static str),
    RoundOver { final_score: u32, new_high_score: bool },
    /// Close the round-over summary
    RoundOverDismissed,
    /// Close the difficulty dialog without starting a round
    DifficultyDismissed,
    /// New record, fire the confetti
    Celebrate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn icon(id: u32, cell: usize) -> SpawnedIcon {
        SpawnedIcon {
            id: IconId(id),
            kind: IconKind::Collectible,
            cell,
            created_at_ms: 0,
            clicked: false,
        }
    }

    #[test]
    fn test_grid_place_and_remove() {
        let mut grid = Grid::new();
        assert!(grid.is_empty());

        assert!(grid.place(icon(1, 4)).is_none());
        assert_eq!(grid.occupied_count(), 1);
        assert_eq!(grid.cell(4).map(|i| i.id), Some(IconId(1)));

        // Removing a stale id does nothing
        assert!(grid.remove(IconId(9)).is_none());
        assert_eq!(grid.occupied_count(), 1);

        assert_eq!(grid.remove(IconId(1)).map(|i| i.cell), Some(4));
        assert!(grid.is_empty());
        assert!(grid.remove(IconId(1)).is_none());
    }

    #[test]
    fn test_grid_clear_returns_removed() {
        let mut grid = Grid::new();
        grid.place(icon(1, 0));
        grid.place(icon(2, 8));
        let removed: Vec<_> = grid.clear().into_iter().map(|i| i.id).collect();
        assert_eq!(removed, vec![IconId(1), IconId(2)]);
        assert!(grid.is_empty());
        assert!(grid.clear().is_empty());
    }

    #[test]
    fn test_milestones_fire_once() {
        let mut round = RoundState::new(30);
        let mut messages = Vec::new();
        for _ in 0..55 {
            if let Some(msg) = round.collect() {
                messages.push(msg);
            }
        }
        assert_eq!(round.score, 55);
        assert_eq!(messages.len(), MILESTONES.len());
        assert_eq!(messages[4], milestone_message(GOAL_CANS).unwrap());
        assert_eq!(
            round.milestones_shown.iter().copied().collect::<Vec<_>>(),
            vec![5, 10, 15, 20, 25, 30, 40, 50]
        );
    }

    #[test]
    fn test_milestone_not_repeated_after_reshown() {
        let mut round = RoundState::new(30);
        round.score = 4;
        assert!(round.collect().is_some());
        // Same threshold reached again (e.g. state restored) stays quiet
        round.score = 4;
        assert!(round.collect().is_none());
    }

    #[test]
    fn test_time_bounds() {
        let mut round = RoundState::new(2);
        round.apply_penalty(3);
        assert_eq!(round.time_remaining, 0);
        assert!(round.is_out_of_time());

        let mut round = RoundState::new(98);
        round.apply_bonus(2);
        assert_eq!(round.time_remaining, MAX_TIME_SECS);

        let mut round = RoundState::new(1);
        assert!(round.tick_down());
        assert!(round.tick_down());
        assert_eq!(round.time_remaining, 0);
    }

    proptest! {
        #[test]
        fn penalty_floors_at_zero(t in 0u32..=MAX_TIME_SECS, p in 0u32..=10) {
            let mut round = RoundState::new(t);
            round.apply_penalty(p);
            prop_assert_eq!(round.time_remaining, t.saturating_sub(p));
            prop_assert_eq!(round.is_out_of_time(), p >= t);
        }

        #[test]
        fn bonus_caps_at_max(t in 0u32..=MAX_TIME_SECS, b in 0u32..=10) {
            let mut round = RoundState::new(t);
            round.apply_bonus(b);
            prop_assert_eq!(round.time_remaining, (t + b).min(MAX_TIME_SECS));
            prop_assert!(round.time_remaining >= t);
        }
    }
}
