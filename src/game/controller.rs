//! Round controller
//!
//! Owns every piece of round state and is its only writer. Player input goes
//! through [`RoundController::handle`], the passage of time through
//! [`RoundController::advance`]; both queue [`GameEvent`]s for the view.

use std::time::Duration;

use super::spawn::SpawnScheduler;
use super::state::{GameEvent, Grid, IconId, IconKind, RoundPhase, RoundState, SpawnedIcon};
use super::timer::{IntervalTimer, PendingRemoval};
use crate::consts::COUNTDOWN_INTERVAL_MS;
use crate::difficulty::{Difficulty, DifficultyProfile};
use crate::highscore::HighScoreStore;
use crate::platform::KeyValueStore;

/// Player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Start button / try again
    RequestStart,
    ChooseDifficulty(Difficulty),
    Click(IconId),
    /// Reset the current round only
    ResetCurrent,
    /// Reset the round and erase the high score
    ResetAll,
}

/// The game session: state machine, timers, grid, scores
#[derive(Debug)]
pub struct RoundController<S: KeyValueStore> {
    phase: RoundPhase,
    difficulty: Difficulty,
    profile: DifficultyProfile,
    round: RoundState,
    grid: Grid,
    spawner: SpawnScheduler,
    spawn_timer: IntervalTimer,
    countdown: IntervalTimer,
    lingering: Vec<PendingRemoval>,
    /// Time spent Running in the current round
    clock: Duration,
    high_score: HighScoreStore<S>,
    events: Vec<GameEvent>,
}

impl<S: KeyValueStore> RoundController<S> {
    /// Create an idle session. Queues the initial display values.
    pub fn new(seed: u64, store: S) -> Self {
        let profile = Difficulty::Normal.profile();
        let high_score = HighScoreStore::open(store);
        let mut controller = Self {
            phase: RoundPhase::Idle,
            difficulty: Difficulty::Normal,
            profile,
            round: RoundState::new(profile.round_duration_secs),
            grid: Grid::new(),
            spawner: SpawnScheduler::new(seed),
            spawn_timer: IntervalTimer::new(profile.spawn_interval()),
            countdown: IntervalTimer::new(Duration::from_millis(COUNTDOWN_INTERVAL_MS)),
            lingering: Vec::new(),
            clock: Duration::ZERO,
            high_score,
            events: Vec::new(),
        };
        controller.emit(GameEvent::HighScoreChanged(controller.high_score.best()));
        controller.emit(GameEvent::ScoreChanged(0));
        controller.emit(GameEvent::TimeChanged(controller.round.time_remaining));
        controller
    }

    // === Accessors ===

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RoundPhase::Running
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn score(&self) -> u32 {
        self.round.score
    }

    pub fn time_remaining(&self) -> u32 {
        self.round.time_remaining
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The icon currently on the grid, if any
    pub fn active_icon(&self) -> Option<&SpawnedIcon> {
        self.grid.icons().next()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn high_scores(&self) -> &HighScoreStore<S> {
        &self.high_score
    }

    /// Both round timers are ticking
    pub fn timers_running(&self) -> (bool, bool) {
        (self.spawn_timer.is_running(), self.countdown.is_running())
    }

    pub fn pending_removals(&self) -> usize {
        self.lingering.len()
    }

    /// Events queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    // === Input ===

    /// Apply a player command
    pub fn handle(&mut self, input: Input) {
        match input {
            Input::RequestStart => {
                self.request_start();
            }
            Input::ChooseDifficulty(difficulty) => {
                self.choose_difficulty(difficulty);
            }
            Input::Click(id) => {
                self.click(id);
            }
            Input::ResetCurrent => self.reset_current(),
            Input::ResetAll => self.reset_all(),
        }
    }

    /// Ask for a new round. Ignored while a round is running.
    pub fn request_start(&mut self) -> bool {
        if self.phase == RoundPhase::Running {
            log::debug!("Start requested while running - ignored");
            return false;
        }
        self.phase = RoundPhase::AwaitingDifficultyChoice;
        self.emit(GameEvent::DifficultyPrompt);
        true
    }

    /// Begin a round at the given tier. Only valid while the dialog is open.
    pub fn choose_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != RoundPhase::AwaitingDifficultyChoice {
            log::debug!("Difficulty chosen in {:?} - ignored", self.phase);
            return false;
        }

        self.difficulty = difficulty;
        self.profile = difficulty.profile();
        self.round = RoundState::new(self.profile.round_duration_secs);
        self.clock = Duration::ZERO;
        self.lingering.clear();
        self.grid.clear();

        self.phase = RoundPhase::Running;
        self.spawn_timer = IntervalTimer::new(self.profile.spawn_interval());
        self.spawn_timer.start();
        self.countdown.start();

        self.emit(GameEvent::GridCleared);
        self.emit(GameEvent::RoundStarted { difficulty });
        self.emit(GameEvent::ScoreChanged(0));
        self.emit(GameEvent::TimeChanged(self.round.time_remaining));

        log::info!(
            "Round started on {} ({}s)",
            difficulty.as_str(),
            self.round.time_remaining
        );
        true
    }

    /// Click an icon. Returns true if the click had an effect.
    pub fn click(&mut self, id: IconId) -> bool {
        if self.phase != RoundPhase::Running {
            return false;
        }
        let Some(icon) = self.grid.get_mut(id) else {
            log::debug!("Click on stale icon {:?}", id);
            return false;
        };
        if icon.clicked {
            return false;
        }
        icon.clicked = true;
        let (kind, cell) = (icon.kind, icon.cell);

        self.emit(GameEvent::IconClicked { id, kind, cell });
        match kind {
            IconKind::Collectible => {
                let milestone = self.round.collect();
                self.emit(GameEvent::ScoreChanged(self.round.score));
                if let Some(message) = milestone {
                    self.emit(GameEvent::Milestone(message));
                }
            }
            IconKind::Hazard => {
                self.round.apply_penalty(self.profile.hazard_penalty_secs);
                self.emit(GameEvent::TimeChanged(self.round.time_remaining));
            }
            IconKind::Bonus => {
                self.round.apply_bonus(self.profile.bonus_secs);
                self.emit(GameEvent::TimeChanged(self.round.time_remaining));
            }
        }

        self.lingering
            .push(PendingRemoval::new(id, self.profile.icon_linger()));

        // Running out of time ends the round whatever drained it
        if self.round.is_out_of_time() {
            self.end_round();
        }
        true
    }

    /// Stop the current round and return to Idle. High score is kept.
    pub fn reset_current(&mut self) {
        self.stop_timers();
        self.lingering.clear();
        self.grid.clear();

        self.phase = RoundPhase::Idle;
        self.difficulty = Difficulty::Normal;
        self.profile = Difficulty::Normal.profile();
        self.round = RoundState::new(self.profile.round_duration_secs);
        self.clock = Duration::ZERO;

        self.emit(GameEvent::GridCleared);
        self.emit(GameEvent::ScoreChanged(0));
        self.emit(GameEvent::TimeChanged(self.round.time_remaining));
        self.emit(GameEvent::RoundOverDismissed);
        self.emit(GameEvent::DifficultyDismissed);
        log::info!("Round reset");
    }

    /// Reset the round and erase the high score
    pub fn reset_all(&mut self) {
        self.reset_current();
        self.high_score.clear();
        self.emit(GameEvent::HighScoreChanged(0));
    }

    // === Time ===

    /// Advance all timers by `dt`, firing due callbacks in time order
    pub fn advance(&mut self, dt: Duration) {
        let mut remaining = dt;
        loop {
            match self.next_deadline() {
                Some(step) if step <= remaining => {
                    remaining -= step;
                    self.elapse(step);
                }
                _ => {
                    self.elapse(remaining);
                    break;
                }
            }
        }
    }

    /// Time until the earliest pending timer
    fn next_deadline(&self) -> Option<Duration> {
        [self.spawn_timer.until_next(), self.countdown.until_next()]
            .into_iter()
            .flatten()
            .chain(self.lingering.iter().map(|p| p.remaining))
            .min()
    }

    fn elapse(&mut self, step: Duration) {
        if self.phase == RoundPhase::Running {
            self.clock += step;
        }
        let spawns = self.spawn_timer.advance(step);
        let ticks = self.countdown.advance(step);
        for pending in &mut self.lingering {
            pending.advance(step);
        }

        self.expire_lingering();
        // Spawn interval was registered first, so it wins ties
        for _ in 0..spawns {
            self.spawn_tick();
        }
        for _ in 0..ticks {
            self.countdown_tick();
        }
    }

    fn expire_lingering(&mut self) {
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.lingering)
            .into_iter()
            .partition(PendingRemoval::is_due);
        self.lingering = waiting;
        for pending in due {
            if let Some(icon) = self.grid.remove(pending.id) {
                self.emit(GameEvent::IconRemoved {
                    id: icon.id,
                    cell: icon.cell,
                });
            }
        }
    }

    fn spawn_tick(&mut self) {
        if self.phase != RoundPhase::Running {
            return;
        }
        for old in self.grid.clear() {
            self.emit(GameEvent::IconRemoved {
                id: old.id,
                cell: old.cell,
            });
        }
        let now_ms = self.clock.as_millis() as u64;
        let icon = self.spawner.next_icon(&self.profile, now_ms);
        self.grid.place(icon);
        self.emit(GameEvent::IconSpawned(icon));
    }

    fn countdown_tick(&mut self) {
        if self.phase != RoundPhase::Running {
            return;
        }
        let expired = self.round.tick_down();
        self.emit(GameEvent::TimeChanged(self.round.time_remaining));
        if expired {
            self.end_round();
        }
    }

    fn stop_timers(&mut self) {
        self.spawn_timer.cancel();
        self.countdown.cancel();
    }

    fn end_round(&mut self) {
        if self.phase != RoundPhase::Running {
            return;
        }
        self.phase = RoundPhase::GameOver;
        self.stop_timers();

        let final_score = self.round.score;
        let new_high_score = self.high_score.submit(final_score);
        if new_high_score {
            self.emit(GameEvent::HighScoreChanged(final_score));
            self.emit(GameEvent::Celebrate);
        }
        self.emit(GameEvent::RoundOver {
            final_score,
            new_high_score,
        });
        log::info!(
            "Round over: {} cans on {}{}",
            final_score,
            self.difficulty.as_str(),
            if new_high_score { " (new high score)" } else { "" }
        );
    }
}
