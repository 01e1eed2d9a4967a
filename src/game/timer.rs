//! Elapsed-time driven timers
//!
//! Stand-ins for the browser's `setInterval`/`setTimeout`: the owner feeds
//! elapsed time in and gets back how many times each timer fired.

use std::time::Duration;

use super::state::IconId;

/// A repeating fixed-period timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalTimer {
    period: Duration,
    elapsed: Duration,
    running: bool,
}

impl IntervalTimer {
    /// Create a stopped timer
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            elapsed: Duration::ZERO,
            running: false,
        }
    }

    /// Start (or restart) counting from zero
    pub fn start(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    /// Stop the timer. Safe to call when already stopped.
    pub fn cancel(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time until the next fire, `None` if stopped or the period is zero
    pub fn until_next(&self) -> Option<Duration> {
        if !self.running || self.period.is_zero() {
            return None;
        }
        Some(self.period.saturating_sub(self.elapsed))
    }

    /// Advance by `dt`, returning the number of fires
    pub fn advance(&mut self, dt: Duration) -> u32 {
        if !self.running || self.period.is_zero() {
            return 0;
        }
        self.elapsed += dt;
        let mut fires = 0;
        while self.elapsed >= self.period {
            self.elapsed -= self.period;
            fires += 1;
        }
        fires
    }
}

/// A one-shot removal scheduled after an icon was clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRemoval {
    pub id: IconId,
    pub remaining: Duration,
}

impl PendingRemoval {
    pub fn new(id: IconId, delay: Duration) -> Self {
        Self { id, remaining: delay }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.remaining = self.remaining.saturating_sub(dt);
    }

    pub fn is_due(&self) -> bool {
        self.remaining.is_zero()
    }
}
