//! Level-triggered idle poll.
//!
//! The scheduler does not keep a timer per keystroke. It fires at a fixed
//! cadence and, on each firing, re-checks whether the active pane has been
//! quiet long enough. Cancelling it (at session teardown) stops all further
//! firings.

use std::time::{Duration, Instant};

use super::pane::Pane;

#[derive(Debug, Clone)]
pub struct IdleScheduler {
    poll_interval: Duration,
    idle_threshold: Duration,
    next_tick: Option<Instant>,
    cancelled: bool,
}

impl IdleScheduler {
    pub fn new(poll_interval: Duration, idle_threshold: Duration) -> Self {
        Self {
            poll_interval,
            idle_threshold,
            next_tick: None,
            cancelled: false,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn idle_threshold(&self) -> Duration {
        self.idle_threshold
    }

    /// Returns true once per elapsed `poll_interval`.
    ///
    /// The first call arms the timer. When the caller falls behind by several
    /// intervals only one tick is reported; missed ticks are not replayed.
    pub fn tick_due(&mut self, now: Instant) -> bool {
        if self.cancelled {
            return false;
        }
        match self.next_tick {
            None => {
                self.next_tick = Some(now + self.poll_interval);
                false
            }
            Some(deadline) if now >= deadline => {
                self.next_tick = Some(now + self.poll_interval);
                true
            }
            Some(_) => false,
        }
    }

    /// Whether `pane` has been left alone for at least the idle threshold.
    ///
    /// A pane the user never touched counts as settled.
    pub fn is_settled(&self, pane: &Pane, now: Instant) -> bool {
        match pane.last_edit() {
            Some(at) => now.saturating_duration_since(at) >= self.idle_threshold,
            None => true,
        }
    }

    /// The single per-tick question: settled, non-empty, and not yet sent.
    pub fn should_request(&self, pane: &Pane, now: Instant) -> bool {
        self.is_settled(pane, now) && pane.needs_request()
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.next_tick = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
