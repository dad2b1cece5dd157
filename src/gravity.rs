//! Gravity timer
//!
//! The timer only runs while it is armed. The game arms it when the session
//! enters the running state and disarms it on every way out, so a stale
//! deadline can never move a piece after a pause or game over.

use std::time::{Duration, Instant};

/// Reference gravity interval
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(400);

#[derive(Debug, Clone)]
pub struct GravityTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl GravityTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    #[cfg(test)]
    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Start counting a fresh interval from `now`
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn disarm(&mut self) {
        self.next_due = None;
    }

    /// Number of whole intervals elapsed by `now`, advancing the deadline
    /// past them. Always 0 while disarmed.
    pub fn due_ticks(&mut self, now: Instant) -> u32 {
        let Some(mut due) = self.next_due else {
            return 0;
        };

        let mut ticks = 0;
        while due <= now {
            ticks += 1;
            due += self.interval;
        }
        self.next_due = Some(due);
        ticks
    }
}

impl Default for GravityTimer {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}
