//! Scoring and best-score persistence

use crate::store::Store;

/// Points per cleared row
pub const POINTS_PER_ROW: u64 = 100;

/// Store key holding the best score
pub const HIGH_SCORE_KEY: &str = "tetris_high";

/// Score for the current session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub points: u64,
    /// Total rows cleared
    pub lines: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit rows cleared in one lock
    pub fn add_rows(&mut self, rows: u32) {
        self.lines += rows;
        self.points += POINTS_PER_ROW * rows as u64;
    }
}

/// Best score ever reached on this device
pub struct HighScore {
    best: u64,
    store: Box<dyn Store>,
}

impl HighScore {
    /// Read the stored best. Missing or non-numeric values count as 0.
    pub fn load(store: Box<dyn Store>) -> Self {
        let best = match store.get(HIGH_SCORE_KEY) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring malformed best score {:?}", raw);
                0
            }),
            None => 0,
        };
        Self { best, store }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record a finished session. Returns true on a new best.
    pub fn record_game_over(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        tracing::info!(best = score, "new best score");
        if let Err(e) = self.store.set(HIGH_SCORE_KEY, &score.to_string()) {
            tracing::warn!("Could not persist best score: {:#}", e);
        }
        true
    }
}

impl std::fmt::Debug for HighScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighScore").field("best", &self.best).finish()
    }
}
