//! Core game state and logic
//!
//! `Game` is the single owner of the session: board, active piece, score and
//! gravity timer. Every trigger (key press or gravity tick) goes through
//! `process_action` or `update` and runs to completion before the next one.

use crate::bag::{Randomizer, RandomizerKind};
use crate::board::{Board, Position, DEFAULT_COLS, DEFAULT_ROWS};
use crate::gravity::{GravityTimer, DEFAULT_INTERVAL};
use crate::piece::{MoveOutcome, Piece};
use crate::score::{HighScore, Score};
use crate::settings::GameplaySettings;
use crate::snapshot::Snapshot;
use crate::tetromino::TetrominoType;
use crate::theme::Theme;
use anyhow::ensure;
use std::time::{Duration, Instant};

/// Where new pieces appear, above the visible grid
pub const SPAWN_POSITION: Position = Position { x: 3, y: -2 };

/// Top-level session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    TogglePause,
    Start,
    Restart,
    /// Handled by the host loop
    Quit,
}

/// Fixed parameters of a session
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub spawn: Position,
    pub gravity: Duration,
    pub retryable: bool,
    pub randomizer: RandomizerKind,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            spawn: SPAWN_POSITION,
            gravity: DEFAULT_INTERVAL,
            retryable: true,
            randomizer: RandomizerKind::Uniform,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_settings(gameplay: &GameplaySettings) -> Self {
        Self {
            rows: gameplay.rows,
            cols: gameplay.cols,
            spawn: Position::new(gameplay.spawn_x, gameplay.spawn_y),
            gravity: Duration::from_millis(gameplay.gravity_ms),
            retryable: gameplay.retryable,
            randomizer: gameplay.randomizer,
            seed: gameplay.seed,
        }
    }
}

/// The main game struct
#[derive(Debug)]
pub struct Game {
    board: Board,
    /// None only after game over
    current_piece: Option<Piece>,
    randomizer: Randomizer,
    score: Score,
    high_score: HighScore,
    state: SessionState,
    /// Armed exactly while the session is running
    gravity: GravityTimer,
    config: GameConfig,
    theme: Theme,
}

impl Game {
    /// Create a session in the not-started state with its first piece drawn.
    /// Fails on zero board dimensions, a zero gravity interval or a spawn
    /// offset that does not fit every piece inside the board.
    pub fn new(config: GameConfig, high_score: HighScore, theme: Theme) -> anyhow::Result<Self> {
        ensure!(!config.gravity.is_zero(), "gravity interval must be positive");
        let board = Board::new(config.rows, config.cols)?;
        for kind in TetrominoType::all() {
            let shape = kind.shape();
            ensure!(
                !board.collides(&shape, config.spawn),
                "spawn offset ({}, {}) does not fit {:?} on a {}x{} board",
                config.spawn.x,
                config.spawn.y,
                kind,
                config.rows,
                config.cols
            );
        }
        let mut randomizer = match config.seed {
            Some(seed) => Randomizer::with_seed(config.randomizer, seed),
            None => Randomizer::new(config.randomizer),
        };
        let first = Piece::spawn(randomizer.next(), config.spawn);

        tracing::info!(
            rows = config.rows,
            cols = config.cols,
            randomizer = ?randomizer.kind(),
            best = high_score.best(),
            "new session"
        );

        Ok(Self {
            board,
            current_piece: Some(first),
            randomizer,
            score: Score::new(),
            high_score,
            state: SessionState::NotStarted,
            gravity: GravityTimer::new(config.gravity),
            config,
            theme,
        })
    }

    #[cfg(test)]
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn best(&self) -> u64 {
        self.high_score.best()
    }

    #[cfg(test)]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current_piece.as_ref()
    }

    #[cfg(test)]
    pub fn is_gravity_armed(&self) -> bool {
        self.gravity.is_armed()
    }

    /// Process an action
    pub fn process_action(&mut self, action: Action, now: Instant) {
        match self.state {
            SessionState::NotStarted => {
                if action == Action::Start {
                    self.enter(SessionState::Running, now);
                }
            }
            SessionState::Paused => {
                if action == Action::TogglePause {
                    self.enter(SessionState::Running, now);
                }
            }
            SessionState::Running => match action {
                Action::MoveLeft => self.shift(-1, 0, now),
                Action::MoveRight => self.shift(1, 0, now),
                Action::SoftDrop => self.shift(0, 1, now),
                Action::Rotate => self.rotate(),
                Action::TogglePause => self.enter(SessionState::Paused, now),
                Action::Start | Action::Restart | Action::Quit => {}
            },
            SessionState::GameOver => {
                if action == Action::Restart && self.config.retryable {
                    self.restart(now);
                }
            }
        }
    }

    /// Apply every gravity tick that has come due by `now`
    pub fn update(&mut self, now: Instant) {
        let ticks = self.gravity.due_ticks(now);
        for _ in 0..ticks {
            if self.state != SessionState::Running {
                break;
            }
            self.tick(now);
        }
    }

    /// One gravity step
    pub fn tick(&mut self, now: Instant) {
        if self.state == SessionState::Running {
            self.shift(0, 1, now);
        }
    }

    fn shift(&mut self, dx: i32, dy: i32, now: Instant) {
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        if piece.try_move(dx, dy, &self.board) == MoveOutcome::LockRequested {
            self.lock_piece(now);
        }
    }

    fn rotate(&mut self) {
        if let Some(piece) = &mut self.current_piece {
            piece.rotate(&self.board);
        }
    }

    /// Lock the current piece, clear rows and spawn the next one
    fn lock_piece(&mut self, now: Instant) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };

        self.board = piece.merge_into(&self.board);

        // Block out: part of the piece never made it onto the grid
        if piece.is_above_top() {
            tracing::debug!(kind = ?piece.kind(), pos = ?piece.position(), "locked above the top edge");
            self.end_session(now);
            return;
        }

        let (board, cleared) = self.board.clear_full_rows();
        self.board = board;
        if cleared > 0 {
            self.score.add_rows(cleared as u32);
            tracing::debug!(cleared, score = self.score.points, "rows cleared");
        }

        let next = Piece::spawn(self.randomizer.next(), self.config.spawn);

        // Top out: no room for the next piece
        if next.collides(&self.board) {
            tracing::debug!(kind = ?next.kind(), "spawn blocked");
            self.end_session(now);
            return;
        }

        self.current_piece = Some(next);
    }

    fn end_session(&mut self, now: Instant) {
        self.enter(SessionState::GameOver, now);
        self.high_score.record_game_over(self.score.points);
    }

    /// Back to a fresh, not-started session. The best score is kept.
    fn restart(&mut self, now: Instant) {
        self.board = self.board.emptied();
        self.current_piece = Some(Piece::spawn(self.randomizer.next(), self.config.spawn));
        self.score = Score::new();
        self.enter(SessionState::NotStarted, now);
    }

    /// Switch session state, keeping the gravity timer armed only while running
    fn enter(&mut self, next: SessionState, now: Instant) {
        tracing::info!(from = ?self.state, to = ?next, score = self.score.points, "session state");
        self.state = next;
        if next == SessionState::Running {
            self.gravity.arm(now);
        } else {
            self.gravity.disarm();
        }
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: &self.board,
            active: self.current_piece.as_ref(),
            score: self.score.points,
            best: self.high_score.best(),
            state: self.state,
            retryable: self.config.retryable,
            theme: &self.theme,
        }
    }
}
