//! Read-only view of a session for the renderer

use crate::board::Board;
use crate::game::SessionState;
use crate::piece::Piece;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub board: &'a Board,
    /// Hidden by the renderer until the session has started
    pub active: Option<&'a Piece>,
    pub score: u64,
    pub best: u64,
    pub state: SessionState,
    /// Whether a finished session may be restarted
    pub retryable: bool,
    pub theme: &'a Theme,
}

impl Snapshot<'_> {
    /// Is the active piece covering (row, col)?
    pub fn active_covers(&self, row: i32, col: i32) -> bool {
        self.active
            .is_some_and(|piece| piece.cells().any(|(x, y)| x == col && y == row))
    }
}
