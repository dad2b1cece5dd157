//! Active falling piece logic

use crate::board::{Board, Position};
use crate::tetromino::{Shape, ShapeDef, TetrominoType};

/// Result of a movement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The piece now sits at the new position
    Moved,
    /// Sideways (or upward) move rejected, nothing changed
    Blocked,
    /// A downward move was blocked: the piece must lock where it is
    LockRequested,
}

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: TetrominoType,
    /// Current orientation, rotated in place
    shape: Shape,
    /// Offset of the matrix origin on the board
    pos: Position,
}

impl Piece {
    /// Create a piece from a catalog entry at the spawn offset
    pub fn spawn(def: ShapeDef, pos: Position) -> Self {
        Self {
            kind: def.kind,
            shape: def.shape,
            pos,
        }
    }

    pub fn kind(&self) -> TetrominoType {
        self.kind
    }

    #[cfg(test)]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    /// Absolute (x, y) of every occupied cell
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .filled_cells()
            .map(|(dx, dy)| (self.pos.x + dx, self.pos.y + dy))
    }

    /// Does the piece overlap the board at its current position?
    pub fn collides(&self, board: &Board) -> bool {
        board.collides(&self.shape, self.pos)
    }

    /// Rotate clockwise in place. There are no wall kicks: a rotation that
    /// would collide is rejected outright.
    pub fn rotate(&mut self, board: &Board) -> bool {
        let rotated = self.shape.rotated_cw();
        if board.collides(&rotated, self.pos) {
            return false;
        }
        self.shape = rotated;
        true
    }

    /// Try to shift by (dx, dy)
    pub fn try_move(&mut self, dx: i32, dy: i32, board: &Board) -> MoveOutcome {
        let target = self.pos.offset(dx, dy);
        if !board.collides(&self.shape, target) {
            self.pos = target;
            MoveOutcome::Moved
        } else if dy == 1 {
            MoveOutcome::LockRequested
        } else {
            MoveOutcome::Blocked
        }
    }

    /// Write this piece into a copy of `board`
    pub fn merge_into(&self, board: &Board) -> Board {
        board.merge(&self.shape, self.pos, self.kind)
    }

    /// Is any occupied cell above the top edge of the board?
    pub fn is_above_top(&self) -> bool {
        self.cells().any(|(_, y)| y < 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{DEFAULT_COLS, DEFAULT_ROWS};

    fn board() -> Board {
        Board::new(DEFAULT_ROWS, DEFAULT_COLS).unwrap()
    }

    fn piece(kind: TetrominoType, x: i32, y: i32) -> Piece {
        Piece::spawn(ShapeDef::new(kind), Position::new(x, y))
    }

    #[test]
    fn test_spawn_position() {
        let piece = piece(TetrominoType::T, 3, -2);
        assert_eq!(piece.position(), Position::new(3, -2));
        assert!(piece.is_above_top());
    }

    #[test]
    fn test_move_sideways() {
        let board = board();
        let mut piece = piece(TetrominoType::O, 0, 5);

        assert_eq!(piece.try_move(-1, 0, &board), MoveOutcome::Blocked);
        assert_eq!(piece.position(), Position::new(0, 5));
        assert_eq!(piece.try_move(1, 0, &board), MoveOutcome::Moved);
        assert_eq!(piece.position(), Position::new(1, 5));
    }

    #[test]
    fn test_blocked_down_requests_lock() {
        let board = board();
        let mut piece = piece(TetrominoType::I, 0, 18);

        assert_eq!(piece.try_move(0, 1, &board), MoveOutcome::Moved);
        assert_eq!(piece.try_move(0, 1, &board), MoveOutcome::LockRequested);
        assert_eq!(piece.position(), Position::new(0, 19));
    }

    #[test]
    fn test_rotate_rejected_without_kick() {
        let board = board();
        // Flat I on the floor cannot stand up
        let mut piece = piece(TetrominoType::I, 8, 19);
        let before = piece.clone();

        assert!(!piece.rotate(&board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_rotate_against_wall_rejected() {
        let board = board();
        // Vertical I hugging the right wall: turning back to flat would poke out
        let mut piece = piece(TetrominoType::I, 0, 5);
        assert!(piece.rotate(&board));
        let vertical = Piece {
            pos: Position::new(19, 5),
            ..piece
        };
        let mut piece = vertical.clone();
        assert!(!piece.rotate(&board));
        assert_eq!(piece, vertical);
    }

    #[test]
    fn test_two_rotations_equal_half_turn() {
        let board = board();
        let mut piece = piece(TetrominoType::J, 8, 8);
        let half_turn = piece.shape().rotated_cw().rotated_cw();

        assert!(piece.rotate(&board));
        assert!(piece.rotate(&board));
        assert_eq!(piece.shape(), &half_turn);
    }

    #[test]
    fn test_merge_into_leaves_board_alone() {
        let board = board();
        let piece = piece(TetrominoType::S, 4, 18);
        let merged = piece.merge_into(&board);

        assert!(board.is_empty());
        assert_eq!(
            merged.iter_rows().flatten().filter(|c| c.is_filled()).count(),
            4
        );
    }
}
