//! Game board representation and collision detection
//!
//! Every operation that changes the grid returns a new board and leaves the
//! receiver untouched; callers swap in the returned value.

use crate::tetromino::{Shape, TetrominoType};
use anyhow::ensure;

/// Reference board dimensions
pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLS: usize = 20;

/// A cell on the board - either empty or filled by a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    /// Numeric encoding: 0 for empty, catalog index + 1 otherwise
    #[cfg(test)]
    pub fn code(&self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Filled(kind) => kind.index() as u8 + 1,
        }
    }
}

/// Grid offset of a shape's top-left corner. `y` may be negative while a
/// piece is still entering from above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The game board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is the top
    cells: Vec<Vec<Cell>>,
    cols: usize,
}

impl Board {
    /// Create an empty board. Both dimensions must be non-zero.
    pub fn new(rows: usize, cols: usize) -> anyhow::Result<Self> {
        ensure!(
            rows > 0 && cols > 0,
            "board dimensions must be positive, got {rows}x{cols}"
        );
        Ok(Self {
            cells: vec![vec![Cell::Empty; cols]; rows],
            cols,
        })
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Get the cell at (row, col), None if out of bounds
    #[cfg(test)]
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .copied()
    }

    /// Iterate rows from top to bottom
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Would `shape` at `pos` leave the board or overlap a filled cell?
    ///
    /// Cells above the top edge only have to be inside the horizontal bounds.
    pub fn collides(&self, shape: &Shape, pos: Position) -> bool {
        let rows = self.rows() as i32;
        let cols = self.cols as i32;

        shape.filled_cells().any(|(dx, dy)| {
            let x = pos.x + dx;
            let y = pos.y + dy;
            if x < 0 || x >= cols || y >= rows {
                return true;
            }
            y >= 0 && self.cells[y as usize][x as usize].is_filled()
        })
    }

    /// Copy of this board with `shape` written at `pos`.
    ///
    /// Cells landing outside the grid are dropped.
    pub fn merge(&self, shape: &Shape, pos: Position, kind: TetrominoType) -> Board {
        let mut merged = self.clone();
        for (dx, dy) in shape.filled_cells() {
            let x = pos.x + dx;
            let y = pos.y + dy;
            if y >= 0 && (y as usize) < merged.rows() && x >= 0 && (x as usize) < merged.cols {
                merged.cells[y as usize][x as usize] = Cell::Filled(kind);
            }
        }
        merged
    }

    /// Copy of this board with every full row removed and the same number
    /// of empty rows added on top. Returns the new board and the count.
    pub fn clear_full_rows(&self) -> (Board, usize) {
        let rows = self.rows();
        let kept: Vec<Vec<Cell>> = self
            .cells
            .iter()
            .filter(|row| !row.iter().all(Cell::is_filled))
            .cloned()
            .collect();

        let cleared = rows - kept.len();
        let mut cells = vec![vec![Cell::Empty; self.cols]; cleared];
        cells.extend(kept);

        (
            Board {
                cells,
                cols: self.cols,
            },
            cleared,
        )
    }

    /// An empty board with the same dimensions
    pub fn emptied(&self) -> Board {
        Board {
            cells: vec![vec![Cell::Empty; self.cols]; self.rows()],
            cols: self.cols,
        }
    }

    /// Check if the board is completely empty
    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(DEFAULT_ROWS, DEFAULT_COLS).unwrap()
    }

    /// Fill a whole row except the listed columns
    fn fill_row(board: &Board, row: i32, gaps: &[i32]) -> Board {
        let dot = Shape::from_rows(&[&[1]]);
        let mut out = board.clone();
        for col in 0..board.cols() as i32 {
            if !gaps.contains(&col) {
                out = out.merge(&dot, Position::new(col, row), TetrominoType::O);
            }
        }
        out
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = board();
        assert!(board.is_empty());
        assert_eq!(board.rows(), 20);
        assert_eq!(board.cols(), 20);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(Board::new(0, 10).is_err());
        assert!(Board::new(10, 0).is_err());
        assert!(Board::new(1, 1).is_ok());
    }

    #[test]
    fn test_out_of_bounds() {
        let board = board();
        assert_eq!(board.get(-1, 0), None);
        assert_eq!(board.get(0, -1), None);
        assert_eq!(board.get(20, 0), None);
        assert_eq!(board.get(0, 20), None);
        assert_eq!(board.get(0, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_collides_walls_and_floor() {
        let board = board();
        let bar = TetrominoType::I.shape();

        assert!(!board.collides(&bar, Position::new(0, 0)));
        assert!(!board.collides(&bar, Position::new(16, 19)));
        assert!(board.collides(&bar, Position::new(-1, 0)));
        assert!(board.collides(&bar, Position::new(17, 0)));
        assert!(board.collides(&bar, Position::new(0, 20)));
    }

    #[test]
    fn test_collides_above_top_only_checks_horizontal() {
        let board = fill_row(&board(), 0, &[]);
        let square = TetrominoType::O.shape();

        // Entirely above the grid: the full top row does not matter
        assert!(!board.collides(&square, Position::new(3, -2)));
        // Bottom half reaches row 0
        assert!(board.collides(&square, Position::new(3, -1)));
        // Horizontal bounds still apply above the grid
        assert!(board.collides(&square, Position::new(-1, -5)));
        assert!(board.collides(&square, Position::new(19, -5)));
    }

    #[test]
    fn test_collides_with_filled_cell() {
        let board = board().merge(&Shape::from_rows(&[&[1]]), Position::new(5, 10), TetrominoType::T);
        let square = TetrominoType::O.shape();

        assert!(board.collides(&square, Position::new(4, 9)));
        assert!(board.collides(&square, Position::new(5, 10)));
        assert!(!board.collides(&square, Position::new(6, 10)));
        assert!(!board.collides(&square, Position::new(4, 11)));
    }

    #[test]
    fn test_collides_matches_cellwise_definition() {
        let board = fill_row(&board(), 19, &[4, 5]);
        let t = TetrominoType::T.shape();

        for y in -3..22 {
            for x in -3..22 {
                let expected = t.filled_cells().any(|(dx, dy)| {
                    let (cx, cy) = (x + dx, y + dy);
                    if cx < 0 || cx >= 20 || cy >= 20 {
                        return true;
                    }
                    cy >= 0 && board.get(cy, cx).is_some_and(|c| c.is_filled())
                });
                assert_eq!(board.collides(&t, Position::new(x, y)), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_merge_is_pure_and_encodes_index() {
        let board = board();
        let merged = board.merge(&TetrominoType::J.shape(), Position::new(2, 18), TetrominoType::J);

        assert!(board.is_empty());
        assert_eq!(merged.get(18, 2), Some(Cell::Filled(TetrominoType::J)));
        assert_eq!(merged.get(19, 4).map(|c| c.code()), Some(6));
        assert_eq!(merged.get(18, 3), Some(Cell::Empty));
    }

    #[test]
    fn test_merge_drops_cells_above_top() {
        let merged = board().merge(&TetrominoType::T.shape(), Position::new(3, -1), TetrominoType::T);
        let filled: usize = merged
            .iter_rows()
            .map(|row| row.iter().filter(|c| c.is_filled()).count())
            .sum();
        assert_eq!(filled, 3);
        assert_eq!(merged.rows(), 20);
    }

    #[test]
    fn test_clear_without_full_rows_is_identity() {
        let board = fill_row(&board(), 19, &[0]);
        let (cleared, count) = board.clear_full_rows();
        assert_eq!(count, 0);
        assert_eq!(cleared, board);
    }

    #[test]
    fn test_clear_single_line() {
        let mut board = fill_row(&board(), 19, &[]);
        board = board.merge(&Shape::from_rows(&[&[1]]), Position::new(0, 18), TetrominoType::S);

        let (cleared, count) = board.clear_full_rows();
        assert_eq!(count, 1);
        assert_eq!(cleared.rows(), 20);
        // The block from row 18 drops to row 19
        assert_eq!(cleared.get(19, 0), Some(Cell::Filled(TetrominoType::S)));
        assert!(cleared.get(18, 0).unwrap().is_empty());
    }

    #[test]
    fn test_clear_preserves_order_of_remaining_rows() {
        let mut board = board();
        board = fill_row(&board, 19, &[]);
        board = fill_row(&board, 18, &[1]);
        board = fill_row(&board, 17, &[]);
        board = fill_row(&board, 16, &[2]);

        let (cleared, count) = board.clear_full_rows();
        assert_eq!(count, 2);
        assert!(cleared.iter_rows().take(2).all(|row| row.iter().all(Cell::is_empty)));
        assert_eq!(cleared.get(19, 1), Some(Cell::Empty));
        assert_eq!(cleared.get(18, 2), Some(Cell::Empty));
        assert!(cleared.get(19, 2).unwrap().is_filled());
        assert!(cleared.get(18, 1).unwrap().is_filled());
    }
}
