//! Shape catalog
//!
//! The seven pieces as boolean matrices (origin top-left, row 0 on top),
//! each with a fixed catalog index and display color.

use rand::Rng;
use ratatui::style::Color;

/// Number of entries in the catalog
pub const CATALOG_SIZE: usize = 7;

/// The 7 catalog entries, in catalog order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // Cyan - long bar
    O, // Orange - square
    T, // Rose - T-shape
    S, // Lime - S-shape
    Z, // Amber - Z-shape
    J, // Indigo - J-shape
    L, // Pink - L-shape
}

impl TetrominoType {
    /// All entries, indexed by catalog index
    pub fn all() -> [TetrominoType; CATALOG_SIZE] {
        [
            TetrominoType::I,
            TetrominoType::O,
            TetrominoType::T,
            TetrominoType::S,
            TetrominoType::Z,
            TetrominoType::J,
            TetrominoType::L,
        ]
    }

    /// Look up an entry by catalog index
    #[cfg(test)]
    pub fn from_index(index: usize) -> Option<TetrominoType> {
        Self::all().get(index).copied()
    }

    /// Position of this entry in the catalog
    #[cfg(test)]
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn color(&self) -> Color {
        match self {
            TetrominoType::I => Color::Rgb(0x06, 0xb6, 0xd4),
            TetrominoType::O => Color::Rgb(0xf5, 0x9e, 0x42),
            TetrominoType::T => Color::Rgb(0xf4, 0x3f, 0x5e),
            TetrominoType::S => Color::Rgb(0xa3, 0xe6, 0x35),
            TetrominoType::Z => Color::Rgb(0xfb, 0xbf, 0x24),
            TetrominoType::J => Color::Rgb(0x63, 0x66, 0xf1),
            TetrominoType::L => Color::Rgb(0xf4, 0x72, 0xb6),
        }
    }

    /// Canonical rows of the spawn orientation
    fn rows(&self) -> &'static [&'static [u8]] {
        match self {
            TetrominoType::I => &[&[1, 1, 1, 1]],
            TetrominoType::O => &[&[1, 1], &[1, 1]],
            TetrominoType::T => &[&[0, 1, 0], &[1, 1, 1]],
            // .SS
            // SS.
            TetrominoType::S => &[&[0, 1, 1], &[1, 1, 0]],
            // ZZ.
            // .ZZ
            TetrominoType::Z => &[&[1, 1, 0], &[0, 1, 1]],
            TetrominoType::J => &[&[1, 0, 0], &[1, 1, 1]],
            TetrominoType::L => &[&[0, 0, 1], &[1, 1, 1]],
        }
    }

    /// A freshly materialized copy of the spawn matrix
    pub fn shape(&self) -> Shape {
        Shape::from_rows(self.rows())
    }
}

/// A piece matrix, stored row-major with row 0 on top
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    cells: Vec<Vec<bool>>,
}

impl Shape {
    /// Build a shape from rows of 0/1 values
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            cells: rows
                .iter()
                .map(|row| row.iter().map(|&v| v != 0).collect())
                .collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    /// Offsets (dx, dy) of every occupied cell
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &filled)| filled)
                .map(move |(x, _)| (x as i32, y as i32))
        })
    }

    /// The matrix turned 90 degrees clockwise.
    ///
    /// Row `i` of the result is column `i` of the source read bottom to top.
    pub fn rotated_cw(&self) -> Shape {
        let height = self.height();
        let cells = (0..self.width())
            .map(|col| (0..height).rev().map(|row| self.cells[row][col]).collect())
            .collect();
        Shape { cells }
    }
}

/// A catalog entry handed out for spawning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDef {
    pub kind: TetrominoType,
    pub shape: Shape,
}

impl ShapeDef {
    pub fn new(kind: TetrominoType) -> Self {
        Self {
            kind,
            shape: kind.shape(),
        }
    }
}

/// Pick a catalog entry uniformly at random
pub fn pick_random<R: Rng + ?Sized>(rng: &mut R) -> ShapeDef {
    let index = rng.gen_range(0..CATALOG_SIZE);
    ShapeDef::new(TetrominoType::all()[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_catalog_indices_match_order() {
        for (i, kind) in TetrominoType::all().iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(TetrominoType::from_index(i), Some(*kind));
        }
        assert_eq!(TetrominoType::from_index(CATALOG_SIZE), None);
    }

    #[test]
    fn test_every_shape_has_four_cells() {
        for kind in TetrominoType::all() {
            assert_eq!(kind.shape().filled_cells().count(), 4, "{:?}", kind);
        }
    }

    #[test]
    fn test_rotate_t_clockwise() {
        // .T.      T.
        // TTT  ->  TT
        //          T.
        let rotated = TetrominoType::T.shape().rotated_cw();
        assert_eq!(rotated, Shape::from_rows(&[&[1, 0], &[1, 1], &[1, 0]]));
    }

    #[test]
    fn test_rotate_i_becomes_vertical() {
        let rotated = TetrominoType::I.shape().rotated_cw();
        assert_eq!(rotated.height(), 4);
        assert_eq!(rotated.width(), 1);
    }

    #[test]
    fn test_four_rotations_are_identity() {
        for kind in TetrominoType::all() {
            let shape = kind.shape();
            let back = shape.rotated_cw().rotated_cw().rotated_cw().rotated_cw();
            assert_eq!(back, shape);
        }
    }

    #[test]
    fn test_half_turn_of_l() {
        // ..L      LLL
        // LLL  ->  L..
        let half = TetrominoType::L.shape().rotated_cw().rotated_cw();
        assert_eq!(half, Shape::from_rows(&[&[1, 1, 1], &[1, 0, 0]]));
    }

    #[test]
    fn test_pick_random_copies_matrix() {
        let mut def = pick_random(&mut ChaCha8Rng::seed_from_u64(7));
        let original = def.shape.clone();
        def.shape = def.shape.rotated_cw();

        // Same seed, same entry: the catalog still hands out the spawn matrix
        let again = pick_random(&mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(again.kind, def.kind);
        assert_eq!(again.shape, original);
    }

    #[test]
    fn test_pick_random_covers_catalog() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut seen = [false; CATALOG_SIZE];
        for _ in 0..500 {
            seen[pick_random(&mut rng).kind.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
