use rand::{Rng, distr::StandardUniform, prelude::Distribution};
use serde::{Deserialize, Serialize};

/// Occupancy matrix for one orientation of a piece.
///
/// Shapes are square (N×N, N ≤ 4) and stored as one bitmask per row, where
/// bit `x` of row `y` marks cell `(x, y)` as occupied. The matrix size never
/// changes under rotation: the square piece is 2×2, the long bar 4×4, and the
/// remaining five kinds 3×3 with an all-empty bottom row as rotation headroom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    size: u8,
    rows: [u8; 4],
}

impl Shape {
    const fn new(size: u8, rows: [u8; 4]) -> Self {
        assert!(size as usize <= rows.len());
        Self { size, rows }
    }

    /// Side length of the (square) matrix.
    #[must_use]
    pub const fn size(self) -> usize {
        self.size as usize
    }

    #[must_use]
    pub const fn is_occupied(self, x: usize, y: usize) -> bool {
        x < self.size() && y < self.size() && (self.rows[y] >> x) & 1 != 0
    }

    /// Returns an iterator of occupied `(x, y)` cells within the matrix.
    pub fn occupied_cells(self) -> impl Iterator<Item = (u8, u8)> {
        (0..self.size).flat_map(move |y| {
            (0..self.size).filter_map(move |x| {
                self.is_occupied(usize::from(x), usize::from(y))
                    .then_some((x, y))
            })
        })
    }

    /// Rotates the matrix a quarter-turn clockwise.
    ///
    /// The cell at `(row, col)` moves to `(col, N−1−row)`; the matrix size is
    /// preserved, so four applications return the original shape.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        let n = self.size();
        let mut rows = [0_u8; 4];
        let mut y = 0;
        while y < n {
            let mut x = 0;
            while x < n {
                if (self.rows[y] >> x) & 1 != 0 {
                    rows[x] |= 1 << (n - 1 - y);
                }
                x += 1;
            }
            y += 1;
        }
        Self {
            size: self.size,
            rows,
        }
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece (long bar).
    I = 0,
    /// O-piece (square).
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(0..=6) {
            0 => PieceKind::I,
            1 => PieceKind::O,
            2 => PieceKind::S,
            3 => PieceKind::Z,
            4 => PieceKind::J,
            5 => PieceKind::L,
            _ => PieceKind::T,
        }
    }
}

impl PieceKind {
    /// Number of piece kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
        PieceKind::T,
    ];

    /// Returns the catalog shape for this kind in its spawn orientation.
    #[must_use]
    pub const fn base_shape(self) -> Shape {
        BASE_SHAPES[self as usize]
    }
}

const BASE_SHAPES: [Shape; PieceKind::LEN] = {
    const fn m(bits: [bool; 4]) -> u8 {
        let mut mask = 0;
        let mut i = 0;
        while i < 4 {
            if bits[i] {
                mask |= 1 << i;
            }
            i += 1;
        }
        mask
    }

    const C: bool = true;
    const E: bool = false;
    const EEEE: u8 = m([E; 4]);

    [
        // I-piece
        Shape::new(4, [EEEE, m([C, C, C, C]), EEEE, EEEE]),
        // O-piece
        Shape::new(2, [m([C, C, E, E]), m([C, C, E, E]), EEEE, EEEE]),
        // S-piece
        Shape::new(3, [m([E, C, C, E]), m([C, C, E, E]), EEEE, EEEE]),
        // Z-piece
        Shape::new(3, [m([C, C, E, E]), m([E, C, C, E]), EEEE, EEEE]),
        // J-piece
        Shape::new(3, [m([C, E, E, E]), m([C, C, C, E]), EEEE, EEEE]),
        // L-piece
        Shape::new(3, [m([E, E, C, E]), m([C, C, C, E]), EEEE, EEEE]),
        // T-piece
        Shape::new(3, [m([E, C, E, E]), m([C, C, C, E]), EEEE, EEEE]),
    ]
};
