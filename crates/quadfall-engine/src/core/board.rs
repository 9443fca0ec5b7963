use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{piece::Piece, shape::PieceKind};

/// A single cell of the board.
///
/// The board only ever stores settled pieces. The falling piece and its
/// landing preview are derived projections computed at render time
/// (see [`Snapshot`](crate::engine::Snapshot)), never written here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Cell {
    /// Empty cell (no piece).
    #[default]
    Empty,
    /// Cell occupied by a locked piece of the given kind.
    Settled(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
}

/// Rows removed by a single line-clear pass.
///
/// Holds the board-row indices (ascending) of the cleared rows, used for the
/// transient clear-flash indicator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearedRows {
    rows: ArrayVec<usize, { Board::HEIGHT }>,
}

impl ClearedRows {
    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The playing field: a fixed 10×20 grid of cells.
///
/// Dimensions never change; only cell contents mutate, and only through
/// [`settle_piece`](Self::settle_piece) and
/// [`clear_completed_rows`](Self::clear_completed_rows).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Board {
    rows: [[Cell; Self::WIDTH]; Self::HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 20;

    /// Creates an all-empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rows: [[Cell::Empty; Self::WIDTH]; Self::HEIGHT],
        }
    }

    /// Checks whether `(x, y)` lies within the grid.
    #[must_use]
    pub fn in_bounds(x: i16, y: i16) -> bool {
        Self::cell_index(x, y).is_some()
    }

    /// Converts signed board coordinates into grid indices, if in bounds.
    pub(crate) fn cell_index(x: i16, y: i16) -> Option<(usize, usize)> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < Self::WIDTH && y < Self::HEIGHT).then_some((x, y))
    }

    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> Cell {
        self.rows[y][x]
    }

    /// Returns an iterator over the board rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell; Self::WIDTH]> {
        self.rows.iter()
    }

    /// Tests a candidate placement against bounds and settled cells.
    ///
    /// Returns `true` if any occupied cell of the piece would fall outside
    /// the grid or land on a settled cell. This predicate is the single
    /// legality gate for every movement, rotation, and drop: callers apply a
    /// mutation only when it returns `false` for the candidate.
    #[must_use]
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.occupied_board_cells().any(|(x, y)| {
            Self::cell_index(x, y).is_none_or(|(x, y)| !self.rows[y][x].is_empty())
        })
    }

    /// Writes the piece's occupied cells into the board as settled cells.
    ///
    /// Callers must only settle placements that do not collide; out-of-bounds
    /// cells are skipped rather than wrapped.
    pub fn settle_piece(&mut self, piece: &Piece) {
        for (x, y) in piece.occupied_board_cells() {
            if let Some((x, y)) = Self::cell_index(x, y) {
                self.rows[y][x] = Cell::Settled(piece.kind());
            }
        }
    }

    /// Removes completed rows and compacts the board.
    ///
    /// A row is complete when every cell is non-empty. Surviving rows keep
    /// their relative order and shift down; an equal number of empty rows
    /// appears at the top, so the height never changes. Applying this to its
    /// own output clears nothing further.
    pub fn clear_completed_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::default();
        let mut count = 0;
        for y in (0..Self::HEIGHT).rev() {
            if self.rows[y].iter().all(|cell| !cell.is_empty()) {
                cleared.rows.push(y);
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill([Cell::Empty; Self::WIDTH]);
        cleared.rows.reverse();
        cleared
    }
}
