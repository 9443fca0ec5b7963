use serde::{Deserialize, Serialize};

use super::{
    board::Board,
    shape::{PieceKind, Shape},
};

/// Kick offsets tried, in priority order, when a naive rotation collides.
///
/// This is a fixed empirical list, not a standard rotation system: no
/// per-orientation tables and no piece-specific patterns beyond the extra
/// long-bar offsets below.
const KICK_OFFSETS: [(i8, i8); 6] = [(0, 0), (1, 0), (-1, 0), (0, 1), (2, 0), (-2, 0)];

/// Additional offsets appended after the base six for the long bar, whose
/// 4×4 matrix needs more room near the walls.
const LONG_BAR_KICK_OFFSETS: [(i8, i8); 4] = [(-2, -1), (2, -1), (-2, 1), (2, 1)];

/// Anchor position of a piece on the board.
///
/// Coordinates are signed: kick offsets and tall orientations can push the
/// matrix anchor past a board edge while every occupied cell stays inside.
/// (0, 0) is the top-left corner; x grows rightward, y downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Position {
    x: i8,
    y: i8,
}

impl Position {
    /// Spawn anchor: horizontally centered, top row.
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const SPAWN: Self = Self::new((Board::WIDTH / 2 - 1) as i8, 0);

    #[must_use]
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i8 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i8 {
        self.y
    }

    #[must_use]
    const fn translated(self, dx: i8, dy: i8) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// The falling piece: a kind, its current orientation matrix, and an anchor.
///
/// Pieces are immutable values; movement and rotation return candidates that
/// the caller validates with [`Board::collides`] before committing. The
/// invariant that the committed piece never overlaps settled cells or leaves
/// the board is enforced before every mutation, never repaired after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Piece {
    kind: PieceKind,
    shape: Shape,
    position: Position,
}

impl Piece {
    /// Creates a piece of the given kind at the spawn anchor.
    #[must_use]
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: kind.base_shape(),
            position: Position::SPAWN,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns an iterator of the piece's occupied cells in board coordinates.
    pub fn occupied_board_cells(&self) -> impl Iterator<Item = (i16, i16)> {
        let (px, py) = (i16::from(self.position.x), i16::from(self.position.y));
        self.shape
            .occupied_cells()
            .map(move |(dx, dy)| (px + i16::from(dx), py + i16::from(dy)))
    }

    #[must_use]
    pub fn left(&self) -> Self {
        self.translated(-1, 0)
    }

    #[must_use]
    pub fn right(&self) -> Self {
        self.translated(1, 0)
    }

    #[must_use]
    pub fn down(&self) -> Self {
        self.translated(0, 1)
    }

    #[must_use]
    fn translated(&self, dx: i8, dy: i8) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape,
            position: self.position.translated(dx, dy),
        }
    }

    /// Rotates the orientation matrix a quarter-turn clockwise in place.
    #[must_use]
    pub fn rotated_clockwise(&self) -> Self {
        Self {
            kind: self.kind,
            shape: self.shape.rotated_clockwise(),
            position: self.position,
        }
    }

    /// Resolves a clockwise rotation against the board via the kick list.
    ///
    /// The square piece never rotates (its matrix is rotation-invariant, so
    /// the search is skipped outright). For every other kind the rotated
    /// matrix is tried at each kick offset in priority order, and the first
    /// placement that does not collide is returned with shape and position
    /// committed together. `None` means no offset fit; the caller keeps the
    /// piece unchanged.
    #[must_use]
    pub fn kicked_rotation(&self, board: &Board) -> Option<Self> {
        if self.kind == PieceKind::O {
            return None;
        }
        let rotated = self.rotated_clockwise();
        let extra: &[(i8, i8)] = match self.kind {
            PieceKind::I => &LONG_BAR_KICK_OFFSETS,
            _ => &[],
        };
        KICK_OFFSETS
            .iter()
            .chain(extra)
            .map(|&(dx, dy)| rotated.translated(dx, dy))
            .find(|candidate| !board.collides(candidate))
    }

    /// Returns the piece advanced straight down to its resting position.
    #[must_use]
    pub fn dropped(&self, board: &Board) -> Self {
        let mut dropped = *self;
        loop {
            let below = dropped.down();
            if board.collides(&below) {
                return dropped;
            }
            dropped = below;
        }
    }
}

#[cfg(test)]
impl Piece {
    /// Test helper: a spawn-orientation piece at an arbitrary anchor.
    pub(crate) fn at(kind: PieceKind, x: i8, y: i8) -> Self {
        Self {
            position: Position::new(x, y),
            ..Self::spawn(kind)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_is_centered_on_the_top_row() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind);
            assert_eq!(piece.position(), Position::new(4, 0), "{kind:?}");
        }
    }

    #[test]
    fn test_movement_shifts_the_anchor() {
        let piece = Piece::spawn(PieceKind::T);
        assert_eq!(piece.left().position(), Position::new(3, 0));
        assert_eq!(piece.right().position(), Position::new(5, 0));
        assert_eq!(piece.down().position(), Position::new(4, 1));
    }

    #[test]
    fn test_rotating_four_times_restores_the_piece() {
        for kind in PieceKind::ALL {
            let piece = Piece::spawn(kind);
            let full_turn = piece
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise()
                .rotated_clockwise();
            assert_eq!(full_turn, piece, "{kind:?}");
        }
    }

    #[test]
    fn test_square_never_rotates() {
        let board = Board::new();
        assert_eq!(Piece::spawn(PieceKind::O).kicked_rotation(&board), None);
    }

    #[test]
    fn test_unobstructed_rotation_uses_the_identity_offset() {
        let board = Board::new();
        let piece = Piece::spawn(PieceKind::T).down().down();

        let rotated = piece.kicked_rotation(&board).unwrap();
        assert_eq!(rotated.position(), piece.position());
        assert_eq!(rotated.shape(), piece.shape().rotated_clockwise());
    }

    #[test]
    fn test_wall_flush_rotation_kicks_to_the_first_legal_offset() {
        let board = Board::new();
        // Vertical long bar hugging the left wall: column 2 of the matrix at
        // board column 0 puts the anchor at x = -2.
        let mut piece = Piece::spawn(PieceKind::I).rotated_clockwise().down();
        piece = Piece {
            position: Position::new(-2, piece.position().y()),
            ..piece
        };
        assert!(!board.collides(&piece));

        // The horizontal matrix spans columns 0..4, so offsets (0,0), (+1,0)
        // and (-1,0) stick out past the wall; (0,+1) shares the overhang, and
        // the first fit is (+2,0).
        let kicked = piece.kicked_rotation(&board).unwrap();
        assert_eq!(kicked.position(), Position::new(0, piece.position().y()));
    }

    #[test]
    fn test_boxed_in_rotation_is_rejected() {
        let mut board = Board::new();
        // Fill every column except the leftmost with stacked vertical bars,
        // leaving a one-cell-wide shaft at x = 0.
        let wall = Piece::spawn(PieceKind::I).rotated_clockwise();
        for x in 1..Board::WIDTH {
            for y in (0..Board::HEIGHT).step_by(4) {
                board.settle_piece(&Piece {
                    position: Position::new(
                        i8::try_from(x).unwrap() - 2,
                        i8::try_from(y).unwrap(),
                    ),
                    ..wall
                });
            }
        }

        // A vertical bar inside the shaft has no legal horizontal placement,
        // so every kick offset fails and the rotation is a silent no-op.
        let piece = Piece {
            position: Position::new(-2, 3),
            ..wall
        };
        assert!(!board.collides(&piece));
        assert_eq!(piece.kicked_rotation(&board), None);
    }

    #[test]
    fn test_dropped_rests_on_the_floor() {
        let board = Board::new();
        let dropped = Piece::spawn(PieceKind::O).dropped(&board);
        // The 2×2 matrix bottoms out with its last row on row 19.
        assert_eq!(dropped.position(), Position::new(4, 18));
        assert!(board.collides(&dropped.down()));
    }

    #[test]
    fn test_dropped_rests_on_settled_cells() {
        let mut board = Board::new();
        // A horizontal bar settled on the bottom row, under the spawn column.
        board.settle_piece(&Piece {
            position: Position::new(2, 18),
            ..Piece::spawn(PieceKind::I)
        });

        let dropped = Piece::spawn(PieceKind::O).dropped(&board);
        assert_eq!(dropped.position(), Position::new(4, 17));
    }
}
