use std::time::Duration;

use serde::Serialize;

use crate::core::{Board, Cell, Piece, PieceKind};

use super::game::{Game, GamePhase};

/// A cell of the derived render grid.
///
/// `Active` and `Ghost` exist only in this projection; the board itself
/// stores nothing but settled cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectedCell {
    Empty,
    Settled(PieceKind),
    Active(PieceKind),
    Ghost,
}

/// Read-only view of the game state, published after every state change.
///
/// Collaborators render from this and never touch the [`Game`] directly.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    board: Board,
    active: Piece,
    ghost: Option<Piece>,
    next: PieceKind,
    score: usize,
    level: usize,
    lines: usize,
    phase: GamePhase,
    fall_interval: Duration,
    flashing_rows: Vec<usize>,
}

impl Game {
    /// Captures the current state for rendering or inspection.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board().clone(),
            active: self.active_piece(),
            ghost: self.ghost_piece(),
            next: self.next_piece(),
            score: self.score(),
            level: self.level(),
            lines: self.lines(),
            phase: self.phase(),
            fall_interval: self.fall_interval(),
            flashing_rows: self.flashing_rows().to_vec(),
        }
    }
}

impl Snapshot {
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> Piece {
        self.active
    }

    #[must_use]
    pub fn ghost_piece(&self) -> Option<Piece> {
        self.ghost
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub fn lines(&self) -> usize {
        self.lines
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn started(&self) -> bool {
        !self.phase.is_not_started()
    }

    #[must_use]
    pub fn paused(&self) -> bool {
        self.phase.is_paused()
    }

    #[must_use]
    pub fn game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    #[must_use]
    pub fn flashing_rows(&self) -> &[usize] {
        &self.flashing_rows
    }

    /// Derives the render grid: settled cells with the falling piece and its
    /// landing preview overlaid while a piece is in play.
    ///
    /// The overlay is computed here on demand — it is never part of the
    /// persisted board, so collision checks can never confuse the falling
    /// piece with settled content.
    #[must_use]
    pub fn projected_rows(&self) -> [[ProjectedCell; Board::WIDTH]; Board::HEIGHT] {
        let mut rows = [[ProjectedCell::Empty; Board::WIDTH]; Board::HEIGHT];
        for (y, row) in self.board.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if let Cell::Settled(kind) = cell {
                    rows[y][x] = ProjectedCell::Settled(*kind);
                }
            }
        }

        let piece_in_play = matches!(self.phase, GamePhase::Running | GamePhase::Paused);
        if !piece_in_play {
            return rows;
        }

        if let Some(ghost) = self.ghost {
            for (x, y) in ghost.occupied_board_cells() {
                if let Some((x, y)) = Board::cell_index(x, y)
                    && rows[y][x] == ProjectedCell::Empty
                {
                    rows[y][x] = ProjectedCell::Ghost;
                }
            }
        }
        for (x, y) in self.active.occupied_board_cells() {
            if let Some((x, y)) = Board::cell_index(x, y) {
                rows[y][x] = ProjectedCell::Active(self.active.kind());
            }
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{command::Command, piece_source::PieceSource};

    fn started_game() -> Game {
        let seed = "0f".repeat(16).parse().unwrap();
        let mut game = Game::with_source(PieceSource::with_seed(seed));
        game.apply(Command::Reset);
        game
    }

    fn count_cells(
        rows: &[[ProjectedCell; Board::WIDTH]; Board::HEIGHT],
        pred: impl Fn(ProjectedCell) -> bool,
    ) -> usize {
        rows.iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| pred(cell))
            .count()
    }

    #[test]
    fn test_projection_overlays_active_and_ghost() {
        let game = started_game();
        let snapshot = game.snapshot();
        let rows = snapshot.projected_rows();

        let kind = snapshot.active_piece().kind();
        assert_eq!(
            count_cells(&rows, |c| c == ProjectedCell::Active(kind)),
            4,
        );
        // On an empty board the ghost sits strictly below the fresh spawn.
        assert_eq!(count_cells(&rows, |c| c == ProjectedCell::Ghost), 4);
        for (x, y) in snapshot.active_piece().occupied_board_cells() {
            let (x, y) = Board::cell_index(x, y).unwrap();
            assert_eq!(rows[y][x], ProjectedCell::Active(kind));
        }
    }

    #[test]
    fn test_projection_has_no_overlay_before_start() {
        let seed = "0f".repeat(16).parse().unwrap();
        let game = Game::with_source(PieceSource::with_seed(seed));
        let rows = game.snapshot().projected_rows();
        assert_eq!(count_cells(&rows, |c| c != ProjectedCell::Empty), 0);
    }

    #[test]
    fn test_projection_keeps_settled_cells_under_the_ghost() {
        let mut game = started_game();
        game.apply(Command::HardDrop);
        let snapshot = game.snapshot();
        let rows = snapshot.projected_rows();

        // The locked piece stays settled in the projection.
        assert_eq!(
            count_cells(&rows, |c| matches!(c, ProjectedCell::Settled(_))),
            4,
        );
    }

    #[test]
    fn test_snapshot_carries_the_ghost() {
        let game = started_game();
        let snapshot = game.snapshot();
        let ghost = snapshot.ghost_piece().unwrap();
        assert_eq!(ghost.kind(), snapshot.active_piece().kind());
        assert!(ghost.position().y() > snapshot.active_piece().position().y());
    }

    #[test]
    fn test_snapshot_flags_follow_the_phase() {
        let mut game = started_game();
        let snapshot = game.snapshot();
        assert!(snapshot.started());
        assert!(!snapshot.paused());
        assert!(!snapshot.game_over());

        game.apply(Command::TogglePause);
        let snapshot = game.snapshot();
        assert!(snapshot.started() && snapshot.paused());
    }

    #[test]
    fn test_snapshot_serializes() {
        let game = started_game();
        let json = serde_json::to_value(game.snapshot()).unwrap();
        assert!(json.get("score").is_some());
        assert!(json.get("board").is_some());
        assert_eq!(json["phase"], "Running");
    }
}
