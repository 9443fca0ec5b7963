use std::time::Duration;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::core::{Board, Piece, PieceKind};

use super::{command::Command, piece_source::PieceSource, scoring};

/// Lifecycle phase of a game session.
///
/// `NotStarted → Running ⇄ Paused → GameOver`; a reset re-enters `Running`
/// from any phase with a freshly built board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant,
)]
pub enum GamePhase {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// The authoritative game state and its command API.
///
/// Owns the board, the falling and next pieces, score, level, line count and
/// lifecycle phase. Every mutation happens through [`apply`](Self::apply) or
/// the gravity hook, runs to completion against the current state, and is
/// gated by [`Board::collides`] before anything is written. Illegal commands
/// leave the state untouched; there are no error returns.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    active: Piece,
    next: PieceKind,
    source: PieceSource,
    score: usize,
    level: usize,
    lines: usize,
    pieces_locked: usize,
    phase: GamePhase,
    fall_interval: Duration,
    flashing_rows: ArrayVec<usize, { Board::HEIGHT }>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates a not-yet-started game with an OS-seeded piece source.
    #[must_use]
    pub fn new() -> Self {
        Self::with_source(PieceSource::new())
    }

    /// Like [`Self::new`], but drawing pieces from the given source.
    #[must_use]
    pub fn with_source(mut source: PieceSource) -> Self {
        let active = Piece::spawn(source.draw());
        let next = source.draw();
        Self {
            board: Board::new(),
            active,
            next,
            source,
            score: 0,
            level: 1,
            lines: 0,
            pieces_locked: 0,
            phase: GamePhase::NotStarted,
            fall_interval: scoring::fall_interval(1),
            flashing_rows: ArrayVec::new(),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn active_piece(&self) -> Piece {
        self.active
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

    /// Total number of pieces locked into the board since the last reset.
    #[must_use]
    pub fn pieces_locked(&self) -> usize {
        self.pieces_locked
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        self.fall_interval
    }

    /// Row indices pending a visual clear-flash, replaced on every lock.
    #[must_use]
    pub fn flashing_rows(&self) -> &[usize] {
        &self.flashing_rows
    }

    /// Landing preview of the falling piece, if it would rest below it.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<Piece> {
        let dropped = self.active.dropped(&self.board);
        (dropped.position() != self.active.position()).then_some(dropped)
    }

    /// Applies a command against the current state.
    ///
    /// Commands other than `Reset` and `TogglePause` only act while Running;
    /// anywhere else they are silent no-ops.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveLeft => self.move_active(Piece::left),
            Command::MoveRight => self.move_active(Piece::right),
            Command::SoftDrop => self.soft_drop(),
            Command::Rotate => self.rotate(),
            Command::HardDrop => self.hard_drop(),
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => self.reset(),
        }
    }

    /// Timer-driven descent.
    ///
    /// Shares the soft-drop path, including its one-point award and the lock
    /// branch when the piece can no longer move down.
    pub fn apply_gravity(&mut self) {
        self.soft_drop();
    }

    /// Drops the transient clear-flash indicator.
    ///
    /// Called by the owner when the flash timeout expires; clearing an
    /// already-empty set is harmless.
    pub fn clear_flash(&mut self) {
        self.flashing_rows.clear();
    }

    fn move_active(&mut self, step: fn(&Piece) -> Piece) {
        if !self.phase.is_running() {
            return;
        }
        let candidate = step(&self.active);
        if !self.board.collides(&candidate) {
            self.active = candidate;
        }
    }

    fn soft_drop(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        let candidate = self.active.down();
        if self.board.collides(&candidate) {
            self.lock_active();
        } else {
            self.active = candidate;
            self.award(scoring::SOFT_DROP_POINTS);
        }
    }

    fn rotate(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        if let Some(piece) = self.active.kicked_rotation(&self.board) {
            self.active = piece;
        }
    }

    fn hard_drop(&mut self) {
        if !self.phase.is_running() {
            return;
        }
        let mut distance = 0;
        loop {
            let candidate = self.active.down();
            if self.board.collides(&candidate) {
                break;
            }
            self.active = candidate;
            distance += 1;
        }
        self.award(distance * scoring::HARD_DROP_POINTS);
        self.lock_active();
    }

    fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
            // NotStarted needs a reset first; GameOver is final.
            phase => phase,
        };
    }

    fn reset(&mut self) {
        self.board = Board::new();
        self.active = Piece::spawn(self.source.draw());
        self.next = self.source.draw();
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.pieces_locked = 0;
        self.fall_interval = scoring::fall_interval(1);
        self.flashing_rows.clear();
        self.phase = GamePhase::Running;
    }

    /// Settles the falling piece and runs the end-of-turn sequence:
    /// clear + score, level refresh, then game-over check or promotion.
    fn lock_active(&mut self) {
        // Locking with the anchor still at the top row means the stack has
        // reached the spawn area.
        let locked_near_top = self.active.position().y() < 1;

        self.board.settle_piece(&self.active);
        self.pieces_locked += 1;
        let cleared = self.board.clear_completed_rows();
        self.flashing_rows.clear();
        if !cleared.is_empty() {
            self.score += scoring::line_clear_score(cleared.count(), self.level);
            self.lines += cleared.count();
            self.flashing_rows
                .try_extend_from_slice(cleared.rows())
                .expect("cleared rows fit the board height");
            self.refresh_level();
        }

        if locked_near_top {
            self.phase = GamePhase::GameOver;
        } else {
            self.active = Piece::spawn(self.next);
            self.next = self.source.draw();
        }
    }

    fn award(&mut self, points: usize) {
        self.score += points;
        self.refresh_level();
    }

    fn refresh_level(&mut self) {
        let level = scoring::level_for_score(self.score);
        if level != self.level {
            self.level = level;
            self.fall_interval = scoring::fall_interval(level);
        }
    }
}

#[cfg(test)]
impl Game {
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub(crate) fn set_active(&mut self, piece: Piece) {
        self.active = piece;
    }

    pub(crate) fn set_score(&mut self, score: usize) {
        self.score = score;
        self.refresh_level();
    }
}
