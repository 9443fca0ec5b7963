use std::time::{Duration, Instant};

use super::{command::Command, game::Game};

/// How long cleared rows stay highlighted before the flash indicator drops.
pub const FLASH_DURATION: Duration = Duration::from_millis(300);

/// Owns a [`Game`] together with its two one-shot deadlines: the automatic
/// drop and the clear-flash expiry.
///
/// Every method takes an explicit `now` instead of reading a clock, so timing
/// behavior is deterministic under test. The fall deadline is rearmed exactly
/// when the pair (running?, fall interval) changes — a pause, game over or
/// reset cancels it unconditionally, a level-up reschedules at the new
/// cadence — and after every gravity fire. Callers drive the deadlines by
/// sleeping until [`next_deadline`](Self::next_deadline) and then calling
/// [`poll`](Self::poll).
#[derive(Debug, Clone)]
pub struct GameDriver {
    game: Game,
    fall_deadline: Option<Instant>,
    flash_deadline: Option<Instant>,
}

impl GameDriver {
    #[must_use]
    pub fn new(game: Game) -> Self {
        Self {
            game,
            fall_deadline: None,
            flash_deadline: None,
        }
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Applies a command and resynchronizes the deadlines.
    pub fn command(&mut self, command: Command, now: Instant) {
        let timing_before = self.timing_key();
        let locks_before = self.game.pieces_locked();

        self.game.apply(command);

        if self.timing_key() != timing_before {
            self.rearm_fall(now);
        }
        self.sync_flash(locks_before, now);
    }

    /// Fires any deadline that is due; returns whether state changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if self.flash_deadline.is_some_and(|at| now >= at) {
            self.flash_deadline = None;
            self.game.clear_flash();
            changed = true;
        }

        if self.fall_deadline.is_some_and(|at| now >= at) {
            let locks_before = self.game.pieces_locked();
            self.game.apply_gravity();
            self.rearm_fall(now);
            self.sync_flash(locks_before, now);
            changed = true;
        }

        changed
    }

    /// The next instant at which [`poll`](Self::poll) has work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.fall_deadline, self.flash_deadline) {
            (Some(fall), Some(flash)) => Some(fall.min(flash)),
            (fall, flash) => fall.or(flash),
        }
    }

    fn timing_key(&self) -> (bool, Duration) {
        (self.game.phase().is_running(), self.game.fall_interval())
    }

    fn rearm_fall(&mut self, now: Instant) {
        self.fall_deadline = self
            .game
            .phase()
            .is_running()
            .then(|| now + self.game.fall_interval());
    }

    fn sync_flash(&mut self, locks_before: usize, now: Instant) {
        if self.game.flashing_rows().is_empty() {
            self.flash_deadline = None;
        } else if self.game.pieces_locked() != locks_before {
            // A fresh lock restarts the flash window.
            self.flash_deadline = Some(now + FLASH_DURATION);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{Board, Piece, PieceKind},
        engine::{piece_source::PieceSource, scoring},
    };

    fn driver() -> (GameDriver, Instant) {
        let seed = "17".repeat(16).parse().unwrap();
        let driver = GameDriver::new(Game::with_source(PieceSource::with_seed(seed)));
        (driver, Instant::now())
    }

    #[test]
    fn test_no_deadline_before_start() {
        let (driver, _) = driver();
        assert_eq!(driver.next_deadline(), None);
    }

    #[test]
    fn test_reset_arms_the_fall_deadline() {
        let (mut driver, now) = driver();
        driver.command(Command::Reset, now);
        assert_eq!(driver.next_deadline(), Some(now + scoring::fall_interval(1)));
    }

    #[test]
    fn test_moves_do_not_reschedule_gravity() {
        let (mut driver, now) = driver();
        driver.command(Command::Reset, now);
        let armed = driver.next_deadline();

        let later = now + Duration::from_millis(100);
        driver.command(Command::MoveLeft, later);
        driver.command(Command::Rotate, later);
        assert_eq!(driver.next_deadline(), armed);
    }

    #[test]
    fn test_gravity_fires_and_rearms() {
        let (mut driver, now) = driver();
        driver.command(Command::Reset, now);

        let before_deadline = now + Duration::from_millis(100);
        assert!(!driver.poll(before_deadline));

        let at_deadline = now + scoring::fall_interval(1);
        let y_before = driver.game().active_piece().position().y();
        assert!(driver.poll(at_deadline));
        assert_eq!(driver.game().active_piece().position().y(), y_before + 1);
        assert_eq!(
            driver.next_deadline(),
            Some(at_deadline + scoring::fall_interval(1)),
        );
    }

    #[test]
    fn test_pause_disarms_and_resume_rearms() {
        let (mut driver, now) = driver();
        driver.command(Command::Reset, now);

        driver.command(Command::TogglePause, now);
        assert_eq!(driver.next_deadline(), None);

        let later = now + Duration::from_secs(5);
        driver.command(Command::TogglePause, later);
        assert_eq!(
            driver.next_deadline(),
            Some(later + scoring::fall_interval(1)),
        );
    }

    #[test]
    fn test_game_over_disarms_the_fall_deadline() {
        let (mut driver, now) = driver();
        driver.command(Command::Reset, now);

        // A blocker right under the spawn area forces an immediate top lock.
        driver
            .game
            .board_mut()
            .settle_piece(&Piece::at(PieceKind::O, 4, 2));
        driver.game.set_active(Piece::spawn(PieceKind::O));

        driver.command(Command::HardDrop, now);
        assert!(driver.game().phase().is_game_over());
        assert_eq!(driver.next_deadline(), None);
    }

    #[test]
    fn test_level_up_reschedules_at_the_new_cadence() {
        let (mut driver, now) = driver();
        driver.command(Command::Reset, now);
        driver.game.set_score(999);
        driver.game.set_active(Piece::spawn(PieceKind::T));

        let later = now + Duration::from_millis(10);
        driver.command(Command::SoftDrop, later);

        assert_eq!(driver.game().level(), 2);
        assert_eq!(
            driver.next_deadline(),
            Some(later + scoring::fall_interval(2)),
        );
    }

    #[test]
    fn test_flash_is_armed_by_a_clearing_lock_and_expires() {
        let (mut driver, now) = driver();
        driver.command(Command::Reset, now);

        let board = driver.game.board_mut();
        let floor_y = i8::try_from(Board::HEIGHT).unwrap() - 2;
        board.settle_piece(&Piece::at(PieceKind::I, 0, floor_y));
        board.settle_piece(&Piece::at(PieceKind::I, 6, floor_y));
        driver.game.set_active(Piece::spawn(PieceKind::O));

        driver.command(Command::HardDrop, now);
        assert!(!driver.game().flashing_rows().is_empty());

        // The flash deadline is the nearest one.
        assert_eq!(driver.next_deadline(), Some(now + FLASH_DURATION));

        assert!(driver.poll(now + FLASH_DURATION));
        assert!(driver.game().flashing_rows().is_empty());

        // Gravity stays armed after the flash expires.
        assert_eq!(
            driver.next_deadline(),
            Some(now + scoring::fall_interval(1)),
        );
    }

    #[test]
    fn test_reset_drops_a_pending_flash() {
        let (mut driver, now) = driver();
        driver.command(Command::Reset, now);

        let board = driver.game.board_mut();
        let floor_y = i8::try_from(Board::HEIGHT).unwrap() - 2;
        board.settle_piece(&Piece::at(PieceKind::I, 0, floor_y));
        board.settle_piece(&Piece::at(PieceKind::I, 6, floor_y));
        driver.game.set_active(Piece::spawn(PieceKind::O));
        driver.command(Command::HardDrop, now);
        assert!(!driver.game().flashing_rows().is_empty());

        driver.command(Command::Reset, now);
        assert!(driver.game().flashing_rows().is_empty());
        // Only the fall deadline remains armed.
        assert_eq!(
            driver.next_deadline(),
            Some(now + scoring::fall_interval(1)),
        );
    }
}
