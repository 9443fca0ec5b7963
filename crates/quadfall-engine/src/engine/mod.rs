//! Game engine logic and state management.
//!
//! This module layers the game rules on top of the core data structures:
//!
//! - [`Game`] - Authoritative state (board, falling/next piece, score,
//!   level, lifecycle phase) behind a discrete command API
//! - [`Command`] - The command vocabulary collaborators inject
//! - [`GameDriver`] - Owns the automatic-drop and flash deadlines
//! - [`PieceSource`] - Uniform random piece generation, seedable for replay
//! - [`Snapshot`] - Read-only view published to renderers
//! - [`scoring`] - Score tiers, level curve and fall-interval table
//!
//! # Game Flow
//!
//! 1. Build a [`Game`] (it starts in `NotStarted`) and wrap it in a
//!    [`GameDriver`]
//! 2. Issue [`Command::Reset`] to enter `Running`
//! 3. Feed player input through [`GameDriver::command`] and drive time with
//!    [`GameDriver::poll`] at [`GameDriver::next_deadline`]
//! 4. Render from [`Game::snapshot`] after every change
//! 5. The session ends when a piece locks at the top; reset starts over

pub use self::{command::*, driver::*, game::*, piece_source::*, snapshot::*};

pub mod scoring;

mod command;
mod driver;
mod game;
mod piece_source;
mod snapshot;
