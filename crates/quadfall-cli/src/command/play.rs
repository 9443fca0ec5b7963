use std::{path::PathBuf, time::Instant};

use anyhow::Context as _;
use crossterm::event::{Event, KeyCode};
use quadfall_engine::{Command, Game, GameDriver, PieceSource, Seed};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Text,
};
use tui_runtime::{App, RenderMode, Runtime};

use crate::{highscore::HighScoreStore, ui::widgets::SessionDisplay};

const DEFAULT_HIGH_SCORE_FILE: &str = "./data/highscore.json";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for a reproducible piece sequence (32 hex characters)
    #[clap(long)]
    seed: Option<Seed>,
    /// Hide the landing preview
    #[clap(long)]
    no_ghost: bool,
    /// File the high score is persisted in
    #[clap(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            no_ghost: false,
            high_score_file: PathBuf::from(DEFAULT_HIGH_SCORE_FILE),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let source = arg.seed.map_or_else(PieceSource::new, PieceSource::with_seed);
    let high_scores = HighScoreStore::load(arg.high_score_file.clone());

    let mut app = PlayApp::new(Game::with_source(source), !arg.no_ghost, high_scores);
    Runtime::new()
        .run(&mut app)
        .context("terminal session failed")?;

    app.into_high_scores().save()
}

#[derive(Debug)]
struct PlayApp {
    driver: GameDriver,
    show_ghost: bool,
    high_scores: HighScoreStore,
    is_exiting: bool,
}

impl PlayApp {
    fn new(game: Game, show_ghost: bool, high_scores: HighScoreStore) -> Self {
        Self {
            driver: GameDriver::new(game),
            show_ghost,
            high_scores,
            is_exiting: false,
        }
    }

    fn into_high_scores(self) -> HighScoreStore {
        self.high_scores
    }

    fn handle_key(&mut self, code: KeyCode) {
        let now = Instant::now();
        let phase = self.driver.game().phase();
        match code {
            KeyCode::Char('q') => self.is_exiting = true,
            // Enter starts a fresh game from the start screen or after a
            // game over; mid-game it does nothing (use 'r' to restart).
            KeyCode::Enter if phase.is_not_started() || phase.is_game_over() => {
                self.driver.command(Command::Reset, now);
            }
            KeyCode::Char('r') => self.driver.command(Command::Reset, now),
            KeyCode::Char('p') | KeyCode::Esc => self.driver.command(Command::TogglePause, now),
            KeyCode::Left => self.driver.command(Command::MoveLeft, now),
            KeyCode::Right => self.driver.command(Command::MoveRight, now),
            KeyCode::Down => self.driver.command(Command::SoftDrop, now),
            KeyCode::Up => self.driver.command(Command::Rotate, now),
            KeyCode::Char(' ') => self.driver.command(Command::HardDrop, now),
            _ => {}
        }
    }

    fn record_outcome(&mut self) {
        let game = self.driver.game();
        if game.phase().is_game_over() && game.score() > 0 {
            self.high_scores.submit(game.score());
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        // Held-down movement keys repeat faster than the terminal needs to
        // repaint; batch them.
        runtime.set_render_mode(RenderMode::throttled_from_rate(60.0));
        runtime.set_deadline(self.driver.next_deadline());
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(event) = event.as_key_event() {
            self.handle_key(event.code);
        }
        self.record_outcome();
        runtime.set_deadline(self.driver.next_deadline());
    }

    fn on_deadline(&mut self, runtime: &mut Runtime) {
        self.driver.poll(Instant::now());
        self.record_outcome();
        runtime.set_deadline(self.driver.next_deadline());
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.driver.game().snapshot();
        let session_display = SessionDisplay::new(&snapshot, self.high_scores.best())
            .show_ghost(self.show_ghost);

        let help_text = if snapshot.paused() {
            "Controls: P / Esc (Resume) | Q (Quit)"
        } else if !snapshot.started() || snapshot.game_over() {
            "Controls: Enter (New Game) | Q (Quit)"
        } else {
            "Controls: \u{2190} \u{2192} (Move) | \u{2193} (Soft Drop) | \u{2191} (Rotate) | Space (Hard Drop) | P (Pause) | R (Restart) | Q (Quit)"
        };
        let help_text = Text::from(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(23), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }
}
