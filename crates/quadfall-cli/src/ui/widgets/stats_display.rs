use quadfall_engine::Snapshot;
use ratatui::{
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Widget},
};

use crate::ui::widgets::{block_horizontal_margin, block_vertical_margin};

/// Score, record, level and line count panel.
#[derive(Debug)]
pub struct StatsDisplay<'a> {
    snapshot: &'a Snapshot,
    high_score: usize,
    block: Option<Block<'a>>,
}

const PANEL_COLUMNS: u16 = 16;

impl<'a> StatsDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot, high_score: usize) -> Self {
        Self {
            snapshot,
            high_score,
            block: None,
        }
    }

    pub fn block(self, block: Block<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        PANEL_COLUMNS + block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        4 + block_vertical_margin(self.block.as_ref())
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let width = usize::from(PANEL_COLUMNS);
        let row = |label: &str, value: usize| {
            let value = value.to_string();
            let padding = width.saturating_sub(label.len() + value.len());
            Line::from(format!("{label}{}{value}", " ".repeat(padding)))
        };
        vec![
            row("Score", self.snapshot.score()),
            row("Record", self.high_score.max(self.snapshot.score())),
            row("Level", self.snapshot.level()),
            row("Lines", self.snapshot.lines()),
        ]
    }
}

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let inner = self.block.as_ref().map_or(area, |block| {
            block.render(area, buf);
            block.inner(area)
        });
        Text::from(self.lines()).render(inner, buf);
    }
}
