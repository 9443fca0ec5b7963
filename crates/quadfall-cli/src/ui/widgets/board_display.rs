use quadfall_engine::{Board, Snapshot};
use ratatui::{
    prelude::{Buffer, Rect},
    widgets::{Block, Widget},
};

use crate::ui::widgets::{CellDisplay, block_horizontal_margin, block_vertical_margin};

/// The playing field, rendered from a snapshot's derived projection.
///
/// Rows pending a clear-flash are painted solid white for the duration of
/// the flash window.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    snapshot: &'a Snapshot,
    show_ghost: bool,
    block: Option<Block<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            show_ghost: true,
            block: None,
        }
    }

    pub fn show_ghost(self, show_ghost: bool) -> Self {
        Self { show_ghost, ..self }
    }

    pub fn block(self, block: Block<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        u16::try_from(Board::WIDTH).unwrap_or(u16::MAX) * CellDisplay::width()
            + block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(Board::HEIGHT).unwrap_or(u16::MAX)
            + block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let inner = self.block.as_ref().map_or(area, |block| {
            block.render(area, buf);
            block.inner(area)
        });

        let rows = self.snapshot.projected_rows();
        for (y, row) in rows.iter().enumerate() {
            let flashing = self.snapshot.flashing_rows().contains(&y);
            for (x, &cell) in row.iter().enumerate() {
                let display = if flashing {
                    CellDisplay::flash()
                } else {
                    CellDisplay::from_projected(cell, self.show_ghost)
                };
                let cell_x = inner.x + u16::try_from(x).unwrap_or(0) * CellDisplay::width();
                let cell_y = inner.y + u16::try_from(y).unwrap_or(0);
                if cell_y >= inner.bottom() {
                    continue;
                }
                for index in 0..usize::from(CellDisplay::width()) {
                    let column = cell_x + u16::try_from(index).unwrap_or(0);
                    if column >= inner.right() {
                        continue;
                    }
                    if let Some(buf_cell) = buf.cell_mut((column, cell_y)) {
                        display.draw(buf_cell, index);
                    }
                }
            }
        }
    }
}
