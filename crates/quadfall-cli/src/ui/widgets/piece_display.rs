use quadfall_engine::PieceKind;
use ratatui::{
    prelude::{Buffer, Rect},
    widgets::{Block, Widget},
};

use crate::ui::widgets::{CellDisplay, block_horizontal_margin, block_vertical_margin};

/// Preview of a single piece kind in its spawn orientation (the NEXT panel).
#[derive(Debug, Default)]
pub struct PieceDisplay<'a> {
    kind: Option<PieceKind>,
    block: Option<Block<'a>>,
}

// Largest piece matrix; smaller shapes render into the same box.
const PREVIEW_CELLS: u16 = 4;

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(self, kind: PieceKind) -> Self {
        Self {
            kind: Some(kind),
            ..self
        }
    }

    pub fn block(self, block: Block<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        PREVIEW_CELLS * CellDisplay::width() + block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        // The tallest spawn orientation only uses two matrix rows.
        2 + block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let inner = self.block.as_ref().map_or(area, |block| {
            block.render(area, buf);
            block.inner(area)
        });

        let Some(kind) = self.kind else {
            return;
        };
        let shape = kind.base_shape();
        let display = CellDisplay::from_kind(kind);
        // Center the matrix horizontally within the 4-cell preview box.
        let offset = (PREVIEW_CELLS - u16::try_from(shape.size()).unwrap_or(PREVIEW_CELLS))
            * CellDisplay::width()
            / 2;
        for (x, y) in shape.occupied_cells() {
            let cell_x = inner.x + offset + u16::from(x) * CellDisplay::width();
            let cell_y = inner.y + u16::from(y);
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
