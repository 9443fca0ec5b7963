use quadfall_engine::{PieceKind, ProjectedCell};
use ratatui::{buffer::Cell, style::Style};

use crate::ui::widgets::style;

/// How a single board cell is painted: a style plus a two-character symbol,
/// one character per terminal column of the cell.
#[derive(Debug)]
pub struct CellDisplay {
    style: Style,
    symbol: &'static str,
}

impl CellDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    /// Terminal columns per board cell.
    pub fn width() -> u16 {
        2
    }

    pub fn from_projected(cell: ProjectedCell, show_ghost: bool) -> Self {
        match cell {
            ProjectedCell::Empty => Self::new(style::EMPTY, "  "),
            ProjectedCell::Ghost if show_ghost => Self::new(style::GHOST, "[]"),
            ProjectedCell::Ghost => Self::new(style::EMPTY, "  "),
            ProjectedCell::Settled(kind) | ProjectedCell::Active(kind) => Self::from_kind(kind),
        }
    }

    pub fn from_kind(kind: PieceKind) -> Self {
        let style = match kind {
            PieceKind::I => style::I_CELL,
            PieceKind::O => style::O_CELL,
            PieceKind::S => style::S_CELL,
            PieceKind::Z => style::Z_CELL,
            PieceKind::J => style::J_CELL,
            PieceKind::L => style::L_CELL,
            PieceKind::T => style::T_CELL,
        };
        Self::new(style, "  ")
    }

    pub fn flash() -> Self {
        Self::new(style::FLASH, "  ")
    }

    /// Paints the `index`-th terminal column of this board cell.
    pub fn draw(&self, cell: &mut Cell, index: usize) {
        cell.set_style(self.style);
        cell.set_char(self.symbol.chars().nth(index).unwrap_or(' '));
    }
}
