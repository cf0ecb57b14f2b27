//! Terminal state - cursor and drawing pen

use crate::cell::Cell;
use crate::color::{Color, PALETTE};

/// Cursor position relative to the live screen
///
/// `col == cols` is the deferred-wrap position after the last column was
/// written; the next printable byte wraps first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
    pub saved_row: usize,
    pub saved_col: usize,
    pub visible: bool,
}

impl Cursor {
    pub const fn new() -> Self {
        Self {
            row: 0,
            col: 0,
            saved_row: 0,
            saved_col: 0,
            visible: true,
        }
    }

    pub fn save(&mut self) {
        self.saved_row = self.row;
        self.saved_col = self.col;
    }

    /// Restore the saved position, clamped to the current screen
    pub fn restore(&mut self, cols: usize, rows: usize) {
        self.row = self.saved_row.min(rows - 1);
        self.col = self.saved_col.min(cols - 1);
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Current drawing attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pen {
    pub fg: Color,
    pub bg: Color,
    pub default_fg: Color,
    pub default_bg: Color,
    /// Palette slot of `fg` when it came from SGR 30-37, so bright can promote it
    pub fg_index: Option<u8>,
    pub bright: bool,
    pub inverse: bool,
}

impl Pen {
    pub const fn new(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            default_fg: fg,
            default_bg: bg,
            fg_index: None,
            bright: false,
            inverse: false,
        }
    }

    /// SGR 0
    pub fn reset(&mut self) {
        self.fg = self.default_fg;
        self.bg = self.default_bg;
        self.fg_index = None;
        self.bright = false;
        self.inverse = false;
    }

    pub fn set_colors(&mut self, fg: Color, bg: Color) {
        self.fg = fg;
        self.bg = bg;
        self.fg_index = None;
    }

    /// Foreground from palette slot 0-7 (bright slots 8-15 are taken as-is)
    pub fn set_fg_index(&mut self, index: u8) {
        self.fg = PALETTE[(index & 0x0F) as usize];
        self.fg_index = Some(index & 0x0F);
    }

    /// Colors a cell written now receives
    pub fn resolve(&self) -> (Color, Color) {
        let fg = match self.fg_index {
            Some(index) if self.bright && index < 8 => PALETTE[(index + 8) as usize],
            _ => self.fg,
        };
        if self.inverse {
            (self.bg, fg)
        } else {
            (fg, self.bg)
        }
    }

    /// Glyph cell in the current attributes
    pub fn cell(&self, ch: u8) -> Cell {
        let (fg, bg) = self.resolve();
        Cell::new(ch, fg, bg)
    }

    /// Blank used by erase operations (keeps the current background)
    pub fn erase_cell(&self) -> Cell {
        self.cell(b' ')
    }

    /// Blank used for fresh rows
    pub fn default_cell(&self) -> Cell {
        Cell::empty(self.default_fg, self.default_bg)
    }
}
