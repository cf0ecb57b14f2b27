//! Terminal cell representation

use crate::color::Color;

/// A single character cell: one code page 437 byte and its resolved colors
///
/// Bright and inverse are pen attributes; they are folded into `fg`/`bg`
/// when the cell is written and are not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: u8,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    pub const fn new(ch: u8, fg: Color, bg: Color) -> Self {
        Self { ch, fg, bg }
    }

    /// Create an empty (space) cell with given colors
    pub const fn empty(fg: Color, bg: Color) -> Self {
        Self::new(b' ', fg, bg)
    }

    /// True for a space, which the renderer covers with the background fill alone
    pub fn is_space(&self) -> bool {
        self.ch == b' '
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty(Color::LIGHT_GRAY, Color::BLACK)
    }
}
