//! VgaTermRenderer - draws a TermSnapshot into a framebuffer
//!
//! Stateless: everything it needs comes from the snapshot it is handed. Per
//! visible row only the damaged span is drawn (the whole row on a full
//! redraw). Each span is painted in two passes: runs of equal background
//! become one rectangle fill, then every non-space glyph is drawn on top.

use watos_terminal::{Cell, Color, TermSnapshot};

use crate::config::{GLYPH_HEIGHT, GLYPH_WIDTH};

/// Framebuffer primitives the renderer draws with
///
/// Implemented by the video driver; coordinates are pixels.
pub trait Framebuffer {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Color);
    /// Draw the foreground pixels of one 8x16 glyph; the background is left alone
    fn draw_glyph(&mut self, x: u32, y: u32, ch: u8, fg: Color);
}

/// Cursor underline thickness in pixels
const CURSOR_HEIGHT: u32 = 2;

pub struct VgaTermRenderer {
    char_width: u32,
    char_height: u32,
}

impl VgaTermRenderer {
    pub const fn new() -> Self {
        VgaTermRenderer {
            char_width: GLYPH_WIDTH,
            char_height: GLYPH_HEIGHT,
        }
    }

    fn origin(&self, win_x: u32, win_y: u32, row: usize, col: usize) -> (u32, u32) {
        (
            win_x + col as u32 * self.char_width,
            win_y + row as u32 * self.char_height,
        )
    }

    /// Paint a `cols` x `rows` window in `bg`, clipped to the framebuffer
    pub fn clear_window<F: Framebuffer>(
        &self,
        fb: &mut F,
        cols: usize,
        rows: usize,
        bg: Color,
        win_x: u32,
        win_y: u32,
    ) {
        let width = (cols as u32 * self.char_width).min(fb.width().saturating_sub(win_x));
        let height = (rows as u32 * self.char_height).min(fb.height().saturating_sub(win_y));
        if width > 0 && height > 0 {
            fb.fill_rect(win_x, win_y, width, height, bg);
        }
    }

    /// Draw the damaged parts of `snapshot` at pixel offset (win_x, win_y)
    ///
    /// Returns the number of rows drawn.
    pub fn render<F: Framebuffer>(
        &self,
        fb: &mut F,
        snapshot: &mut TermSnapshot,
        win_x: u32,
        win_y: u32,
    ) -> usize {
        snapshot.prefetch_damage();
        let mut drawn = 0;
        for row in 0..snapshot.rows() {
            let Some(span) = snapshot.row_span(row) else {
                continue;
            };
            self.fill_backgrounds(fb, snapshot, row, span.x1, span.x2, win_x, win_y);
            for col in span.x1..=span.x2 {
                let cell = snapshot.cell(row, col);
                self.draw_glyph(fb, row, col, &cell, win_x, win_y);
            }
            drawn += 1;
        }
        drawn
    }

    /// One fill per run of equal background in `[x1, x2]`
    fn fill_backgrounds<F: Framebuffer>(
        &self,
        fb: &mut F,
        snapshot: &mut TermSnapshot,
        row: usize,
        x1: usize,
        x2: usize,
        win_x: u32,
        win_y: u32,
    ) {
        let mut start = x1;
        while start <= x2 {
            let bg = snapshot.bg_at(row, start);
            let mut end = start;
            while end < x2 && snapshot.bg_at(row, end + 1) == bg {
                end += 1;
            }
            let (x, y) = self.origin(win_x, win_y, row, start);
            let width = (end - start + 1) as u32 * self.char_width;
            fb.fill_rect(x, y, width, self.char_height, bg);
            start = end + 1;
        }
    }

    fn draw_glyph<F: Framebuffer>(&self, fb: &mut F, row: usize, col: usize, cell: &Cell, win_x: u32, win_y: u32) {
        if cell.is_space() {
            return;
        }
        let (x, y) = self.origin(win_x, win_y, row, col);
        fb.draw_glyph(x, y, cell.ch, cell.fg);
    }

    /// Full repaint of one cell
    fn draw_cell<F: Framebuffer>(&self, fb: &mut F, snapshot: &mut TermSnapshot, row: usize, col: usize, win_x: u32, win_y: u32) {
        let cell = snapshot.cell(row, col);
        let (x, y) = self.origin(win_x, win_y, row, col);
        fb.fill_rect(x, y, self.char_width, self.char_height, cell.bg);
        self.draw_glyph(fb, row, col, &cell, win_x, win_y);
    }

    /// Move the cursor underline
    ///
    /// Repaints the cell under `previous` (the position drawn last time, if
    /// it is still inside the window) and underlines the captured cursor when
    /// it is visible. Returns the position drawn, to pass back next time.
    pub fn render_cursor<F: Framebuffer>(
        &self,
        fb: &mut F,
        snapshot: &mut TermSnapshot,
        previous: Option<(usize, usize)>,
        win_x: u32,
        win_y: u32,
    ) -> Option<(usize, usize)> {
        if let Some((row, col)) = previous {
            if row < snapshot.rows() && col < snapshot.cols() {
                self.draw_cell(fb, snapshot, row, col, win_x, win_y);
            }
        }
        if !snapshot.cursor_visible() {
            return None;
        }
        let (row, col) = snapshot.cursor();
        let (x, y) = self.origin(win_x, win_y, row, col);
        let (fg, _) = snapshot.colors();
        fb.fill_rect(x, y + self.char_height - CURSOR_HEIGHT, self.char_width, CURSOR_HEIGHT, fg);
        Some((row, col))
    }
}

impl Default for VgaTermRenderer {
    fn default() -> Self {
        Self::new()
    }
}
