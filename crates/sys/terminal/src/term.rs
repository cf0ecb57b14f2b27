//! Term - text buffer plus escape interpreter
//!
//! Every byte goes through the parser; the resulting action mutates the grid,
//! the cursor or the pen. Two counters let readers detect staleness without
//! holding the lock: `seq` moves on every content change, `view_seq` whenever
//! the shown window changes (scroll, resize, invalidation, output that
//! scrolls the view).

use core::fmt;

use crate::cell::Cell;
use crate::color::{color_256, Color, PALETTE};
use crate::grid::{DirtySpan, Grid, MAX_COLS, MAX_ROWS};
use crate::parser::{Action, Csi, Parser};
use crate::snapshot::TermSnapshot;
use crate::state::{Cursor, Pen};

/// Tab stops every 8 columns
pub const TAB_WIDTH: usize = 8;

/// Zero width or height on creation or resize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryError {
    pub cols: usize,
    pub rows: usize,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid terminal geometry {}x{}", self.cols, self.rows)
    }
}

fn check_geometry(cols: usize, rows: usize) -> Result<(usize, usize), GeometryError> {
    if cols == 0 || rows == 0 {
        return Err(GeometryError { cols, rows });
    }
    Ok((cols.min(MAX_COLS), rows.min(MAX_ROWS)))
}

pub struct Term {
    grid: Grid,
    cursor: Cursor,
    pen: Pen,
    parser: Parser,
    seq: u64,
    view_seq: u64,
}

impl Term {
    /// Create a terminal of `cols` x `rows`; dimensions above the limits are clamped
    pub fn new(cols: usize, rows: usize) -> Result<Self, GeometryError> {
        let (cols, rows) = check_geometry(cols, rows)?;
        let pen = Pen::new(Color::LIGHT_GRAY, Color::BLACK);
        Ok(Self {
            grid: Grid::new(cols, rows, pen.default_cell()),
            cursor: Cursor::new(),
            pen,
            parser: Parser::new(),
            seq: 0,
            view_seq: 0,
        })
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.grid.view_rows()
    }

    /// Cursor as (row, col) on the live screen
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor.row, self.cursor.col)
    }

    pub fn saved_cursor(&self) -> (usize, usize) {
        (self.cursor.saved_row, self.cursor.saved_col)
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor.visible
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn view_seq(&self) -> u64 {
        self.view_seq
    }

    pub fn view_row(&self) -> usize {
        self.grid.view_row()
    }

    pub fn max_row(&self) -> usize {
        self.grid.max_row()
    }

    pub fn history_rows(&self) -> usize {
        self.grid.history_rows()
    }

    /// Cell at (row, col) of the shown window
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows() {
            return None;
        }
        self.grid.cell(self.grid.view_row() + row, col)
    }

    pub fn dirty_span(&self, row: usize) -> Option<DirtySpan> {
        self.grid.dirty_span(row)
    }

    pub fn is_row_dirty(&self, row: usize) -> bool {
        self.grid.dirty_span(row).is_some()
    }

    pub fn needs_full_redraw(&self) -> bool {
        self.grid.needs_full_redraw()
    }

    /// Process output bytes
    pub fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.putc(byte);
        }
    }

    /// Process a single output byte
    pub fn putc(&mut self, byte: u8) {
        if let Some(action) = self.parser.advance(byte) {
            self.perform(action);
        }
    }

    /// Set the pen colors for subsequent output
    pub fn set_colors(&mut self, fg: Color, bg: Color) {
        self.pen.set_colors(fg, bg);
    }

    /// Move the view through history by `delta` rows (negative = older)
    pub fn scroll(&mut self, delta: isize) {
        self.grid.scroll_view(delta);
        self.view_seq += 1;
    }

    /// Resize, re-wrapping history to the new width
    pub fn set_winsz(&mut self, cols: usize, rows: usize) -> Result<(), GeometryError> {
        let (cols, rows) = check_geometry(cols, rows)?;
        let at = (self.grid.screen_top() + self.cursor.row, self.cursor.col);
        let (row, col) = self.grid.reflow(cols, rows, at, self.pen.default_cell());
        self.cursor.row = row;
        self.cursor.col = col;
        self.cursor.saved_row = self.cursor.saved_row.min(rows - 1);
        self.cursor.saved_col = self.cursor.saved_col.min(cols - 1);
        self.view_seq += 1;
        log::debug!("term: resized to {}x{}, {} rows of history", cols, rows, self.grid.max_row());
        Ok(())
    }

    /// Force the next capture to repaint everything
    pub fn invalidate_view(&mut self) {
        self.grid.mark_all_dirty();
        self.view_seq += 1;
    }

    /// Erase the screen and home the cursor
    pub fn clear(&mut self) {
        self.erase_in_display(2);
        self.cursor.row = 0;
        self.cursor.col = 0;
    }

    /// Full reset (RIS)
    pub fn reset(&mut self) {
        self.parser.reset();
        self.pen.reset();
        self.cursor = Cursor::new();
        self.clear();
    }

    /// Copy metadata and damage into `out`, clearing the damage here
    ///
    /// Cell contents are not copied; see `capture_cell`.
    pub fn capture_snapshot(&mut self, out: &mut TermSnapshot) {
        let cols = self.grid.cols();
        let rows = self.grid.view_rows();
        let view_row = self.grid.view_row();
        let cursor_abs = self.grid.screen_top() + self.cursor.row;

        out.source = None;
        out.cols = cols;
        out.rows = rows;
        out.view_row = view_row;
        out.cursor_visible = false;
        out.cursor_row = self.cursor.row;
        out.cursor_col = self.cursor.col.min(cols - 1);
        if cursor_abs >= view_row && cursor_abs < view_row + rows {
            out.cursor_row = cursor_abs - view_row;
            out.cursor_visible = self.cursor.visible;
        }
        let (fg, bg) = self.pen.resolve();
        out.fg = fg;
        out.bg = bg;
        out.default_bg = self.pen.default_bg;
        out.seq = self.seq;
        out.view_seq = self.view_seq;
        out.full_redraw = self.grid.take_dirty(&mut out.dirty);

        let blank = self.pen.default_cell();
        out.cells.clear();
        out.cells.resize(rows * cols, blank);
        out.filled.clear();
        out.filled.resize(rows * cols, false);
    }

    /// Copy one cell of the snapshot's view into the snapshot
    pub fn capture_cell(&self, snap: &mut TermSnapshot, rel_row: usize, col: usize) -> Cell {
        if rel_row >= snap.rows || col >= snap.cols {
            return self.pen.default_cell();
        }
        let cell = self
            .grid
            .cell(snap.view_row + rel_row, col)
            .unwrap_or_else(|| self.pen.default_cell());
        let idx = rel_row * snap.cols + col;
        snap.cells[idx] = cell;
        snap.filled[idx] = true;
        cell
    }

    // === Byte handling ===

    fn perform(&mut self, action: Action) {
        match action {
            Action::Print(byte) => self.print(byte),
            Action::Control(byte) => self.control(byte),
            Action::Csi(csi) => self.csi(&csi),
            Action::Esc(byte) => self.esc(byte),
        }
    }

    /// History row the cursor is on
    fn cursor_abs(&self) -> usize {
        self.grid.screen_top() + self.cursor.row
    }

    fn print(&mut self, byte: u8) {
        if self.cursor.col >= self.cols() {
            let row = self.cursor_abs();
            self.grid.set_wrapped(row, true);
            self.cursor.col = 0;
            self.line_feed();
        }
        let row = self.cursor_abs();
        self.grid.set(row, self.cursor.col, self.pen.cell(byte));
        self.cursor.col += 1;
        self.seq += 1;
    }

    fn line_feed(&mut self) {
        if self.cursor.row + 1 < self.rows() {
            self.cursor.row += 1;
            return;
        }
        if self.grid.push_line(self.pen.default_cell()) {
            self.view_seq += 1;
        }
        self.seq += 1;
    }

    fn control(&mut self, byte: u8) {
        match byte {
            // LF, VT, FF - line feed with implicit carriage return
            0x0A | 0x0B | 0x0C => {
                self.cursor.col = 0;
                self.line_feed();
            }
            0x0D => self.cursor.col = 0,
            0x08 => self.cursor.col = self.cursor.col.saturating_sub(1),
            0x09 => {
                let next = (self.cursor.col / TAB_WIDTH + 1) * TAB_WIDTH;
                self.cursor.col = next.min(self.cols() - 1);
            }
            // BEL and everything else
            _ => {}
        }
    }

    fn esc(&mut self, byte: u8) {
        match byte {
            b'7' => self.cursor.save(),
            b'8' => self.cursor.restore(self.cols(), self.rows()),
            b'c' => self.reset(),
            _ => {}
        }
    }

    fn csi(&mut self, csi: &Csi) {
        if csi.private {
            if csi.param(0, 0) == 25 {
                match csi.final_byte {
                    b'h' => self.cursor.visible = true,
                    b'l' => self.cursor.visible = false,
                    _ => {}
                }
            }
            return;
        }

        let cols = self.cols();
        let rows = self.rows();
        let n = csi.param(0, 1) as usize;
        let col = self.cursor.col.min(cols - 1);
        match csi.final_byte {
            b'A' => self.cursor.row = self.cursor.row.saturating_sub(n),
            b'B' => self.cursor.row = (self.cursor.row + n).min(rows - 1),
            b'C' => self.cursor.col = (col + n).min(cols - 1),
            b'D' => self.cursor.col = col.saturating_sub(n),
            b'E' => {
                self.cursor.row = (self.cursor.row + n).min(rows - 1);
                self.cursor.col = 0;
            }
            b'F' => {
                self.cursor.row = self.cursor.row.saturating_sub(n);
                self.cursor.col = 0;
            }
            b'G' => self.cursor.col = (n - 1).min(cols - 1),
            b'd' => self.cursor.row = (n - 1).min(rows - 1),
            b'H' | b'f' => {
                self.cursor.row = (csi.param(0, 1) as usize - 1).min(rows - 1);
                self.cursor.col = (csi.param(1, 1) as usize - 1).min(cols - 1);
            }
            b'J' => self.erase_in_display(csi.param(0, 0)),
            b'K' => self.erase_in_line(csi.param(0, 0)),
            b'm' => self.sgr(csi),
            b's' => self.cursor.save(),
            b'u' => self.cursor.restore(cols, rows),
            _ => {}
        }
    }

    fn sgr(&mut self, csi: &Csi) {
        if csi.count == 0 {
            self.pen.reset();
            return;
        }
        let params = csi.params();
        let mut i = 0;
        while i < params.len() {
            let p = params[i];
            match p {
                0 => self.pen.reset(),
                1 => self.pen.bright = true,
                22 => self.pen.bright = false,
                7 => self.pen.inverse = true,
                27 => self.pen.inverse = false,
                30..=37 => self.pen.set_fg_index((p - 30) as u8),
                39 => {
                    self.pen.fg = self.pen.default_fg;
                    self.pen.fg_index = None;
                }
                40..=47 => self.pen.bg = PALETTE[(p - 40) as usize],
                49 => self.pen.bg = self.pen.default_bg,
                90..=97 => self.pen.set_fg_index((p - 90 + 8) as u8),
                100..=107 => self.pen.bg = PALETTE[(p - 100 + 8) as usize],
                38 | 48 => {
                    if let Some((color, used)) = extended_color(&params[i + 1..]) {
                        if p == 38 {
                            self.pen.fg = color;
                            self.pen.fg_index = None;
                        } else {
                            self.pen.bg = color;
                        }
                        i += used;
                    }
                }
                _ => {}
            }
            i += 1;
        }
    }

    fn erase_in_display(&mut self, mode: u16) {
        let blank = self.pen.erase_cell();
        let cols = self.cols();
        let top = self.grid.screen_top();
        let row = self.cursor_abs();
        let col = self.cursor.col.min(cols - 1);
        match mode {
            0 => {
                self.grid.fill(row, col, cols - 1, blank);
                self.grid.set_wrapped(row, false);
                for r in row + 1..top + self.rows() {
                    self.grid.fill(r, 0, cols - 1, blank);
                    self.grid.set_wrapped(r, false);
                }
            }
            1 => {
                for r in top..row {
                    self.grid.fill(r, 0, cols - 1, blank);
                    self.grid.set_wrapped(r, false);
                }
                self.grid.fill(row, 0, col, blank);
            }
            2 | 3 => {
                for r in top..top + self.rows() {
                    self.grid.fill(r, 0, cols - 1, blank);
                    self.grid.set_wrapped(r, false);
                }
                self.grid.mark_all_dirty();
            }
            _ => return,
        }
        self.seq += 1;
    }

    fn erase_in_line(&mut self, mode: u16) {
        let blank = self.pen.erase_cell();
        let cols = self.cols();
        let row = self.cursor_abs();
        let col = self.cursor.col.min(cols - 1);
        match mode {
            0 => {
                self.grid.fill(row, col, cols - 1, blank);
                self.grid.set_wrapped(row, false);
            }
            1 => self.grid.fill(row, 0, col, blank),
            2 => {
                self.grid.fill(row, 0, cols - 1, blank);
                self.grid.set_wrapped(row, false);
            }
            _ => return,
        }
        self.seq += 1;
    }
}

/// Decode the tail of SGR 38/48: `5;n` or `2;r;g;b`, returning params consumed
fn extended_color(rest: &[u16]) -> Option<(Color, usize)> {
    match rest {
        [5, n, ..] => Some((color_256(saturate(*n)), 2)),
        [2, r, g, b, ..] => Some((Color::rgb(saturate(*r), saturate(*g), saturate(*b)), 4)),
        _ => None,
    }
}

/// Out-of-range color components clamp to 255
fn saturate(value: u16) -> u8 {
    u8::try_from(value).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::grid::SCROLLBACK_ROWS;
    use std::vec::Vec;

    fn row_text(term: &Term, row: usize) -> Vec<u8> {
        (0..term.cols()).map(|c| term.cell(row, c).unwrap().ch).collect()
    }

    fn trimmed(term: &Term, row: usize) -> Vec<u8> {
        let mut text = row_text(term, row);
        while text.last() == Some(&b' ') {
            text.pop();
        }
        text
    }

    #[test]
    fn test_rejects_zero_geometry() {
        assert!(Term::new(0, 24).is_err());
        assert!(Term::new(80, 0).is_err());
        let mut term = Term::new(80, 24).unwrap();
        assert_eq!(term.set_winsz(0, 10), Err(GeometryError { cols: 0, rows: 10 }));
        assert_eq!((term.cols(), term.rows()), (80, 24));
    }

    #[test]
    fn test_text_wraps_at_cols() {
        let mut term = Term::new(4, 3).unwrap();
        term.write(b"abcdefg");
        assert_eq!(row_text(&term, 0), b"abcd");
        assert_eq!(row_text(&term, 1), b"efg ");
        assert_eq!(term.cursor(), (1, 3));
    }

    #[test]
    fn test_deferred_wrap_then_newline() {
        let mut term = Term::new(4, 3).unwrap();
        term.write(b"abcd");
        assert_eq!(term.cursor(), (0, 4));
        term.write(b"\nx");
        assert_eq!(trimmed(&term, 1), b"x");
        assert_eq!(term.cursor(), (1, 1));
    }

    #[test]
    fn test_scrolls_at_bottom() {
        let mut term = Term::new(4, 2).unwrap();
        term.write(b"one\ntwo\nsix");
        assert_eq!(trimmed(&term, 0), b"two");
        assert_eq!(trimmed(&term, 1), b"six");
        assert_eq!(term.max_row(), 3);
        assert_eq!(term.view_row(), 1);
    }

    #[test]
    fn test_control_bytes() {
        let mut term = Term::new(20, 2).unwrap();
        term.write(b"abc\x08\x08X");
        assert_eq!(trimmed(&term, 0), b"aXc");
        term.write(b"\rY");
        assert_eq!(trimmed(&term, 0), b"YXc");
        term.write(b"\t");
        assert_eq!(term.cursor(), (0, 8));
        term.write(b"\x08\x08\x08\x08\x08\x08\x08\x08\x08\x08");
        assert_eq!(term.cursor(), (0, 0));
    }

    #[test]
    fn test_seq_moves_on_content_only() {
        let mut term = Term::new(10, 3).unwrap();
        let s0 = term.seq();
        term.putc(b'a');
        let s1 = term.seq();
        assert!(s1 > s0);
        term.putc(b'b');
        assert!(term.seq() > s1);

        let s2 = term.seq();
        let v2 = term.view_seq();
        term.scroll(-1);
        assert_eq!(term.seq(), s2);
        assert!(term.view_seq() > v2);

        let v3 = term.view_seq();
        term.set_winsz(12, 3).unwrap();
        assert_eq!(term.seq(), s2);
        assert!(term.view_seq() > v3);

        let v4 = term.view_seq();
        term.invalidate_view();
        assert!(term.view_seq() > v4);
        assert!(term.needs_full_redraw());
    }

    #[test]
    fn test_cursor_moves_do_not_dirty() {
        let mut term = Term::new(10, 5).unwrap();
        let mut snap = TermSnapshot::new();
        term.capture_snapshot(&mut snap);
        term.write(b"\x1b[3;4H\x1b[A\x1b[2C");
        assert_eq!(term.cursor(), (1, 5));
        assert!((0..5).all(|r| !term.is_row_dirty(r)));
        assert!(!term.needs_full_redraw());
    }

    #[test]
    fn test_dirty_span_tracks_writes() {
        let mut term = Term::new(10, 3).unwrap();
        let mut snap = TermSnapshot::new();
        term.capture_snapshot(&mut snap);
        term.write(b"\x1b[2;3Hxy\x1b[2;8Hz");
        assert_eq!(term.dirty_span(1), Some(DirtySpan { x1: 2, x2: 7 }));
        assert!(!term.is_row_dirty(0));
    }

    #[test]
    fn test_erase_screen() {
        let mut term = Term::new(6, 3).unwrap();
        term.write(b"abc\ndef\x1b[44m");
        let mut snap = TermSnapshot::new();
        term.capture_snapshot(&mut snap);
        let seq = term.seq();

        term.write(b"\x1b[2J");
        assert!(term.needs_full_redraw());
        assert!(term.seq() > seq);
        for r in 0..3 {
            for c in 0..6 {
                let cell = term.cell(r, c).unwrap();
                assert_eq!(cell.ch, b' ');
                assert_eq!(cell.bg, PALETTE[4]);
            }
        }
    }

    #[test]
    fn test_erase_line_modes() {
        let mut term = Term::new(6, 1).unwrap();
        term.write(b"abcdef\x1b[1;3H\x1b[K");
        assert_eq!(trimmed(&term, 0), b"ab");
        term.write(b"\rabcdef\x1b[1;3H\x1b[1K");
        assert_eq!(row_text(&term, 0), b"   def");
        term.write(b"\x1b[2K");
        assert_eq!(trimmed(&term, 0), b"");
    }

    #[test]
    fn test_sgr_colors_and_attributes() {
        let mut term = Term::new(10, 1).unwrap();
        term.write(b"\x1b[31ma\x1b[1mb\x1b[7mc\x1b[0md\x1b[38;5;196;48;2;1;2;3me");
        assert_eq!(term.cell(0, 0).unwrap().fg, PALETTE[1]);
        assert_eq!(term.cell(0, 1).unwrap().fg, PALETTE[9]);
        let c = term.cell(0, 2).unwrap();
        assert_eq!((c.fg, c.bg), (Color::BLACK, PALETTE[9]));
        assert_eq!(term.cell(0, 3).unwrap().fg, Color::LIGHT_GRAY);
        let e = term.cell(0, 4).unwrap();
        assert_eq!(e.fg, color_256(196));
        assert_eq!(e.bg, Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_extended_color_out_of_range_clamps() {
        let mut term = Term::new(10, 1).unwrap();
        term.write(b"\x1b[38;5;300;48;2;256;7;9999ma");
        let a = term.cell(0, 0).unwrap();
        assert_eq!(a.fg, color_256(255));
        assert_eq!(a.bg, Color::rgb(255, 7, 255));
    }

    #[test]
    fn test_huge_cursor_move_is_clamped() {
        let mut term = Term::new(10, 2).unwrap();
        term.write(b"\x1b[99999Cx");
        assert_eq!(row_text(&term, 0), b"         x");
        term.write(b"\x1b[70000;5Hy");
        assert_eq!(term.cursor(), (1, 5));
        assert_eq!(term.cell(1, 4).unwrap().ch, b'y');
    }

    #[test]
    fn test_set_colors() {
        let mut term = Term::new(10, 1).unwrap();
        let mut snap = TermSnapshot::new();
        term.capture_snapshot(&mut snap);
        let seq = term.seq();
        term.set_colors(Color::WHITE, PALETTE[1]);
        assert_eq!(term.seq(), seq);
        assert!(!term.is_row_dirty(0));
        term.putc(b'q');
        assert_eq!(term.cell(0, 0).unwrap(), Cell::new(b'q', Color::WHITE, PALETTE[1]));
    }

    #[test]
    fn test_save_restore_cursor() {
        let mut term = Term::new(10, 5).unwrap();
        term.write(b"\x1b[2;3H\x1b[s\x1b[5;9H\x1b[u");
        assert_eq!(term.cursor(), (1, 2));
        term.write(b"\x1b[4;4H\x1b7\x1b[H\x1b8");
        assert_eq!(term.cursor(), (3, 3));
        assert_eq!(term.saved_cursor(), (3, 3));
    }

    #[test]
    fn test_cursor_visibility() {
        let mut term = Term::new(10, 5).unwrap();
        term.write(b"\x1b[?25l");
        assert!(!term.cursor_visible());
        term.write(b"\x1b[?25h");
        assert!(term.cursor_visible());
    }

    #[test]
    fn test_unknown_sequences_have_no_effect() {
        let mut term = Term::new(10, 2).unwrap();
        term.write(b"\x1bZa\x1b[5zb");
        assert_eq!(trimmed(&term, 0), b"ab");
    }

    #[test]
    fn test_scroll_clamps_to_history() {
        let mut term = Term::new(4, 2).unwrap();
        term.scroll(-5);
        assert_eq!(term.view_row(), 0);
        term.write(b"1\n2\n3\n4");
        assert_eq!(term.max_row(), 4);
        term.scroll(-1);
        assert_eq!(term.view_row(), 1);
        assert_eq!(trimmed(&term, 0), b"2");
        term.scroll(100);
        assert_eq!(term.view_row(), 2);
    }

    #[test]
    fn test_output_while_scrolled_back_keeps_view() {
        let mut term = Term::new(4, 2).unwrap();
        term.write(b"1\n2\n3");
        term.scroll(-1);
        let view = term.view_row();
        term.write(b"\n4");
        assert_eq!(term.view_row(), view);
        assert_eq!(trimmed(&term, 0), b"1");
    }

    #[test]
    fn test_history_recycles_oldest_rows() {
        let mut term = Term::new(4, 2).unwrap();
        for _ in 0..SCROLLBACK_ROWS + 10 {
            term.write(b"x\n");
        }
        assert_eq!(term.max_row(), term.history_rows());
        assert_eq!(term.view_row(), term.max_row() - term.rows());
    }

    #[test]
    fn test_resize_rewraps_content() {
        let mut term = Term::new(80, 24).unwrap();
        let long: Vec<u8> = (0..70).map(|i| b'a' + (i % 26) as u8).collect();
        term.write(&long);
        term.write(b"\nshort line\n");
        for i in 0..5u8 {
            term.write(&[b'0' + i, b'\n']);
        }
        let mut snap = TermSnapshot::new();
        term.capture_snapshot(&mut snap);

        term.set_winsz(40, 24).unwrap();
        assert_eq!((term.cols(), term.rows()), (40, 24));
        assert!(term.needs_full_redraw());

        let mut first = row_text(&term, 0);
        first.extend(trimmed(&term, 1));
        assert_eq!(first, long);
        assert_eq!(trimmed(&term, 2), b"short line");
        for i in 0..5u8 {
            assert_eq!(trimmed(&term, 3 + i as usize), [b'0' + i]);
        }
        assert_eq!(term.cursor(), (8, 0));
    }

    #[test]
    fn test_resize_moves_cursor_with_text() {
        let mut term = Term::new(10, 4).unwrap();
        term.write(b"0123456789ab");
        assert_eq!(term.cursor(), (1, 2));
        term.set_winsz(20, 4).unwrap();
        assert_eq!(term.cursor(), (0, 12));
        assert_eq!(trimmed(&term, 0), b"0123456789ab");
        term.write(b"c");
        assert_eq!(trimmed(&term, 0), b"0123456789abc");
    }

    #[test]
    fn test_clear_and_reset() {
        let mut term = Term::new(5, 2).unwrap();
        term.write(b"\x1b[31mhi\x1b[2;2H");
        term.clear();
        assert_eq!(term.cursor(), (0, 0));
        assert_eq!(trimmed(&term, 0), b"");
        term.write(b"\x1bc");
        assert_eq!(term.pen().fg, Color::LIGHT_GRAY);
    }
}
