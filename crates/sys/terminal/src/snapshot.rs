//! Render-side view of a Term
//!
//! `capture` copies cursor, colors, versions and the dirty summary while
//! holding the Term lock, then lets go. Cell contents are pulled on demand:
//! each uncached `cell()` re-takes the lock just long enough to copy that one
//! cell into the snapshot. The renderer only ever reads the snapshot, never
//! the live Term.

use alloc::sync::Arc;
use alloc::vec::Vec;

use spin::Mutex;

use crate::cell::Cell;
use crate::color::Color;
use crate::grid::DirtySpan;
use crate::term::Term;

/// A Term shared between its writers and the render worker
pub type SharedTerm = Arc<Mutex<Term>>;

pub struct TermSnapshot {
    /// Lock used for on-demand cell reads, None before the first capture
    pub(crate) source: Option<SharedTerm>,
    pub(crate) cols: usize,
    pub(crate) rows: usize,
    pub(crate) view_row: usize,
    pub(crate) cursor_row: usize,
    pub(crate) cursor_col: usize,
    pub(crate) cursor_visible: bool,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
    pub(crate) default_bg: Color,
    pub(crate) full_redraw: bool,
    pub(crate) seq: u64,
    pub(crate) view_seq: u64,
    pub(crate) dirty: Vec<Option<DirtySpan>>,
    pub(crate) cells: Vec<Cell>,
    pub(crate) filled: Vec<bool>,
}

impl TermSnapshot {
    /// Empty snapshot; buffers grow on first capture and are reused after
    pub fn new() -> Self {
        TermSnapshot {
            source: None,
            cols: 0,
            rows: 0,
            view_row: 0,
            cursor_row: 0,
            cursor_col: 0,
            cursor_visible: false,
            fg: Color::LIGHT_GRAY,
            bg: Color::BLACK,
            default_bg: Color::BLACK,
            full_redraw: false,
            seq: 0,
            view_seq: 0,
            dirty: Vec::new(),
            cells: Vec::new(),
            filled: Vec::new(),
        }
    }

    /// Capture `term` and bind cell reads to it
    pub fn capture(&mut self, term: &SharedTerm) {
        term.lock().capture_snapshot(self);
        self.source = Some(term.clone());
    }

    /// Drop the binding to the Term; uncached cells read as blanks afterwards
    pub fn release(&mut self) {
        self.source = None;
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn view_row(&self) -> usize {
        self.view_row
    }

    /// Cursor as (row, col) relative to the captured view
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    /// Cursor enabled and inside the captured view
    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Pen colors at capture time
    pub fn colors(&self) -> (Color, Color) {
        (self.fg, self.bg)
    }

    pub fn default_bg(&self) -> Color {
        self.default_bg
    }

    pub fn full_redraw(&self) -> bool {
        self.full_redraw
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn view_seq(&self) -> u64 {
        self.view_seq
    }

    /// Changed columns of `row` since the previous capture
    pub fn dirty_span(&self, row: usize) -> Option<DirtySpan> {
        self.dirty.get(row).copied().flatten()
    }

    /// Columns of `row` a renderer has to repaint
    pub fn row_span(&self, row: usize) -> Option<DirtySpan> {
        if row >= self.rows || self.cols == 0 {
            None
        } else if self.full_redraw {
            Some(DirtySpan {
                x1: 0,
                x2: self.cols - 1,
            })
        } else {
            self.dirty_span(row)
        }
    }

    /// Anything to repaint at all
    pub fn has_damage(&self) -> bool {
        self.full_redraw || self.dirty.iter().any(|span| span.is_some())
    }

    /// Cell at (row, col) of the captured view, fetched on first use
    pub fn cell(&mut self, row: usize, col: usize) -> Cell {
        if row >= self.rows || col >= self.cols {
            return Cell::empty(self.fg, self.default_bg);
        }
        let idx = row * self.cols + col;
        if self.filled[idx] {
            return self.cells[idx];
        }
        match self.source.take() {
            Some(term) => {
                let cell = term.lock().capture_cell(self, row, col);
                self.source = Some(term);
                cell
            }
            None => self.cells[idx],
        }
    }

    pub fn ch_at(&mut self, row: usize, col: usize) -> u8 {
        self.cell(row, col).ch
    }

    pub fn fg_at(&mut self, row: usize, col: usize) -> Color {
        self.cell(row, col).fg
    }

    pub fn bg_at(&mut self, row: usize, col: usize) -> Color {
        self.cell(row, col).bg
    }

    /// Fetch every damaged cell under a single lock acquisition
    pub fn prefetch_damage(&mut self) {
        let Some(term) = self.source.take() else {
            return;
        };
        {
            let term = term.lock();
            for row in 0..self.rows {
                if let Some(span) = self.row_span(row) {
                    for col in span.x1..=span.x2 {
                        term.capture_cell(self, row, col);
                    }
                }
            }
        }
        self.source = Some(term);
    }
}

impl Default for TermSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(cols: usize, rows: usize) -> SharedTerm {
        Arc::new(Mutex::new(Term::new(cols, rows).unwrap()))
    }

    #[test]
    fn test_plain_text_round_trip() {
        let term = shared(10, 4);
        let mut snap = TermSnapshot::new();
        snap.capture(&term);

        term.lock().write(b"hello");
        snap.capture(&term);
        assert!(!snap.full_redraw());
        assert_eq!(snap.dirty_span(0), Some(DirtySpan { x1: 0, x2: 4 }));
        for (col, &ch) in b"hello".iter().enumerate() {
            assert_eq!(snap.ch_at(0, col), ch);
        }
        assert_eq!(snap.ch_at(0, 5), b' ');
        assert_eq!(snap.ch_at(1, 0), b' ');
        assert_eq!(snap.cursor(), (0, 5));
    }

    #[test]
    fn test_cells_are_cached_after_first_read() {
        let term = shared(10, 2);
        term.lock().write(b"a");
        let mut snap = TermSnapshot::new();
        snap.capture(&term);
        assert_eq!(snap.ch_at(0, 0), b'a');

        term.lock().write(b"\rb");
        assert_eq!(snap.ch_at(0, 0), b'a');
        snap.capture(&term);
        assert_eq!(snap.ch_at(0, 0), b'b');
    }

    #[test]
    fn test_capture_consumes_damage() {
        let term = shared(10, 2);
        let mut snap = TermSnapshot::new();
        snap.capture(&term);
        assert!(snap.full_redraw());
        assert_eq!(snap.row_span(1), Some(DirtySpan { x1: 0, x2: 9 }));

        snap.capture(&term);
        assert!(!snap.has_damage());
        assert_eq!(snap.row_span(0), None);
    }

    #[test]
    fn test_versions_are_copied() {
        let term = shared(10, 2);
        term.lock().write(b"xy");
        term.lock().invalidate_view();
        let mut snap = TermSnapshot::new();
        snap.capture(&term);
        let guard = term.lock();
        assert_eq!(snap.seq(), guard.seq());
        assert_eq!(snap.view_seq(), guard.view_seq());
    }

    #[test]
    fn test_prefetch_then_release() {
        let term = shared(4, 2);
        term.lock().write(b"ab");
        let mut snap = TermSnapshot::new();
        snap.capture(&term);
        snap.prefetch_damage();
        snap.release();

        term.lock().write(b"\rzz");
        assert_eq!(snap.ch_at(0, 0), b'a');
        assert_eq!(snap.ch_at(0, 1), b'b');
    }
}
