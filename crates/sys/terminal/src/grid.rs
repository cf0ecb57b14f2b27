//! Character grid with scrollback
//!
//! History rows live in a ring (`base` is the physical slot of history row 0),
//! so scrolling a full history is O(cols). The live screen is always the last
//! `view_rows` rows of written history: `[max_row - view_rows, max_row)`.
//! `view_row` is the first history row shown; dirty tracking is per shown row.

use alloc::vec;
use alloc::vec::Vec;

use crate::cell::Cell;

/// Dimension clamps, keep per-session allocations bounded
pub const MAX_COLS: usize = 512;
pub const MAX_ROWS: usize = 256;

/// History rows kept above the live screen
pub const SCROLLBACK_ROWS: usize = 256;

/// Inclusive changed-column range of one visible row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtySpan {
    pub x1: usize,
    pub x2: usize,
}

impl DirtySpan {
    pub fn union(self, x1: usize, x2: usize) -> Self {
        DirtySpan {
            x1: self.x1.min(x1),
            x2: self.x2.max(x2),
        }
    }
}

pub struct Grid {
    /// Cell storage, `capacity` rows of `cols` cells
    cells: Vec<Cell>,
    /// Per physical row: content continues on the next row (soft wrap)
    wrapped: Vec<bool>,
    cols: usize,
    view_rows: usize,
    capacity: usize,
    base: usize,
    max_row: usize,
    view_row: usize,
    dirty: Vec<Option<DirtySpan>>,
    full_redraw: bool,
}

impl Grid {
    pub fn new(cols: usize, view_rows: usize, blank: Cell) -> Self {
        let capacity = view_rows + SCROLLBACK_ROWS;
        Grid {
            cells: vec![blank; capacity * cols],
            wrapped: vec![false; capacity],
            cols,
            view_rows,
            capacity,
            base: 0,
            max_row: view_rows,
            view_row: 0,
            dirty: vec![None; view_rows],
            full_redraw: true,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn view_rows(&self) -> usize {
        self.view_rows
    }

    /// History capacity in rows
    pub fn history_rows(&self) -> usize {
        self.capacity
    }

    pub fn max_row(&self) -> usize {
        self.max_row
    }

    pub fn view_row(&self) -> usize {
        self.view_row
    }

    /// First history row of the live screen
    pub fn screen_top(&self) -> usize {
        self.max_row - self.view_rows
    }

    /// True while the view shows the live screen
    pub fn is_following(&self) -> bool {
        self.view_row == self.screen_top()
    }

    fn slot(&self, row: usize) -> usize {
        (self.base + row) % self.capacity
    }

    fn index(&self, row: usize, col: usize) -> usize {
        self.slot(row) * self.cols + col
    }

    /// Cell at history row `row`
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row < self.max_row && col < self.cols {
            Some(self.cells[self.index(row, col)])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.max_row && col < self.cols {
            let idx = self.index(row, col);
            self.cells[idx] = cell;
            self.mark(row, col, col);
        }
    }

    /// Fill `[x1, x2]` of a history row, clamped to the grid
    pub fn fill(&mut self, row: usize, x1: usize, x2: usize, cell: Cell) {
        if row >= self.max_row || x1 >= self.cols {
            return;
        }
        let x2 = x2.min(self.cols - 1);
        if x1 > x2 {
            return;
        }
        let start = self.index(row, 0);
        for c in &mut self.cells[start + x1..=start + x2] {
            *c = cell;
        }
        self.mark(row, x1, x2);
    }

    pub fn is_wrapped(&self, row: usize) -> bool {
        row < self.max_row && self.wrapped[self.slot(row)]
    }

    pub fn set_wrapped(&mut self, row: usize, wrapped: bool) {
        if row < self.max_row {
            let slot = self.slot(row);
            self.wrapped[slot] = wrapped;
        }
    }

    /// Union `[x1, x2]` into the dirty span of `row` if it is on view
    pub fn mark(&mut self, row: usize, x1: usize, x2: usize) {
        if row < self.view_row || row >= self.view_row + self.view_rows {
            return;
        }
        let rel = row - self.view_row;
        self.dirty[rel] = Some(match self.dirty[rel] {
            Some(span) => span.union(x1, x2),
            None => DirtySpan { x1, x2 },
        });
    }

    pub fn dirty_span(&self, rel_row: usize) -> Option<DirtySpan> {
        self.dirty.get(rel_row).copied().flatten()
    }

    pub fn needs_full_redraw(&self) -> bool {
        self.full_redraw
    }

    pub fn mark_all_dirty(&mut self) {
        self.full_redraw = true;
    }

    /// Copy out the dirty state and reset it; returns the full-redraw flag
    pub fn take_dirty(&mut self, out: &mut Vec<Option<DirtySpan>>) -> bool {
        out.clear();
        out.extend_from_slice(&self.dirty);
        for span in self.dirty.iter_mut() {
            *span = None;
        }
        core::mem::replace(&mut self.full_redraw, false)
    }

    /// Append a blank row below the live screen
    ///
    /// Grows history until it is full, then recycles the oldest row. A view
    /// that was following the screen keeps following it. Returns true when
    /// the shown window changed.
    pub fn push_line(&mut self, blank: Cell) -> bool {
        let following = self.is_following();
        let recycled = self.max_row == self.capacity;
        if recycled {
            self.base = (self.base + 1) % self.capacity;
            if !following {
                self.view_row = self.view_row.saturating_sub(1);
            }
        } else {
            self.max_row += 1;
        }

        let last = self.max_row - 1;
        let start = self.index(last, 0);
        let end = start + self.cols;
        for c in &mut self.cells[start..end] {
            *c = blank;
        }
        let slot = self.slot(last);
        self.wrapped[slot] = false;

        if following {
            self.view_row = self.screen_top();
        }
        let moved = following || recycled;
        if moved {
            self.full_redraw = true;
        }
        moved
    }

    /// Move the view by `delta` rows (negative = back into history)
    pub fn scroll_view(&mut self, delta: isize) {
        let limit = self.max_row.saturating_sub(self.view_rows) as isize;
        let target = (self.view_row as isize + delta).clamp(0, limit);
        self.view_row = target as usize;
        self.full_redraw = true;
    }

    /// Re-wrap history to a new width and height
    ///
    /// Soft-wrapped rows are joined back into logical lines, trailing blanks
    /// are dropped (never the cells before the cursor), and the lines are
    /// wrapped again at `new_cols`. Rows past the new history capacity are
    /// discarded oldest first. `cursor` is (history row, col); the return
    /// value is the cursor as (screen row, col) in the new geometry. The view
    /// snaps back to the live screen.
    pub fn reflow(
        &mut self,
        new_cols: usize,
        new_rows: usize,
        cursor: (usize, usize),
        blank: Cell,
    ) -> (usize, usize) {
        let (cursor_row, cursor_col) = cursor;

        let mut lines: Vec<Vec<Cell>> = Vec::new();
        let mut current: Vec<Cell> = Vec::new();
        let mut cursor_line = 0;
        let mut cursor_offset = 0;
        for row in 0..self.max_row {
            if row == cursor_row {
                cursor_line = lines.len();
                cursor_offset = current.len() + cursor_col;
            }
            let start = self.index(row, 0);
            current.extend_from_slice(&self.cells[start..start + self.cols]);
            if !self.is_wrapped(row) || row + 1 == self.max_row {
                lines.push(core::mem::take(&mut current));
            }
        }

        for (i, line) in lines.iter_mut().enumerate() {
            let keep = if i == cursor_line { cursor_offset } else { 0 };
            while line.len() > keep && line.last() == Some(&blank) {
                line.pop();
            }
        }
        let mut end = lines.len();
        while end > cursor_line + 1 && lines[end - 1].is_empty() {
            end -= 1;
        }
        lines.truncate(end);

        let mut rows: Vec<Cell> = Vec::new();
        let mut wrapped: Vec<bool> = Vec::new();
        let mut new_cursor = (0, 0);
        for (i, line) in lines.iter().enumerate() {
            let first = wrapped.len();
            let count = ((line.len() + new_cols - 1) / new_cols).max(1);
            for r in 0..count {
                for c in 0..new_cols {
                    rows.push(line.get(r * new_cols + c).copied().unwrap_or(blank));
                }
                wrapped.push(r + 1 < count);
            }
            if i == cursor_line {
                let r = cursor_offset / new_cols;
                new_cursor = if r >= count {
                    (first + count - 1, new_cols)
                } else {
                    (first + r, cursor_offset % new_cols)
                };
            }
        }

        let capacity = new_rows + SCROLLBACK_ROWS;
        let total = wrapped.len();
        let dropped = total.saturating_sub(capacity);
        let kept = total - dropped;

        self.cells = vec![blank; capacity * new_cols];
        self.cells[..kept * new_cols].copy_from_slice(&rows[dropped * new_cols..]);
        self.wrapped = vec![false; capacity];
        self.wrapped[..kept].copy_from_slice(&wrapped[dropped..]);
        self.cols = new_cols;
        self.view_rows = new_rows;
        self.capacity = capacity;
        self.base = 0;
        self.max_row = kept.max(new_rows);
        self.view_row = self.screen_top();
        self.dirty = vec![None; new_rows];
        self.full_redraw = true;

        let top = self.screen_top();
        let row = new_cursor.0.saturating_sub(dropped).clamp(top, self.max_row - 1);
        (row - top, new_cursor.1.min(new_cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> Cell {
        Cell::default()
    }

    fn glyph(ch: u8) -> Cell {
        Cell { ch, ..Cell::default() }
    }

    #[test]
    fn test_mark_unions_spans() {
        let mut grid = Grid::new(10, 3, blank());
        grid.take_dirty(&mut Vec::new());
        grid.set(1, 4, glyph(b'a'));
        grid.set(1, 2, glyph(b'b'));
        grid.fill(1, 6, 7, glyph(b'c'));
        assert_eq!(grid.dirty_span(1), Some(DirtySpan { x1: 2, x2: 7 }));
        assert_eq!(grid.dirty_span(0), None);
    }

    #[test]
    fn test_take_dirty_resets() {
        let mut grid = Grid::new(10, 3, blank());
        let mut out = Vec::new();
        assert!(grid.take_dirty(&mut out));
        grid.set(0, 0, glyph(b'x'));
        assert!(!grid.take_dirty(&mut out));
        assert_eq!(out[0], Some(DirtySpan { x1: 0, x2: 0 }));
        assert!(!grid.take_dirty(&mut out));
        assert!(out.iter().all(|s| s.is_none()));
    }

    #[test]
    fn test_push_line_grows_then_recycles() {
        let mut grid = Grid::new(4, 2, blank());
        grid.set(0, 0, glyph(b'a'));
        for _ in 0..SCROLLBACK_ROWS {
            assert!(grid.push_line(blank()));
        }
        assert_eq!(grid.max_row(), grid.history_rows());
        assert_eq!(grid.cell(0, 0), Some(glyph(b'a')));

        grid.push_line(blank());
        assert_eq!(grid.max_row(), grid.history_rows());
        assert_eq!(grid.cell(0, 0), Some(blank()));
        assert!(grid.is_following());
    }

    #[test]
    fn test_scrolled_back_view_stays() {
        let mut grid = Grid::new(4, 2, blank());
        for _ in 0..5 {
            grid.push_line(blank());
        }
        grid.scroll_view(-3);
        assert_eq!(grid.view_row(), 2);
        grid.take_dirty(&mut Vec::new());

        assert!(!grid.push_line(blank()));
        assert_eq!(grid.view_row(), 2);
        assert!(!grid.needs_full_redraw());
    }

    #[test]
    fn test_scroll_view_clamps() {
        let mut grid = Grid::new(4, 2, blank());
        grid.push_line(blank());
        grid.scroll_view(-10);
        assert_eq!(grid.view_row(), 0);
        grid.scroll_view(10);
        assert_eq!(grid.view_row(), 1);
    }

    #[test]
    fn test_reflow_joins_soft_wrapped_rows() {
        let mut grid = Grid::new(4, 3, blank());
        for (i, &ch) in b"abcdef".iter().enumerate() {
            grid.set(i / 4, i % 4, glyph(ch));
        }
        grid.set_wrapped(0, true);

        let cursor = grid.reflow(8, 3, (1, 2), blank());
        assert_eq!(cursor, (0, 6));
        let row: Vec<u8> = (0..6).map(|c| grid.cell(0, c).unwrap().ch).collect();
        assert_eq!(row.as_slice(), b"abcdef");
        assert!(!grid.is_wrapped(0));
        assert!(grid.needs_full_redraw());
    }
}
