//! WATOS Terminal
//!
//! A no_std text terminal: character grid with scrollback, an ANSI/VT100
//! escape subset, and per-row dirty tracking for incremental redraw.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Term                                                        │
//! │  - write/putc, resize with reflow, scroll, seq/view_seq     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Parser                Cursor / Pen                          │
//! │  - ESC/CSI states      - position, SGR attributes           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Grid                                                        │
//! │  - history ring, view window, dirty spans                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TermSnapshot                                                │
//! │  - render-side copy, cells pulled on demand                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![no_std]

extern crate alloc;

pub mod cell;
pub mod color;
pub mod grid;
pub mod parser;
pub mod snapshot;
pub mod state;
pub mod term;

pub use cell::Cell;
pub use color::{color_256, Color, PALETTE};
pub use grid::{DirtySpan, Grid, MAX_COLS, MAX_ROWS, SCROLLBACK_ROWS};
pub use parser::{Action, Csi, Parser, MAX_CSI_PARAMS};
pub use snapshot::{SharedTerm, TermSnapshot};
pub use state::{Cursor, Pen};
pub use term::{GeometryError, Term, TAB_WIDTH};
