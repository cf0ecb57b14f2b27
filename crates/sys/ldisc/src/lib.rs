//! WATOS Line Discipline
//!
//! Turns raw input bytes (keyboard, serial) into what a reader sees:
//!
//! ```text
//!  raw bytes ──► LineDiscipline ──► cooked Ring ──► read()
//!                   │    │
//!                   │    └─► echo sink (back to the terminal)
//!                   └──────► signal sink (SIGINT/SIGQUIT/SIGTSTP)
//! ```
//!
//! In canonical mode input is assembled into lines with erase/kill editing and
//! only complete lines reach the cooked ring. In raw mode bytes pass straight
//! through. Nothing here ever blocks a writer: a full buffer drops the newest data.

#![no_std]

extern crate alloc;

pub mod ring;
pub mod termios;
pub mod ldisc;

pub use ring::Ring;
pub use termios::{ControlChars, InputFlags, LdiscConfig, LocalFlags, OutputFlags, Signal};
pub use ldisc::{EchoFn, LineDiscipline, SignalFn, COOKED_CAPACITY, LINE_CAPACITY};
