//! WATOS TTY Subsystem
//!
//! Kernel terminal sessions: each session owns a Term (text buffer with
//! scrollback and an ANSI escape subset) and a LineDiscipline (canonical or
//! raw input, echo, signal characters). Only the active session is drawn; a
//! single render worker turns coalesced render requests into framebuffer
//! updates.
//!
//! ```text
//!  kernel print / write() ──► TtyService::print ──► Term ──┐
//!                                  │                       │ capture
//!                                  └─► request_render      ▼
//!                                          │         TermSnapshot
//!                                          ▼               │
//!                                   RenderWorker ──► VgaTermRenderer ──► Framebuffer
//!
//!  serial / keyboard ──► pump_input ──► LineDiscipline ──► read()
//!                                          ├─► echo into Term
//!                                          └─► signal sink
//! ```
//!
//! The kernel calls `init` once during boot, before any other entry point,
//! then starts a thread running `RenderWorker::run(service)`.

#![no_std]

extern crate alloc;

pub mod config;
pub mod error;
pub mod input;
pub mod klog;
pub mod renderer;
pub mod service;
pub mod session;
pub mod worker;

pub use config::{TtyGeometry, GLYPH_HEIGHT, GLYPH_WIDTH, INPUT_BATCH, MAX_SESSIONS};
pub use error::{TtyError, TtyResult};
pub use input::{pump_input, write_to_device, ByteSink, ByteSource};
pub use renderer::{Framebuffer, VgaTermRenderer};
pub use service::{RenderQueue, RenderReason, SignalSink, TtyService};
pub use session::{SessionId, SessionRegistry, TtySession};
pub use worker::RenderWorker;

pub use watos_ldisc::{LdiscConfig, LineDiscipline, Signal};
pub use watos_terminal::{Color, Term, TermSnapshot};

use alloc::vec::Vec;
use spin::Once;

static SERVICE: Once<TtyService> = Once::new();

/// Initialize the TTY subsystem for a `fb_width` x `fb_height` framebuffer
///
/// Later calls return the existing service unchanged.
pub fn init(fb_width: u32, fb_height: u32) -> &'static TtyService {
    SERVICE.call_once(|| {
        let geometry = TtyGeometry::from_framebuffer(fb_width, fb_height);
        log::info!(
            "tty subsystem initialized ({}x{} cells, {} sessions max)",
            geometry.cols,
            geometry.rows,
            MAX_SESSIONS
        );
        TtyService::new(geometry)
    })
}

/// The service, once `init` has run
pub fn service() -> TtyResult<&'static TtyService> {
    SERVICE.get().ok_or(TtyError::NotInitialized)
}

/// Create a session at the default geometry
pub fn session_create() -> TtyResult<SessionId> {
    service()?.create_default_session()
}

pub fn session_destroy(id: SessionId) -> TtyResult<()> {
    service()?.destroy_session(id)
}

pub fn session_list() -> TtyResult<Vec<SessionId>> {
    Ok(service()?.list_sessions())
}

/// Write bytes to a session's terminal
pub fn tty_print(id: SessionId, bytes: &[u8]) -> TtyResult<()> {
    service()?.print(id, bytes)
}

pub fn tty_putc(id: SessionId, byte: u8) -> TtyResult<()> {
    service()?.putc(id, byte)
}

pub fn tty_set_colors(id: SessionId, fg: Color, bg: Color) -> TtyResult<()> {
    service()?.set_colors(id, fg, bg)
}

/// Input focus moved to `id`
pub fn tty_activate(id: SessionId) -> TtyResult<()> {
    service()?.activate(id)
}

pub fn tty_resize(id: SessionId, cols: usize, rows: usize) -> TtyResult<()> {
    service()?.resize(id, cols, rows)
}

pub fn tty_scroll(id: SessionId, delta: isize) -> TtyResult<()> {
    service()?.scroll(id, delta)
}

/// Raw input bytes for a session (already out of interrupt context)
pub fn tty_input(id: SessionId, bytes: &[u8]) -> TtyResult<()> {
    service()?.input(id, bytes)
}

/// Non-blocking read of cooked input
pub fn tty_read(id: SessionId, out: &mut [u8]) -> TtyResult<usize> {
    service()?.read(id, out)
}

/// Route tty-generated signals (SIGINT, SIGQUIT, SIGTSTP) to the kernel
pub fn tty_set_signal_sink(sink: Option<SignalSink>) -> TtyResult<()> {
    service()?.set_signal_sink(sink);
    Ok(())
}
