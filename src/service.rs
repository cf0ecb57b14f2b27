//! TtyService - session ownership, active session and render scheduling
//!
//! Producers mutate a session's Term and then call `request_render`. Requests
//! are coalesced: the reasons are OR-ed into one mask and the render worker is
//! woken only on the transition from "nothing pending" to "pending", so a burst
//! of writes costs one wakeup. The worker takes the accumulated mask with
//! `consume_render_requests` and draws the latest state of the active session.
//!
//! The registry and the active handle sit under separate locks and are never
//! held together.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use bitflags::bitflags;
use spin::{Mutex, RwLock};
use watos_ldisc::Signal;
use watos_sync::Semaphore;
use watos_terminal::Color;

use crate::config::TtyGeometry;
use crate::error::{TtyError, TtyResult};
use crate::session::{SessionId, SessionRegistry, TtySession};

bitflags! {
    /// Why a redraw was requested
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenderReason: u32 {
        const OUTPUT = 1 << 0;
        const SCROLL = 1 << 1;
        const RESIZE = 1 << 2;
        const ACTIVE_CHANGED = 1 << 3;
    }
}

/// Kernel entry point for tty-generated signals
pub type SignalSink = fn(SessionId, Signal);

/// Coalescing render request queue
pub struct RenderQueue {
    pending: AtomicBool,
    reasons: AtomicU32,
    wake: Semaphore,
}

impl RenderQueue {
    pub const fn new() -> Self {
        RenderQueue {
            pending: AtomicBool::new(false),
            reasons: AtomicU32::new(0),
            wake: Semaphore::new(0),
        }
    }

    /// Record `reason`; wakes the worker only if nothing was pending
    pub fn request(&self, reason: RenderReason) {
        self.reasons.fetch_or(reason.bits(), Ordering::AcqRel);
        if !self.pending.swap(true, Ordering::AcqRel) {
            self.wake.signal();
        }
    }

    /// Take every reason recorded since the last consume
    pub fn consume(&self) -> RenderReason {
        // Clear pending before taking the mask: a request racing with us
        // either lands in this mask or signals a fresh wakeup.
        self.pending.store(false, Ordering::Release);
        RenderReason::from_bits_truncate(self.reasons.swap(0, Ordering::AcqRel))
    }

    pub fn wait(&self) {
        self.wake.wait();
    }

    pub fn try_acquire(&self) -> bool {
        self.wake.try_acquire()
    }

    /// Wakeups signalled and not yet taken
    pub fn wakeups(&self) -> usize {
        self.wake.count()
    }
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TtyService {
    geometry: TtyGeometry,
    sessions: Mutex<SessionRegistry>,
    active: Mutex<Option<SessionId>>,
    render: Arc<RenderQueue>,
    signal_sink: Arc<RwLock<Option<SignalSink>>>,
}

impl TtyService {
    /// Service whose sessions default to `geometry`
    pub fn new(geometry: TtyGeometry) -> Self {
        TtyService {
            geometry,
            sessions: Mutex::new(SessionRegistry::new()),
            active: Mutex::new(None),
            render: Arc::new(RenderQueue::new()),
            signal_sink: Arc::new(RwLock::new(None)),
        }
    }

    pub fn geometry(&self) -> TtyGeometry {
        self.geometry
    }

    pub fn render_queue(&self) -> &RenderQueue {
        &self.render
    }

    // === Registry ===

    /// Add a session built for a slot obtained from the registry
    pub fn register_session(&self, session: Arc<TtySession>) -> bool {
        self.sessions.lock().insert(session)
    }

    /// Remove a session from the registry, returning the registry's reference
    pub fn unregister_session(&self, id: SessionId) -> Option<Arc<TtySession>> {
        self.sessions.lock().remove(id)
    }

    pub fn session(&self, id: SessionId) -> Option<Arc<TtySession>> {
        self.sessions.lock().get(id)
    }

    pub fn list_sessions(&self) -> Vec<SessionId> {
        self.sessions.lock().ids()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }

    // === Active session ===

    /// Swap the active handle; does not request a render
    pub fn set_active(&self, id: Option<SessionId>) -> Option<SessionId> {
        core::mem::replace(&mut *self.active.lock(), id)
    }

    pub fn active(&self) -> Option<SessionId> {
        *self.active.lock()
    }

    /// The active session, if it is still registered
    pub fn get_active_for_render(&self) -> Option<Arc<TtySession>> {
        let id = (*self.active.lock())?;
        self.session(id)
    }

    /// Clear the active handle if it names `id`; returns whether it did
    pub fn clear_active_if_matches(&self, id: SessionId) -> bool {
        let mut active = self.active.lock();
        if *active == Some(id) {
            *active = None;
            true
        } else {
            false
        }
    }

    // === Render scheduling ===

    pub fn request_render(&self, reason: RenderReason) {
        self.render.request(reason);
    }

    pub fn consume_render_requests(&self) -> RenderReason {
        self.render.consume()
    }

    /// Block the render worker until a request arrives
    pub fn render_wait(&self) {
        self.render.wait();
    }

    pub fn render_try_acquire(&self) -> bool {
        self.render.try_acquire()
    }

    // === Signals ===

    /// Route line discipline signals to the kernel; None drops them
    pub fn set_signal_sink(&self, sink: Option<SignalSink>) {
        *self.signal_sink.write() = sink;
    }

    // === Session lifecycle ===

    /// Create and register a session of `cols` x `rows`
    ///
    /// The session's echo goes to its own Term and requests an Output
    /// render. The first session created while none is active becomes active.
    pub fn create_session(&self, cols: usize, rows: usize) -> TtyResult<SessionId> {
        let id = self.sessions.lock().reserve().ok_or(TtyError::SessionLimit)?;
        let session = match TtySession::new(id, cols, rows) {
            Ok(session) => Arc::new(session),
            Err(err) => {
                self.sessions.lock().release(id);
                return Err(err.into());
            }
        };

        let term = session.term().clone();
        let render = self.render.clone();
        session.ldisc().set_echo(Some(alloc::boxed::Box::new(move |bytes: &[u8]| {
            term.lock().write(bytes);
            render.request(RenderReason::OUTPUT);
        })));

        let sink = self.signal_sink.clone();
        session.ldisc().set_signal(Some(alloc::boxed::Box::new(move |signal: Signal| {
            let target = *sink.read();
            match target {
                Some(deliver) => deliver(id, signal),
                None => log::debug!("{}: {:?} dropped, no signal sink", id, signal),
            }
        })));

        let (cols, rows) = session.size();
        self.register_session(session);

        let became_active = {
            let mut active = self.active.lock();
            if active.is_none() {
                *active = Some(id);
                true
            } else {
                false
            }
        };
        if became_active {
            self.request_render(RenderReason::ACTIVE_CHANGED);
        }

        log::info!("{}: created {}x{}", id, cols, rows);
        Ok(id)
    }

    /// Create a session sized to the service's default geometry
    pub fn create_default_session(&self) -> TtyResult<SessionId> {
        self.create_session(self.geometry.cols, self.geometry.rows)
    }

    /// Tear down a session
    ///
    /// The active handle is cleared first, then the session leaves the
    /// registry. A render cycle already holding the session finishes with
    /// it; the Term is freed when that reference goes.
    pub fn destroy_session(&self, id: SessionId) -> TtyResult<()> {
        self.clear_active_if_matches(id);
        let session = self.unregister_session(id).ok_or(TtyError::NoSuchSession)?;
        session.ldisc().set_echo(None);
        session.ldisc().set_signal(None);
        drop(session);
        log::info!("{}: destroyed", id);
        Ok(())
    }

    fn lookup(&self, id: SessionId) -> TtyResult<Arc<TtySession>> {
        self.session(id).ok_or(TtyError::NoSuchSession)
    }

    // === Output paths ===

    /// Write output bytes to a session's Term
    pub fn print(&self, id: SessionId, bytes: &[u8]) -> TtyResult<()> {
        let session = self.lookup(id)?;
        session.term().lock().write(bytes);
        self.request_render(RenderReason::OUTPUT);
        Ok(())
    }

    pub fn putc(&self, id: SessionId, byte: u8) -> TtyResult<()> {
        let session = self.lookup(id)?;
        session.term().lock().putc(byte);
        self.request_render(RenderReason::OUTPUT);
        Ok(())
    }

    pub fn set_colors(&self, id: SessionId, fg: Color, bg: Color) -> TtyResult<()> {
        let session = self.lookup(id)?;
        session.term().lock().set_colors(fg, bg);
        self.request_render(RenderReason::OUTPUT);
        Ok(())
    }

    /// Focus moved to `id`: make it active and repaint it in full
    pub fn activate(&self, id: SessionId) -> TtyResult<()> {
        let session = self.lookup(id)?;
        let previous = self.set_active(Some(id));
        session.term().lock().invalidate_view();
        self.request_render(RenderReason::ACTIVE_CHANGED);
        if previous != Some(id) {
            log::info!("active session -> {}", id);
        }
        Ok(())
    }

    pub fn resize(&self, id: SessionId, cols: usize, rows: usize) -> TtyResult<()> {
        let session = self.lookup(id)?;
        session.term().lock().set_winsz(cols, rows)?;
        self.request_render(RenderReason::RESIZE);
        Ok(())
    }

    /// Scroll a session's view through history (negative = back)
    pub fn scroll(&self, id: SessionId, delta: isize) -> TtyResult<()> {
        let session = self.lookup(id)?;
        session.term().lock().scroll(delta);
        self.request_render(RenderReason::SCROLL);
        Ok(())
    }

    // === Input paths ===

    /// Feed raw input bytes to a session's line discipline
    pub fn input(&self, id: SessionId, bytes: &[u8]) -> TtyResult<()> {
        let session = self.lookup(id)?;
        session.ldisc().receive_bytes(bytes);
        Ok(())
    }

    /// Non-blocking read of cooked input
    pub fn read(&self, id: SessionId, out: &mut [u8]) -> TtyResult<usize> {
        let session = self.lookup(id)?;
        Ok(session.ldisc().read(out))
    }
}
