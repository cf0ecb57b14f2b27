//! Render worker
//!
//! One long-lived kernel thread runs `RenderWorker::run`. Each cycle waits for
//! a coalesced render request, captures the active session's Term and draws
//! its damage. A missing active session just skips the cycle.

use watos_terminal::TermSnapshot;

use crate::renderer::{Framebuffer, VgaTermRenderer};
use crate::service::{RenderReason, TtyService};
use crate::session::SessionId;

pub struct RenderWorker<F: Framebuffer> {
    fb: F,
    renderer: VgaTermRenderer,
    snapshot: TermSnapshot,
    /// Session drawn by the previous cycle
    last_session: Option<SessionId>,
    /// Cursor cell underlined by the previous cycle
    last_cursor: Option<(usize, usize)>,
    /// (cols, rows) of the window drawn by the previous cycle
    last_extent: (usize, usize),
    win_x: u32,
    win_y: u32,
}

impl<F: Framebuffer> RenderWorker<F> {
    /// Worker drawing into `fb` at its top-left corner
    pub fn new(fb: F) -> Self {
        Self::with_origin(fb, 0, 0)
    }

    /// Worker drawing the window at pixel offset (win_x, win_y)
    pub fn with_origin(fb: F, win_x: u32, win_y: u32) -> Self {
        RenderWorker {
            fb,
            renderer: VgaTermRenderer::new(),
            snapshot: TermSnapshot::new(),
            last_session: None,
            last_cursor: None,
            last_extent: (0, 0),
            win_x,
            win_y,
        }
    }

    pub fn framebuffer(&self) -> &F {
        &self.fb
    }

    pub fn framebuffer_mut(&mut self) -> &mut F {
        &mut self.fb
    }

    /// Block for one request and render it
    pub fn run_once(&mut self, service: &TtyService) -> RenderReason {
        service.render_wait();
        self.cycle(service)
    }

    /// Render if a request is waiting; None when there was none
    pub fn try_run_once(&mut self, service: &TtyService) -> Option<RenderReason> {
        if service.render_try_acquire() {
            Some(self.cycle(service))
        } else {
            None
        }
    }

    /// Worker thread body
    pub fn run(&mut self, service: &TtyService) -> ! {
        log::info!("render worker started");
        loop {
            self.run_once(service);
        }
    }

    fn cycle(&mut self, service: &TtyService) -> RenderReason {
        let mut reasons = service.consume_render_requests();
        let Some(session) = service.get_active_for_render() else {
            self.last_session = None;
            self.last_cursor = None;
            return reasons;
        };

        if self.last_session != Some(session.id()) {
            // Another session owned the window; nothing drawn there is ours
            reasons |= RenderReason::ACTIVE_CHANGED;
            self.last_session = Some(session.id());
            self.last_cursor = None;
            session.term().lock().invalidate_view();
        }

        self.snapshot.capture(session.term());
        if reasons.intersects(RenderReason::ACTIVE_CHANGED | RenderReason::RESIZE) {
            // Cover the old window too, a smaller one leaves its edge behind
            let (cols, rows) = self.last_extent;
            self.renderer.clear_window(
                &mut self.fb,
                cols.max(self.snapshot.cols()),
                rows.max(self.snapshot.rows()),
                self.snapshot.default_bg(),
                self.win_x,
                self.win_y,
            );
            self.last_cursor = None;
        }
        self.last_extent = (self.snapshot.cols(), self.snapshot.rows());
        let rows = self
            .renderer
            .render(&mut self.fb, &mut self.snapshot, self.win_x, self.win_y);
        self.last_cursor = self.renderer.render_cursor(
            &mut self.fb,
            &mut self.snapshot,
            self.last_cursor,
            self.win_x,
            self.win_y,
        );
        self.snapshot.release();

        log::trace!(
            "{}: rendered {} rows, reasons {:?}, seq {}",
            session.id(),
            rows,
            reasons,
            self.snapshot.seq()
        );
        reasons
    }
}
