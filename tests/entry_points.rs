//! Kernel-facing entry points over the global service
//!
//! Everything lives in one test: the service is process-wide.

use std::sync::Mutex;

use watos_tty::{Color, SessionId, Signal, TtyError};

static SIGNALED: Mutex<Option<(usize, u32)>> = Mutex::new(None);

fn on_signal(id: SessionId, signal: Signal) {
    *SIGNALED.lock().unwrap() = Some((id.index(), signal.number()));
}

#[test]
fn test_global_lifecycle() {
    assert_eq!(watos_tty::service().err(), Some(TtyError::NotInitialized));
    assert_eq!(watos_tty::session_create(), Err(TtyError::NotInitialized));

    let service = watos_tty::init(640, 480);
    let again = watos_tty::init(800, 600);
    assert!(core::ptr::eq(service, again));
    assert_eq!(service.geometry().cols, 80);
    assert_eq!(service.geometry().rows, 30);

    let a = watos_tty::session_create().unwrap();
    let b = watos_tty::session_create().unwrap();
    assert_eq!(watos_tty::session_list().unwrap(), vec![a, b]);
    assert_eq!(service.active(), Some(a));

    watos_tty::tty_set_colors(a, Color::WHITE, Color::BLACK).unwrap();
    watos_tty::tty_print(a, b"hello").unwrap();
    watos_tty::tty_putc(a, b'!').unwrap();
    {
        let session = service.session(a).unwrap();
        let term = session.term().lock();
        assert_eq!(term.cell(0, 5).unwrap().ch, b'!');
        assert_eq!(term.cell(0, 0).unwrap().fg, Color::WHITE);
    }

    watos_tty::tty_activate(b).unwrap();
    assert_eq!(service.active(), Some(b));
    watos_tty::tty_resize(b, 40, 10).unwrap();
    assert_eq!(
        watos_tty::tty_resize(b, 40, 0),
        Err(TtyError::InvalidGeometry)
    );
    watos_tty::tty_scroll(b, -3).unwrap();

    watos_tty::tty_set_signal_sink(Some(on_signal)).unwrap();
    watos_tty::tty_input(b, b"echo hi\n\x03").unwrap();
    let mut buf = [0u8; 32];
    assert_eq!(watos_tty::tty_read(b, &mut buf), Ok(8));
    assert_eq!(&buf[..8], b"echo hi\n");
    assert_eq!(*SIGNALED.lock().unwrap(), Some((b.index(), 2)));

    watos_tty::session_destroy(b).unwrap();
    assert_eq!(service.active(), None);
    assert_eq!(watos_tty::tty_print(b, b"x"), Err(TtyError::NoSuchSession));
    assert_eq!(
        TtyError::NoSuchSession.to_errno(),
        watos_tty::session_destroy(b).unwrap_err().to_errno()
    );
}
