//! Device byte plumbing
//!
//! The serial port and keyboard decoder hand raw bytes to a session's line
//! discipline through `pump_input`; the device half of a tty goes out through
//! `write_to_device`. Both run from deferred workers, never from an interrupt
//! handler directly.

use crate::config::INPUT_BATCH;
use crate::session::TtySession;

/// Raw byte producer (serial receive FIFO, decoded keyboard queue)
pub trait ByteSource {
    /// Read up to `buf.len()` bytes without blocking; 0 when nothing is queued
    fn read_bytes(&mut self, buf: &mut [u8]) -> usize;
}

/// Raw byte consumer (serial transmit)
pub trait ByteSink {
    fn write_bytes(&mut self, bytes: &[u8]);
}

/// Move one batch of input from `source` into the session's line discipline
///
/// Returns the number of bytes moved; call again while it returns
/// `INPUT_BATCH` to drain a busy device.
pub fn pump_input<S: ByteSource + ?Sized>(source: &mut S, session: &TtySession) -> usize {
    let mut buf = [0u8; INPUT_BATCH];
    let n = source.read_bytes(&mut buf).min(INPUT_BATCH);
    if n > 0 {
        session.ldisc().receive_bytes(&buf[..n]);
    }
    n
}

/// Send output bytes to the device, applying the session's output transforms
pub fn write_to_device<K: ByteSink + ?Sized>(session: &TtySession, bytes: &[u8], sink: &mut K) {
    session.ldisc().write_transform(bytes, |chunk| sink.write_bytes(chunk));
}
