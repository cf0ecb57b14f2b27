//! Kernel logger for the tty subsystem
//!
//! Implements the `log` facade on top of the kernel's serial writer. Each
//! record becomes one `[TTY] LEVEL target: message\r\n` line, formatted on
//! the stack so logging never allocates. Until a sink is registered records
//! are discarded.

use core::fmt::{self, Write};

use log::{LevelFilter, Log, Metadata, Record};
use spin::RwLock;

/// Serial output routine (e.g. the arch layer's `serial_write`)
pub type SerialSink = fn(&[u8]);

/// Longest line emitted; longer messages are cut
const LINE_MAX: usize = 192;

#[cfg(feature = "debug-tty")]
const MAX_LEVEL: LevelFilter = LevelFilter::Trace;
#[cfg(not(feature = "debug-tty"))]
const MAX_LEVEL: LevelFilter = LevelFilter::Info;

static SINK: RwLock<Option<SerialSink>> = RwLock::new(None);
static LOGGER: SerialLogger = SerialLogger;

/// Fixed-size line, silently truncated, always ends in CRLF
struct LineBuffer {
    buf: [u8; LINE_MAX],
    len: usize,
}

impl LineBuffer {
    const fn new() -> Self {
        LineBuffer {
            buf: [0; LINE_MAX],
            len: 0,
        }
    }

    fn finish(&mut self) -> &[u8] {
        let end = self.len.min(LINE_MAX - 2);
        self.buf[end..end + 2].copy_from_slice(b"\r\n");
        &self.buf[..end + 2]
    }
}

impl Write for LineBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // Keep two bytes for the line terminator
        let room = (LINE_MAX - 2).saturating_sub(self.len);
        let n = s.len().min(room);
        self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
        self.len += n;
        Ok(())
    }
}

fn format_line<'a>(line: &'a mut LineBuffer, record: &Record<'_>) -> &'a [u8] {
    let _ = write!(
        line,
        "[TTY] {} {}: {}",
        record.level(),
        record.target(),
        record.args()
    );
    line.finish()
}

pub struct SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Some(sink) = *SINK.read() else {
            return;
        };
        let mut line = LineBuffer::new();
        sink(format_line(&mut line, record));
    }

    fn flush(&self) {}
}

/// Register the serial sink and install the logger
///
/// Safe to call more than once; later calls only replace the sink.
pub fn init(sink: SerialSink) {
    *SINK.write() = Some(sink);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(MAX_LEVEL);
    }
}
