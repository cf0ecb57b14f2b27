//! Line discipline state machine
//!
//! One lock covers the cooked ring and the pending line: erase and echo must
//! see both consistently. Echo and signal sinks run with that lock held, so
//! they must not call back into the same discipline.

use alloc::boxed::Box;

use spin::Mutex;
use watos_sync::Semaphore;

use crate::ring::Ring;
use crate::termios::{InputFlags, LdiscConfig, LocalFlags, Signal};

/// Bytes ready for readers
pub const COOKED_CAPACITY: usize = 4096;

/// Longest canonical line, terminator included
pub const LINE_CAPACITY: usize = 512;

/// Visually removes one character
const ERASE_SEQ: &[u8] = b"\x08 \x08";

/// Receives echoed bytes
pub type EchoFn = Box<dyn FnMut(&[u8]) + Send>;

/// Receives raised signals
pub type SignalFn = Box<dyn FnMut(Signal) + Send>;

struct LdiscState {
    config: LdiscConfig,
    cooked: Ring,
    line: [u8; LINE_CAPACITY],
    line_len: usize,
    /// VEOF seen on an empty line, not yet reported to a reader
    eof_pending: bool,
    echo: Option<EchoFn>,
    signal: Option<SignalFn>,
}

impl LdiscState {
    fn echo(&mut self, bytes: &[u8]) {
        if !self.config.echo() {
            return;
        }
        let onlcr = self.config.onlcr();
        if let Some(echo) = self.echo.as_mut() {
            transform_output(bytes, onlcr, |chunk| echo(chunk));
        }
    }

    fn raise(&mut self, sig: Signal, byte: u8) {
        if !self.config.lflags.contains(LocalFlags::NOFLSH) {
            self.line_len = 0;
        }
        self.echo(&[byte]);
        match self.signal.as_mut() {
            Some(deliver) => deliver(sig),
            None => log::debug!("ldisc: signal {} dropped, no sink", sig.number()),
        }
    }

    /// Move the pending line into the cooked ring, whole or not at all
    fn commit_line(&mut self) -> bool {
        let len = self.line_len;
        self.line_len = 0;
        if self.cooked.push_all(&self.line[..len]) {
            true
        } else {
            log::debug!("ldisc: cooked buffer full, dropped {}-byte line", len);
            false
        }
    }

    fn erase_one(&mut self) -> bool {
        if self.line_len == 0 {
            return false;
        }
        self.line_len -= 1;
        self.echo(ERASE_SEQ);
        true
    }

    /// Process one input byte; true when a reader should be woken
    fn receive_byte(&mut self, byte: u8) -> bool {
        let mut byte = byte;
        if byte == b'\r' && self.config.iflags.contains(InputFlags::ICRNL) {
            byte = b'\n';
        }

        if let Some(sig) = self.config.signal_for(byte) {
            self.raise(sig, byte);
            return false;
        }

        if !self.config.canonical() {
            if self.cooked.push(byte) {
                self.echo(&[byte]);
                return true;
            }
            return false;
        }

        let cc = self.config.cc;
        if byte == cc.erase || byte == 0x08 {
            self.erase_one();
            false
        } else if byte == cc.kill {
            while self.erase_one() {}
            false
        } else if byte == cc.eof {
            if self.line_len == 0 {
                self.eof_pending = true;
            }
            self.commit_line() || self.eof_pending
        } else if byte == b'\n' {
            // Regular bytes stop one short of capacity, the terminator always fits
            self.line[self.line_len] = b'\n';
            self.line_len += 1;
            self.echo(b"\n");
            self.commit_line()
        } else {
            if self.line_len + 1 < LINE_CAPACITY {
                self.line[self.line_len] = byte;
                self.line_len += 1;
                self.echo(&[byte]);
            }
            false
        }
    }
}

/// Apply output post-processing, handing each resulting chunk to `emit`
fn transform_output<F: FnMut(&[u8])>(input: &[u8], onlcr: bool, mut emit: F) {
    if !onlcr {
        if !input.is_empty() {
            emit(input);
        }
        return;
    }
    let mut start = 0;
    for (i, &byte) in input.iter().enumerate() {
        if byte == b'\n' {
            if i > start {
                emit(&input[start..i]);
            }
            emit(b"\r\n");
            start = i + 1;
        }
    }
    if start < input.len() {
        emit(&input[start..]);
    }
}

/// Line discipline for one tty
pub struct LineDiscipline {
    state: Mutex<LdiscState>,
    /// One permit per wakeup of a blocked reader
    readers: Semaphore,
}

impl LineDiscipline {
    pub fn new(config: LdiscConfig) -> Self {
        LineDiscipline {
            state: Mutex::new(LdiscState {
                config,
                cooked: Ring::with_capacity(COOKED_CAPACITY),
                line: [0; LINE_CAPACITY],
                line_len: 0,
                eof_pending: false,
                echo: None,
                signal: None,
            }),
            readers: Semaphore::new(0),
        }
    }

    pub fn config(&self) -> LdiscConfig {
        self.state.lock().config
    }

    /// Replace the configuration; a pending partial line is kept
    pub fn set_config(&self, config: LdiscConfig) {
        self.state.lock().config = config;
    }

    /// Bind (or with None, unbind) the echo sink
    pub fn set_echo(&self, echo: Option<EchoFn>) {
        self.state.lock().echo = echo;
    }

    /// Bind (or with None, unbind) the signal sink
    pub fn set_signal(&self, signal: Option<SignalFn>) {
        self.state.lock().signal = signal;
    }

    /// Feed raw input bytes
    ///
    /// Must be called from a deferred worker, never straight from an
    /// interrupt handler: the whole batch runs under the discipline lock.
    pub fn receive_bytes(&self, data: &[u8]) {
        let mut wake = false;
        {
            let mut state = self.state.lock();
            for &byte in data {
                wake |= state.receive_byte(byte);
            }
        }
        if wake {
            self.readers.signal();
        }
    }

    /// Pop up to `out.len()` cooked bytes, never blocks
    pub fn read(&self, out: &mut [u8]) -> usize {
        self.state.lock().cooked.pop_while(out, |_| true)
    }

    /// Pop bytes up to and including the next newline
    pub fn read_line(&self, out: &mut [u8]) -> usize {
        let mut done = false;
        self.state.lock().cooked.pop_while(out, |byte| {
            if done {
                return false;
            }
            done = byte == b'\n';
            true
        })
    }

    /// Block until cooked data or end-of-file is available, then read
    ///
    /// Returns 0 only for end-of-file (VEOF on an empty line).
    pub fn read_blocking(&self, out: &mut [u8]) -> usize {
        loop {
            {
                let mut state = self.state.lock();
                let n = state.cooked.pop_while(out, |_| true);
                if n > 0 {
                    return n;
                }
                if state.eof_pending {
                    state.eof_pending = false;
                    return 0;
                }
            }
            self.readers.wait();
        }
    }

    pub fn has_readable(&self) -> bool {
        !self.state.lock().cooked.is_empty()
    }

    /// Bytes of the partial canonical line not yet delivered
    pub fn pending_line_len(&self) -> usize {
        self.state.lock().line_len
    }

    /// Block until `receive_bytes` makes something readable
    pub fn reader_wait(&self) {
        self.readers.wait();
    }

    pub fn reader_try_acquire(&self) -> bool {
        self.readers.try_acquire()
    }

    /// Output-side transform for the device half of the tty
    pub fn write_transform<F: FnMut(&[u8])>(&self, input: &[u8], emit: F) {
        let onlcr = self.state.lock().config.onlcr();
        transform_output(input, onlcr, emit);
    }

    /// Drop all buffered input, cooked and pending
    pub fn flush_input(&self) {
        let mut state = self.state.lock();
        state.cooked.clear();
        state.line_len = 0;
        state.eof_pending = false;
    }
}

impl Default for LineDiscipline {
    fn default() -> Self {
        Self::new(LdiscConfig::default())
    }
}
