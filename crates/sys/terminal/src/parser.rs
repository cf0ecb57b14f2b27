//! Escape sequence parser
//!
//! Three-state machine: Normal, SawEsc, InCsi. Feeds one byte at a time and
//! hands back an `Action` when a byte completes something the terminal acts on.
//! Unknown escapes are swallowed; CSI parameters past `MAX_CSI_PARAMS` are
//! dropped and the count saturates.

/// Maximum number of CSI parameters kept
pub const MAX_CSI_PARAMS: usize = 8;

/// Parameter values saturate here
const PARAM_LIMIT: u16 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    /// Received ESC
    SawEsc,
    /// Received ESC [
    InCsi,
}

/// Parsed CSI sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Csi {
    pub params: [u16; MAX_CSI_PARAMS],
    pub count: usize,
    /// `ESC [ ?` form
    pub private: bool,
    pub final_byte: u8,
}

impl Csi {
    /// Parameter `index`, or `default` when missing or zero
    pub fn param(&self, index: usize, default: u16) -> u16 {
        if index < self.count && self.params[index] != 0 {
            self.params[index]
        } else {
            default
        }
    }

    /// Collected parameters
    pub fn params(&self) -> &[u16] {
        &self.params[..self.count]
    }
}

/// What the terminal should do with the byte just consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Write a glyph at the cursor
    Print(u8),
    /// C0 control byte (or DEL)
    Control(u8),
    /// Complete CSI sequence
    Csi(Csi),
    /// Recognized single-byte escape (`ESC 7`, `ESC 8`, `ESC c`)
    Esc(u8),
}

pub struct Parser {
    state: State,
    params: [u16; MAX_CSI_PARAMS],
    count: usize,
    current: u16,
    in_param: bool,
    private: bool,
}

impl Parser {
    pub const fn new() -> Self {
        Self {
            state: State::Normal,
            params: [0; MAX_CSI_PARAMS],
            count: 0,
            current: 0,
            in_param: false,
            private: false,
        }
    }

    /// Reset parser to the Normal state
    pub fn reset(&mut self) {
        self.state = State::Normal;
        self.begin_csi();
    }

    /// Process a single byte, returning an action if one is produced
    pub fn advance(&mut self, byte: u8) -> Option<Action> {
        match self.state {
            State::Normal => self.normal(byte),
            State::SawEsc => self.saw_esc(byte),
            State::InCsi => self.in_csi(byte),
        }
    }

    fn normal(&mut self, byte: u8) -> Option<Action> {
        match byte {
            0x1B => {
                self.state = State::SawEsc;
                None
            }
            0x00..=0x1F | 0x7F => Some(Action::Control(byte)),
            // 0x80-0xFF are code page 437 glyphs on the VGA font
            _ => Some(Action::Print(byte)),
        }
    }

    fn saw_esc(&mut self, byte: u8) -> Option<Action> {
        match byte {
            b'[' => {
                self.begin_csi();
                self.state = State::InCsi;
                None
            }
            b'7' | b'8' | b'c' => {
                self.state = State::Normal;
                Some(Action::Esc(byte))
            }
            _ => {
                self.state = State::Normal;
                None
            }
        }
    }

    fn begin_csi(&mut self) {
        self.params = [0; MAX_CSI_PARAMS];
        self.count = 0;
        self.current = 0;
        self.in_param = false;
        self.private = false;
    }

    fn commit_param(&mut self) {
        if self.count < MAX_CSI_PARAMS {
            self.params[self.count] = self.current;
            self.count += 1;
        }
        self.current = 0;
        self.in_param = false;
    }

    fn in_csi(&mut self, byte: u8) -> Option<Action> {
        match byte {
            b'0'..=b'9' => {
                let digit = (byte - b'0') as u16;
                self.current = self.current.saturating_mul(10).saturating_add(digit).min(PARAM_LIMIT);
                self.in_param = true;
                None
            }
            b';' => {
                self.commit_param();
                None
            }
            b'?' if self.count == 0 && !self.in_param => {
                self.private = true;
                None
            }
            // Final byte
            0x40..=0x7E => {
                if self.in_param || self.count > 0 {
                    self.commit_param();
                }
                self.state = State::Normal;
                Some(Action::Csi(Csi {
                    params: self.params,
                    count: self.count,
                    private: self.private,
                    final_byte: byte,
                }))
            }
            // CAN / SUB abort the sequence
            0x18 | 0x1A => {
                self.state = State::Normal;
                None
            }
            0x1B => {
                self.state = State::SawEsc;
                None
            }
            _ => None,
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
