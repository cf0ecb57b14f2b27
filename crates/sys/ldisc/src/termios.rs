//! Line discipline configuration (termios subset)

use bitflags::bitflags;

bitflags! {
    /// Local modes
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LocalFlags: u32 {
        /// Canonical (line-buffered) input
        const ICANON = 0b0000_0001;
        /// Echo input back to the terminal
        const ECHO   = 0b0000_0010;
        /// Raise signals for INTR/QUIT/SUSP
        const ISIG   = 0b0000_0100;
        /// Keep the pending line when a signal character arrives
        const NOFLSH = 0b0000_1000;
    }
}

bitflags! {
    /// Input modes
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InputFlags: u32 {
        /// Translate CR to NL on input
        const ICRNL = 0b0000_0001;
    }
}

bitflags! {
    /// Output modes
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OutputFlags: u32 {
        /// Translate NL to CR-NL on output
        const ONLCR = 0b0000_0001;
    }
}

/// Special input characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChars {
    pub intr: u8,
    pub quit: u8,
    pub susp: u8,
    pub erase: u8,
    pub kill: u8,
    pub eof: u8,
}

impl Default for ControlChars {
    fn default() -> Self {
        ControlChars {
            intr: 0x03,  // ^C
            quit: 0x1C,  // ^\
            susp: 0x1A,  // ^Z
            erase: 0x7F, // DEL
            kill: 0x15,  // ^U
            eof: 0x04,   // ^D
        }
    }
}

/// Signals a line discipline can raise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Quit,
    Suspend,
}

impl Signal {
    /// POSIX signal number
    pub const fn number(self) -> u32 {
        match self {
            Signal::Interrupt => 2, // SIGINT
            Signal::Quit => 3,      // SIGQUIT
            Signal::Suspend => 20,  // SIGTSTP
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LdiscConfig {
    pub lflags: LocalFlags,
    pub iflags: InputFlags,
    pub oflags: OutputFlags,
    pub cc: ControlChars,
}

impl LdiscConfig {
    /// Byte-at-a-time input with no echo, no signals, no translation
    pub fn raw() -> Self {
        LdiscConfig {
            lflags: LocalFlags::empty(),
            iflags: InputFlags::empty(),
            ..Self::default()
        }
    }

    pub fn canonical(&self) -> bool {
        self.lflags.contains(LocalFlags::ICANON)
    }

    pub fn echo(&self) -> bool {
        self.lflags.contains(LocalFlags::ECHO)
    }

    pub fn isig(&self) -> bool {
        self.lflags.contains(LocalFlags::ISIG)
    }

    pub fn onlcr(&self) -> bool {
        self.oflags.contains(OutputFlags::ONLCR)
    }

    /// Signal raised by `byte`, if signal characters are enabled
    pub fn signal_for(&self, byte: u8) -> Option<Signal> {
        if !self.isig() {
            return None;
        }
        if byte == self.cc.intr {
            Some(Signal::Interrupt)
        } else if byte == self.cc.quit {
            Some(Signal::Quit)
        } else if byte == self.cc.susp {
            Some(Signal::Suspend)
        } else {
            None
        }
    }
}

impl Default for LdiscConfig {
    fn default() -> Self {
        LdiscConfig {
            lflags: LocalFlags::ICANON | LocalFlags::ECHO | LocalFlags::ISIG,
            iflags: InputFlags::ICRNL,
            oflags: OutputFlags::ONLCR,
            cc: ControlChars::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_cooked() {
        let cfg = LdiscConfig::default();
        assert!(cfg.canonical());
        assert!(cfg.echo());
        assert!(cfg.isig());
        assert!(cfg.onlcr());
    }

    #[test]
    fn test_signal_mapping() {
        let cfg = LdiscConfig::default();
        assert_eq!(cfg.signal_for(0x03), Some(Signal::Interrupt));
        assert_eq!(cfg.signal_for(0x1C).map(Signal::number), Some(3));
        assert_eq!(cfg.signal_for(0x1A).map(Signal::number), Some(20));
        assert_eq!(cfg.signal_for(b'a'), None);
        assert_eq!(LdiscConfig::raw().signal_for(0x03), None);
    }
}
