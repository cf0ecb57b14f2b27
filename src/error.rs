//! TTY error types

use core::fmt;

/// TTY Result type
pub type TtyResult<T> = Result<T, TtyError>;

/// TTY error types
///
/// Buffer exhaustion is never an error here: full rings and line buffers drop
/// the newest data instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtyError {
    /// Zero width or height
    InvalidGeometry,
    /// Handle does not name a live session
    NoSuchSession,
    /// `init` has not run yet
    NotInitialized,
    /// Registry is full
    SessionLimit,
}

impl TtyError {
    /// Convert to errno-style error code
    pub fn to_errno(&self) -> i32 {
        match self {
            TtyError::InvalidGeometry => -22, // EINVAL
            TtyError::NoSuchSession => -19,   // ENODEV
            TtyError::NotInitialized => -11,  // EAGAIN
            TtyError::SessionLimit => -23,    // ENFILE
        }
    }
}

impl fmt::Display for TtyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            TtyError::InvalidGeometry => "invalid terminal geometry",
            TtyError::NoSuchSession => "no such tty session",
            TtyError::NotInitialized => "tty service not initialized",
            TtyError::SessionLimit => "too many tty sessions",
        };
        f.write_str(msg)
    }
}

impl From<watos_terminal::GeometryError> for TtyError {
    fn from(_: watos_terminal::GeometryError) -> Self {
        TtyError::InvalidGeometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errno_values() {
        assert_eq!(TtyError::InvalidGeometry.to_errno(), -22);
        assert_eq!(TtyError::NoSuchSession.to_errno(), -19);
        assert_eq!(TtyError::SessionLimit.to_errno(), -23);
    }
}
