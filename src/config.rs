//! Compile-time tty configuration

/// Character cell size in pixels (VGA 8x16 font)
pub const GLYPH_WIDTH: u32 = 8;
pub const GLYPH_HEIGHT: u32 = 16;

/// Live sessions the registry will hold at once
pub const MAX_SESSIONS: usize = 16;

/// Bytes moved from an input device per `pump_input` call
pub const INPUT_BATCH: usize = 64;

/// Character geometry of a session window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtyGeometry {
    pub cols: usize,
    pub rows: usize,
}

impl TtyGeometry {
    /// Cells that fit a framebuffer of `width` x `height` pixels, at least 1x1
    pub fn from_framebuffer(width: u32, height: u32) -> Self {
        TtyGeometry {
            cols: ((width / GLYPH_WIDTH) as usize).max(1),
            rows: ((height / GLYPH_HEIGHT) as usize).max(1),
        }
    }
}
