//! Color handling for terminal cells
//!
//! Uses u32 ARGB format internally. No floating point.

/// ARGB color (0xAARRGGBB format)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Self = PALETTE[0];
    pub const LIGHT_GRAY: Self = PALETTE[7];
    pub const WHITE: Self = PALETTE[15];

    /// Create opaque RGB color
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(0xFF00_0000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// One of the 16 VGA text-mode colors (index wraps at 16)
    #[inline]
    pub const fn from_palette(index: u8) -> Self {
        PALETTE[(index & 0x0F) as usize]
    }

    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    #[inline]
    pub const fn to_u32(self) -> u32 {
        self.0
    }
}

/// VGA 16-color palette, in ANSI order (SGR 30-37, then the bright 90-97 set)
pub const PALETTE: [Color; 16] = [
    Color::rgb(0, 0, 0),       // 0: Black
    Color::rgb(170, 0, 0),     // 1: Red
    Color::rgb(0, 170, 0),     // 2: Green
    Color::rgb(170, 85, 0),    // 3: Brown
    Color::rgb(0, 0, 170),     // 4: Blue
    Color::rgb(170, 0, 170),   // 5: Magenta
    Color::rgb(0, 170, 170),   // 6: Cyan
    Color::rgb(170, 170, 170), // 7: Light gray
    Color::rgb(85, 85, 85),    // 8: Dark gray
    Color::rgb(255, 85, 85),   // 9: Bright red
    Color::rgb(85, 255, 85),   // 10: Bright green
    Color::rgb(255, 255, 85),  // 11: Yellow
    Color::rgb(85, 85, 255),   // 12: Bright blue
    Color::rgb(255, 85, 255),  // 13: Bright magenta
    Color::rgb(85, 255, 255),  // 14: Bright cyan
    Color::rgb(255, 255, 255), // 15: White
];

/// Color from the xterm 256-color table (SGR 38;5;n / 48;5;n)
pub fn color_256(index: u8) -> Color {
    match index {
        0..=15 => PALETTE[index as usize],
        // 6x6x6 cube
        16..=231 => {
            let idx = index - 16;
            let level = |v: u8| if v == 0 { 0 } else { 55 + v * 40 };
            Color::rgb(level(idx / 36), level((idx / 6) % 6), level(idx % 6))
        }
        // 24-step gray ramp
        232..=255 => {
            let gray = 8 + (index - 232) * 10;
            Color::rgb(gray, gray, gray)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_wraps() {
        assert_eq!(Color::from_palette(7), Color::LIGHT_GRAY);
        assert_eq!(Color::from_palette(16), Color::BLACK);
    }

    #[test]
    fn test_color_256() {
        assert_eq!(color_256(1), PALETTE[1]);
        assert_eq!(color_256(16), Color::rgb(0, 0, 0));
        assert_eq!(color_256(231), Color::rgb(255, 255, 255));
        assert_eq!(color_256(232), Color::rgb(8, 8, 8));
    }
}
