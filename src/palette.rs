//! Display palette.
//!
//! Sixteen fixed colours indexed by the low nibble of a display-window byte.
//! The values follow the C64 palette.

/// RGB colours as `0xRRGGBB`, indexed 0-15.
#[rustfmt::skip]
pub const PALETTE: [u32; 16] = [
    0x000000, 0xFFFFFF, 0x880000, 0xAAFFEE,
    0xCC44CC, 0x00CC55, 0x0000AA, 0xEEEE77,
    0xDD8855, 0x664400, 0xFF7777, 0x333333,
    0x777777, 0xAAFF66, 0x0088FF, 0xBBBBBB,
];

/// Returns the colour for a display byte. Only the low nibble is used.
pub fn color(value: u8) -> u32 {
    PALETTE[(value & 0x0F) as usize]
}

/// Formats the colour for a display byte as a CSS hex string.
pub fn css_color(value: u8) -> String {
    format!("#{:06x}", color(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_nibble_is_ignored() {
        assert_eq!(color(0x01), 0xFFFFFF);
        assert_eq!(color(0xF1), 0xFFFFFF);
        assert_eq!(color(0x0E), 0x0088FF);
    }

    #[test]
    fn test_css_color() {
        assert_eq!(css_color(0x00), "#000000");
        assert_eq!(css_color(0x02), "#880000");
    }
}
