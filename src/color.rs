// Conversion between 8-bit RGB colors and the SNES 15-bit BGR format
// (0bbbbbgggggrrrrr, stored as a little-endian word).
use crate::error::{PaletteError, Result};

pub type ColorValue = u8; // 8-bit channel value (0-255)
pub type ColorRGB = [ColorValue; 3];

/// Scales an 8-bit channel down to 5 bits, rounding to nearest.
///
/// `c * 31 / 255` never lands exactly on a half, so round-half-up and
/// round-half-even give the same result.
pub fn scale_to_5bit(c: u8) -> u8 {
    ((c as u32 * 62 + 255) / 510) as u8
}

/// Expands a 5-bit channel back to 8 bits, rounding to nearest.
pub fn scale_to_8bit(v: u8) -> u8 {
    let v = (v & 31) as u32;
    ((v * 510 + 31) / 62) as u8
}

pub fn to_bgr555(c: ColorRGB) -> u16 {
    let r = scale_to_5bit(c[0]) as u16;
    let g = scale_to_5bit(c[1]) as u16;
    let b = scale_to_5bit(c[2]) as u16;
    b << 10 | g << 5 | r
}

pub fn from_bgr555(w: u16) -> ColorRGB {
    [
        scale_to_8bit((w & 31) as u8),
        scale_to_8bit((w >> 5 & 31) as u8),
        scale_to_8bit((w >> 10 & 31) as u8),
    ]
}

pub fn encode_rgb(c: ColorRGB) -> [u8; 2] {
    to_bgr555(c).to_le_bytes()
}

fn check_channel(channel: &'static str, value: i64) -> Result<u8> {
    u8::try_from(value).map_err(|_| PaletteError::InvalidChannelValue { channel, value })
}

pub fn validate_rgb(r: i64, g: i64, b: i64) -> Result<ColorRGB> {
    Ok([
        check_channel("red", r)?,
        check_channel("green", g)?,
        check_channel("blue", b)?,
    ])
}

/// Encodes an RGB triple as the two ROM bytes of a BGR555 word (low byte first).
pub fn encode(r: i64, g: i64, b: i64) -> Result<[u8; 2]> {
    Ok(encode_rgb(validate_rgb(r, g, b)?))
}

pub fn decode(byte0: u8, byte1: u8) -> ColorRGB {
    from_bgr555(u16::from_le_bytes([byte0, byte1]))
}

pub fn parse_hex_color(s: &str) -> Result<ColorRGB> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PaletteError::InvalidHexColor(s.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| PaletteError::InvalidHexColor(s.to_string()))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

pub fn format_hex_color(c: ColorRGB) -> String {
    format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2])
}
