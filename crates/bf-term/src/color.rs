// SPDX-License-Identifier: MIT
//
// Cell colors.
//
// The backdrop is black ink on white paper with one muted tone for the
// overlay veil, so the color model is the compact terminal one: 24-bit
// RGB, an ANSI-256 palette index, or the terminal's own default. Colors
// come in from configuration as hex strings.

use std::fmt;

/// Compact color for terminal cell storage.
///
/// Small and cheap to compare, which matters in the diff renderer's
/// inner loop.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// 24-bit `TrueColor`.
    Rgb(u8, u8, u8),

    /// ANSI 256-color palette index.
    Ansi256(u8),

    /// Terminal default color.
    #[default]
    Default,
}

impl CellColor {
    pub const BLACK: Self = Self::Rgb(0, 0, 0);
    pub const WHITE: Self = Self::Rgb(255, 255, 255);

    /// Parse a hex color.
    ///
    /// Supports `#RGB` and `#RRGGBB`, with or without the `#`.
    ///
    /// ```
    /// use bf_term::color::CellColor;
    ///
    /// assert_eq!(CellColor::hex("#fff"), Some(CellColor::WHITE));
    /// assert_eq!(CellColor::hex("102030"), Some(CellColor::Rgb(0x10, 0x20, 0x30)));
    /// assert_eq!(CellColor::hex("#12345"), None);
    /// ```
    #[must_use]
    pub fn hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix('#').unwrap_or(s);
        let bytes = s.as_bytes();

        match bytes.len() {
            3 => {
                let r = parse_hex_digit(bytes[0])?;
                let g = parse_hex_digit(bytes[1])?;
                let b = parse_hex_digit(bytes[2])?;
                Some(Self::Rgb(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => {
                let r = parse_hex_byte(&bytes[0..2])?;
                let g = parse_hex_byte(&bytes[2..4])?;
                let b = parse_hex_byte(&bytes[4..6])?;
                Some(Self::Rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// Lowercase `#rrggbb` form. `None` for palette and default colors.
    #[must_use]
    pub fn to_hex(self) -> Option<String> {
        match self {
            Self::Rgb(r, g, b) => Some(format!("#{r:02x}{g:02x}{b:02x}")),
            Self::Ansi256(_) | Self::Default => None,
        }
    }

    /// Whether this is the terminal default color.
    #[inline]
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
            Self::Ansi256(idx) => write!(f, "ansi({idx})"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[inline]
const fn parse_hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

#[inline]
fn parse_hex_byte(bytes: &[u8]) -> Option<u8> {
    let hi = parse_hex_digit(bytes[0])?;
    let lo = parse_hex_digit(bytes[1])?;
    Some(hi << 4 | lo)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_long_form() {
        assert_eq!(CellColor::hex("#999999"), Some(CellColor::Rgb(153, 153, 153)));
        assert_eq!(CellColor::hex("#FFFFFF"), Some(CellColor::WHITE));
    }

    #[test]
    fn hex_short_form_expands_digits() {
        assert_eq!(CellColor::hex("#000"), Some(CellColor::BLACK));
        assert_eq!(CellColor::hex("a1f"), Some(CellColor::Rgb(0xaa, 0x11, 0xff)));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert_eq!(CellColor::hex(""), None);
        assert_eq!(CellColor::hex("#ggg"), None);
        assert_eq!(CellColor::hex("#12345678"), None);
        assert_eq!(CellColor::hex("white"), None);
    }

    #[test]
    fn to_hex_round_trips_rgb_only() {
        assert_eq!(CellColor::Rgb(1, 2, 255).to_hex().as_deref(), Some("#0102ff"));
        assert_eq!(CellColor::Ansi256(7).to_hex(), None);
        assert_eq!(CellColor::Default.to_hex(), None);
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", CellColor::WHITE), "#ffffff");
        assert_eq!(format!("{}", CellColor::Ansi256(42)), "ansi(42)");
        assert_eq!(format!("{:?}", CellColor::Default), "default");
    }

    #[test]
    fn default_is_terminal_default() {
        assert!(CellColor::default().is_default());
        assert!(!CellColor::BLACK.is_default());
    }
}
