// SPDX-License-Identifier: MIT
//
// Glyph — what one grid cell holds.
//
// Nearly every cell is a single character, but the message stamp puts a
// two-character glyph (`*T`) into one cell, so a glyph is a short UTF-8
// string stored inline. Eight bytes covers a prefix plus any grapheme the
// message is likely to contain, keeps `Glyph` Copy, and a whole grid stays
// one flat allocation.

use std::fmt;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Inline UTF-8 string of at most [`Glyph::MAX_LEN`] bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph {
    len: u8,
    bytes: [u8; Glyph::MAX_LEN],
}

impl Glyph {
    pub const MAX_LEN: usize = 8;

    pub const SPACE: Self = Self {
        len: 1,
        bytes: [b' ', 0, 0, 0, 0, 0, 0, 0],
    };

    /// A single-character glyph.
    #[must_use]
    pub fn from_char(ch: char) -> Self {
        let mut bytes = [0u8; Self::MAX_LEN];
        // A char is at most 4 bytes.
        #[allow(clippy::cast_possible_truncation)]
        let len = ch.encode_utf8(&mut bytes).len() as u8;
        Self { len, bytes }
    }

    /// `None` if `s` is empty or longer than [`MAX_LEN`](Self::MAX_LEN)
    /// bytes.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        if s.is_empty() || s.len() > Self::MAX_LEN {
            return None;
        }
        Some(Self::truncated(s))
    }

    /// As many whole characters of `s` as fit.
    #[must_use]
    pub fn truncated(s: &str) -> Self {
        let mut bytes = [0u8; Self::MAX_LEN];
        let mut len = 0;
        for ch in s.chars() {
            let n = ch.len_utf8();
            if len + n > Self::MAX_LEN {
                break;
            }
            ch.encode_utf8(&mut bytes[len..]);
            len += n;
        }
        #[allow(clippy::cast_possible_truncation)]
        let len = len as u8;
        Self { len, bytes }
    }

    /// `prefix` followed by `body`, cut at a character boundary when the
    /// pair does not fit.
    #[must_use]
    pub fn stamp(prefix: Self, body: &str) -> Self {
        let mut joined = String::with_capacity(Self::MAX_LEN * 2);
        joined.push_str(prefix.as_str());
        joined.push_str(body);
        Self::truncated(&joined)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes[..usize::from(self.len)]).unwrap_or_default()
    }

    /// Display width in terminal columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.as_str().width()
    }

    /// Number of extended grapheme clusters.
    #[must_use]
    pub fn grapheme_count(&self) -> usize {
        self.as_str().graphemes(true).count()
    }

    #[must_use]
    pub const fn is_space(&self) -> bool {
        self.len == 1 && self.bytes[0] == b' '
    }
}

impl Default for Glyph {
    fn default() -> Self {
        Self::SPACE
    }
}

impl From<char> for Glyph {
    fn from(ch: char) -> Self {
        Self::from_char(ch)
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Glyph({:?})", self.as_str())
    }
}
