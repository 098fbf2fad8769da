// SPDX-License-Identifier: MIT
//
// Output buffering and stateful cell rendering.
//
//   OutputBuffer — accumulates a whole frame's ANSI bytes so it goes to the
//   terminal in one write().
//
//   CellWriter — remembers the terminal's cursor position, colors and
//   attributes, and skips escape sequences that would change nothing. A
//   row of black-on-white box glyphs is one cursor move, two SGR codes and
//   then plain characters.

use std::io::{self, Write};

use crate::ansi;
use crate::cell::{Attr, Cell};
use crate::color::CellColor;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates ANSI output for a single `write()`.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    /// Create an empty buffer with 16 KB of capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Write a codepoint as UTF-8. Invalid codepoints (and the continuation
    /// marker 0) produce `?`.
    pub fn write_codepoint(&mut self, cp: u32) {
        match char::from_u32(cp).filter(|&ch| ch != '\0') {
            Some(ch) => {
                let mut enc = [0u8; 4];
                self.buf.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
            }
            None => self.buf.push(b'?'),
        }
    }

    /// Clear for reuse, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write everything to stdout and clear.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush_stdout(&mut self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.flush_to(&mut lock)
    }

    /// Write everything to `w` and clear.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            w.flush()?;
            self.buf.clear();
        }
        Ok(())
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Real flushing goes through flush_stdout() / flush_to().
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── CellWriter ──────────────────────────────────────────────────────────────

/// Stateful cell renderer that skips redundant escapes.
///
/// - **Cursor**: skipped when the next cell is `(last_x + 1, last_y)`.
/// - **Attributes**: on change, reset (SGR 0) and re-emit; the reset
///   invalidates tracked colors.
/// - **Colors**: skipped if unchanged.
/// - **Wide chars**: a continuation cell right after its owner emits nothing.
#[allow(clippy::struct_field_names)]
pub struct CellWriter {
    last_x: i32,
    last_y: i32,
    last_fg: Option<CellColor>,
    last_bg: Option<CellColor>,
    last_attrs: Attr,
}

impl CellWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_fg: None,
            last_bg: None,
            last_attrs: Attr::empty(),
        }
    }

    /// Forget all tracked state. Call after a terminal reset or clear.
    #[allow(clippy::missing_const_for_fn)]
    pub fn reset_state(&mut self) {
        *self = Self::new();
    }

    /// Render one cell, emitting only the sequences needed.
    pub fn render_cell(&mut self, out: &mut OutputBuffer, x: u16, y: u16, cell: &Cell) {
        let xi = i32::from(x);
        let yi = i32::from(y);

        if yi != self.last_y || xi != self.last_x + 1 {
            ansi::cursor_to(out, x, y).ok();
        }

        if cell.is_continuation() {
            // The owner at x-1 already drew this column.
            if xi > 0 && self.last_x == xi - 1 && self.last_y == yi {
                self.last_x = xi;
                return;
            }
            self.apply_style(out, cell);
            out.buf.push(b' ');
            self.last_x = xi;
            self.last_y = yi;
            return;
        }

        self.apply_style(out, cell);
        out.write_codepoint(cell.ch);

        self.last_x = xi;
        self.last_y = yi;
    }

    fn apply_style(&mut self, out: &mut OutputBuffer, cell: &Cell) {
        if cell.attrs != self.last_attrs {
            if !self.last_attrs.is_empty() {
                ansi::reset(out).ok();
                self.last_fg = None;
                self.last_bg = None;
            }
            self.last_attrs = cell.attrs;
            ansi::attrs(out, cell.attrs).ok();
        }

        if self.last_fg != Some(cell.fg) {
            ansi::fg(out, cell.fg).ok();
            self.last_fg = Some(cell.fg);
        }

        if self.last_bg != Some(cell.bg) {
            ansi::bg(out, cell.bg).ok();
            self.last_bg = Some(cell.bg);
        }
    }
}

impl Default for CellWriter {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn output_buffer_write_trait() {
        let mut buf = OutputBuffer::new();
        write!(buf, "pos:{},{}", 14, 7).unwrap();
        assert_eq!(buf.as_bytes(), b"pos:14,7");
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn write_codepoint_encodes_utf8() {
        let mut buf = OutputBuffer::new();
        buf.write_codepoint(u32::from('╔'));
        assert_eq!(buf.as_bytes(), "╔".as_bytes());
    }

    #[test]
    fn write_codepoint_rejects_zero_and_surrogates() {
        let mut buf = OutputBuffer::new();
        buf.write_codepoint(0);
        buf.write_codepoint(0xD800);
        assert_eq!(buf.as_bytes(), b"??");
    }

    #[test]
    fn flush_to_drains() {
        let mut buf = OutputBuffer::new();
        buf.write_all(b"frame").unwrap();
        let mut sink = Vec::new();
        buf.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"frame");
        assert!(buf.is_empty());
    }

    fn render_seq(cells: &[(u16, u16, Cell)]) -> String {
        let mut out = OutputBuffer::new();
        let mut writer = CellWriter::new();
        for (x, y, cell) in cells {
            writer.render_cell(&mut out, *x, *y, cell);
        }
        String::from_utf8(out.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn sequential_cells_share_cursor_and_style() {
        let ink = Cell::new('═').with_fg(CellColor::BLACK).with_bg(CellColor::WHITE);
        let out = render_seq(&[(0, 0, ink), (1, 0, ink), (2, 0, ink)]);
        assert_eq!(
            out,
            "\x1b[1;1H\x1b[38;2;0;0;0m\x1b[48;2;255;255;255m═══"
        );
    }

    #[test]
    fn jump_emits_cursor_move() {
        let out = render_seq(&[(0, 0, Cell::new('a')), (5, 2, Cell::new('b'))]);
        assert!(out.contains("\x1b[3;6Hb"));
    }

    #[test]
    fn attr_change_resets_and_re_emits_colors() {
        let dim = Cell::new('a').with_attrs(Attr::DIM);
        let plain = Cell::new('b');
        let out = render_seq(&[(0, 0, dim), (1, 0, plain)]);
        assert!(out.contains("\x1b[2m"));
        let after_reset = out.split("\x1b[0m").nth(1).unwrap();
        assert!(after_reset.contains("\x1b[39m"));
        assert!(after_reset.ends_with('b'));
    }

    #[test]
    fn continuation_after_owner_is_skipped() {
        let owner = Cell::new('中');
        let cont = Cell::continuation(CellColor::Default, CellColor::Default, Attr::empty());
        let out = render_seq(&[(0, 0, owner), (1, 0, cont)]);
        assert!(out.ends_with('中'));
    }

    #[test]
    fn lone_continuation_emits_space() {
        let cont = Cell::continuation(CellColor::Default, CellColor::Default, Attr::empty());
        let out = render_seq(&[(3, 0, cont)]);
        assert!(out.ends_with(' '));
    }
}
