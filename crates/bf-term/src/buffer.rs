// SPDX-License-Identifier: MIT
//
// FrameBuffer — the 2D cell grid every frame is painted into.
//
// The animator's glyph rows and the landing panel are painted here, then
// the diff renderer compares the frame against the previous one and emits
// escape sequences only for what changed.
//
// Design:
//
//   - Flat `Vec<Cell>` with row-major indexing. A row is contiguous, so the
//     renderer's left-to-right scan is linear.
//
//   - Every write is bounds-checked. Painting past the right edge or below
//     the last row is silently dropped; callers never range-check.
//
//   - Wide characters take two columns: the owner cell plus a continuation
//     cell (ch = 0). A wide char that would straddle the right edge is
//     replaced by a space.

use unicode_width::UnicodeWidthChar;

use crate::cell::{Attr, Cell};
use crate::color::CellColor;

// ─── FrameBuffer ────────────────────────────────────────────────────────────────

/// A 2D buffer of terminal cells.
///
/// # Examples
///
/// ```
/// use bf_term::buffer::FrameBuffer;
/// use bf_term::cell::Cell;
///
/// let mut buf = FrameBuffer::new(80, 24);
/// assert!(buf.set(5, 3, Cell::new('X')));
/// assert!(!buf.set(80, 3, Cell::new('X')));
/// assert_eq!(buf.get(5, 3).unwrap().character(), Some('X'));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    // ─── Construction ────────────────────────────────────────────────────

    /// Create a buffer filled with empty cells.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_bg(width, height, CellColor::Default)
    }

    /// Create a buffer whose cells all carry `bg`.
    #[must_use]
    pub fn with_bg(width: u16, height: u16, bg: CellColor) -> Self {
        let size = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            cells: vec![Cell::EMPTY.with_bg(bg); size],
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells (`width × height`).
    #[inline]
    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    #[must_use]
    pub const fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    const fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get a cell, or `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// The raw cell slice.
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// A single row as a slice. `None` if `y` is out of bounds.
    #[inline]
    #[must_use]
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            Some(&self.cells[start..start + usize::from(self.width)])
        } else {
            None
        }
    }

    /// The characters of row `y` as a `String`, skipping continuation cells.
    ///
    /// Handy for asserting on painted output.
    #[must_use]
    pub fn row_text(&self, y: u16) -> Option<String> {
        self.row(y)
            .map(|row| row.iter().filter_map(|cell| cell.character()).collect())
    }

    // ─── Clear, Resize & Copy ────────────────────────────────────────────

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    /// Resize the buffer, clearing all content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let size = usize::from(width) * usize::from(height);
        self.cells.clear();
        self.cells.resize(size, Cell::EMPTY);
    }

    /// Copy another buffer's contents into this one, reusing the allocation.
    ///
    /// Dimensions are taken from `other`.
    pub fn copy_from(&mut self, other: &Self) {
        self.width = other.width;
        self.height = other.height;
        self.cells.clear();
        self.cells.extend_from_slice(&other.cells);
    }

    // ─── Writes ──────────────────────────────────────────────────────────

    /// Write a cell. Returns `true` if the position was in bounds.
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        true
    }

    /// Break any wide character that touches `(x, y)` before overwriting it.
    fn break_wide_char_at(&mut self, x: u16, y: u16) {
        let idx = self.index(x, y);

        if self.cells[idx].is_continuation() && x > 0 {
            let prev = self.index(x - 1, y);
            self.cells[prev].ch = u32::from(b' ');
        }

        if x + 1 < self.width {
            let next = self.index(x + 1, y);
            if self.cells[next].is_continuation() {
                self.cells[next] = Cell::EMPTY;
            }
        }
    }

    /// Fill a rectangle with spaces on `bg`. The rect is clipped to the buffer.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, bg: CellColor) {
        let x2 = x.saturating_add(width).min(self.width);
        let y2 = y.saturating_add(height).min(self.height);
        if x >= x2 || y >= y2 {
            return;
        }

        let blank = Cell::EMPTY.with_bg(bg);
        for row in y..y2 {
            let start = self.index(x, row);
            let end = self.index(x2, row);
            self.cells[start..end].fill(blank);
        }
    }

    /// Paint a string left to right starting at `(x, y)`.
    ///
    /// Zero-width characters are skipped, wide characters get a
    /// continuation cell, and everything past the right edge is dropped.
    /// When `bg` is `None` the existing background of each cell is kept.
    ///
    /// Returns the number of columns consumed.
    pub fn paint_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: CellColor,
        bg: Option<CellColor>,
        attrs: Attr,
    ) -> u16 {
        if y >= self.height {
            return 0;
        }

        let mut col = x;

        for ch in text.chars() {
            if col >= self.width {
                break;
            }

            let char_w = ch.width().unwrap_or(0);
            if char_w == 0 {
                continue;
            }

            self.break_wide_char_at(col, y);
            let idx = self.index(col, y);
            let cell_bg = bg.unwrap_or(self.cells[idx].bg);

            // A wide char whose second column is off-screen renders as garbage.
            if char_w == 2 && col + 1 >= self.width {
                self.cells[idx] = Cell::new(' ').with_fg(fg).with_bg(cell_bg).with_attrs(attrs);
                col += 1;
                break;
            }

            self.cells[idx] = Cell::new(ch).with_fg(fg).with_bg(cell_bg).with_attrs(attrs);

            if char_w == 2 {
                let cont_x = col + 1;
                self.break_wide_char_at(cont_x, y);
                let cont_idx = self.index(cont_x, y);
                self.cells[cont_idx] = Cell::continuation(fg, cell_bg, attrs);
            }

            // char_w is 1 or 2.
            #[allow(clippy::cast_possible_truncation)]
            let w = char_w as u16;
            col = col.saturating_add(w);
        }

        col.saturating_sub(x)
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FrameBuffer({}x{})", self.width, self.height)
    }
}

// ─── Text Width ─────────────────────────────────────────────────────────────────

/// Display width of a string in terminal columns.
///
/// ```
/// use bf_term::buffer::string_width;
///
/// assert_eq!(string_width("pos:14,7"), 8);
/// assert_eq!(string_width("中文"), 4);
/// ```
#[must_use]
pub fn string_width(s: &str) -> usize {
    s.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

// ─── Tests ──────────────────────────────────────────────────────────────────────
