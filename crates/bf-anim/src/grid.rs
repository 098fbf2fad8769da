// SPDX-License-Identifier: MIT
//
// GlyphGrid — the character buffer the animator composes into.
//
// Flat row-major storage like the terminal frame buffer, but indexed with
// signed coordinates: a box that swings past the left or top edge asks to
// write at negative positions, and those writes are simply dropped. Nothing
// in the geometry code has to range-check.

use std::fmt;

use crate::glyph::Glyph;

#[derive(Clone, PartialEq, Eq)]
pub struct GlyphGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Glyph>,
}

impl GlyphGrid {
    /// A grid of spaces.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Glyph::SPACE; cols * rows],
        }
    }

    /// `dot` where `x + y` is odd, space elsewhere.
    #[must_use]
    pub fn checkerboard(cols: usize, rows: usize, dot: Glyph) -> Self {
        let cells = (0..rows)
            .flat_map(|y| (0..cols).map(move |x| if (x + y) % 2 == 1 { dot } else { Glyph::SPACE }))
            .collect();
        Self { cols, rows, cells }
    }

    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let x = usize::try_from(x).ok().filter(|&x| x < self.cols)?;
        let y = usize::try_from(y).ok().filter(|&y| y < self.rows)?;
        Some(y * self.cols + x)
    }

    /// The glyph at `(x, y)`, or `None` off the grid.
    #[must_use]
    pub fn get(&self, x: i64, y: i64) -> Option<Glyph> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Write `glyph` at `(x, y)`. Off-grid writes are ignored and return
    /// `false`.
    #[inline]
    pub fn try_set(&mut self, x: i64, y: i64, glyph: Glyph) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = glyph;
                true
            }
            None => false,
        }
    }

    /// Row `y` as a slice.
    #[must_use]
    pub fn row(&self, y: usize) -> Option<&[Glyph]> {
        (y < self.rows).then(|| &self.cells[y * self.cols..(y + 1) * self.cols])
    }

    /// Row `y` with its glyphs joined into one string.
    #[must_use]
    pub fn row_string(&self, y: usize) -> Option<String> {
        self.row(y).map(|row| row.iter().map(Glyph::as_str).collect())
    }

    /// Every row joined, top to bottom.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.rows).filter_map(|y| self.row_string(y))
    }

    /// Overwrite this grid with `other`, reusing the allocation.
    pub fn copy_from(&mut self, other: &Self) {
        self.cols = other.cols;
        self.rows = other.rows;
        self.cells.clear();
        self.cells.extend_from_slice(&other.cells);
    }
}

impl fmt::Display for GlyphGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, line) in self.lines().enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for GlyphGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlyphGrid({}x{})", self.cols, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dot() -> Glyph {
        Glyph::from_char('·')
    }

    #[test]
    fn checkerboard_pattern() {
        let grid = GlyphGrid::checkerboard(4, 3, dot());
        assert_eq!(grid.to_string(), " · ·\n· · \n · ·");
    }

    #[test]
    fn checkerboard_dot_iff_odd_sum() {
        let grid = GlyphGrid::checkerboard(7, 5, dot());
        for y in 0..5 {
            for x in 0..7 {
                let expected = if (x + y) % 2 == 1 { dot() } else { Glyph::SPACE };
                assert_eq!(grid.get(x, y), Some(expected), "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn try_set_ignores_off_grid() {
        let mut grid = GlyphGrid::new(3, 2);
        let g = Glyph::from_char('═');
        assert!(!grid.try_set(-1, 0, g));
        assert!(!grid.try_set(0, -1, g));
        assert!(!grid.try_set(3, 0, g));
        assert!(!grid.try_set(0, 2, g));
        assert!(!grid.try_set(i64::MIN, i64::MAX, g));
        assert_eq!(grid, GlyphGrid::new(3, 2));
        assert!(grid.try_set(2, 1, g));
        assert_eq!(grid.get(2, 1), Some(g));
    }

    #[test]
    fn row_strings_join_multi_char_glyphs() {
        let mut grid = GlyphGrid::new(3, 1);
        grid.try_set(1, 0, Glyph::stamp(Glyph::from_char('*'), "T"));
        assert_eq!(grid.row_string(0).as_deref(), Some(" *T "));
        assert_eq!(grid.row(0).map(<[Glyph]>::len), Some(3));
        assert_eq!(grid.row_string(1), None);
    }

    #[test]
    fn empty_grid() {
        let grid = GlyphGrid::checkerboard(0, 5, dot());
        assert!(grid.is_empty());
        assert_eq!(grid.get(0, 0), None);
        assert_eq!(grid.lines().filter(|l| !l.is_empty()).count(), 0);
    }

    #[test]
    fn copy_from_replaces_contents_and_size() {
        let source = GlyphGrid::checkerboard(5, 2, dot());
        let mut target = GlyphGrid::new(1, 1);
        target.copy_from(&source);
        assert_eq!(target, source);
    }
}
