// SPDX-License-Identifier: MIT
//
// Drawing surfaces.
//
// The animator only needs three things from whatever it draws on: the
// size, a solid background fill and monospaced text at a position. Sizes
// and positions are in surface units (pixels for a canvas-like target);
// the animator converts grid cells to units with its cell size.

use std::fmt;

use bf_term::color::CellColor;

/// A drawing target for the animator and the overlay.
pub trait Surface {
    /// Width in surface units.
    fn width(&self) -> u32;

    /// Height in surface units.
    fn height(&self) -> u32;

    /// Fill the whole surface with `color`.
    fn fill_background(&mut self, color: CellColor);

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: u32, y: u32, color: CellColor);
}

/// A surface that keeps plain character lines.
///
/// One character is one column; text past the right edge is dropped.
/// Colors are recorded but not rendered.
#[derive(Clone, PartialEq, Eq)]
pub struct TextSurface {
    width: u32,
    height: u32,
    cell_width: u32,
    cell_height: u32,
    lines: Vec<Vec<char>>,
    background: Option<CellColor>,
}

impl TextSurface {
    /// A `width × height` unit surface with `cell_width × cell_height`
    /// unit character cells. A zero cell size gives a surface with no
    /// lines.
    #[must_use]
    pub fn new(width: u32, height: u32, cell_width: u32, cell_height: u32) -> Self {
        let cols = width.checked_div(cell_width).unwrap_or(0) as usize;
        let rows = height.checked_div(cell_height).unwrap_or(0) as usize;
        Self {
            width,
            height,
            cell_width,
            cell_height,
            lines: vec![vec![' '; cols]; rows],
            background: None,
        }
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.lines.first().map_or(0, Vec::len)
    }

    /// The last background color filled, if any.
    #[must_use]
    pub const fn background(&self) -> Option<CellColor> {
        self.background
    }

    /// Line `row` as a string.
    #[must_use]
    pub fn line(&self, row: usize) -> Option<String> {
        self.lines.get(row).map(|line| line.iter().collect())
    }

    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.lines.iter().map(|line| line.iter().collect())
    }
}

impl Surface for TextSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_background(&mut self, color: CellColor) {
        for line in &mut self.lines {
            line.fill(' ');
        }
        self.background = Some(color);
    }

    fn fill_text(&mut self, text: &str, x: u32, y: u32, _color: CellColor) {
        let (Some(col), Some(row)) = (x.checked_div(self.cell_width), y.checked_div(self.cell_height))
        else {
            return;
        };
        let Some(line) = self.lines.get_mut(row as usize) else {
            return;
        };
        for (slot, ch) in line.iter_mut().skip(col as usize).zip(text.chars()) {
            *slot = ch;
        }
    }
}

impl fmt::Display for TextSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(&line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TextSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextSurface({}x{} units)", self.width, self.height)
    }
}
