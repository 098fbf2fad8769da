// SPDX-License-Identifier: MIT
//
// Surface over a terminal frame buffer.
//
// One terminal cell stands for one animator cell, so the surface reports
// `cols * cell_width` by `rows * cell_height` units and maps every text
// position back to the cell it falls in.

use bf_term::buffer::FrameBuffer;
use bf_term::cell::Attr;
use bf_term::color::CellColor;

use crate::surface::Surface;

/// Borrowed frame buffer seen as a [`Surface`].
pub struct FrameSurface<'a> {
    buf: &'a mut FrameBuffer,
    cell_width: u32,
    cell_height: u32,
}

impl<'a> FrameSurface<'a> {
    /// `cell_width` and `cell_height` are clamped to at least 1.
    pub fn new(buf: &'a mut FrameBuffer, cell_width: u32, cell_height: u32) -> Self {
        Self {
            buf,
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        }
    }
}

impl Surface for FrameSurface<'_> {
    fn width(&self) -> u32 {
        u32::from(self.buf.width()).saturating_mul(self.cell_width)
    }

    fn height(&self) -> u32 {
        u32::from(self.buf.height()).saturating_mul(self.cell_height)
    }

    fn fill_background(&mut self, color: CellColor) {
        let (w, h) = (self.buf.width(), self.buf.height());
        self.buf.fill_rect(0, 0, w, h, color);
    }

    fn fill_text(&mut self, text: &str, x: u32, y: u32, color: CellColor) {
        let (Ok(col), Ok(row)) = (
            u16::try_from(x / self.cell_width),
            u16::try_from(y / self.cell_height),
        ) else {
            return;
        };
        self.buf.paint_text(col, row, text, color, None, Attr::empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reports_units_from_cells() {
        let mut buf = FrameBuffer::new(100, 30);
        let surface = FrameSurface::new(&mut buf, 10, 20);
        assert_eq!((surface.width(), surface.height()), (1000, 600));
    }

    #[test]
    fn background_then_text_keeps_paper() {
        let mut buf = FrameBuffer::new(6, 2);
        let mut surface = FrameSurface::new(&mut buf, 10, 20);
        surface.fill_background(CellColor::WHITE);
        surface.fill_text("╔══╗", 10, 20, CellColor::BLACK);

        assert_eq!(buf.row_text(1).as_deref(), Some(" ╔══╗ "));
        let cell = buf.get(1, 1).copied().unwrap();
        assert_eq!(cell.fg, CellColor::BLACK);
        assert_eq!(cell.bg, CellColor::WHITE);
        assert_eq!(buf.get(0, 0).map(|c| c.bg), Some(CellColor::WHITE));
    }

    #[test]
    fn positions_round_down_to_cells() {
        let mut buf = FrameBuffer::new(4, 2);
        let mut surface = FrameSurface::new(&mut buf, 10, 20);
        surface.fill_text("x", 19, 39, CellColor::BLACK);
        assert_eq!(buf.row_text(1).as_deref(), Some(" x  "));
    }

    #[test]
    fn zero_cell_size_is_clamped() {
        let mut buf = FrameBuffer::new(3, 1);
        let mut surface = FrameSurface::new(&mut buf, 0, 0);
        surface.fill_text("ab", 1, 0, CellColor::BLACK);
        assert_eq!(buf.row_text(0).as_deref(), Some(" ab"));
    }
}
