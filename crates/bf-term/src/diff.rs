// SPDX-License-Identifier: MIT
//
// Differential renderer.
//
// The animator rebuilds its whole grid every tick, but between two ticks
// most of the screen is the same checkerboard. Comparing the new frame
// against the previous one and emitting only the changed cells keeps the
// terminal traffic proportional to how much the boxes actually moved.
//
// Per frame:
//
//   1. The host paints a FrameBuffer.
//   2. render() diffs it against the stored previous frame.
//   3. Changed cells go through the CellWriter into the OutputBuffer.
//   4. flush() sends everything in one write().
//
// Unchanged rows are skipped with a single slice comparison, and the frame
// is wrapped in synchronized output so the terminal never shows half of it.

use std::io::{self, Write};

use crate::ansi;
use crate::buffer::FrameBuffer;
use crate::output::{CellWriter, OutputBuffer};

// ─── RenderStats ─────────────────────────────────────────────────────────────

/// Statistics from one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Cells that differed from the previous frame.
    pub cells_rendered: usize,
    /// Cells that matched and were skipped.
    pub cells_skipped: usize,
    /// Bytes of ANSI output generated.
    pub bytes_written: usize,
}

impl RenderStats {
    #[inline]
    #[must_use]
    pub const fn total_cells(&self) -> usize {
        self.cells_rendered + self.cells_skipped
    }
}

// ─── DiffRenderer ────────────────────────────────────────────────────────────

/// Emits ANSI only for cells that changed since the previous frame.
///
/// ```no_run
/// use bf_term::buffer::FrameBuffer;
/// use bf_term::diff::DiffRenderer;
///
/// let mut renderer = DiffRenderer::new();
/// let frame = FrameBuffer::new(80, 24);
/// let stats = renderer.render(&frame);
/// renderer.flush().unwrap();
/// assert_eq!(stats.total_cells(), 80 * 24);
/// ```
pub struct DiffRenderer {
    output: OutputBuffer,
    writer: CellWriter,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    /// Create a renderer with no previous frame; the first render draws
    /// everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: OutputBuffer::new(),
            writer: CellWriter::new(),
            previous: None,
        }
    }

    /// Diff `current` against the previous frame and generate output.
    ///
    /// Follow with [`flush`](Self::flush) or [`flush_to`](Self::flush_to).
    pub fn render(&mut self, current: &FrameBuffer) -> RenderStats {
        self.output.clear();
        self.writer.reset_state();

        let width = current.width();
        let height = current.height();
        let mut stats = RenderStats::default();

        if width == 0 || height == 0 {
            self.store_frame(current);
            return stats;
        }

        ansi::begin_sync(&mut self.output).ok();

        let previous = self
            .previous
            .take()
            .filter(|prev| prev.width() == width && prev.height() == height);

        if previous.is_none() {
            ansi::clear_screen(&mut self.output).ok();
        }

        for y in 0..height {
            let Some(curr_row) = current.row(y) else {
                continue;
            };
            let prev_row = previous.as_ref().and_then(|p| p.row(y));

            if prev_row == Some(curr_row) {
                stats.cells_skipped += curr_row.len();
                continue;
            }

            for (x, cell) in (0..width).zip(curr_row) {
                let unchanged = prev_row.is_some_and(|row| row[usize::from(x)] == *cell);
                if unchanged {
                    stats.cells_skipped += 1;
                } else {
                    self.writer.render_cell(&mut self.output, x, y, cell);
                    stats.cells_rendered += 1;
                }
            }
        }

        // Leave the terminal in its default state between frames.
        ansi::reset(&mut self.output).ok();
        ansi::end_sync(&mut self.output).ok();

        stats.bytes_written = self.output.len();

        self.previous = previous;
        self.store_frame(current);

        stats
    }

    /// The ANSI bytes from the last render.
    #[must_use]
    pub fn output_bytes(&self) -> &[u8] {
        self.output.as_bytes()
    }

    /// Write the accumulated output to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout fails.
    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush_stdout()
    }

    /// Write the accumulated output to `w`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        self.output.flush_to(w)
    }

    /// Forget the previous frame so the next render draws everything.
    pub fn force_redraw(&mut self) {
        self.previous = None;
    }

    /// Keep `current` for the next comparison, reusing the allocation.
    fn store_frame(&mut self, current: &FrameBuffer) {
        match &mut self.previous {
            Some(prev) => prev.copy_from(current),
            None => self.previous = Some(current.clone()),
        }
    }
}

impl Default for DiffRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;
    use pretty_assertions::assert_eq;

    fn render_frame(renderer: &mut DiffRenderer, frame: &FrameBuffer) -> (RenderStats, String) {
        let stats = renderer.render(frame);
        let output = String::from_utf8(renderer.output_bytes().to_vec()).unwrap();
        (stats, output)
    }

    #[test]
    fn first_render_draws_all_cells() {
        let mut renderer = DiffRenderer::new();
        let frame = FrameBuffer::new(10, 5);
        let (stats, out) = render_frame(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 50);
        assert_eq!(stats.cells_skipped, 0);
        assert!(out.contains("\x1b[2J"));
        assert!(out.starts_with("\x1b[?2026h"));
        assert!(out.ends_with("\x1b[?2026l"));
    }

    #[test]
    fn identical_frame_skips_everything() {
        let mut renderer = DiffRenderer::new();
        let frame = FrameBuffer::new(10, 5);
        renderer.render(&frame);
        let (stats, out) = render_frame(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 0);
        assert_eq!(stats.cells_skipped, 50);
        assert!(!out.contains("\x1b[2J"));
    }

    #[test]
    fn single_change_renders_single_cell() {
        let mut renderer = DiffRenderer::new();
        let mut frame = FrameBuffer::new(10, 5);
        renderer.render(&frame);

        frame.set(4, 2, Cell::new('╔'));
        let (stats, out) = render_frame(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 1);
        assert_eq!(stats.total_cells(), 50);
        assert!(out.contains("\x1b[3;5H"));
        assert!(out.contains('╔'));
    }

    #[test]
    fn size_change_forces_full_redraw() {
        let mut renderer = DiffRenderer::new();
        renderer.render(&FrameBuffer::new(10, 5));
        let (stats, out) = render_frame(&mut renderer, &FrameBuffer::new(12, 5));
        assert_eq!(stats.cells_rendered, 60);
        assert!(out.contains("\x1b[2J"));
    }

    #[test]
    fn force_redraw_renders_everything_again() {
        let mut renderer = DiffRenderer::new();
        let frame = FrameBuffer::new(4, 2);
        renderer.render(&frame);
        renderer.force_redraw();
        let (stats, _) = render_frame(&mut renderer, &frame);
        assert_eq!(stats.cells_rendered, 8);
    }

    #[test]
    fn zero_size_frame_emits_nothing() {
        let mut renderer = DiffRenderer::new();
        let (stats, out) = render_frame(&mut renderer, &FrameBuffer::new(0, 0));
        assert_eq!(stats, RenderStats::default());
        assert!(out.is_empty());
    }

    #[test]
    fn flush_to_writes_and_drains() {
        let mut renderer = DiffRenderer::new();
        renderer.render(&FrameBuffer::new(2, 1));
        let mut sink = Vec::new();
        renderer.flush_to(&mut sink).unwrap();
        assert!(!sink.is_empty());
        assert!(renderer.output_bytes().is_empty());
    }
}
