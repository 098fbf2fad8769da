// SPDX-License-Identifier: MIT
//
// The box-field animator.
//
// Built once for a surface size: the grid dimensions, the checkerboard
// and the slot tiling never change afterwards. A host whose surface
// changes size builds a new animator. Each frame clones the checkerboard,
// stamps every box at its swung position and blits the rows onto a
// surface. Rendering reads the clock and nothing else, so two renders at
// the same instant produce the same grid.

use bf_term::color::CellColor;

use crate::clock::{Clock, SystemClock};
use crate::glyph::Glyph;
use crate::grid::GlyphGrid;
use crate::settings::ResolvedSettings;
use crate::surface::Surface;
use crate::tiling::{BoxPlacement, Tiling};

pub struct Animator<C = SystemClock> {
    settings: ResolvedSettings,
    checkerboard: GlyphGrid,
    tiling: Tiling,
    clock: C,
    muted: bool,
}

impl Animator<SystemClock> {
    /// An animator for a `width × height` unit surface, timed by a fresh
    /// [`SystemClock`].
    #[must_use]
    pub fn new(settings: ResolvedSettings, width: u32, height: u32) -> Self {
        Self::with_clock(settings, width, height, SystemClock::new())
    }
}

impl<C: Clock> Animator<C> {
    #[must_use]
    pub fn with_clock(settings: ResolvedSettings, width: u32, height: u32, clock: C) -> Self {
        let cols = width.checked_div(settings.cell_width).unwrap_or(0) as usize;
        let rows = height.checked_div(settings.cell_height).unwrap_or(0) as usize;
        let checkerboard = GlyphGrid::checkerboard(cols, rows, settings.glyphs.checker);
        let tiling = Tiling::compute(cols, rows, &settings.geometry);

        tracing::debug!(
            width,
            height,
            cols,
            rows,
            boxes_x = tiling.num_x,
            boxes_y = tiling.num_y,
            "animator built"
        );

        Self {
            settings,
            checkerboard,
            tiling,
            clock,
            muted: false,
        }
    }

    #[must_use]
    pub const fn cols(&self) -> usize {
        self.checkerboard.cols()
    }

    #[must_use]
    pub const fn rows(&self) -> usize {
        self.checkerboard.rows()
    }

    #[must_use]
    pub const fn tiling(&self) -> &Tiling {
        &self.tiling
    }

    #[must_use]
    pub const fn settings(&self) -> &ResolvedSettings {
        &self.settings
    }

    /// The static background every frame starts from.
    #[must_use]
    pub const fn checkerboard(&self) -> &GlyphGrid {
        &self.checkerboard
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    pub const fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Give the clock back, e.g. to carry it into a rebuilt animator.
    #[must_use]
    pub fn into_clock(self) -> C {
        self.clock
    }

    /// Draw in the muted ink instead of the regular one.
    pub const fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted
    }

    /// Animation phase at `now_ms`.
    #[must_use]
    pub fn phase(&self, now_ms: f64) -> f64 {
        now_ms * self.settings.phase_rate
    }

    /// Where every box sits at `now_ms`, in drawing order.
    pub fn placements(&self, now_ms: f64) -> impl Iterator<Item = BoxPlacement> + '_ {
        self.tiling
            .placements(self.phase(now_ms), self.settings.phase_step, &self.settings.geometry)
    }

    /// The full frame at `now_ms` as a grid.
    #[must_use]
    pub fn compose(&self, now_ms: f64) -> GlyphGrid {
        let mut grid = self.checkerboard.clone();
        self.stamp_boxes(&mut grid, now_ms);
        grid
    }

    /// [`compose`](Self::compose) into an existing grid.
    pub fn compose_into(&self, now_ms: f64, grid: &mut GlyphGrid) {
        grid.copy_from(&self.checkerboard);
        self.stamp_boxes(grid, now_ms);
    }

    /// Render the frame for the clock's current time.
    pub fn render(&self, surface: &mut impl Surface) {
        self.render_at(surface, self.clock.now_ms());
    }

    pub fn render_at(&self, surface: &mut impl Surface, now_ms: f64) {
        let grid = self.compose(now_ms);
        self.blit(&grid, surface);
    }

    /// Render only the checkerboard.
    pub fn render_static(&self, surface: &mut impl Surface) {
        self.blit(&self.checkerboard, surface);
    }

    fn ink(&self) -> CellColor {
        let palette = &self.settings.palette;
        if self.muted { palette.muted_ink } else { palette.ink }
    }

    fn stamp_boxes(&self, grid: &mut GlyphGrid, now_ms: f64) {
        for placement in self.placements(now_ms) {
            self.overlay_box(grid, placement);
        }
    }

    /// Draw one box: blank interior, double-line frame, drop shadow to
    /// the right and below, message stamp and origin label.
    fn overlay_box(&self, grid: &mut GlyphGrid, placement: BoxPlacement) {
        let BoxPlacement { x, y, i, j } = placement;
        let g = &self.settings.glyphs;
        let w = self.settings.geometry.width;
        let h = self.settings.geometry.height;
        let (right, bottom) = (x + w - 1, y + h - 1);

        for dy in 0..h {
            for dx in 0..w {
                grid.try_set(x + dx, y + dy, Glyph::SPACE);
            }
        }

        for cx in x..x + w {
            grid.try_set(cx, y, g.horizontal);
            grid.try_set(cx, bottom, g.horizontal);
        }
        for cy in y..y + h {
            grid.try_set(x, cy, g.vertical);
            grid.try_set(right, cy, g.vertical);
        }

        grid.try_set(x, y, g.top_left);
        grid.try_set(right, y, g.top_right);
        grid.try_set(x, bottom, g.bottom_left);
        grid.try_set(right, bottom, g.bottom_right);

        for cx in x + 2..x + w + 2 {
            grid.try_set(cx, y + h, g.shadow);
        }
        for cy in y + 1..y + h {
            grid.try_set(x + w, cy, g.shadow);
        }

        let stamp = self.settings.stamp_for(i, j, self.tiling.num_x);
        grid.try_set(x + 2, y + 1, stamp);

        if self.settings.show_positions {
            let label = format!("pos:{x},{y}");
            for (cx, ch) in (x + 2..).zip(label.chars()) {
                grid.try_set(cx, y + 2, Glyph::from_char(ch));
            }
        }
    }

    fn blit(&self, grid: &GlyphGrid, surface: &mut impl Surface) {
        surface.fill_background(self.settings.palette.paper);
        let ink = self.ink();
        let mut top = 0u32;
        for line in grid.lines() {
            surface.fill_text(&line, 0, top, ink);
            top = top.saturating_add(self.settings.cell_height);
        }
    }
}
