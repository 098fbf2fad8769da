// SPDX-License-Identifier: MIT
//
// The interactive backdrop: an animator driven by the frame loop.
//
// Keys:
//   q, Esc, Ctrl+C   quit
//   p, Space         pause / resume time
//   o                toggle the landing panel
//   s                toggle static mode (checkerboard only)

use bf_anim::clock::{Clock, PausableClock, SystemClock};
use bf_anim::overlay::OverlayContent;
use bf_anim::term_surface::FrameSurface;
use bf_anim::{Animator, ResolvedSettings};
use bf_term::buffer::FrameBuffer;
use bf_term::event_loop::{Action, App};
use bf_term::input::{Event, KeyCode, KeyEvent};
use bf_term::terminal::Size;

use crate::config::RunConfig;

pub struct FieldApp<C = SystemClock> {
    settings: ResolvedSettings,
    content: OverlayContent,
    animator: Animator<PausableClock<C>>,
    show_overlay: bool,
    static_mode: bool,
}

impl FieldApp<SystemClock> {
    #[must_use]
    pub fn new(settings: ResolvedSettings, content: OverlayContent, run: &RunConfig, size: Size) -> Self {
        Self::with_clock(settings, content, run, size, SystemClock::new())
    }
}

impl<C: Clock + Clone> FieldApp<C> {
    #[must_use]
    pub fn with_clock(
        settings: ResolvedSettings,
        content: OverlayContent,
        run: &RunConfig,
        size: Size,
        clock: C,
    ) -> Self {
        let animator = build_animator(&settings, size, PausableClock::new(clock));
        let mut app = Self {
            settings,
            content,
            animator,
            show_overlay: false,
            static_mode: run.static_mode,
        };
        app.set_overlay(run.overlay);
        app
    }

    #[must_use]
    pub const fn animator(&self) -> &Animator<PausableClock<C>> {
        &self.animator
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.animator.clock().is_paused()
    }

    #[must_use]
    pub const fn shows_overlay(&self) -> bool {
        self.show_overlay
    }

    #[must_use]
    pub const fn is_static(&self) -> bool {
        self.static_mode
    }

    fn set_overlay(&mut self, on: bool) {
        self.show_overlay = on;
        self.animator.set_muted(on);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.is_interrupt() {
            return Action::Quit;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Escape => return Action::Quit,
            KeyCode::Char('p' | ' ') => {
                let paused = self.animator.clock_mut().toggle();
                tracing::debug!(paused, "pause toggled");
            }
            KeyCode::Char('o') => {
                self.set_overlay(!self.show_overlay);
                tracing::debug!(overlay = self.show_overlay, "overlay toggled");
            }
            KeyCode::Char('s') => {
                self.static_mode = !self.static_mode;
                tracing::debug!(static_mode = self.static_mode, "static mode toggled");
            }
            _ => {}
        }
        Action::Continue
    }
}

impl<C: Clock + Clone> App for FieldApp<C> {
    fn on_event(&mut self, event: &Event) -> Action {
        let Event::Key(key) = event;
        self.handle_key(*key)
    }

    fn on_resize(&mut self, size: Size) {
        let clock = self.animator.clock().clone();
        self.animator = build_animator(&self.settings, size, clock);
        self.animator.set_muted(self.show_overlay);
    }

    fn on_tick(&mut self) -> bool {
        !(self.static_mode || self.is_paused())
    }

    fn paint(&mut self, buf: &mut FrameBuffer) {
        let (cell_w, cell_h) = (self.settings.cell_width, self.settings.cell_height);
        let mut surface = FrameSurface::new(buf, cell_w, cell_h);

        if self.static_mode {
            self.animator.render_static(&mut surface);
        } else {
            self.animator.render(&mut surface);
        }
        if self.show_overlay {
            self.content
                .draw(&mut surface, cell_w, cell_h, self.settings.palette.ink);
        }
    }
}

/// An animator whose surface is exactly `size` terminal cells.
fn build_animator<C: Clock>(settings: &ResolvedSettings, size: Size, clock: C) -> Animator<C> {
    let width = u32::from(size.cols) * settings.cell_width;
    let height = u32::from(size.rows) * settings.cell_height;
    Animator::with_clock(settings.clone(), width, height, clock)
}
