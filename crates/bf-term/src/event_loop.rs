// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Frame loop.
//
// Wires the pieces together: stdin bytes arrive from the background
// reader, become key events, the application reacts, paints a frame
// buffer, and the diff renderer sends only what changed.
//
// # Timing
//
// The loop keeps a deadline for the next frame and blocks on the stdin
// channel until that deadline. Key presses are handled the moment they
// arrive without pulling the next frame forward; when the deadline passes
// the application gets a tick and, if it reports a change, a repaint.
// An idle, paused screen costs one wake-up per frame interval.
//
// A lone ESC byte stays pending in the parser until a deadline passes with
// no more input, then it is flushed as the Escape key.
//
// # Resize
//
// A SIGWINCH handler sets an `AtomicBool`. The loop checks it once per
// iteration, resizes the frame buffer and forces a full redraw.
//
// # Cancellation
//
// The loop stops on `Action::Quit`, when the [`CancelToken`] is cancelled
// from another thread, or after `max_frames` rendered frames.

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crate::buffer::FrameBuffer;
use crate::diff::{DiffRenderer, RenderStats};
use crate::input::{Event, Parser};
use crate::reader::StdinReader;
use crate::terminal::{Size, Terminal};

// ─── SIGWINCH ────────────────────────────────────────────────────────────────

static SIGWINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Only stores to an atomic, which is async-signal-safe.
#[cfg(unix)]
fn install_sigwinch_handler() {
    unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = sigwinch_handler as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGWINCH, &raw const sa, std::ptr::null_mut());
    }
}

#[cfg(unix)]
extern "C" fn sigwinch_handler(_sig: libc::c_int) {
    SIGWINCH_RECEIVED.store(true, Ordering::Relaxed);
}

#[cfg(not(unix))]
fn install_sigwinch_handler() {}

// ─── CancelToken ─────────────────────────────────────────────────────────────

/// Shared stop flag. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application wants after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Application interface for the frame loop.
///
/// Per iteration the loop calls, in order:
///
/// 1. [`on_event`](App::on_event) for each parsed key
/// 2. [`on_resize`](App::on_resize) when the terminal size changed
/// 3. [`on_tick`](App::on_tick) once the frame deadline has passed
/// 4. [`paint`](App::paint) when something asked for a repaint
///
/// Only [`paint`](App::paint) is required.
pub trait App {
    /// Return [`Action::Quit`] to leave the loop.
    fn on_event(&mut self, _event: &Event) -> Action {
        Action::Continue
    }

    /// Called after the frame buffer has been resized to `size`.
    fn on_resize(&mut self, _size: Size) {}

    /// Advance time-based state. Return `true` to request a repaint.
    fn on_tick(&mut self) -> bool {
        false
    }

    /// Paint the whole frame. The buffer is cleared beforehand.
    fn paint(&mut self, buf: &mut FrameBuffer);
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Frame loop timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Interval between frame deadlines.
    pub tick_interval: Duration,
    /// Stop after this many rendered frames.
    pub max_frames: Option<u64>,
}

impl LoopConfig {
    /// Interval for `fps` frames per second, clamped to 1..=240.
    #[must_use]
    pub fn from_fps(fps: u32) -> Self {
        let fps = fps.clamp(1, 240);
        Self {
            tick_interval: Duration::from_micros(1_000_000 / u64::from(fps)),
            max_frames: None,
        }
    }

    #[must_use]
    pub const fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::from_fps(60)
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub cells_rendered: u64,
    pub bytes_written: u64,
}

impl RunSummary {
    fn record(&mut self, stats: RenderStats) {
        self.frames += 1;
        self.cells_rendered += stats.cells_rendered as u64;
        self.bytes_written += stats.bytes_written as u64;
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal, parser and renderer.
///
/// ```no_run
/// use bf_term::buffer::FrameBuffer;
/// use bf_term::event_loop::{Action, App, EventLoop, LoopConfig};
/// use bf_term::input::{Event, KeyCode};
///
/// struct Blank;
///
/// impl App for Blank {
///     fn on_event(&mut self, event: &Event) -> Action {
///         let Event::Key(key) = event;
///         if key.code == KeyCode::Char('q') { Action::Quit } else { Action::Continue }
///     }
///
///     fn paint(&mut self, _buf: &mut FrameBuffer) {}
/// }
///
/// let mut event_loop = EventLoop::with_config(LoopConfig::from_fps(30))?;
/// event_loop.run(&mut Blank)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    parser: Parser,
    renderer: DiffRenderer,
    config: LoopConfig,
    cancel: CancelToken,
}

impl EventLoop {
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn new() -> io::Result<Self> {
        Self::with_config(LoopConfig::default())
    }

    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized.
    pub fn with_config(config: LoopConfig) -> io::Result<Self> {
        Ok(Self {
            terminal: Terminal::new()?,
            parser: Parser::new(),
            renderer: DiffRenderer::new(),
            config,
            cancel: CancelToken::new(),
        })
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// A token that stops the loop from another thread.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Take over the terminal and run until the app quits, the token is
    /// cancelled or `max_frames` is reached. The terminal is restored
    /// even when the loop fails.
    ///
    /// # Errors
    ///
    /// Returns an error if entering or leaving the terminal, spawning
    /// the reader, or writing a frame fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<RunSummary> {
        self.terminal.enter()?;
        install_sigwinch_handler();

        let (mut reader, rx) = match StdinReader::spawn() {
            Ok(spawned) => spawned,
            Err(err) => {
                self.terminal.leave()?;
                return Err(err);
            }
        };

        tracing::info!(
            cols = self.terminal.size().cols,
            rows = self.terminal.size().rows,
            interval_us = self.config.tick_interval.as_micros(),
            "frame loop started"
        );

        let result = self.run_inner(app, &rx);

        reader.stop();
        self.terminal.leave()?;

        if let Ok(summary) = &result {
            tracing::info!(
                frames = summary.frames,
                cells = summary.cells_rendered,
                bytes = summary.bytes_written,
                "frame loop finished"
            );
        }
        result
    }

    fn run_inner(&mut self, app: &mut impl App, rx: &Receiver<Vec<u8>>) -> io::Result<RunSummary> {
        let size = self.terminal.size();
        let mut frame = FrameBuffer::new(size.cols, size.rows);
        let mut summary = RunSummary::default();
        let mut dirty = true;
        let mut next_frame = Instant::now();

        loop {
            if self.cancel.is_cancelled() {
                tracing::debug!("frame loop cancelled");
                return Ok(summary);
            }

            let wait = next_frame.saturating_duration_since(Instant::now());
            let deadline_passed = match rx.recv_timeout(wait) {
                Ok(bytes) => {
                    let events = self.parser.advance(&bytes);
                    if dispatch(app, &events) == Action::Quit {
                        return Ok(summary);
                    }
                    dirty |= !events.is_empty();
                    Instant::now() >= next_frame
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.parser.has_pending() {
                        let events = self.parser.flush();
                        if dispatch(app, &events) == Action::Quit {
                            return Ok(summary);
                        }
                        dirty |= !events.is_empty();
                    }
                    true
                }
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("stdin closed");
                    return Ok(summary);
                }
            };

            if SIGWINCH_RECEIVED.swap(false, Ordering::Relaxed) {
                let new_size = self.terminal.refresh_size();
                tracing::debug!(cols = new_size.cols, rows = new_size.rows, "terminal resized");
                frame.resize(new_size.cols, new_size.rows);
                self.renderer.force_redraw();
                app.on_resize(new_size);
                dirty = true;
            }

            if !deadline_passed {
                continue;
            }
            next_frame += self.config.tick_interval;
            // After a stall, skip the missed frames instead of bursting.
            let now = Instant::now();
            if next_frame < now {
                next_frame = now + self.config.tick_interval;
            }

            dirty |= app.on_tick();

            if dirty {
                let stats = paint_frame(app, &mut frame, &mut self.renderer);
                self.renderer.flush()?;
                summary.record(stats);
                tracing::trace!(
                    frame = summary.frames,
                    rendered = stats.cells_rendered,
                    bytes = stats.bytes_written,
                    "frame"
                );
                dirty = false;

                if self.config.max_frames.is_some_and(|max| summary.frames >= max) {
                    return Ok(summary);
                }
            }
        }
    }
}

/// Hand each event to the app, stopping at the first `Quit`.
fn dispatch(app: &mut impl App, events: &[Event]) -> Action {
    for event in events {
        if app.on_event(event) == Action::Quit {
            return Action::Quit;
        }
    }
    Action::Continue
}

/// Clear, paint and diff one frame. Output stays in the renderer until
/// flushed.
pub fn paint_frame(
    app: &mut impl App,
    frame: &mut FrameBuffer,
    renderer: &mut DiffRenderer,
) -> RenderStats {
    frame.clear();
    app.paint(frame);
    renderer.render(frame)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
