// SPDX-License-Identifier: MIT
//
// bf-term — Terminal rendering engine for boxfield.
//
// The animator paints a grid of glyphs; this crate turns that grid into
// bytes on a real terminal. It owns the cell model, a flat frame buffer,
// a differential renderer that only emits changed cells, raw-mode
// terminal control, a background stdin reader, a small key parser and
// the tick-driven frame loop that plays the role of a display refresh.
//
// No TUI framework in between: escape sequences are written directly and
// every frame goes out in a single write().

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod color;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;
