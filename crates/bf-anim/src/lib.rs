// SPDX-License-Identifier: MIT
//
// bf-anim — the procedural box field.
//
// A checkerboard of mid-dots with a grid of double-line boxes swinging
// over it, each box stamped with one character of a message and its own
// origin. The animator is a pure function of time and surface size:
// build it once per size, then render frames onto any `Surface`.
//
//   settings  → validated geometry, colors and glyphs
//   tiling    → slot layout and per-frame box placement
//   grid      → signed-coordinate glyph buffer
//   animator  → composes frames and blits them
//   surface   → drawing target trait plus a plain-text implementation
//   overlay   → the landing panel drawn on top

pub mod animator;
pub mod clock;
pub mod glyph;
pub mod grid;
pub mod overlay;
pub mod settings;
pub mod surface;
pub mod term_surface;
pub mod tiling;

pub use animator::Animator;
pub use clock::{Clock, FixedClock, PausableClock, SystemClock};
pub use settings::{AnimatorSettings, ResolvedSettings, SettingsError};
pub use surface::{Surface, TextSurface};
