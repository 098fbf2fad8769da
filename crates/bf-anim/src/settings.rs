// SPDX-License-Identifier: MIT
//
// Animator settings.
//
// `AnimatorSettings` is the serde-facing form: every field has a default,
// so a config file only names what it changes. `resolve()` validates it
// once and produces `ResolvedSettings`, the typed form the animator reads
// on every frame (parsed colors, glyphs, pre-stamped message cells).

use bf_term::color::CellColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::glyph::Glyph;

/// Largest accepted value for any size, spacing or margin.
pub const MAX_DIMENSION: u32 = 1000;

/// Invalid animator settings.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("{field}: {value:?} is not a hex color (#rgb or #rrggbb)")]
    InvalidColor { field: &'static str, value: String },

    #[error("cell size must be non-zero, got {width}x{height}")]
    ZeroCellSize { width: u32, height: u32 },

    #[error("box must be at least 3x3, got {width}x{height}")]
    BoxTooSmall { width: u32, height: u32 },

    #[error("{field}: {value} exceeds the maximum of {max}", max = MAX_DIMENSION)]
    OutOfRange { field: &'static str, value: u32 },

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("{field} must be a positive finite number, got {value}")]
    NonPositiveRate { field: &'static str, value: f64 },

    #[error("glyphs.{field}: {value:?} must be a single one-column character")]
    InvalidGlyph { field: &'static str, value: String },
}

// ─── Serde Form ──────────────────────────────────────────────────────────────

/// Geometry and appearance of the box field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnimatorSettings {
    /// Width of one grid cell in surface units.
    pub cell_width: u32,
    /// Height of one grid cell in surface units.
    pub cell_height: u32,
    pub box_width: u32,
    pub box_height: u32,
    /// Horizontal gap between box slots, also the horizontal swing.
    pub spacing_x: u32,
    /// Vertical gap between box slots, also the vertical swing.
    pub spacing_y: u32,
    /// Minimum margin before centring.
    pub margin_x: u32,
    pub margin_y: u32,
    /// Phase advance per millisecond.
    pub phase_rate: f64,
    /// Phase offset between neighbouring diagonals.
    pub phase_step: f64,
    pub message: String,
    /// Stamp each box with its `pos:x,y` origin.
    pub show_positions: bool,
    pub paper: String,
    pub ink: String,
    /// Ink used while something is drawn on top of the field.
    pub muted_ink: String,
    pub glyphs: GlyphSettings,
}

impl Default for AnimatorSettings {
    fn default() -> Self {
        Self {
            cell_width: 10,
            cell_height: 20,
            box_width: 15,
            box_height: 5,
            spacing_x: 4,
            spacing_y: 2,
            margin_x: 3,
            margin_y: 2,
            phase_rate: 0.006,
            phase_step: 0.6,
            message: "THINK INSIDE OF THE BOX".to_owned(),
            show_positions: true,
            paper: "#ffffff".to_owned(),
            ink: "#000000".to_owned(),
            muted_ink: "#999999".to_owned(),
            glyphs: GlyphSettings::default(),
        }
    }
}

/// Characters used to draw the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlyphSettings {
    pub checker: String,
    pub horizontal: String,
    pub vertical: String,
    pub top_left: String,
    pub top_right: String,
    pub bottom_left: String,
    pub bottom_right: String,
    pub shadow: String,
    /// Prefix put in front of the message character.
    pub stamp: String,
}

impl Default for GlyphSettings {
    fn default() -> Self {
        Self {
            checker: "·".to_owned(),
            horizontal: "═".to_owned(),
            vertical: "║".to_owned(),
            top_left: "╔".to_owned(),
            top_right: "╗".to_owned(),
            bottom_left: "╚".to_owned(),
            bottom_right: "╝".to_owned(),
            shadow: "░".to_owned(),
            stamp: "*".to_owned(),
        }
    }
}

// ─── Resolved Form ───────────────────────────────────────────────────────────

/// Box and slot dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxGeometry {
    pub width: i64,
    pub height: i64,
    pub spacing_x: i64,
    pub spacing_y: i64,
    pub margin_x: i64,
    pub margin_y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub paper: CellColor,
    pub ink: CellColor,
    pub muted_ink: CellColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxGlyphs {
    pub checker: Glyph,
    pub horizontal: Glyph,
    pub vertical: Glyph,
    pub top_left: Glyph,
    pub top_right: Glyph,
    pub bottom_left: Glyph,
    pub bottom_right: Glyph,
    pub shadow: Glyph,
}

/// Validated settings, ready for the animator.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub cell_width: u32,
    pub cell_height: u32,
    pub geometry: BoxGeometry,
    pub phase_rate: f64,
    pub phase_step: f64,
    /// Stamp prefix joined with each grapheme of the message.
    pub stamps: Vec<Glyph>,
    pub show_positions: bool,
    pub palette: Palette,
    pub glyphs: BoxGlyphs,
}

impl AnimatorSettings {
    /// Every problem with these settings. Empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<SettingsError> {
        let mut errors = Vec::new();

        if self.cell_width == 0 || self.cell_height == 0 {
            errors.push(SettingsError::ZeroCellSize {
                width: self.cell_width,
                height: self.cell_height,
            });
        }
        if self.box_width < 3 || self.box_height < 3 {
            errors.push(SettingsError::BoxTooSmall {
                width: self.box_width,
                height: self.box_height,
            });
        }
        for (field, value) in [
            ("cell_width", self.cell_width),
            ("cell_height", self.cell_height),
            ("box_width", self.box_width),
            ("box_height", self.box_height),
            ("spacing_x", self.spacing_x),
            ("spacing_y", self.spacing_y),
            ("margin_x", self.margin_x),
            ("margin_y", self.margin_y),
        ] {
            if value > MAX_DIMENSION {
                errors.push(SettingsError::OutOfRange { field, value });
            }
        }

        for (field, value) in [("phase_rate", self.phase_rate), ("phase_step", self.phase_step)] {
            if !(value.is_finite() && value > 0.0) {
                errors.push(SettingsError::NonPositiveRate { field, value });
            }
        }

        if self.message.is_empty() {
            errors.push(SettingsError::EmptyMessage);
        }

        for (field, value) in [("paper", &self.paper), ("ink", &self.ink), ("muted_ink", &self.muted_ink)] {
            if CellColor::hex(value).is_none() {
                errors.push(SettingsError::InvalidColor {
                    field,
                    value: value.clone(),
                });
            }
        }

        for (field, value) in self.glyphs.fields() {
            if parse_glyph(value).is_none() {
                errors.push(SettingsError::InvalidGlyph {
                    field,
                    value: value.to_owned(),
                });
            }
        }

        errors
    }

    /// Validate and convert. Reports the first problem found.
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError`] from [`validate`](Self::validate).
    pub fn resolve(&self) -> Result<ResolvedSettings, SettingsError> {
        if let Some(err) = self.validate().into_iter().next() {
            return Err(err);
        }

        let color = |field: &'static str, value: &str| {
            CellColor::hex(value).ok_or_else(|| SettingsError::InvalidColor {
                field,
                value: value.to_owned(),
            })
        };
        let palette = Palette {
            paper: color("paper", &self.paper)?,
            ink: color("ink", &self.ink)?,
            muted_ink: color("muted_ink", &self.muted_ink)?,
        };

        let g = &self.glyphs;
        let glyph = |field: &'static str, value: &str| {
            parse_glyph(value).ok_or_else(|| SettingsError::InvalidGlyph {
                field,
                value: value.to_owned(),
            })
        };
        let glyphs = BoxGlyphs {
            checker: glyph("checker", &g.checker)?,
            horizontal: glyph("horizontal", &g.horizontal)?,
            vertical: glyph("vertical", &g.vertical)?,
            top_left: glyph("top_left", &g.top_left)?,
            top_right: glyph("top_right", &g.top_right)?,
            bottom_left: glyph("bottom_left", &g.bottom_left)?,
            bottom_right: glyph("bottom_right", &g.bottom_right)?,
            shadow: glyph("shadow", &g.shadow)?,
        };
        let prefix = glyph("stamp", &g.stamp)?;

        let stamps = self
            .message
            .graphemes(true)
            .map(|grapheme| Glyph::stamp(prefix, grapheme))
            .collect();

        Ok(ResolvedSettings {
            cell_width: self.cell_width,
            cell_height: self.cell_height,
            geometry: BoxGeometry {
                width: i64::from(self.box_width),
                height: i64::from(self.box_height),
                spacing_x: i64::from(self.spacing_x),
                spacing_y: i64::from(self.spacing_y),
                margin_x: i64::from(self.margin_x),
                margin_y: i64::from(self.margin_y),
            },
            phase_rate: self.phase_rate,
            phase_step: self.phase_step,
            stamps,
            show_positions: self.show_positions,
            palette,
            glyphs,
        })
    }
}

impl GlyphSettings {
    fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("checker", &self.checker),
            ("horizontal", &self.horizontal),
            ("vertical", &self.vertical),
            ("top_left", &self.top_left),
            ("top_right", &self.top_right),
            ("bottom_left", &self.bottom_left),
            ("bottom_right", &self.bottom_right),
            ("shadow", &self.shadow),
            ("stamp", &self.stamp),
        ]
    }
}

/// One grapheme, one column wide.
fn parse_glyph(s: &str) -> Option<Glyph> {
    let mut graphemes = s.graphemes(true);
    let first = graphemes.next()?;
    if graphemes.next().is_some() || first.width() != 1 {
        return None;
    }
    Glyph::new(first)
}

impl ResolvedSettings {
    /// The stamp for box `(i, j)` in a row of `num_x` boxes.
    #[must_use]
    pub fn stamp_for(&self, i: i64, j: i64, num_x: i64) -> Glyph {
        let len = i64::try_from(self.stamps.len()).unwrap_or(i64::MAX);
        usize::try_from((i + j * num_x).rem_euclid(len.max(1)))
            .ok()
            .and_then(|idx| self.stamps.get(idx).copied())
            .unwrap_or(Glyph::SPACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolved() -> ResolvedSettings {
        AnimatorSettings::default().resolve().unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        assert!(AnimatorSettings::default().validate().is_empty());
        let r = resolved();
        assert_eq!((r.cell_width, r.cell_height), (10, 20));
        assert_eq!(r.geometry.width, 15);
        assert_eq!(r.palette.paper, CellColor::WHITE);
        assert_eq!(r.palette.ink, CellColor::BLACK);
        assert_eq!(r.glyphs.top_left.as_str(), "╔");
    }

    #[test]
    fn stamps_follow_message_graphemes() {
        let r = resolved();
        assert_eq!(r.stamps.len(), "THINK INSIDE OF THE BOX".len());
        assert_eq!(r.stamps[0].as_str(), "*T");
        assert_eq!(r.stamps[5].as_str(), "* ");
    }

    #[test]
    fn stamp_index_wraps_row_major() {
        let r = resolved();
        assert_eq!(r.stamp_for(0, 0, 4).as_str(), "*T");
        assert_eq!(r.stamp_for(1, 0, 4).as_str(), "*H");
        assert_eq!(r.stamp_for(0, 1, 4).as_str(), "*K");
        // 23 characters: index 23 wraps to 0.
        assert_eq!(r.stamp_for(3, 5, 4).as_str(), "*T");
    }

    #[test]
    fn grapheme_clusters_stay_whole() {
        let settings = AnimatorSettings {
            message: "e\u{301}x".to_owned(),
            ..AnimatorSettings::default()
        };
        let r = settings.resolve().unwrap();
        assert_eq!(r.stamps.len(), 2);
        assert_eq!(r.stamps[0].as_str(), "*e\u{301}");
    }

    #[test]
    fn rejects_bad_values() {
        let settings = AnimatorSettings {
            cell_width: 0,
            box_height: 2,
            phase_rate: 0.0,
            phase_step: f64::NAN,
            message: String::new(),
            ink: "black".to_owned(),
            spacing_x: MAX_DIMENSION + 1,
            ..AnimatorSettings::default()
        };
        let errors = settings.validate();
        assert!(errors.contains(&SettingsError::ZeroCellSize { width: 0, height: 20 }));
        assert!(errors.contains(&SettingsError::BoxTooSmall { width: 15, height: 2 }));
        assert!(errors.contains(&SettingsError::EmptyMessage));
        assert!(errors.contains(&SettingsError::InvalidColor {
            field: "ink",
            value: "black".to_owned()
        }));
        assert!(errors.contains(&SettingsError::OutOfRange {
            field: "spacing_x",
            value: MAX_DIMENSION + 1
        }));
        let rates = errors
            .iter()
            .filter(|e| matches!(e, SettingsError::NonPositiveRate { .. }))
            .count();
        assert_eq!(rates, 2);
        assert_eq!(settings.resolve(), Err(errors[0].clone()));
    }

    #[test]
    fn rejects_wide_or_multi_char_glyphs() {
        let settings = AnimatorSettings {
            glyphs: GlyphSettings {
                shadow: "中".to_owned(),
                checker: "..".to_owned(),
                vertical: String::new(),
                ..GlyphSettings::default()
            },
            ..AnimatorSettings::default()
        };
        let fields: Vec<_> = settings
            .validate()
            .into_iter()
            .filter_map(|e| match e {
                SettingsError::InvalidGlyph { field, .. } => Some(field),
                _ => None,
            })
            .collect();
        assert_eq!(fields, vec!["checker", "vertical", "shadow"]);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            SettingsError::BoxTooSmall { width: 2, height: 5 }.to_string(),
            "box must be at least 3x3, got 2x5"
        );
        assert_eq!(
            SettingsError::InvalidColor { field: "paper", value: "#12".to_owned() }.to_string(),
            "paper: \"#12\" is not a hex color (#rgb or #rrggbb)"
        );
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings: AnimatorSettings = toml::from_str(
            r#"
            message = "HI"
            box_width = 9

            [glyphs]
            shadow = "▒"
            "#,
        )
        .unwrap();
        assert_eq!(settings.message, "HI");
        assert_eq!(settings.box_width, 9);
        assert_eq!(settings.box_height, 5);
        assert_eq!(settings.glyphs.shadow, "▒");
        assert_eq!(settings.glyphs.horizontal, "═");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<AnimatorSettings>("box_depth = 3").is_err());
    }
}
