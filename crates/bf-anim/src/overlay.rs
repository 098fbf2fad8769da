// SPDX-License-Identifier: MIT
//
// Landing panel drawn over the box field.
//
// A single-line framed panel centred on the grid: title, a word-wrapped
// tagline, a row of link labels and a footer. It is laid out in grid
// cells and drawn through the same `Surface` as the animation, after it,
// so its blank interior covers the boxes underneath.

use serde::{Deserialize, Serialize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use bf_term::color::CellColor;

use crate::surface::Surface;

/// Widest the panel gets, border included.
pub const MAX_PANEL_WIDTH: usize = 64;

/// Narrowest the panel gets; smaller grids clip it.
pub const MIN_PANEL_WIDTH: usize = 16;

/// Border plus one column of padding on each side.
const CHROME: usize = 4;

const LINK_GAP: &str = "  ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayContent {
    pub title: String,
    pub tagline: String,
    pub links: Vec<String>,
    pub footer: String,
}

impl Default for OverlayContent {
    fn default() -> Self {
        Self {
            title: "investigating the edge".to_owned(),
            tagline: "an online lab where you can navigate through edge-detector behaviors \
                      and uncover vulnerabilities in vision models"
                .to_owned(),
            links: vec!["/about".to_owned(), "/simulation".to_owned()],
            footer: "scroll to learn more".to_owned(),
        }
    }
}

/// A panel placed on a grid. Rows include the border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    /// Left column; negative when the panel is wider than the grid.
    pub x: i64,
    pub y: i64,
    pub width: usize,
    pub rows: Vec<String>,
}

impl PanelLayout {
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }
}

enum Align {
    Left,
    Center,
}

impl OverlayContent {
    /// Lay the panel out for a `cols × rows` grid.
    #[must_use]
    pub fn layout(&self, cols: usize, rows: usize) -> PanelLayout {
        let width = cols.saturating_sub(4).clamp(MIN_PANEL_WIDTH, MAX_PANEL_WIDTH);
        let text_width = width - CHROME;

        let mut body: Vec<(String, Align)> = vec![(String::new(), Align::Left)];
        body.push((self.title.clone(), Align::Center));
        if !self.tagline.trim().is_empty() {
            body.push((String::new(), Align::Left));
            body.extend(
                wrap(&self.tagline, text_width)
                    .into_iter()
                    .map(|line| (line, Align::Left)),
            );
        }
        if !self.links.is_empty() {
            body.push((String::new(), Align::Left));
            body.push((self.links.join(LINK_GAP), Align::Center));
        }
        if !self.footer.is_empty() {
            body.push((String::new(), Align::Left));
            body.push((self.footer.clone(), Align::Center));
        }
        body.push((String::new(), Align::Left));

        let rule = "─".repeat(width - 2);
        let mut panel_rows = Vec::with_capacity(body.len() + 2);
        panel_rows.push(format!("┌{rule}┐"));
        panel_rows.extend(
            body.iter()
                .map(|(text, align)| format!("│ {} │", fit(text, text_width, align))),
        );
        panel_rows.push(format!("└{rule}┘"));

        PanelLayout {
            x: centre(cols, width),
            y: centre(rows, panel_rows.len()),
            width,
            rows: panel_rows,
        }
    }

    /// Draw the panel onto `surface` in `ink`. Parts outside the surface
    /// are clipped.
    pub fn draw(&self, surface: &mut impl Surface, cell_width: u32, cell_height: u32, ink: CellColor) {
        let (Some(cols), Some(rows)) = (
            surface.width().checked_div(cell_width),
            surface.height().checked_div(cell_height),
        ) else {
            return;
        };
        let layout = self.layout(cols as usize, rows as usize);

        for (row_y, text) in (layout.y..).zip(&layout.rows) {
            let Ok(cell_y) = u32::try_from(row_y) else {
                continue;
            };
            if cell_y >= rows {
                break;
            }
            // Columns left of the grid are cut off the front of the row.
            let skip = usize::try_from(-layout.x).unwrap_or(0);
            let visible: String = text.chars().skip(skip).collect();
            let cell_x = u32::try_from(layout.x.max(0)).unwrap_or(0);
            surface.fill_text(
                &visible,
                cell_x.saturating_mul(cell_width),
                cell_y.saturating_mul(cell_height),
                ink,
            );
        }
    }
}

/// Signed offset that centres `size` inside `extent`.
fn centre(extent: usize, size: usize) -> i64 {
    let extent = i64::try_from(extent).unwrap_or(i64::MAX);
    let size = i64::try_from(size).unwrap_or(i64::MAX);
    (extent - size).div_euclid(2)
}

/// Pad or cut `text` to exactly `width` columns.
fn fit(text: &str, width: usize, align: &Align) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }

    let slack = width - used;
    let left = match align {
        Align::Left => 0,
        Align::Center => slack / 2,
    };
    format!("{}{out}{}", " ".repeat(left), " ".repeat(slack - left))
}

/// Greedy word wrap to `width` columns. Words longer than a line are
/// broken.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.width()
        } else {
            line.width() + 1 + word.width()
        };
        if needed <= width {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        for ch in word.chars() {
            if line.width() + ch.width().unwrap_or(0) > width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            line.push(ch);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::TextSurface;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_on_words() {
        assert_eq!(
            wrap("an online lab where you can navigate", 12),
            vec!["an online", "lab where", "you can", "navigate"]
        );
    }

    #[test]
    fn long_words_are_broken() {
        assert_eq!(wrap("edge-detector", 5), vec!["edge-", "detec", "tor"]);
    }

    #[test]
    fn fit_pads_and_centres() {
        assert_eq!(fit("ab", 6, &Align::Center), "  ab  ");
        assert_eq!(fit("ab", 5, &Align::Left), "ab   ");
        assert_eq!(fit("abcdef", 4, &Align::Center), "abcd");
    }

    #[test]
    fn default_panel_on_a_wide_grid() {
        let layout = OverlayContent::default().layout(100, 30);
        assert_eq!(layout.width, MAX_PANEL_WIDTH);
        assert_eq!(layout.x, 18);
        assert!(layout.rows.iter().all(|r| r.chars().count() == MAX_PANEL_WIDTH));
        assert!(layout.rows[0].starts_with('┌') && layout.rows[0].ends_with('┐'));
        assert!(layout.rows[layout.height() - 1].starts_with('└'));

        let text: Vec<&str> = layout.rows.iter().map(|r| r.trim_matches(['│', ' '])).collect();
        assert_eq!(text[2], "investigating the edge");
        assert!(text.contains(&"/about  /simulation"));
        assert!(text.contains(&"scroll to learn more"));
        assert_eq!(layout.y, (30 - i64::try_from(layout.height()).unwrap()) / 2);
    }

    #[test]
    fn panel_shrinks_with_the_grid() {
        let layout = OverlayContent::default().layout(40, 30);
        assert_eq!(layout.width, 36);
        assert_eq!(layout.x, 2);
        assert!(layout.rows.iter().all(|r| r.chars().count() == 36));
    }

    #[test]
    fn panel_wider_than_grid_is_offset_negative() {
        let layout = OverlayContent::default().layout(10, 4);
        assert_eq!(layout.width, MIN_PANEL_WIDTH);
        assert_eq!(layout.x, -3);
        assert!(layout.y < 0);
    }

    #[test]
    fn empty_sections_are_dropped() {
        let content = OverlayContent {
            title: "hi".to_owned(),
            tagline: String::new(),
            links: Vec::new(),
            footer: String::new(),
        };
        assert_eq!(content.layout(40, 10).height(), 5);
    }

    #[test]
    fn draw_centres_on_surface() {
        let content = OverlayContent {
            title: "box".to_owned(),
            tagline: String::new(),
            links: Vec::new(),
            footer: String::new(),
        };
        let mut surface = TextSurface::new(240, 140, 10, 20);
        content.draw(&mut surface, 10, 20, CellColor::BLACK);
        assert_eq!(
            surface.to_string(),
            [
                "                        ",
                "  ┌──────────────────┐  ",
                "  │                  │  ",
                "  │       box        │  ",
                "  │                  │  ",
                "  └──────────────────┘  ",
                "                        ",
            ]
            .join("\n")
        );
    }

    #[test]
    fn draw_clips_on_small_surfaces() {
        let mut surface = TextSurface::new(100, 60, 10, 20);
        OverlayContent::default().draw(&mut surface, 10, 20, CellColor::BLACK);
        let lines: Vec<String> = surface.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() == 10));
        assert!(lines.iter().any(|l| !l.trim().is_empty()));
    }

    #[test]
    fn content_from_toml() {
        let content: OverlayContent = toml::from_str(r#"title = "hello""#).unwrap();
        assert_eq!(content.title, "hello");
        assert_eq!(content.footer, "scroll to learn more");
    }
}
