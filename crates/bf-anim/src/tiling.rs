// SPDX-License-Identifier: MIT
//
// Box-slot tiling and per-box oscillation.
//
// The slot layout depends only on the grid size, so it is computed once
// per animator. Each frame then swings every box around its slot on a
// sine/cosine pair whose phase shifts along the diagonals, which makes
// the field ripple corner to corner.

use crate::settings::BoxGeometry;

/// How many boxes fit and where the first slot starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tiling {
    pub num_x: i64,
    pub num_y: i64,
    /// Left edge of the first column of slots, after centring.
    pub margin_x: i64,
    /// Top edge of the first row of slots, after centring.
    pub margin_y: i64,
    pitch_x: i64,
    pitch_y: i64,
}

/// One box for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxPlacement {
    /// Top-left corner in cells. May lie outside the grid.
    pub x: i64,
    pub y: i64,
    pub i: i64,
    pub j: i64,
}

impl Tiling {
    /// Fit as many slots as the minimum margins allow, then centre them.
    ///
    /// Divisions floor toward negative infinity; slot counts never go
    /// below zero.
    #[must_use]
    pub fn compute(cols: usize, rows: usize, geometry: &BoxGeometry) -> Self {
        let cols = i64::try_from(cols).unwrap_or(i64::MAX);
        let rows = i64::try_from(rows).unwrap_or(i64::MAX);
        let g = geometry;

        let (num_x, margin_x) = fit_axis(cols, g.width, g.spacing_x, g.margin_x);
        let (num_y, margin_y) = fit_axis(rows, g.height, g.spacing_y, g.margin_y);

        Self {
            num_x,
            num_y,
            margin_x,
            margin_y,
            pitch_x: g.width + g.spacing_x,
            pitch_y: g.height + g.spacing_y,
        }
    }

    #[must_use]
    pub const fn box_count(&self) -> i64 {
        self.num_x * self.num_y
    }

    /// Every box at phase `t`, row-major (`j` outer, `i` inner).
    pub fn placements(
        &self,
        t: f64,
        phase_step: f64,
        geometry: &BoxGeometry,
    ) -> impl Iterator<Item = BoxPlacement> + '_ {
        // The swing amplitude equals the slot spacing.
        #[allow(clippy::cast_precision_loss)]
        let (amp_x, amp_y) = (geometry.spacing_x as f64, geometry.spacing_y as f64);

        (0..self.num_y).flat_map(move |j| {
            (0..self.num_x).map(move |i| {
                #[allow(clippy::cast_precision_loss)]
                let phase = (i + j) as f64 * phase_step + t;
                BoxPlacement {
                    x: self.margin_x + i * self.pitch_x + floor_to_i64(phase.sin() * amp_x),
                    y: self.margin_y + j * self.pitch_y + floor_to_i64(phase.cos() * amp_y),
                    i,
                    j,
                }
            })
        })
    }
}

/// `(count, centred margin)` along one axis.
fn fit_axis(extent: i64, size: i64, spacing: i64, min_margin: i64) -> (i64, i64) {
    let pitch = size + spacing;
    let count = if pitch > 0 {
        (extent - 2 * min_margin).div_euclid(pitch).max(0)
    } else {
        0
    };
    let used = count * size + (count - 1) * spacing;
    (count, (extent - used).div_euclid(2))
}

/// `floor(v)` as an integer. The inputs are bounded by the swing amplitude.
#[allow(clippy::cast_possible_truncation)]
fn floor_to_i64(v: f64) -> i64 {
    v.floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AnimatorSettings;
    use pretty_assertions::assert_eq;

    fn geometry() -> BoxGeometry {
        AnimatorSettings::default().resolve().unwrap().geometry
    }

    #[test]
    fn hundred_columns_fit_four_boxes() {
        let tiling = Tiling::compute(100, 30, &geometry());
        assert_eq!(tiling.num_x, 4);
        // 100 - 4*15 - 3*4 = 28
        assert_eq!(tiling.margin_x, 14);
        // floor(26 / 7) = 3, 30 - 3*5 - 2*2 = 11
        assert_eq!(tiling.num_y, 3);
        assert_eq!(tiling.margin_y, 5);
        assert_eq!(tiling.box_count(), 12);
    }

    #[test]
    fn margins_non_negative_when_a_box_fits() {
        let g = geometry();
        for cols in 15..300 {
            for rows in 5..80 {
                let t = Tiling::compute(cols, rows, &g);
                assert!(t.num_x >= 0 && t.num_y >= 0);
                assert!(t.margin_x >= 0, "cols {cols}: margin {}", t.margin_x);
                assert!(t.margin_y >= 0, "rows {rows}: margin {}", t.margin_y);
            }
        }
    }

    #[test]
    fn tiny_grids_have_no_boxes() {
        let t = Tiling::compute(3, 2, &geometry());
        assert_eq!((t.num_x, t.num_y), (0, 0));
        assert_eq!(t.placements(0.0, 0.6, &geometry()).count(), 0);
    }

    #[test]
    fn empty_axis_centres_with_floor() {
        // Two columns: floor((2 - 6) / 19) is negative, clamped to zero;
        // the margin is floor((2 + 4) / 2).
        let t = Tiling::compute(2, 30, &geometry());
        assert_eq!(t.num_x, 0);
        assert_eq!(t.margin_x, 3);
    }

    #[test]
    fn placements_at_time_zero() {
        let g = geometry();
        let tiling = Tiling::compute(100, 30, &g);
        let boxes: Vec<_> = tiling.placements(0.0, 0.6, &g).collect();
        assert_eq!(boxes.len(), 12);

        // sin(0) = 0, floor(cos(0) * 2) = 2.
        assert_eq!(boxes[0], BoxPlacement { x: 14, y: 7, i: 0, j: 0 });

        // (1, 0): floor(sin(0.6) * 4) = 2, floor(cos(0.6) * 2) = 1.
        assert_eq!(boxes[1], BoxPlacement { x: 35, y: 6, i: 1, j: 0 });

        // Row-major order.
        let order: Vec<_> = boxes.iter().map(|b| (b.i, b.j)).collect();
        assert_eq!(&order[..5], &[(0, 0), (1, 0), (2, 0), (3, 0), (0, 1)]);
    }

    #[test]
    fn offsets_stay_within_amplitude() {
        let g = geometry();
        let tiling = Tiling::compute(100, 30, &g);
        for step in 0..200 {
            let t = f64::from(step) * 0.37;
            for b in tiling.placements(t, 0.6, &g) {
                let dx = b.x - (tiling.margin_x + b.i * 19);
                let dy = b.y - (tiling.margin_y + b.j * 7);
                assert!((-4..=4).contains(&dx), "dx {dx} at t {t}");
                assert!((-2..=2).contains(&dy), "dy {dy} at t {t}");
            }
        }
    }
}
