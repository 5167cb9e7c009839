//! Shared marching-squares cell classification.
//!
//! Cells are classified against a threshold into one of 16 cases and emit
//! directed segments with the above-threshold region on the left of travel.
//! That convention makes outer boundaries counter-clockwise in grid space
//! without a separate orientation pass.
//!
//! Segments are keyed by the integer identity of the grid edge they start
//! on, so adjacent cells stitch exactly with no floating-point matching.
//! Non-finite cell values compare below every threshold.

use std::collections::BTreeMap;

use isomap_common::Grid;

/// Integer identity of a grid edge.
///
/// A horizontal edge `(x, y)` spans grid points `(x, y)` to `(x + 1, y)`;
/// a vertical edge spans `(x, y)` to `(x, y + 1)`. Coordinates are signed
/// so the virtual padding ring around the grid has addressable edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct EdgeId {
    pub y: i64,
    pub x: i64,
    pub horizontal: bool,
}

/// A directed contour segment through one cell.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Seg {
    pub end: EdgeId,
    pub start_pt: [f64; 2],
    pub end_pt: [f64; 2],
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Bottom,
    Right,
    Top,
    Left,
}

/// Grid sampler with an optional virtual padding ring.
///
/// Padded lookups outside the grid return negative infinity, which closes
/// every region boundary along the grid hull.
struct Field<'a> {
    grid: &'a Grid,
    padded: bool,
}

impl Field<'_> {
    fn value(&self, x: i64, y: i64) -> f64 {
        let cols = self.grid.spec().cols as i64;
        let rows = self.grid.spec().rows as i64;
        if x < 0 || y < 0 || x >= cols || y >= rows {
            assert!(self.padded, "unpadded walk queried outside the grid");
            return f64::NEG_INFINITY;
        }
        self.grid.get(x as usize, y as usize)
    }
}

/// Classify every cell against `level` and collect directed segments keyed
/// by their start edge.
///
/// With `padded` set, cells extend one step beyond the grid on every side
/// so all region boundaries close; without it, boundaries may enter and
/// leave at the grid border, producing open chains.
pub(crate) fn build_segments(grid: &Grid, level: f64, padded: bool) -> BTreeMap<EdgeId, Seg> {
    let field = Field { grid, padded };
    let cols = grid.spec().cols as i64;
    let rows = grid.spec().rows as i64;
    let (x0, y0) = if padded { (-1, -1) } else { (0, 0) };
    let (x1, y1) = if padded {
        (cols, rows)
    } else {
        (cols - 1, rows - 1)
    };

    let mut segments = BTreeMap::new();

    for y in y0..y1 {
        for x in x0..x1 {
            let bl = field.value(x, y);
            let br = field.value(x + 1, y);
            let tr = field.value(x + 1, y + 1);
            let tl = field.value(x, y + 1);

            let mut case = 0u8;
            if bl >= level {
                case |= 1;
            }
            if br >= level {
                case |= 2;
            }
            if tr >= level {
                case |= 4;
            }
            if tl >= level {
                case |= 8;
            }

            for &(from, to) in cell_segments(case, level, bl, br, tr, tl) {
                let start = edge_id(x, y, from);
                let seg = Seg {
                    end: edge_id(x, y, to),
                    start_pt: edge_point(x, y, from, level, bl, br, tr, tl),
                    end_pt: edge_point(x, y, to, level, bl, br, tr, tl),
                };
                segments.insert(start, seg);
            }
        }
    }

    segments
}

/// The directed segments for a cell case, above-region on the left.
///
/// Saddles (cases 5 and 10) compare the threshold to the mean of the four
/// corners: a mean at or above the threshold connects the high corners.
fn cell_segments(
    case: u8,
    level: f64,
    bl: f64,
    br: f64,
    tr: f64,
    tl: f64,
) -> &'static [(Side, Side)] {
    use Side::{Bottom as B, Left as L, Right as R, Top as T};

    const CASE_1: &[(Side, Side)] = &[(B, L)];
    const CASE_2: &[(Side, Side)] = &[(R, B)];
    const CASE_3: &[(Side, Side)] = &[(R, L)];
    const CASE_4: &[(Side, Side)] = &[(T, R)];
    const CASE_5_JOINED: &[(Side, Side)] = &[(T, L), (B, R)];
    const CASE_5_SPLIT: &[(Side, Side)] = &[(B, L), (T, R)];
    const CASE_6: &[(Side, Side)] = &[(T, B)];
    const CASE_7: &[(Side, Side)] = &[(T, L)];
    const CASE_8: &[(Side, Side)] = &[(L, T)];
    const CASE_9: &[(Side, Side)] = &[(B, T)];
    const CASE_10_JOINED: &[(Side, Side)] = &[(L, B), (R, T)];
    const CASE_10_SPLIT: &[(Side, Side)] = &[(R, B), (L, T)];
    const CASE_11: &[(Side, Side)] = &[(R, T)];
    const CASE_12: &[(Side, Side)] = &[(L, R)];
    const CASE_13: &[(Side, Side)] = &[(B, R)];
    const CASE_14: &[(Side, Side)] = &[(L, B)];

    match case {
        0 | 15 => &[],
        1 => CASE_1,
        2 => CASE_2,
        3 => CASE_3,
        4 => CASE_4,
        5 => {
            if (bl + br + tr + tl) / 4.0 >= level {
                CASE_5_JOINED
            } else {
                CASE_5_SPLIT
            }
        }
        6 => CASE_6,
        7 => CASE_7,
        8 => CASE_8,
        9 => CASE_9,
        10 => {
            if (bl + br + tr + tl) / 4.0 >= level {
                CASE_10_JOINED
            } else {
                CASE_10_SPLIT
            }
        }
        11 => CASE_11,
        12 => CASE_12,
        13 => CASE_13,
        14 => CASE_14,
        _ => unreachable!(),
    }
}

fn edge_id(x: i64, y: i64, side: Side) -> EdgeId {
    match side {
        Side::Bottom => EdgeId {
            y,
            x,
            horizontal: true,
        },
        Side::Top => EdgeId {
            y: y + 1,
            x,
            horizontal: true,
        },
        Side::Left => EdgeId {
            y,
            x,
            horizontal: false,
        },
        Side::Right => EdgeId {
            y,
            x: x + 1,
            horizontal: false,
        },
    }
}

/// The crossing point on one side of the cell at `(x, y)`.
fn edge_point(
    x: i64,
    y: i64,
    side: Side,
    level: f64,
    bl: f64,
    br: f64,
    tr: f64,
    tl: f64,
) -> [f64; 2] {
    let (p1, v1, p2, v2) = match side {
        Side::Bottom => ([x as f64, y as f64], bl, [(x + 1) as f64, y as f64], br),
        Side::Top => (
            [x as f64, (y + 1) as f64],
            tl,
            [(x + 1) as f64, (y + 1) as f64],
            tr,
        ),
        Side::Left => ([x as f64, y as f64], bl, [x as f64, (y + 1) as f64], tl),
        Side::Right => (
            [(x + 1) as f64, y as f64],
            br,
            [(x + 1) as f64, (y + 1) as f64],
            tr,
        ),
    };

    // A non-finite corner (virtual padding or a missing cell) snaps the
    // crossing onto the finite corner, so boundaries follow the grid hull.
    if !v1.is_finite() {
        return p2;
    }
    if !v2.is_finite() {
        return p1;
    }

    let denom = v2 - v1;
    let t = if denom.abs() < f64::EPSILON {
        0.5
    } else {
        ((level - v1) / denom).clamp(0.0, 1.0)
    };
    [p1[0] + t * (p2[0] - p1[0]), p1[1] + t * (p2[1] - p1[1])]
}

#[cfg(test)]
mod tests {
    use super::*;
    use isomap_common::GridSpec;

    fn grid_2x2(values: [f64; 4]) -> Grid {
        let spec = GridSpec::new(2, 2, 0.0, 0.0, 1.0, 1.0).unwrap();
        Grid::new(spec, values.to_vec()).unwrap()
    }

    #[test]
    fn test_single_cell_one_corner_above() {
        // Only bottom-left corner above: one segment from bottom to left.
        let grid = grid_2x2([10.0, 0.0, 0.0, 0.0]);
        let segs = build_segments(&grid, 5.0, false);
        assert_eq!(segs.len(), 1);

        let (start, seg) = segs.iter().next().unwrap();
        assert_eq!(
            *start,
            EdgeId {
                y: 0,
                x: 0,
                horizontal: true
            }
        );
        assert_eq!(seg.start_pt, [0.5, 0.0]);
        assert_eq!(seg.end_pt, [0.0, 0.5]);
    }

    #[test]
    fn test_saddle_resolved_by_corner_mean() {
        // bl and tr above, br and tl below. Mean 50 >= 40: joined.
        let grid = grid_2x2([100.0, 0.0, 0.0, 100.0]);
        let joined = build_segments(&grid, 40.0, false);
        assert_eq!(joined.len(), 2);
        let seg = joined
            .get(&EdgeId {
                y: 1,
                x: 0,
                horizontal: true,
            })
            .unwrap();
        // T -> L in the joined topology
        assert!(!seg.end.horizontal);

        // Mean 50 < 60: split.
        let split = build_segments(&grid, 60.0, false);
        assert_eq!(split.len(), 2);
        let seg = split
            .get(&EdgeId {
                y: 0,
                x: 0,
                horizontal: true,
            })
            .unwrap();
        // B -> L in the split topology
        assert!(!seg.end.horizontal);
        assert_eq!(seg.end.x, 0);
    }

    #[test]
    fn test_padded_cells_close_around_hull() {
        // All values above threshold: unpadded finds nothing, padded
        // produces the hull boundary.
        let grid = grid_2x2([10.0, 10.0, 10.0, 10.0]);
        assert!(build_segments(&grid, 5.0, false).is_empty());

        let segs = build_segments(&grid, 5.0, true);
        // Every start edge is also exactly one segment's end edge.
        assert!(!segs.is_empty());
        for seg in segs.values() {
            assert!(segs.contains_key(&seg.end), "dangling edge {:?}", seg.end);
        }
    }

    #[test]
    fn test_nan_cells_count_as_below() {
        let grid = grid_2x2([10.0, f64::NAN, 10.0, 10.0]);
        let segs = build_segments(&grid, 5.0, false);
        // Case 13 (all but br): one segment, crossing snapped to the
        // finite corners around the NaN.
        assert_eq!(segs.len(), 1);
        let seg = segs.values().next().unwrap();
        assert_eq!(seg.start_pt, [0.0, 0.0]);
        assert_eq!(seg.end_pt, [1.0, 1.0]);
    }
}
