//! Isoline extraction: polylines where the field crosses a level.

use tracing::debug;

use isomap_common::{Grid, IsomapError, IsomapResult};

use crate::march::{build_segments, EdgeId, Seg};
use crate::Ring;

/// A single contour line at one level, in fractional grid coordinates.
///
/// `closed` lines repeat their first point at the end; open lines start
/// and finish on the grid border.
#[derive(Debug, Clone, PartialEq)]
pub struct Isoline {
    pub level: f64,
    pub points: Ring,
    pub closed: bool,
}

/// Extract all isolines for the given levels.
///
/// Levels at or below the grid minimum, or above its maximum, cross no
/// cell edge and contribute nothing. A flat field therefore yields no
/// isolines at all.
pub fn extract_isolines(grid: &Grid, levels: &[f64]) -> IsomapResult<Vec<Isoline>> {
    let spec = grid.spec();
    if spec.cols < 2 || spec.rows < 2 {
        return Err(IsomapError::InterpolationFailure(format!(
            "contouring needs at least a 2x2 grid, got {}x{}",
            spec.cols, spec.rows
        )));
    }

    let Some((min_v, max_v)) = grid.value_range() else {
        return Ok(Vec::new());
    };

    let mut isolines = Vec::new();
    for &level in levels {
        if !level.is_finite() || level <= min_v || level > max_v {
            continue;
        }
        trace_level(grid, level, &mut isolines);
    }

    debug!(
        levels = levels.len(),
        isolines = isolines.len(),
        "extracted isolines"
    );
    Ok(isolines)
}

fn trace_level(grid: &Grid, level: f64, out: &mut Vec<Isoline>) {
    let mut segments = build_segments(grid, level, false);

    // Start edges that are nobody's end edge begin open chains at the
    // grid border.
    let ends: std::collections::BTreeSet<EdgeId> = segments.values().map(|s| s.end).collect();
    let heads: Vec<EdgeId> = segments
        .keys()
        .copied()
        .filter(|e| !ends.contains(e))
        .collect();

    for head in heads {
        let (points, _) = follow_chain(&mut segments, head);
        if points.len() >= 2 {
            out.push(Isoline {
                level,
                points,
                closed: false,
            });
        }
    }

    // Whatever remains links into cycles.
    while let Some((&start, _)) = segments.iter().next() {
        let (mut points, returned) = follow_chain(&mut segments, start);
        if returned {
            if let Some(&first) = points.first() {
                points.push(first);
            }
        }
        if points.len() >= 3 {
            out.push(Isoline {
                level,
                points,
                closed: returned,
            });
        }
    }
}

/// Walk segment links from `start`, consuming them. Returns the collected
/// points and whether the walk returned to its start edge.
fn follow_chain(
    segments: &mut std::collections::BTreeMap<EdgeId, Seg>,
    start: EdgeId,
) -> (Ring, bool) {
    let mut points: Ring = Vec::new();
    let mut edge = start;

    loop {
        let Some(seg) = segments.remove(&edge) else {
            return (points, false);
        };
        if points.last() != Some(&seg.start_pt) {
            points.push(seg.start_pt);
        }
        if segments.contains_key(&seg.end) {
            edge = seg.end;
        } else {
            let closed = seg.end == start;
            if !closed && points.last() != Some(&seg.end_pt) {
                points.push(seg.end_pt);
            }
            return (points, closed);
        }
    }
}
