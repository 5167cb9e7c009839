//! Closed-ring tracing and polygon assembly.

use isomap_common::Grid;

use crate::march::{build_segments, EdgeId, Seg};
use crate::{Polygon, Ring};

/// Trace the closed boundary rings of the region where `value >= level`.
///
/// Uses the padded cell walk, so every ring closes even when the region
/// touches the grid border. Outer boundaries come out counter-clockwise,
/// boundaries of enclosed below-level pockets clockwise.
pub(crate) fn trace_region_rings(grid: &Grid, level: f64) -> Vec<Ring> {
    let mut segments = build_segments(grid, level, true);
    let mut rings = Vec::new();

    while let Some((&start, _)) = segments.iter().next() {
        if let Some(ring) = follow_cycle(&mut segments, start) {
            rings.push(ring);
        }
    }

    rings
}

/// Follow segment links from `start` until the cycle closes, removing
/// visited segments. Returns `None` for degenerate rings.
fn follow_cycle(
    segments: &mut std::collections::BTreeMap<EdgeId, Seg>,
    start: EdgeId,
) -> Option<Ring> {
    let mut ring: Ring = Vec::new();
    let mut edge = start;

    loop {
        let Some(seg) = segments.remove(&edge) else {
            // Broken chain; padded walks close every cycle, so this only
            // guards against degenerate input.
            return None;
        };
        push_point(&mut ring, seg.start_pt);
        edge = seg.end;
        if edge == start {
            break;
        }
    }

    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    // First point + two more distinct points + closing repeat.
    if ring.len() < 4 {
        return None;
    }
    Some(ring)
}

/// Append a vertex, skipping consecutive duplicates (corner snapping can
/// emit the same point from adjacent cells).
fn push_point(ring: &mut Ring, pt: [f64; 2]) {
    if ring.last() != Some(&pt) {
        ring.push(pt);
    }
}

/// Shoelace signed area of a ring. Positive means counter-clockwise.
pub(crate) fn signed_area(ring: &[[f64; 2]]) -> f64 {
    let mut sum = 0.0;
    for pair in ring.windows(2) {
        sum += pair[0][0] * pair[1][1] - pair[1][0] * pair[0][1];
    }
    sum / 2.0
}

/// Even-odd ray cast point-in-ring test.
pub(crate) fn ring_contains(ring: &[[f64; 2]], pt: [f64; 2]) -> bool {
    let mut inside = false;
    for pair in ring.windows(2) {
        let [x1, y1] = pair[0];
        let [x2, y2] = pair[1];
        if (y1 > pt[1]) != (y2 > pt[1]) {
            let x_cross = x1 + (pt[1] - y1) / (y2 - y1) * (x2 - x1);
            if pt[0] < x_cross {
                inside = !inside;
            }
        }
    }
    inside
}

/// Group mixed-orientation rings into polygons.
///
/// Counter-clockwise rings become outers; each clockwise ring becomes a
/// hole of the smallest outer that contains it. Zero-area rings and
/// orphaned holes are dropped.
pub(crate) fn assemble_polygons(rings: Vec<Ring>) -> Vec<Polygon> {
    let mut outers: Vec<(f64, Ring)> = Vec::new();
    let mut holes: Vec<Ring> = Vec::new();

    for ring in rings {
        let area = signed_area(&ring);
        if area > 0.0 {
            outers.push((area, ring));
        } else if area < 0.0 {
            holes.push(ring);
        }
    }

    let areas: Vec<f64> = outers.iter().map(|(a, _)| *a).collect();
    let mut polygons: Vec<Polygon> = outers.into_iter().map(|(_, r)| vec![r]).collect();

    for hole in holes {
        // A hole can share vertices with its outer's boundary, where the
        // ray cast is unreliable; probe vertices until one lands strictly
        // inside some outer.
        let mut best: Option<(usize, f64)> = None;
        for &probe in &hole {
            for (idx, polygon) in polygons.iter().enumerate() {
                if ring_contains(&polygon[0], probe) {
                    match best {
                        Some((_, a)) if areas[idx] >= a => {}
                        _ => best = Some((idx, areas[idx])),
                    }
                }
            }
            if best.is_some() {
                break;
            }
        }
        if let Some((idx, _)) = best {
            polygons[idx].push(hole);
        }
    }

    polygons
}
