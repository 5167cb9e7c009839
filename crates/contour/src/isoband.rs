//! Isoband extraction: filled polygons between consecutive thresholds.

use tracing::debug;

use isomap_common::{Grid, IsomapError, IsomapResult};

use crate::ring::{assemble_polygons, trace_region_rings};
use crate::Polygon;

/// The region where `low <= value < high`, as polygons with holes in
/// fractional grid coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Isoband {
    pub low: f64,
    pub high: f64,
    pub polygons: Vec<Polygon>,
}

/// Extract the isobands delimited by consecutive threshold pairs.
///
/// Each band is the region at or above its lower threshold minus the
/// region at or above its upper one: the lower region's rings are kept
/// as-is and the upper region's rings are reversed into holes, so the
/// shared boundary between adjacent bands is the exact same polyline.
/// Bands that cover no cell are omitted from the result.
pub fn extract_isobands(grid: &Grid, thresholds: &[f64]) -> IsomapResult<Vec<Isoband>> {
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

    let mut bands = Vec::new();
    for pair in thresholds.windows(2) {
        let (low, high) = (pair[0], pair[1]);
        if !(high > low) {
            continue;
        }
        // Entirely outside the observed range: nothing to trace.
        if high <= min_v || low > max_v {
            continue;
        }

        let mut rings = trace_region_rings(grid, low);
        for mut upper in trace_region_rings(grid, high) {
            upper.reverse();
            rings.push(upper);
        }

        let polygons = assemble_polygons(rings);
        if !polygons.is_empty() {
            bands.push(Isoband {
                low,
                high,
                polygons,
            });
        }
    }

    debug!(
        thresholds = thresholds.len(),
        bands = bands.len(),
        "extracted isobands"
    );
    Ok(bands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ring::signed_area;
    use isomap_common::GridSpec;

    fn grid(cols: usize, rows: usize, values: Vec<f64>) -> Grid {
        let spec = GridSpec::new(cols, rows, 0.0, 0.0, 1.0, 1.0).unwrap();
        Grid::new(spec, values).unwrap()
    }

    fn gradient_3x3() -> Grid {
        grid(
            3,
            3,
            vec![0.0, 0.0, 0.0, 10.0, 10.0, 10.0, 20.0, 20.0, 20.0],
        )
    }

    #[test]
    fn test_needs_contourable_grid() {
        let g = grid(3, 1, vec![0.0; 3]);
        assert!(extract_isobands(&g, &[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_bands_partition_a_gradient() {
        let g = gradient_3x3();
        let bands = extract_isobands(&g, &[0.0, 10.0, 20.0]).unwrap();

        assert_eq!(bands.len(), 2);
        assert_eq!((bands[0].low, bands[0].high), (0.0, 10.0));
        assert_eq!((bands[1].low, bands[1].high), (10.0, 20.0));

        // The grid spans 2x2 cells; the two bands cover it save for the
        // top row of points at exactly 20 (upper bound is exclusive).
        for band in &bands {
            assert_eq!(band.polygons.len(), 1);
            assert!(signed_area(&band.polygons[0][0]) > 0.0);
        }
    }

    #[test]
    fn test_adjacent_bands_share_boundary() {
        let g = gradient_3x3();
        let bands = extract_isobands(&g, &[0.0, 10.0, 20.0]).unwrap();

        // The 10.0 crossing runs along y = 1. The lower band carries it
        // as a hole, the upper band as its outer, with identical points.
        let on_crossing = |ring: &crate::Ring| -> Vec<[f64; 2]> {
            let mut pts: Vec<[f64; 2]> = ring
                .iter()
                .filter(|p| (p[1] - 1.0).abs() < 1e-12)
                .copied()
                .collect();
            pts.sort_by(|a, b| a.partial_cmp(b).unwrap());
            pts.dedup();
            pts
        };

        assert_eq!(bands[0].polygons[0].len(), 2, "lower band carries a hole");
        let lower_pts = on_crossing(&bands[0].polygons[0][1]);
        let upper_pts = on_crossing(&bands[1].polygons[0][0]);
        assert!(!lower_pts.is_empty());
        assert_eq!(lower_pts, upper_pts);
    }

    #[test]
    fn test_peak_produces_hole_in_surrounding_band() {
        // Flat 2.0 field with a 12.0 peak in the middle: band [0, 5) is
        // the surround with a hole where the peak pokes through.
        let mut values = vec![2.0; 25];
        values[2 + 2 * 5] = 12.0;
        let g = grid(5, 5, values);

        let bands = extract_isobands(&g, &[0.0, 5.0, 15.0]).unwrap();
        assert_eq!(bands.len(), 2);

        let surround = &bands[0];
        assert_eq!(surround.polygons.len(), 1);
        assert_eq!(surround.polygons[0].len(), 2, "outer plus one hole");
        assert!(signed_area(&surround.polygons[0][0]) > 0.0);
        assert!(signed_area(&surround.polygons[0][1]) < 0.0);

        let peak = &bands[1];
        assert_eq!(peak.polygons.len(), 1);
        assert_eq!(peak.polygons[0].len(), 1);
        // The peak polygon fills the surround's hole exactly (reversed).
        let hole_area = -signed_area(&surround.polygons[0][1]);
        let peak_area = signed_area(&peak.polygons[0][0]);
        assert!((hole_area - peak_area).abs() < 1e-9);
    }

    #[test]
    fn test_flat_grid_single_covering_band() {
        let g = grid(3, 3, vec![7.0; 9]);

        // An explicit band straddling the flat value covers the hull.
        let bands = extract_isobands(&g, &[5.0, 10.0]).unwrap();
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].polygons.len(), 1);
        assert!((signed_area(&bands[0].polygons[0][0]) - 4.0).abs() < 1e-9);

        // Bands entirely outside the value are skipped.
        assert!(extract_isobands(&g, &[10.0, 20.0]).unwrap().is_empty());
        assert!(extract_isobands(&g, &[0.0, 5.0]).unwrap().is_empty());
    }

    #[test]
    fn test_unordered_threshold_pairs_skipped() {
        let g = gradient_3x3();
        let bands = extract_isobands(&g, &[10.0, 10.0, 5.0]).unwrap();
        assert!(bands.is_empty());
    }
}
