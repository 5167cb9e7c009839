//! Inverse distance weighted interpolation of scattered samples.

use rayon::prelude::*;
use tracing::debug;

use isomap_common::{Grid, GridSpec, IsomapError, IsomapResult, Sample, MIN_SAMPLES};

/// Default inverse-distance power. Higher values localize influence.
pub const DEFAULT_POWER: f64 = 2.0;

/// Samples closer than this to a grid point take over that point
/// directly. Avoids the weight singularity as distance approaches zero.
pub const SNAP_DISTANCE: f64 = 1e-10;

/// Interpolate scattered samples onto every point of `spec` using inverse
/// distance weighting.
///
/// Distances are planar in lng/lat degrees; at the city-to-region extents
/// this targets, the latitude distortion shifts weights only marginally.
/// A grid point on (or within [`SNAP_DISTANCE`] of) a sample takes that
/// sample's value regardless of `power`. The full pass is
/// O(cols * rows * samples), parallelized over rows.
pub fn idw(samples: &[Sample], spec: &GridSpec, power: f64) -> IsomapResult<Grid> {
    if samples.len() < MIN_SAMPLES {
        return Err(IsomapError::InsufficientSamples {
            valid: samples.len(),
            required: MIN_SAMPLES,
        });
    }
    if !power.is_finite() || power <= 0.0 {
        return Err(IsomapError::InterpolationFailure(format!(
            "power must be positive and finite, got {}",
            power
        )));
    }

    debug!(
        samples = samples.len(),
        cols = spec.cols,
        rows = spec.rows,
        power,
        "running idw interpolation"
    );

    let values: Vec<f64> = (0..spec.rows)
        .into_par_iter()
        .flat_map(|j| {
            let mut row = Vec::with_capacity(spec.cols);
            for i in 0..spec.cols {
                let [lng, lat] = spec.cell_center(i, j);
                row.push(estimate(samples, lng, lat, power));
            }
            row
        })
        .collect();

    Grid::new(*spec, values)
}

/// IDW estimate at a single point.
fn estimate(samples: &[Sample], lng: f64, lat: f64, power: f64) -> f64 {
    let mut weight_sum = 0.0;
    let mut weighted_value = 0.0;

    for s in samples {
        let dx = lng - s.position[0];
        let dy = lat - s.position[1];
        let d2 = dx * dx + dy * dy;

        // On or next to a sample: its value wins outright. The squared
        // threshold also catches subnormal distances whose reciprocal
        // weight would overflow to infinity.
        if d2 < SNAP_DISTANCE * SNAP_DISTANCE {
            return s.value;
        }

        let w = 1.0 / d2.sqrt().powf(power);
        weight_sum += w;
        weighted_value += w * s.value;
    }

    weighted_value / weight_sum
}
