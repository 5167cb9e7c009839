//! Rasterization of an analytic field onto a grid.

use isomap_common::{Grid, GridSpec, IsomapResult};

/// Evaluate `field(lng, lat)` at every grid point and collect the result.
///
/// Used by synthetic data generation and anywhere a value is already
/// defined everywhere rather than sampled.
pub fn rasterize<F>(spec: &GridSpec, mut field: F) -> IsomapResult<Grid>
where
    F: FnMut(f64, f64) -> f64,
{
    let mut values = Vec::with_capacity(spec.len());
    for j in 0..spec.rows {
        for i in 0..spec.cols {
            let [lng, lat] = spec.cell_center(i, j);
            values.push(field(lng, lat));
        }
    }
    Grid::new(*spec, values)
}
