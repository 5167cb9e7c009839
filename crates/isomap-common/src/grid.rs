//! Regular lng/lat grids and grid-space coordinate projection.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, IsomapError, IsomapResult};

/// Meters per degree of latitude.
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Cell size for grid construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellSize {
    Meters(f64),
    Kilometers(f64),
    Degrees(f64),
}

impl CellSize {
    /// Convert to (step_lng, step_lat) in degrees at the given latitude.
    ///
    /// A degree of longitude shrinks with the cosine of latitude, so a
    /// metric cell size yields different lng and lat steps.
    pub fn to_degree_steps(self, lat: f64) -> (f64, f64) {
        match self {
            CellSize::Degrees(d) => (d, d),
            CellSize::Kilometers(km) => CellSize::Meters(km * 1000.0).to_degree_steps(lat),
            CellSize::Meters(m) => {
                let step_lat = m / METERS_PER_DEGREE_LAT;
                let step_lng = m / (METERS_PER_DEGREE_LAT * lat.to_radians().cos());
                (step_lng, step_lat)
            }
        }
    }
}

/// Specification of a regular lng/lat grid.
///
/// Cell `(i, j)` sits at `(origin_lng + i * step_lng, origin_lat + j * step_lat)`
/// and is stored at flat index `i + j * cols`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of points in the longitude direction
    pub cols: usize,
    /// Number of points in the latitude direction
    pub rows: usize,
    /// Longitude of grid point (0, 0)
    pub origin_lng: f64,
    /// Latitude of grid point (0, 0)
    pub origin_lat: f64,
    /// Grid step in degrees of longitude
    pub step_lng: f64,
    /// Grid step in degrees of latitude
    pub step_lat: f64,
}

impl GridSpec {
    /// Create a new grid specification, validating its invariants.
    pub fn new(
        cols: usize,
        rows: usize,
        origin_lng: f64,
        origin_lat: f64,
        step_lng: f64,
        step_lat: f64,
    ) -> IsomapResult<Self> {
        if cols == 0 || rows == 0 {
            return Err(IsomapError::InterpolationFailure(format!(
                "grid must be at least 1x1, got {}x{}",
                cols, rows
            )));
        }
        if !(step_lng > 0.0) || !(step_lat > 0.0) {
            return Err(IsomapError::InterpolationFailure(format!(
                "grid steps must be positive, got ({}, {})",
                step_lng, step_lat
            )));
        }

        Ok(Self {
            cols,
            rows,
            origin_lng,
            origin_lat,
            step_lng,
            step_lat,
        })
    }

    /// Derive a grid covering `bounds` at the requested cell size.
    ///
    /// Metric cell sizes are converted to degree steps at the latitude of
    /// the box midline. Column and row counts round up so the grid always
    /// covers the full extent.
    pub fn from_bbox(bounds: &BoundingBox, cell: CellSize) -> IsomapResult<Self> {
        if !bounds.is_valid() || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Err(IsomapError::InterpolationFailure(format!(
                "degenerate bounds: {:?}",
                bounds
            )));
        }

        let (step_lng, step_lat) = cell.to_degree_steps(bounds.mid_lat());
        if !(step_lng > 0.0) || !(step_lat > 0.0) || !step_lng.is_finite() || !step_lat.is_finite()
        {
            return Err(IsomapError::InterpolationFailure(format!(
                "cell size {:?} yields unusable steps at latitude {}",
                cell,
                bounds.mid_lat()
            )));
        }

        // At least 2x2 so the grid is contourable.
        let cols = ((bounds.width() / step_lng).ceil() as usize).max(2);
        let rows = ((bounds.height() / step_lat).ceil() as usize).max(2);

        Self::new(cols, rows, bounds.min_lng, bounds.min_lat, step_lng, step_lat)
    }

    /// Project a grid-space coordinate to geographic coordinates.
    ///
    /// Accepts fractional coordinates: contour crossing points keep their
    /// sub-cell precision through this affine transform, no rounding.
    pub fn grid_to_lnglat(&self, i: f64, j: f64) -> [f64; 2] {
        [
            self.origin_lng + i * self.step_lng,
            self.origin_lat + j * self.step_lat,
        ]
    }

    /// Inverse of [`GridSpec::grid_to_lnglat`].
    pub fn lnglat_to_grid(&self, lng: f64, lat: f64) -> (f64, f64) {
        (
            (lng - self.origin_lng) / self.step_lng,
            (lat - self.origin_lat) / self.step_lat,
        )
    }

    /// Geographic position of an integer cell center.
    pub fn cell_center(&self, i: usize, j: usize) -> [f64; 2] {
        self.grid_to_lnglat(i as f64, j as f64)
    }

    /// Bounding box spanned by the grid points.
    pub fn bbox(&self) -> BoundingBox {
        let [max_lng, max_lat] =
            self.grid_to_lnglat((self.cols - 1) as f64, (self.rows - 1) as f64);
        BoundingBox::new(self.origin_lng, self.origin_lat, max_lng, max_lat)
    }

    /// The 1D array index for a 2D grid position.
    pub fn flat_index(&self, i: usize, j: usize) -> usize {
        i + j * self.cols
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    /// Check if grid is empty.
    pub fn is_empty(&self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

/// A fully populated regular grid of scalar values.
///
/// Each pipeline run builds and exclusively owns one of these; it is never
/// shared across runs.
#[derive(Debug, Clone)]
pub struct Grid {
    spec: GridSpec,
    values: Vec<f64>,
}

impl Grid {
    /// Wrap an already-rasterized value array (dense mode).
    pub fn new(spec: GridSpec, values: Vec<f64>) -> IsomapResult<Self> {
        if values.len() != spec.len() {
            return Err(IsomapError::InterpolationFailure(format!(
                "value array length {} does not match {}x{} grid",
                values.len(),
                spec.cols,
                spec.rows
            )));
        }
        Ok(Self { spec, values })
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value at cell `(i, j)`. Panics on out-of-bounds indices.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[self.spec.flat_index(i, j)]
    }

    /// Observed `(min, max)` across finite cells, `None` if there are none.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for &v in &self.values {
            if !v.is_finite() {
                continue;
            }
            range = Some(match range {
                Some((min, max)) => (min.min(v), max.max(v)),
                None => (v, v),
            });
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_2x3() -> GridSpec {
        GridSpec::new(2, 3, -2.0, 51.0, 0.25, 0.5).unwrap()
    }

    #[test]
    fn test_spec_rejects_bad_geometry() {
        assert!(GridSpec::new(0, 3, 0.0, 0.0, 1.0, 1.0).is_err());
        assert!(GridSpec::new(2, 0, 0.0, 0.0, 1.0, 1.0).is_err());
        assert!(GridSpec::new(2, 2, 0.0, 0.0, 0.0, 1.0).is_err());
        assert!(GridSpec::new(2, 2, 0.0, 0.0, 1.0, -0.5).is_err());
        assert!(GridSpec::new(2, 2, 0.0, 0.0, f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_projection_integer_points() {
        let spec = spec_2x3();
        assert_eq!(spec.grid_to_lnglat(0.0, 0.0), [-2.0, 51.0]);
        assert_eq!(spec.grid_to_lnglat(1.0, 2.0), [-1.75, 52.0]);
    }

    #[test]
    fn test_projection_round_trip_fractional() {
        let spec = spec_2x3();
        for &(i, j) in &[(0.0, 0.0), (1.0, 2.0), (0.37, 1.62), (0.5, 0.25)] {
            let [lng, lat] = spec.grid_to_lnglat(i, j);
            let (ri, rj) = spec.lnglat_to_grid(lng, lat);
            assert!((ri - i).abs() < 1e-9, "i: {} -> {}", i, ri);
            assert!((rj - j).abs() < 1e-9, "j: {} -> {}", j, rj);
        }
    }

    #[test]
    fn test_from_bbox_covers_extent() {
        let bounds = BoundingBox::new(-2.0, 53.0, -1.0, 53.5);
        let spec = GridSpec::from_bbox(&bounds, CellSize::Meters(500.0)).unwrap();

        assert!(spec.cols >= 2 && spec.rows >= 2);
        // cols * step covers the width (possibly overshooting one cell)
        assert!(spec.cols as f64 * spec.step_lng >= bounds.width());
        assert!(spec.rows as f64 * spec.step_lat >= bounds.height());
        // lng step is larger than lat step this far north
        assert!(spec.step_lng > spec.step_lat);
    }

    #[test]
    fn test_from_bbox_rejects_degenerate_bounds() {
        let point = BoundingBox::new(1.0, 1.0, 1.0, 1.0);
        assert!(GridSpec::from_bbox(&point, CellSize::Degrees(0.1)).is_err());
    }

    #[test]
    fn test_grid_length_invariant() {
        let spec = spec_2x3();
        assert!(Grid::new(spec, vec![0.0; 5]).is_err());
        let grid = Grid::new(spec, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(grid.get(1, 2), 6.0);
    }

    #[test]
    fn test_value_range_skips_non_finite() {
        let spec = GridSpec::new(2, 2, 0.0, 0.0, 1.0, 1.0).unwrap();
        let grid = Grid::new(spec, vec![3.0, f64::NAN, -1.0, 7.0]).unwrap();
        assert_eq!(grid.value_range(), Some((-1.0, 7.0)));

        let empty = Grid::new(spec, vec![f64::NAN; 4]).unwrap();
        assert_eq!(empty.value_range(), None);
    }
}
