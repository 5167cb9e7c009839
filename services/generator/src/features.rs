//! Conversion from grid-space contours to styled GeoJSON features.

use contour::{Isoband, Isoline};
use geojson_stream::{Feature, Geometry, Properties};
use isomap_common::{ColorRamp, GridSpec};

fn project_ring(ring: &[[f64; 2]], spec: &GridSpec) -> Vec<[f64; 2]> {
    ring.iter().map(|p| spec.grid_to_lnglat(p[0], p[1])).collect()
}

/// Turn an isoband into a filled feature.
///
/// The fill color classifies the band midpoint, clamped to the observed
/// maximum so the top band does not overshoot the ramp.
pub fn band_to_feature(
    band: &Isoband,
    spec: &GridSpec,
    ramp: &ColorRamp,
    min_value: f64,
    max_value: f64,
    opacity: f64,
) -> Feature {
    let mid = ((band.low + band.high) / 2.0).min(max_value);
    let fill = ramp.classify(mid, min_value, max_value).to_hex();

    let polygons: Vec<Vec<Vec<[f64; 2]>>> = band
        .polygons
        .iter()
        .map(|polygon| polygon.iter().map(|ring| project_ring(ring, spec)).collect())
        .collect();

    let geometry = if polygons.len() == 1 {
        Geometry::Polygon {
            coordinates: polygons.into_iter().next().unwrap_or_default(),
        }
    } else {
        Geometry::MultiPolygon {
            coordinates: polygons,
        }
    };

    Feature::new(
        geometry,
        Properties::band(band.low, band.high, fill, opacity),
    )
}

/// Turn an isoline into a stroked LineString feature.
pub fn isoline_to_feature(
    line: &Isoline,
    spec: &GridSpec,
    ramp: &ColorRamp,
    min_value: f64,
    max_value: f64,
) -> Feature {
    let stroke = ramp.classify(line.level, min_value, max_value).to_hex();
    Feature::new(
        Geometry::LineString {
            coordinates: project_ring(&line.points, spec),
        },
        Properties::level(line.level, stroke),
    )
}
