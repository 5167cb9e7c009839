//! Synthetic field generation for demos and load testing.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use contour::{extract_isobands, generate_thresholds};
use geojson_stream::FeatureStreamer;
use interpolation::rasterize;
use isomap_common::{BoundingBox, CellSize, ColorRamp, GridSpec};

use crate::features::band_to_feature;

/// A broad terrain peak, positioned as a fraction of the grid extent.
/// Height falls off as `exp(-distance_degrees * sigma)`.
struct Peak {
    fx: f64,
    fy: f64,
    height: f64,
    sigma: f64,
}

const PEAKS: &[Peak] = &[
    Peak { fx: 0.3, fy: 0.7, height: 500.0, sigma: 5.0 },
    Peak { fx: 0.7, fy: 0.4, height: 600.0, sigma: 4.0 },
    Peak { fx: 0.5, fy: 0.2, height: 400.0, sigma: 6.0 },
    Peak { fx: 0.15, fy: 0.5, height: 350.0, sigma: 7.0 },
    Peak { fx: 0.85, fy: 0.8, height: 450.0, sigma: 5.0 },
];

const BASE_VALUE: f64 = 50.0;
const NOISE_AMPLITUDE: f64 = 10.0;

#[derive(Args, Debug)]
pub struct SyntheticArgs {
    /// Grid extent: "minLng,minLat,maxLng,maxLat"
    #[arg(
        long,
        default_value = "-2.9691437069012636,53.276823185185435,-1.6440644345684063,53.695462187191424"
    )]
    pub bounds: String,

    /// Grid cell size in meters
    #[arg(long, default_value_t = 20.0)]
    pub cell_size_m: f64,

    /// Number of value bands
    #[arg(long, default_value_t = 30)]
    pub bands: usize,

    /// Fill opacity for band features
    #[arg(long, default_value_t = 0.7)]
    pub opacity: f64,

    /// RNG seed for reproducible noise (default: entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output GeoJSON file
    #[arg(short, long, default_value = "test-data.geojson")]
    pub output: PathBuf,
}

pub fn run(args: &SyntheticArgs) -> Result<()> {
    let bounds = BoundingBox::from_bounds_string(&args.bounds)?;
    let spec = GridSpec::from_bbox(&bounds, CellSize::Meters(args.cell_size_m))?;
    info!(cols = spec.cols, rows = spec.rows, "built synthetic grid");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let grid = rasterize(&spec, |lng, lat| {
        let mut v = BASE_VALUE;
        for peak in PEAKS {
            let dx = lng - (bounds.min_lng + bounds.width() * peak.fx);
            let dy = lat - (bounds.min_lat + bounds.height() * peak.fy);
            let dist = (dx * dx + dy * dy).sqrt();
            v += peak.height * (-dist * peak.sigma).exp();
        }
        v += rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE);
        v.max(0.0)
    })?;

    let (min_v, max_v) = grid
        .value_range()
        .context("synthetic grid has no finite values")?;
    let thresholds = generate_thresholds(min_v, max_v, args.bands);
    let ramp = ColorRamp::elevation();

    let sink = BufWriter::new(
        File::create(&args.output)
            .with_context(|| format!("creating output {}", args.output.display()))?,
    );
    let mut streamer = FeatureStreamer::new(sink);

    for band in extract_isobands(&grid, &thresholds)? {
        streamer.write_feature(&band_to_feature(
            &band,
            &spec,
            &ramp,
            min_v,
            max_v,
            args.opacity,
        ))?;
    }

    let summary = streamer.finish()?;
    info!(
        features = summary.features,
        bytes = summary.bytes,
        output = %args.output.display(),
        "wrote synthetic contours"
    );
    Ok(())
}
