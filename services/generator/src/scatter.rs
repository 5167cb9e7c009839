//! Scattered-sample pipeline: JSON records to contoured GeoJSON.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use contour::{extract_isobands, extract_isolines, generate_thresholds};
use geojson_stream::FeatureStreamer;
use interpolation::idw;
use isomap_common::{ingest, BoundingBox, CellSize, ColorRamp, Diagnostics, GridSpec};

use crate::features::{band_to_feature, isoline_to_feature};

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Ramp {
    /// 12-stop ramp matching the live heatmap layer
    Heatmap,
    /// 30-stop elevation ramp
    Elevation,
}

impl Ramp {
    pub fn to_ramp(self) -> ColorRamp {
        match self {
            Ramp::Heatmap => ColorRamp::heatmap(),
            Ramp::Elevation => ColorRamp::elevation(),
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Units {
    /// Meters
    M,
    /// Kilometers
    Km,
    /// Degrees
    Deg,
}

impl Units {
    pub fn to_cell_size(self, size: f64) -> CellSize {
        match self {
            Units::M => CellSize::Meters(size),
            Units::Km => CellSize::Kilometers(size),
            Units::Deg => CellSize::Degrees(size),
        }
    }
}

#[derive(Args, Debug)]
pub struct ScatterArgs {
    /// Input JSON file: an array of {"position": [lng, lat], "value": n}
    pub input: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long, default_value = "contours.geojson")]
    pub output: PathBuf,

    /// Inverse distance weighting power
    #[arg(long, default_value_t = interpolation::DEFAULT_POWER)]
    pub power: f64,

    /// Grid cell size, interpreted per --units
    #[arg(long, default_value_t = 100.0)]
    pub cell_size: f64,

    /// Units for --cell-size
    #[arg(long, value_enum, default_value = "m")]
    pub units: Units,

    /// Number of value bands
    #[arg(long, default_value_t = 30)]
    pub bands: usize,

    /// Fill opacity for band features
    #[arg(long, default_value_t = 0.7)]
    pub opacity: f64,

    /// Color ramp for band fills
    #[arg(long, value_enum, default_value = "heatmap")]
    pub ramp: Ramp,

    /// Emit isolines instead of filled isobands
    #[arg(long)]
    pub isolines: bool,

    /// Override the grid extent: "minLng,minLat,maxLng,maxLat"
    /// (default: the bounding box of the input samples)
    #[arg(long)]
    pub bounds: Option<String>,
}

pub fn run(args: &ScatterArgs) -> Result<()> {
    let mut diagnostics = Diagnostics::new();

    let file = File::open(&args.input)
        .with_context(|| format!("opening input {}", args.input.display()))?;
    let records: Vec<serde_json::Value> =
        serde_json::from_reader(BufReader::new(file)).context("parsing input records")?;
    info!(records = records.len(), "loaded input");

    let samples = ingest(
        records,
        |rec| {
            let pos = rec.get("position")?.as_array()?;
            match (pos.first()?.as_f64(), pos.get(1)?.as_f64()) {
                (Some(lng), Some(lat)) => Some([lng, lat]),
                _ => None,
            }
        },
        |rec| rec.get("value")?.as_f64(),
    );
    samples.report(&mut diagnostics);

    let sink = BufWriter::new(
        File::create(&args.output)
            .with_context(|| format!("creating output {}", args.output.display()))?,
    );
    let mut streamer = FeatureStreamer::new(sink);

    // Too few samples is not an error: emit a valid empty collection so
    // downstream consumers always get well-formed output.
    if !samples.is_sufficient() {
        warn!("not enough samples to interpolate, writing empty collection");
        let summary = streamer.finish()?;
        info!(bytes = summary.bytes, "wrote empty collection");
        return Ok(());
    }

    let bounds = match &args.bounds {
        Some(s) => BoundingBox::from_bounds_string(s)?,
        None => samples
            .bbox()
            .context("samples carry no extent")?,
    };
    let spec = GridSpec::from_bbox(&bounds, args.units.to_cell_size(args.cell_size))?;
    info!(cols = spec.cols, rows = spec.rows, "built grid");

    let grid = idw(&samples.samples, &spec, args.power)?;

    let (min_v, max_v) = samples
        .value_range()
        .context("samples carry no value range")?;
    let thresholds = generate_thresholds(min_v, max_v, args.bands);
    let ramp = args.ramp.to_ramp();

    if args.isolines {
        for line in extract_isolines(&grid, &thresholds)? {
            streamer.write_feature(&isoline_to_feature(&line, &spec, &ramp, min_v, max_v))?;
        }
    } else {
        for band in extract_isobands(&grid, &thresholds)? {
            streamer
                .write_feature(&band_to_feature(&band, &spec, &ramp, min_v, max_v, args.opacity))?;
        }
    }

    let summary = streamer.finish()?;
    info!(
        features = summary.features,
        bytes = summary.bytes,
        warnings = diagnostics.warnings.len(),
        output = %args.output.display(),
        "wrote contours"
    );
    Ok(())
}
