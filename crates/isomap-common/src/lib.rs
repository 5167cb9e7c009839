//! Common types and utilities shared across all isomap crates.

pub mod bbox;
pub mod color;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod sample;

pub use bbox::BoundingBox;
pub use color::{ColorRamp, RampColor};
pub use diagnostics::{Diagnostics, Warning};
pub use error::{IsomapError, IsomapResult};
pub use grid::{CellSize, Grid, GridSpec};
pub use sample::{ingest, Sample, SampleSet, MIN_SAMPLES};
