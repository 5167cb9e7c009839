//! Scattered-sample and analytic rasterization onto regular grids.

pub mod dense;
pub mod idw;

pub use dense::rasterize;
pub use idw::{idw, DEFAULT_POWER, SNAP_DISTANCE};
