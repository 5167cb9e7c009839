//! Marching-squares contour extraction over regular grids.
//!
//! Isolines trace single threshold crossings; isobands fill the closed
//! regions between consecutive thresholds as polygons with holes. All
//! coordinates are in fractional grid space; callers project them to
//! geographic coordinates afterwards.
//!
//! Saddle cells (two opposite corners above threshold, two below) are
//! ambiguous. We resolve them by comparing the threshold to the average of
//! the four corner values: when the average is at or above the threshold,
//! the high corners are treated as connected. The same rule applies to
//! every threshold, so isolines never cross and adjacent isobands share
//! boundaries exactly.

pub mod isoband;
pub mod isoline;
mod march;
mod ring;
pub mod thresholds;

pub use isoband::{extract_isobands, Isoband};
pub use isoline::{extract_isolines, Isoline};
pub use thresholds::generate_thresholds;

/// A sequence of fractional grid-space points. Closed rings repeat their
/// first point at the end.
pub type Ring = Vec<[f64; 2]>;

/// A polygon: one outer ring followed by zero or more hole rings.
pub type Polygon = Vec<Ring>;
