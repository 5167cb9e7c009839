//! Incremental GeoJSON FeatureCollection output.
//!
//! Features are serialized one at a time straight into the sink, so peak
//! memory stays at one feature no matter how many the pipeline emits.

pub mod feature;
pub mod streamer;

pub use feature::{Feature, FeatureCollection, Geometry, Properties, PropertyValue};
pub use streamer::{stream_features, FeatureStreamer, StreamSummary};
