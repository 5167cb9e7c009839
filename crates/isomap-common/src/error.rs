//! Error types for the isomap pipeline.

use thiserror::Error;

/// Result type alias using IsomapError.
pub type IsomapResult<T> = Result<T, IsomapError>;

/// Fatal pipeline errors.
///
/// Invalid samples never surface here: they are dropped silently during
/// ingestion and only counted. Insufficiency is non-fatal at the pipeline
/// level (the caller emits an empty result plus a diagnostic warning); the
/// variant exists because the interpolator refuses to run below the minimum.
#[derive(Debug, Error)]
pub enum IsomapError {
    #[error("insufficient samples: {valid} valid, at least {required} required")]
    InsufficientSamples { valid: usize, required: usize },

    /// Malformed grid geometry. The run aborts with no partial output.
    #[error("interpolation failure: {0}")]
    InterpolationFailure(String),

    /// I/O failure while streaming features. Bytes already written to the
    /// sink are truncated and must be treated as invalid by any consumer.
    #[error("sink write failure: {0}")]
    SinkWrite(#[from] std::io::Error),
}
