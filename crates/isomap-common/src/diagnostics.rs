//! Result-carried diagnostics.
//!
//! Non-fatal conditions travel with the run's result instead of leaking as
//! ambient console output. Fatal conditions use [`crate::IsomapError`].

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// A non-fatal condition observed during a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Warning {
    #[error("need at least {required} valid samples, got {valid}")]
    InsufficientSamples { valid: usize, required: usize },

    #[error("{dropped} invalid records dropped during ingestion")]
    SamplesDropped { dropped: usize },
}

/// Warnings accumulated over one pipeline run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning. Also emits a structured tracing event so logs and
    /// the carried list stay in sync.
    pub fn push(&mut self, warning: Warning) {
        warn!(warning = %warning, "pipeline warning");
        self.warnings.push(warning);
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}
