//! Sample ingestion: raw records to a validated sample set.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::{Diagnostics, Warning};
use crate::BoundingBox;

/// Minimum number of valid samples required for interpolation.
pub const MIN_SAMPLES: usize = 3;

/// A validated scalar sample at a geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// (lng, lat) in degrees
    pub position: [f64; 2],
    pub value: f64,
}

/// Outcome of ingesting raw records: the clean sample list plus what was
/// observed along the way.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    pub samples: Vec<Sample>,
    /// Records rejected by validation. Counted, never reported individually.
    pub dropped: usize,
    range: Option<(f64, f64)>,
}

impl SampleSet {
    /// Observed `(min_value, max_value)` across valid samples.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.range
    }

    /// Whether enough valid samples survived to interpolate.
    pub fn is_sufficient(&self) -> bool {
        self.samples.len() >= MIN_SAMPLES
    }

    /// Bounding box of the valid sample positions.
    pub fn bbox(&self) -> Option<BoundingBox> {
        if self.samples.is_empty() {
            return None;
        }
        let mut bbox = BoundingBox::empty();
        for s in &self.samples {
            bbox.expand_to(s.position[0], s.position[1]);
        }
        Some(bbox)
    }

    /// Record the non-fatal conditions this set carries (dropped records,
    /// insufficiency) on the run's diagnostics.
    pub fn report(&self, diagnostics: &mut Diagnostics) {
        if self.dropped > 0 {
            diagnostics.push(Warning::SamplesDropped {
                dropped: self.dropped,
            });
        }
        if !self.is_sufficient() {
            diagnostics.push(Warning::InsufficientSamples {
                valid: self.samples.len(),
                required: MIN_SAMPLES,
            });
        }
    }
}

/// Validate raw records into a clean sample set.
///
/// A record is accepted only if its position accessor yields two finite
/// coordinates and its value accessor a finite number. Everything else is
/// dropped silently and counted.
pub fn ingest<T, P, V>(records: impl IntoIterator<Item = T>, position: P, value: V) -> SampleSet
where
    P: Fn(&T) -> Option<[f64; 2]>,
    V: Fn(&T) -> Option<f64>,
{
    let mut set = SampleSet::default();

    for record in records {
        let (Some(pos), Some(val)) = (position(&record), value(&record)) else {
            set.dropped += 1;
            continue;
        };
        if !pos[0].is_finite() || !pos[1].is_finite() || !val.is_finite() {
            set.dropped += 1;
            continue;
        }

        set.range = Some(match set.range {
            Some((min, max)) => (min.min(val), max.max(val)),
            None => (val, val),
        });
        set.samples.push(Sample {
            position: pos,
            value: val,
        });
    }

    debug!(
        valid = set.samples.len(),
        dropped = set.dropped,
        "ingested samples"
    );

    set
}
