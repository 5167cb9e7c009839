//! Incremental FeatureCollection writer.

use std::io::{self, Write};

use tracing::debug;

use isomap_common::{IsomapError, IsomapResult};

use crate::feature::Feature;

const HEADER: &str = "{\"type\":\"FeatureCollection\",\"features\":[\n";
const SEPARATOR: &str = ",\n";
const FOOTER: &str = "\n]}\n";

/// Counts of what a finished stream wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub features: usize,
    pub bytes: u64,
}

/// Writes a FeatureCollection one feature at a time.
///
/// The envelope is emitted lazily: the header goes out with the first
/// feature (or at [`FeatureStreamer::finish`] for an empty collection),
/// so a stream that fails before producing anything leaves the sink
/// untouched. The writer blocks on a slow sink, which is the only
/// backpressure this needs. Every write error is surfaced as
/// [`IsomapError::SinkWrite`] after a best-effort flush.
pub struct FeatureStreamer<W: Write> {
    sink: CountingWriter<W>,
    features: usize,
    header_written: bool,
}

impl<W: Write> FeatureStreamer<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink: CountingWriter::new(sink),
            features: 0,
            header_written: false,
        }
    }

    /// Serialize one feature into the sink.
    pub fn write_feature(&mut self, feature: &Feature) -> IsomapResult<()> {
        let result = self.write_feature_inner(feature);
        if result.is_err() {
            // Push out whatever made it into the sink's buffers before
            // reporting the failure.
            let _ = self.sink.flush();
        }
        result
    }

    fn write_feature_inner(&mut self, feature: &Feature) -> IsomapResult<()> {
        if !self.header_written {
            self.sink.write_all(HEADER.as_bytes())?;
            self.header_written = true;
        } else {
            self.sink.write_all(SEPARATOR.as_bytes())?;
        }

        serde_json::to_writer(&mut self.sink, feature)
            .map_err(|e| IsomapError::SinkWrite(io::Error::new(io::ErrorKind::Other, e)))?;
        self.features += 1;
        Ok(())
    }

    /// Close the envelope and flush. Consumes the streamer; an unfinished
    /// stream is truncated output by construction.
    pub fn finish(mut self) -> IsomapResult<StreamSummary> {
        let result = self.finish_inner();
        if result.is_err() {
            let _ = self.sink.flush();
        }
        result
    }

    fn finish_inner(&mut self) -> IsomapResult<StreamSummary> {
        if !self.header_written {
            self.sink.write_all(HEADER.as_bytes())?;
            self.header_written = true;
        }
        self.sink.write_all(FOOTER.as_bytes())?;
        self.sink.flush()?;

        let summary = StreamSummary {
            features: self.features,
            bytes: self.sink.written,
        };
        debug!(
            features = summary.features,
            bytes = summary.bytes,
            "finished feature stream"
        );
        Ok(summary)
    }
}

/// Stream an iterator of features into a sink and close the envelope.
pub fn stream_features<W: Write>(
    sink: W,
    features: impl IntoIterator<Item = Feature>,
) -> IsomapResult<StreamSummary> {
    let mut streamer = FeatureStreamer::new(sink);
    for feature in features {
        streamer.write_feature(&feature)?;
    }
    streamer.finish()
}

/// Wraps a writer and tracks how many bytes went through.
struct CountingWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::{Geometry, Properties};

    fn feature(level: f64) -> Feature {
        Feature::new(
            Geometry::LineString {
                coordinates: vec![[0.0, 0.0], [1.0, 1.0]],
            },
            Properties::level(level, "#123456".to_string()),
        )
    }

    #[test]
    fn test_empty_stream_is_valid_empty_collection() {
        let mut buf = Vec::new();
        let summary = FeatureStreamer::new(&mut buf).finish().unwrap();

        assert_eq!(summary.features, 0);
        assert_eq!(summary.bytes, buf.len() as u64);

        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["type"], "FeatureCollection");
        assert_eq!(parsed["features"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_single_feature_has_no_separator() {
        let mut buf = Vec::new();
        let summary = stream_features(&mut buf, [feature(7.0)]).unwrap();
        assert_eq!(summary.features, 1);

        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains(SEPARATOR), "lone feature must not be preceded by a separator");

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        let features = parsed["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["value"], 7.0);
    }

    #[test]
    fn test_streamed_output_parses_back() {
        let mut buf = Vec::new();
        let summary = stream_features(&mut buf, (0..5).map(|i| feature(i as f64))).unwrap();

        assert_eq!(summary.features, 5);
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let features = parsed["features"].as_array().unwrap();
        assert_eq!(features.len(), 5);
        assert_eq!(features[3]["properties"]["value"], 3.0);
    }

    #[test]
    fn test_features_separated_one_per_line() {
        let mut buf = Vec::new();
        stream_features(&mut buf, (0..3).map(|i| feature(i as f64))).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let feature_lines = text
            .lines()
            .filter(|l| l.contains("\"Feature\""))
            .count();
        assert_eq!(feature_lines, 3);
    }

    /// Writer that fails after a byte budget is spent.
    struct FailAfter {
        remaining: usize,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.len() > self.remaining {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink full"));
            }
            self.remaining -= buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_fatal() {
        let mut streamer = FeatureStreamer::new(FailAfter { remaining: 64 });

        // First feature fits the header but not the payload forever.
        let mut failed = false;
        for i in 0..10 {
            if let Err(e) = streamer.write_feature(&feature(i as f64)) {
                assert!(matches!(e, IsomapError::SinkWrite(_)));
                failed = true;
                break;
            }
        }
        assert!(failed, "writer never hit the sink failure");
    }
}
