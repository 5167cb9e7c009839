//! Evenly spaced threshold generation over an observed value range.

/// Generate `bands + 1` thresholds spanning `[min, max]`.
///
/// Consecutive pairs delimit half-open bands `[t_i, t_i+1)`. Returns an
/// empty list when `bands` is zero or the range is degenerate (a flat
/// field has no level worth contouring).
pub fn generate_thresholds(min: f64, max: f64, bands: usize) -> Vec<f64> {
    if bands == 0 || !(max > min) || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }

    let step = (max - min) / bands as f64;
    (0..=bands)
        .map(|i| {
            if i == bands {
                max
            } else {
                min + i as f64 * step
            }
        })
        .collect()
}
