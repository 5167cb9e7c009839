//! Value-to-color classification via piecewise-linear ramps.

use serde::{Deserialize, Serialize};

/// An ordered palette of RGB stops, conceptually spanning `t in [0, 1]`
/// via even spacing across stop indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRamp {
    stops: Vec<[u8; 3]>,
}

impl ColorRamp {
    /// Create a ramp from RGB stops. A ramp must carry at least one stop.
    pub fn new(stops: Vec<[u8; 3]>) -> Result<Self, ColorRampError> {
        if stops.is_empty() {
            return Err(ColorRampError::NoStops);
        }
        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[[u8; 3]] {
        &self.stops
    }

    /// Map a value against an observed range to a color.
    ///
    /// `t = clamp((value - min) / (max - min), 0, 1)`, then a per-channel
    /// linear blend between the two bracketing stops, rounded to integer
    /// channels. A degenerate range (`max <= min`, or a single-stop ramp)
    /// always yields the first stop.
    pub fn classify(&self, value: f64, min_value: f64, max_value: f64) -> RampColor {
        let n = self.stops.len();
        if n == 1 || !(max_value > min_value) {
            return RampColor(self.stops[0]);
        }

        let t = ((value - min_value) / (max_value - min_value)).clamp(0.0, 1.0);
        let scaled = t * (n - 1) as f64;
        let idx = (scaled.floor() as usize).min(n - 2);
        let frac = scaled - idx as f64;

        let c1 = self.stops[idx];
        let c2 = self.stops[idx + 1];
        let blend =
            |a: u8, b: u8| -> u8 { (a as f64 + (b as f64 - a as f64) * frac).round() as u8 };

        RampColor([
            blend(c1[0], c2[0]),
            blend(c1[1], c2[1]),
            blend(c1[2], c2[2]),
        ])
    }

    /// 30-stop blue-green-yellow-red elevation ramp.
    pub fn elevation() -> Self {
        Self {
            stops: vec![
                [8, 29, 88],
                [16, 56, 126],
                [23, 82, 156],
                [32, 112, 180],
                [43, 140, 190],
                [65, 182, 196],
                [99, 198, 189],
                [127, 205, 187],
                [161, 218, 180],
                [199, 233, 180],
                [217, 240, 179],
                [237, 248, 177],
                [255, 255, 204],
                [255, 245, 178],
                [255, 237, 160],
                [254, 227, 140],
                [254, 217, 118],
                [254, 198, 96],
                [254, 178, 76],
                [253, 159, 68],
                [253, 141, 60],
                [252, 112, 51],
                [252, 78, 42],
                [240, 52, 35],
                [227, 26, 28],
                [208, 13, 33],
                [189, 0, 38],
                [165, 0, 38],
                [128, 0, 38],
                [89, 0, 28],
            ],
        }
    }

    /// 12-stop ramp used for live heatmap-style layers.
    pub fn heatmap() -> Self {
        Self {
            stops: vec![
                [65, 182, 196],
                [127, 205, 187],
                [199, 233, 180],
                [237, 248, 177],
                [255, 255, 204],
                [255, 237, 160],
                [254, 217, 118],
                [254, 178, 76],
                [253, 141, 60],
                [252, 78, 42],
                [227, 26, 28],
                [189, 0, 38],
            ],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ColorRampError {
    #[error("color ramp must have at least 1 stop")]
    NoStops,
}

/// A classified color, renderable as a hex string or packed RGBA.
///
/// Both renditions derive from the same rounded channel bytes, so they
/// agree bit for bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampColor(pub [u8; 3]);

impl RampColor {
    /// Lowercase "#rrggbb".
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }

    /// RGBA channel array with the given opacity in `[0, 1]`.
    pub fn to_rgba(self, opacity: f64) -> [u8; 4] {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.0[0], self.0[1], self.0[2], a]
    }

    /// Packed 0xRRGGBBAA.
    pub fn to_packed(self, opacity: f64) -> u32 {
        let [r, g, b, a] = self.to_rgba(opacity);
        u32::from_be_bytes([r, g, b, a])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop() -> ColorRamp {
        ColorRamp::new(vec![[0, 0, 0], [100, 200, 50]]).unwrap()
    }

    #[test]
    fn test_ramp_requires_stops() {
        assert!(matches!(
            ColorRamp::new(vec![]),
            Err(ColorRampError::NoStops)
        ));
        assert!(ColorRamp::new(vec![[1, 2, 3]]).is_ok());
    }

    #[test]
    fn test_degenerate_range_returns_first_stop() {
        let ramp = ColorRamp::elevation();
        let first = RampColor(ramp.stops()[0]);
        for value in [-10.0, 0.0, 5.0, 1e9] {
            assert_eq!(ramp.classify(value, 5.0, 5.0), first);
        }
    }

    #[test]
    fn test_classify_endpoints_hit_outer_stops() {
        let ramp = two_stop();
        assert_eq!(ramp.classify(0.0, 0.0, 10.0), RampColor([0, 0, 0]));
        assert_eq!(ramp.classify(10.0, 0.0, 10.0), RampColor([100, 200, 50]));
        // Out-of-range values clamp
        assert_eq!(ramp.classify(-5.0, 0.0, 10.0), RampColor([0, 0, 0]));
        assert_eq!(ramp.classify(99.0, 0.0, 10.0), RampColor([100, 200, 50]));
    }

    #[test]
    fn test_classify_midpoint_blends_rounded() {
        let ramp = two_stop();
        // t = 0.5 -> channel-wise rounded average
        assert_eq!(ramp.classify(5.0, 0.0, 10.0), RampColor([50, 100, 25]));
    }

    #[test]
    fn test_hex_and_packed_agree() {
        let ramp = ColorRamp::elevation();
        for value in [0.0, 13.7, 50.0, 86.2, 100.0] {
            let c = ramp.classify(value, 0.0, 100.0);
            let hex = c.to_hex();
            let packed = c.to_packed(1.0);
            let from_hex = u32::from_str_radix(&hex[1..], 16).unwrap();
            assert_eq!(packed >> 8, from_hex, "hex {} vs packed {:08x}", hex, packed);
            assert_eq!(packed & 0xff, 255);
        }
    }

    #[test]
    fn test_opacity_rounding() {
        let c = RampColor([1, 2, 3]);
        assert_eq!(c.to_rgba(0.7), [1, 2, 3, 179]);
        assert_eq!(c.to_rgba(2.0)[3], 255);
        assert_eq!(c.to_rgba(-1.0)[3], 0);
    }
}
