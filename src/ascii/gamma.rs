//! Gamma correction via a precomputed lookup table.

use crate::camera::Frame;

/// Default gamma. Values above 1.0 brighten midtones.
pub const DEFAULT_GAMMA: f32 = 1.3;

/// 256-entry gamma lookup table.
///
/// Entry `i` is `255 * (i / 255)^(1 / gamma)`, truncated to a byte.
#[derive(Clone)]
pub struct GammaTable {
    gamma: f32,
    lut: [u8; 256],
}

impl std::fmt::Debug for GammaTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GammaTable")
            .field("gamma", &self.gamma)
            .finish_non_exhaustive()
    }
}

impl GammaTable {
    /// Build the table for `gamma` (must be positive and finite).
    pub fn new(gamma: f32) -> Self {
        let inv = 1.0 / gamma as f64;
        let mut lut = [0u8; 256];
        for (i, slot) in lut.iter_mut().enumerate() {
            *slot = ((i as f64 / 255.0).powf(inv) * 255.0) as u8;
        }
        Self { gamma, lut }
    }

    /// Correct a single channel value.
    #[inline]
    pub fn apply(&self, value: u8) -> u8 {
        self.lut[value as usize]
    }

    /// Return a gamma-corrected copy of `frame`, every channel mapped.
    pub fn apply_frame(&self, frame: &Frame) -> Frame {
        Frame {
            data: frame.data.iter().map(|&v| self.apply(v)).collect(),
            width: frame.width,
            height: frame.height,
            format: frame.format,
            timestamp: frame.timestamp,
        }
    }
}

impl Default for GammaTable {
    fn default() -> Self {
        Self::new(DEFAULT_GAMMA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FrameFormat;

    #[test]
    fn test_endpoints_are_fixed() {
        let table = GammaTable::default();
        assert_eq!(table.apply(0), 0);
        assert_eq!(table.apply(255), 255);
    }

    #[test]
    fn test_midtones_are_brightened() {
        let table = GammaTable::default();
        assert_eq!(table.apply(128), 150);
        for v in 1..255u8 {
            assert!(table.apply(v) >= v, "gamma 1.3 darkened {}", v);
        }
    }

    #[test]
    fn test_table_is_monotonic() {
        let table = GammaTable::new(2.2);
        for v in 1..=255u8 {
            assert!(table.apply(v) >= table.apply(v - 1));
        }
    }

    #[test]
    fn test_apply_frame_does_not_touch_source() {
        let frame = Frame::solid(2, 2, FrameFormat::Bgr, (128, 128, 128));
        let corrected = GammaTable::default().apply_frame(&frame);
        assert!(frame.data.iter().all(|&v| v == 128));
        assert!(corrected.data.iter().all(|&v| v == 150));
    }
}
