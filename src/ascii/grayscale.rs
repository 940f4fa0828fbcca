//! RGB to grayscale conversion using ITU-R BT.601 luminance formula.

use super::buffers::{BrightnessMap, ProcessedFrame};

/// Luminance of one pixel: Y = 0.299*R + 0.587*G + 0.114*B.
///
/// Integer math with coefficients scaled by 1000 (299 + 587 + 114 = 1000),
/// rounded to nearest, so pure white stays 255 and pure black stays 0.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

/// Grayscale values for an RGB buffer, one per pixel.
pub fn to_grayscale(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3).map(|p| luma(p[0], p[1], p[2])).collect()
}

/// Brightness map of a processed frame.
pub fn to_brightness_map(frame: &ProcessedFrame) -> BrightnessMap {
    BrightnessMap {
        width: frame.width,
        height: frame.height,
        data: to_grayscale(&frame.data),
    }
}
