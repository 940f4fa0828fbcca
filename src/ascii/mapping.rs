//! Brightness to glyph mapping and color quantization.

use std::fmt;

use super::buffers::{BrightnessMap, ProcessedFrame};
use super::ramp::GlyphRamp;

/// Cells darker than this are not drawn at all.
pub const DEFAULT_VISIBILITY_THRESHOLD: u8 = 10;

/// Quantization step per color channel (4 levels, 64 colors).
pub const COLOR_STEP: u8 = 64;

/// A color reduced to the fixed 64-color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuantizedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl QuantizedColor {
    /// Quantize an arbitrary color.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: quantize_channel(r),
            g: quantize_channel(g),
            b: quantize_channel(b),
        }
    }

    /// `#rrggbb` form of the color.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for QuantizedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Floor a channel to a multiple of [`COLOR_STEP`]: one of 0, 64, 128, 192.
#[inline]
pub fn quantize_channel(value: u8) -> u8 {
    (value / COLOR_STEP) * COLOR_STEP
}

/// Ramp index for a visible brightness.
///
/// Maps `[threshold, 255]` linearly onto `[0, levels - 1]`, rounding to the
/// nearest level. Returns `None` below the threshold.
#[inline]
pub fn glyph_index(brightness: u8, threshold: u8, levels: usize) -> Option<usize> {
    if brightness < threshold {
        return None;
    }
    if levels <= 1 || threshold == 255 {
        return Some(0);
    }

    let span = (255 - threshold) as f32;
    let t = (brightness - threshold) as f32 / span;
    let idx = (t * (levels - 1) as f32).round() as usize;
    Some(idx.min(levels - 1))
}

/// One visible cell of the glyph grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphCell {
    pub x: u16,
    pub y: u16,
    pub glyph: char,
    pub color: QuantizedColor,
}

/// Sparse glyph grid: only visible cells are present, in row-major order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphMap {
    /// Grid width in cells
    pub width: u16,
    /// Grid height in cells
    pub height: u16,
    /// Visible cells
    pub cells: Vec<GlyphCell>,
}

impl GlyphMap {
    /// Number of visible cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is visible.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Look up the visible cell at (x, y).
    pub fn get(&self, x: u16, y: u16) -> Option<&GlyphCell> {
        self.cells.iter().find(|c| c.x == x && c.y == y)
    }
}

/// Turns processed frames into sparse glyph grids.
#[derive(Debug, Clone)]
pub struct GlyphMapper {
    ramp: GlyphRamp,
    visibility_threshold: u8,
}

impl Default for GlyphMapper {
    fn default() -> Self {
        Self::new(GlyphRamp::default(), DEFAULT_VISIBILITY_THRESHOLD)
    }
}

impl GlyphMapper {
    pub fn new(ramp: GlyphRamp, visibility_threshold: u8) -> Self {
        Self {
            ramp,
            visibility_threshold,
        }
    }

    pub fn ramp(&self) -> &GlyphRamp {
        &self.ramp
    }

    pub fn visibility_threshold(&self) -> u8 {
        self.visibility_threshold
    }

    /// Glyph for a brightness value, or `None` if the cell is invisible.
    #[inline]
    pub fn glyph_for(&self, brightness: u8) -> Option<char> {
        glyph_index(brightness, self.visibility_threshold, self.ramp.len())
            .map(|idx| self.ramp.glyph(idx))
    }

    /// Map every visible cell of `frame` to a glyph and quantized color.
    ///
    /// # Panics
    /// If `frame` and `brightness` disagree on dimensions.
    pub fn map(&self, frame: &ProcessedFrame, brightness: &BrightnessMap) -> GlyphMap {
        assert_eq!(
            (frame.width, frame.height),
            brightness.dimensions(),
            "processed frame and brightness map dimensions diverged"
        );

        let mut cells = Vec::new();
        for y in 0..frame.height {
            for x in 0..frame.width {
                let Some(glyph) = self.glyph_for(brightness.get(x, y)) else {
                    continue;
                };
                let (r, g, b) = frame.rgb(x, y);
                cells.push(GlyphCell {
                    x,
                    y,
                    glyph,
                    color: QuantizedColor::from_rgb(r, g, b),
                });
            }
        }

        GlyphMap {
            width: frame.width,
            height: frame.height,
            cells,
        }
    }
}
