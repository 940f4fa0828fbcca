//! Raw frame to (processed frame, brightness map) pipeline.

use super::buffers::{BrightnessMap, ProcessedFrame};
use super::enhance::{enhance, DEFAULT_EDGE_THRESHOLD};
use super::gamma::{GammaTable, DEFAULT_GAMMA};
use super::grayscale::to_brightness_map;
use super::mapping::{GlyphMap, GlyphMapper, DEFAULT_VISIBILITY_THRESHOLD};
use super::ramp::GlyphRamp;
use super::resize::{grid_dimensions, resize_nearest, DEFAULT_CELL_ASPECT, DEFAULT_GRID_WIDTH};
use crate::camera::Frame;

/// Tunables for the transform and mapping stages.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Grid width in cells
    pub width: u16,
    /// Gamma applied before resizing
    pub gamma: f32,
    /// Row scale compensating for tall glyph cells
    pub cell_aspect: f32,
    /// Cells darker than this are invisible
    pub visibility_threshold: u8,
    /// Laplacian magnitude above which a pixel is an edge
    pub edge_threshold: u8,
    /// Glyphs from densest to sparsest
    pub ramp: GlyphRamp,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            gamma: DEFAULT_GAMMA,
            cell_aspect: DEFAULT_CELL_ASPECT,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            ramp: GlyphRamp::default(),
        }
    }
}

/// Deterministic per-frame transform with its lookup tables prebuilt.
///
/// Steps, in order:
/// 1. Gamma correction (lookup table, every channel)
/// 2. Nearest-neighbour resize to the aspect-corrected cell grid
/// 3. Blur + Laplacian edge mask + sharpen-on-edges composite
/// 4. BT.601 grayscale of the result as the brightness map
#[derive(Debug, Clone)]
pub struct FrameTransform {
    settings: PipelineSettings,
    gamma: GammaTable,
    mapper: GlyphMapper,
}

impl Default for FrameTransform {
    fn default() -> Self {
        Self::new(PipelineSettings::default())
    }
}

impl FrameTransform {
    pub fn new(settings: PipelineSettings) -> Self {
        let gamma = GammaTable::new(settings.gamma);
        let mapper = GlyphMapper::new(settings.ramp.clone(), settings.visibility_threshold);
        Self {
            settings,
            gamma,
            mapper,
        }
    }

    /// Grid size this transform produces for a `src_width x src_height` frame.
    pub fn grid_for(&self, src_width: u32, src_height: u32) -> (u16, u16) {
        grid_dimensions(
            src_width,
            src_height,
            self.settings.width,
            self.settings.cell_aspect,
        )
    }

    /// Run steps 1-4 on `raw`. The input is never modified.
    ///
    /// # Panics
    /// If the processed frame and brightness map dimensions diverge, which
    /// would be a bug in the pipeline itself.
    pub fn apply(&self, raw: &Frame) -> (ProcessedFrame, BrightnessMap) {
        let corrected = self.gamma.apply_frame(raw);
        let (width, height) = self.grid_for(raw.width, raw.height);
        let resized = resize_nearest(&corrected, width, height);
        let processed = enhance(&resized, self.settings.edge_threshold);
        let brightness = to_brightness_map(&processed);

        assert_eq!(
            (processed.width, processed.height),
            brightness.dimensions(),
            "processed frame and brightness map dimensions diverged"
        );

        (processed, brightness)
    }

    /// Transform `raw` and map it straight to glyphs.
    pub fn glyphs(&self, raw: &Frame) -> GlyphMap {
        let (processed, brightness) = self.apply(raw);
        self.mapper.map(&processed, &brightness)
    }
}

/// Convenience wrapper: build a [`FrameTransform`] and apply it once.
pub fn transform(raw: &Frame, settings: &PipelineSettings) -> (ProcessedFrame, BrightnessMap) {
    FrameTransform::new(settings.clone()).apply(raw)
}
