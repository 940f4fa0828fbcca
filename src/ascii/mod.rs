//! Frame to glyph-grid pipeline.
//!
//! 1. **Gamma correction** - lookup table per channel
//! 2. **Resize** - nearest neighbour onto an aspect-corrected cell grid
//! 3. **Enhance** - blur, Laplacian edge mask, sharpen edges only
//! 4. **Brightness** - BT.601 grayscale of the enhanced frame
//! 5. **Mapping** - brightness to glyph, color to a 64-color palette
//!
//! Steps 1-4 live in [`FrameTransform`]; step 5 is [`GlyphMapper`].

mod buffers;
mod enhance;
mod gamma;
mod grayscale;
mod mapping;
mod ramp;
mod resize;
mod transform;

pub use buffers::{BrightnessMap, ProcessedFrame};
pub use enhance::{
    edge_mask, enhance, gaussian_blur, laplacian_magnitude, sharpen, DEFAULT_EDGE_THRESHOLD,
};
pub use gamma::{GammaTable, DEFAULT_GAMMA};
pub use grayscale::{luma, to_brightness_map, to_grayscale};
pub use mapping::{
    glyph_index, quantize_channel, GlyphCell, GlyphMap, GlyphMapper, QuantizedColor, COLOR_STEP,
    DEFAULT_VISIBILITY_THRESHOLD,
};
pub use ramp::{GlyphRamp, STANDARD_RAMP};
pub use resize::{grid_dimensions, resize_nearest, DEFAULT_CELL_ASPECT, DEFAULT_GRID_WIDTH};
pub use transform::{transform, FrameTransform, PipelineSettings};
