//! Aspect-correct grid sizing and nearest-neighbour resize.

use super::buffers::ProcessedFrame;
use crate::camera::Frame;

/// Default grid width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 150;

/// Glyph cells are taller than wide; scaling rows by this factor keeps the
/// rendered image at the source aspect ratio.
pub const DEFAULT_CELL_ASPECT: f32 = 0.55;

/// Calculate the cell grid for a source image.
///
/// The width is fixed; the height is
/// `round(width * src_height / src_width * cell_aspect)`, never below 1.
///
/// # Example
/// ```ignore
/// // 640x480 at 150 columns: round(150 * 0.75 * 0.55) = 62 rows
/// assert_eq!(grid_dimensions(640, 480, 150, 0.55), (150, 62));
/// ```
pub fn grid_dimensions(src_width: u32, src_height: u32, width: u16, cell_aspect: f32) -> (u16, u16) {
    if src_width == 0 || src_height == 0 || width == 0 {
        return (0, 0);
    }

    let aspect = src_height as f64 / src_width as f64;
    let height = (width as f64 * aspect * cell_aspect as f64).round();
    let height = height.clamp(1.0, u16::MAX as f64) as u16;

    (width, height)
}

/// Resize a frame to `width x height` cells with nearest-neighbour sampling.
///
/// Source pixel for output `(dx, dy)` is
/// `(floor(dx * src_w / width), floor(dy * src_h / height))`. The output is
/// always RGB ordered, whatever the source channel order.
pub fn resize_nearest(frame: &Frame, width: u16, height: u16) -> ProcessedFrame {
    if frame.is_empty() || width == 0 || height == 0 {
        return ProcessedFrame::new(0, 0);
    }

    let src_w = frame.width as u64;
    let src_h = frame.height as u64;
    let mut out = ProcessedFrame::new(width, height);

    // Column lookup is the same for every row
    let columns: Vec<usize> = (0..width as u64)
        .map(|dx| (dx * src_w / width as u64) as usize)
        .collect();

    for dy in 0..height {
        let sy = (dy as u64 * src_h / height as u64) as usize;
        let row = sy * frame.width as usize;
        for (dx, &sx) in columns.iter().enumerate() {
            out.set_rgb(dx as u16, dy, frame.rgb_at(row + sx));
        }
    }

    out
}
