//! Frame conversion and transformation utilities.

use nokhwa::pixel_format::RgbFormat;
use std::time::Instant;

use super::types::{Frame, FrameFormat};

/// Convert a nokhwa buffer to an RGB [`Frame`].
///
/// nokhwa decodes MJPEG, YUYV, NV12 and friends to RGB for us. Returns
/// `None` if the conversion fails (unsupported format or corrupt data).
pub fn convert_to_rgb(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let decoded = buffer.decode_image::<RgbFormat>().ok()?;
    let resolution = buffer.resolution();

    Some(Frame {
        data: decoded.into_raw(),
        width: resolution.width(),
        height: resolution.height(),
        format: FrameFormat::Rgb,
        timestamp: Instant::now(),
    })
}

/// Flip a frame left-right in place (selfie mode).
///
/// Reversing a row reverses the pixel order and the channel order within
/// each pixel; the second pass puts the channels back.
pub fn mirror_horizontal(frame: &mut Frame) {
    let bpp = frame.bytes_per_pixel();
    let row_len = frame.width as usize * bpp;
    if row_len == 0 {
        return;
    }
    for row in frame.data.chunks_exact_mut(row_len) {
        row.reverse();
        for pixel in row.chunks_exact_mut(bpp) {
            pixel.reverse();
        }
    }
}
