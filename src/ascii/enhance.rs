//! Edge-aware sharpening for crisper glyph contours.
//!
//! The resized frame is blurred to suppress sensor noise, edges are found
//! with a Laplacian on the blurred grayscale, and only edge pixels are
//! replaced with a sharpened value. Smooth regions keep the blurred base.
//!
//! All 3x3 kernels sample borders with reflect-101 (`dcb|abcd|cba`).

use super::buffers::ProcessedFrame;
use super::grayscale::to_grayscale;

/// Laplacian magnitude above which a pixel counts as an edge.
pub const DEFAULT_EDGE_THRESHOLD: u8 = 20;

/// Gaussian 3x3 kernel (outer product of 1-2-1), weights sum to 16.
#[rustfmt::skip]
const GAUSSIAN_3X3: [[u32; 3]; 3] = [
    [1, 2, 1],
    [2, 4, 2],
    [1, 2, 1],
];

/// Reflect-101 border index for a 1-pixel reach.
#[inline]
fn reflect_101(i: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let last = n as isize - 1;
    let i = if i < 0 { -i } else { i };
    let i = if i > last { 2 * last - i } else { i };
    i as usize
}

/// Blur every channel with the 3x3 Gaussian kernel.
pub fn gaussian_blur(frame: &ProcessedFrame) -> ProcessedFrame {
    let w = frame.width as usize;
    let h = frame.height as usize;
    let mut out = ProcessedFrame::new(frame.width, frame.height);

    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u32; 3];
            for (ky, row) in GAUSSIAN_3X3.iter().enumerate() {
                let sy = reflect_101(y as isize + ky as isize - 1, h);
                for (kx, &weight) in row.iter().enumerate() {
                    let sx = reflect_101(x as isize + kx as isize - 1, w);
                    let i = (sy * w + sx) * 3;
                    for c in 0..3 {
                        acc[c] += frame.data[i + c] as u32 * weight;
                    }
                }
            }
            let o = (y * w + x) * 3;
            for c in 0..3 {
                out.data[o + c] = ((acc[c] + 8) >> 4) as u8;
            }
        }
    }

    out
}

/// Absolute 4-neighbour Laplacian of a grayscale image, saturated to 255.
///
/// ```text
/// [0  1  0]
/// [1 -4  1]
/// [0  1  0]
/// ```
pub fn laplacian_magnitude(gray: &[u8], width: u16, height: u16) -> Vec<u8> {
    let w = width as usize;
    let h = height as usize;
    let mut out = vec![0u8; w * h];

    for y in 0..h {
        let up = reflect_101(y as isize - 1, h);
        let down = reflect_101(y as isize + 1, h);
        for x in 0..w {
            let left = reflect_101(x as isize - 1, w);
            let right = reflect_101(x as isize + 1, w);
            let sum = gray[up * w + x] as i32
                + gray[down * w + x] as i32
                + gray[y * w + left] as i32
                + gray[y * w + right] as i32
                - 4 * gray[y * w + x] as i32;
            out[y * w + x] = sum.unsigned_abs().min(255) as u8;
        }
    }

    out
}

/// Binary edge mask: `true` where the Laplacian magnitude exceeds `threshold`.
pub fn edge_mask(blurred: &ProcessedFrame, threshold: u8) -> Vec<bool> {
    let gray = to_grayscale(&blurred.data);
    laplacian_magnitude(&gray, blurred.width, blurred.height)
        .into_iter()
        .map(|m| m > threshold)
        .collect()
}

/// Sharpen a single pixel: center 5, four neighbours -1, corners 0.
fn sharpen_pixel(frame: &ProcessedFrame, x: usize, y: usize) -> [u8; 3] {
    let w = frame.width as usize;
    let h = frame.height as usize;
    let up = reflect_101(y as isize - 1, h);
    let down = reflect_101(y as isize + 1, h);
    let left = reflect_101(x as isize - 1, w);
    let right = reflect_101(x as isize + 1, w);

    let at = |px: usize, py: usize, c: usize| frame.data[(py * w + px) * 3 + c] as i32;

    let mut out = [0u8; 3];
    for (c, slot) in out.iter_mut().enumerate() {
        let v = 5 * at(x, y, c) - at(x, up, c) - at(x, down, c) - at(left, y, c) - at(right, y, c);
        *slot = v.clamp(0, 255) as u8;
    }
    out
}

/// Apply the sharpening kernel to every pixel.
pub fn sharpen(frame: &ProcessedFrame) -> ProcessedFrame {
    let mut out = ProcessedFrame::new(frame.width, frame.height);
    let w = frame.width as usize;
    for y in 0..frame.height as usize {
        for x in 0..w {
            let o = (y * w + x) * 3;
            out.data[o..o + 3].copy_from_slice(&sharpen_pixel(frame, x, y));
        }
    }
    out
}

/// Blur, detect edges, and sharpen only the edge pixels.
pub fn enhance(frame: &ProcessedFrame, edge_threshold: u8) -> ProcessedFrame {
    if frame.is_empty() {
        return frame.clone();
    }

    let blurred = gaussian_blur(frame);
    let mask = edge_mask(&blurred, edge_threshold);

    let mut out = blurred.clone();
    let w = frame.width as usize;
    for (i, &edge) in mask.iter().enumerate() {
        if !edge {
            continue;
        }
        let (x, y) = (i % w, i / w);
        out.data[i * 3..i * 3 + 3].copy_from_slice(&sharpen_pixel(&blurred, x, y));
    }

    out
}
