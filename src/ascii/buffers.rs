//! Cell-resolution buffers produced by the transform pipeline.

/// RGB buffer at cell resolution (one pixel per on-screen glyph).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedFrame {
    /// Width in cells
    pub width: u16,
    /// Height in cells
    pub height: u16,
    /// RGB triplets, row-major
    pub data: Vec<u8>,
}

impl ProcessedFrame {
    /// Create a black frame of the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }

    /// Create a frame filled with one color.
    pub fn filled(width: u16, height: u16, rgb: (u8, u8, u8)) -> Self {
        let mut frame = Self::new(width, height);
        for px in frame.data.chunks_exact_mut(3) {
            px.copy_from_slice(&[rgb.0, rgb.1, rgb.2]);
        }
        frame
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the frame has no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Color of the cell at (x, y).
    #[inline]
    pub fn rgb(&self, x: u16, y: u16) -> (u8, u8, u8) {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        (self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Overwrite the cell at (x, y).
    #[inline]
    pub fn set_rgb(&mut self, x: u16, y: u16, rgb: (u8, u8, u8)) {
        let i = (y as usize * self.width as usize + x as usize) * 3;
        self.data[i..i + 3].copy_from_slice(&[rgb.0, rgb.1, rgb.2]);
    }
}

/// Grayscale intensity per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrightnessMap {
    /// Width in cells
    pub width: u16,
    /// Height in cells
    pub height: u16,
    /// One byte per cell, row-major
    pub data: Vec<u8>,
}

impl BrightnessMap {
    /// Create a map with every cell set to `value`.
    pub fn filled(width: u16, height: u16, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Brightness of the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Overwrite the brightness of the cell at (x, y).
    #[inline]
    pub fn set(&mut self, x: u16, y: u16, value: u8) {
        self.data[y as usize * self.width as usize + x as usize] = value;
    }

    /// Dimensions as (width, height).
    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }
}
