//! Camera types and data structures.

use std::fmt;
use std::time::Instant;

/// Information about an available camera device.
#[derive(Debug, Clone)]
pub struct CameraInfo {
    /// Device index for selection
    pub index: u32,
    /// Human-readable device name
    pub name: String,
    /// Device description
    pub description: String,
}

impl fmt::Display for CameraInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.description)
    }
}

/// Channel order of a captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// Blue, green, red (3 bytes per pixel)
    Bgr,
    /// Red, green, blue (3 bytes per pixel)
    Rgb,
}

/// A captured camera frame.
///
/// Frames are immutable once captured. The capture thread replaces the
/// shared slot with a new frame and readers only ever receive clones.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw pixel data, row-major, 3 bytes per pixel
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Channel order
    pub format: FrameFormat,
    /// Timestamp when frame was captured
    pub timestamp: Instant,
}

impl Frame {
    /// Build a frame filled with a single color, given as (r, g, b).
    pub fn solid(width: u32, height: u32, format: FrameFormat, rgb: (u8, u8, u8)) -> Self {
        let pixel = match format {
            FrameFormat::Bgr => [rgb.2, rgb.1, rgb.0],
            FrameFormat::Rgb => [rgb.0, rgb.1, rgb.2],
        };
        let data = pixel
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            data,
            width,
            height,
            format,
            timestamp: Instant::now(),
        }
    }

    /// Get the number of bytes per pixel.
    pub fn bytes_per_pixel(&self) -> usize {
        3
    }

    /// Number of pixels in the frame.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the frame holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0 || self.data.len() < self.pixel_count() * 3
    }

    /// Read pixel `idx` (row-major) as (r, g, b) regardless of channel order.
    #[inline]
    pub fn rgb_at(&self, idx: usize) -> (u8, u8, u8) {
        let p = &self.data[idx * 3..idx * 3 + 3];
        match self.format {
            FrameFormat::Bgr => (p[2], p[1], p[0]),
            FrameFormat::Rgb => (p[0], p[1], p[2]),
        }
    }
}

/// Settings for camera capture.
#[derive(Debug, Clone)]
pub struct CameraSettings {
    /// Camera device index
    pub device_index: u32,
    /// Mirror horizontally (selfie mode)
    pub mirror: bool,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device_index: 0,
            mirror: false,
        }
    }
}

/// Errors that can occur during camera operations.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    /// Failed to query camera devices
    #[error("Failed to query cameras: {0}")]
    QueryFailed(String),
    /// Failed to open camera
    #[error("Failed to open camera: {0}")]
    OpenFailed(String),
    /// Camera permission denied (macOS)
    #[error(
        "Camera permission denied. On macOS, grant access in System Settings > Privacy & Security > Camera"
    )]
    PermissionDenied,
    /// Camera device not found at specified index
    #[error("Camera device {0} not found. Run 'list-cameras' to see available devices")]
    DeviceNotFound(u32),
    /// Failed to start video stream
    #[error("Failed to start camera stream: {0}")]
    StreamFailed(String),
    /// A frame could not be read from the device
    #[error("Failed to read camera frame: {0}")]
    ReadFailed(String),
    /// Capture thread is already running
    #[error("Capture thread is already running")]
    AlreadyRunning,
}
