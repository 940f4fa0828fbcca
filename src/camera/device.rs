//! Capture device abstraction and the nokhwa-backed webcam.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::query;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;

use super::frame_utils::convert_to_rgb;
use super::types::{CameraError, CameraInfo, Frame};

/// A source of raw frames that the capture loop reads from.
///
/// Devices are opened and used on the capture thread only, so they do not
/// need to be `Send`.
pub trait CaptureDevice {
    /// Read the next frame synchronously.
    ///
    /// `Ok(None)` means the device produced nothing usable this cycle (for
    /// example a frame that failed to decode) and the loop should try again.
    /// `Err` is terminal: the capture loop stops and never writes again.
    fn read_frame(&mut self) -> Result<Option<Frame>, CameraError>;

    /// Release the underlying device.
    fn release(&mut self);
}

/// List all available camera devices on the system.
///
/// If no cameras are found, returns an empty vector (not an error).
pub fn list_devices() -> Result<Vec<CameraInfo>, CameraError> {
    let devices = query(ApiBackend::Auto).map_err(|e| CameraError::QueryFailed(e.to_string()))?;

    Ok(devices
        .into_iter()
        .map(|d| CameraInfo {
            index: d.index().as_index().unwrap_or(0),
            name: d.human_name(),
            description: d.description().to_string(),
        })
        .collect())
}

/// Webcam opened through nokhwa.
pub struct WebcamDevice {
    camera: Camera,
    streaming: bool,
}

impl WebcamDevice {
    /// Open the camera at `device_index` and start its stream.
    pub fn open(device_index: u32) -> Result<Self, CameraError> {
        let index = CameraIndex::Index(device_index);
        let mut camera = open_camera_with_fallback(&index)?;

        camera
            .open_stream()
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        let res = camera.resolution();
        log::info!(
            "Camera {} streaming at {}x{} @ {} fps",
            device_index,
            res.width(),
            res.height(),
            camera.frame_rate()
        );

        Ok(Self {
            camera,
            streaming: true,
        })
    }
}

impl CaptureDevice for WebcamDevice {
    fn read_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        let raw = self
            .camera
            .frame()
            .map_err(|e| CameraError::ReadFailed(e.to_string()))?;
        // Undecodable frames are skipped, not fatal
        Ok(convert_to_rgb(&raw))
    }

    fn release(&mut self) {
        if self.streaming {
            self.streaming = false;
            if let Err(e) = self.camera.stop_stream() {
                log::warn!("Failed to stop camera stream: {}", e);
            }
        }
    }
}

impl Drop for WebcamDevice {
    fn drop(&mut self) {
        self.release();
    }
}

/// Try to open a camera with multiple format fallback strategies.
fn open_camera_with_fallback(index: &CameraIndex) -> Result<Camera, CameraError> {
    // 1. Closest to 640x480 MJPEG (widely supported)
    // 2. Closest to 640x480 NV12 (native on macOS)
    // 3. Whatever the camera offers at its highest resolution
    let format_attempts: Vec<RequestedFormat> = vec![
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            nokhwa::utils::Resolution::new(640, 480),
            NokhwaFrameFormat::MJPEG,
            30,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            nokhwa::utils::Resolution::new(640, 480),
            NokhwaFrameFormat::NV12,
            30,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;

    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                log::debug!("Camera format attempt failed: {}", e);
                last_error = Some(e);
            }
        }
    }

    let msg = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no format accepted".to_string());
    let lower = msg.to_lowercase();
    if lower.contains("permission")
        || lower.contains("denied")
        || lower.contains("authorization")
        || lower.contains("access")
    {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::OpenFailed(msg))
    }
}
