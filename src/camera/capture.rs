//! Frame source handle and public API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Instant;

use super::capture_loop::run_capture_loop;
use super::device::{list_devices, CaptureDevice, WebcamDevice};
use super::types::{CameraError, CameraSettings, Frame};

/// Latest-frame mailbox fed by a background capture thread.
///
/// The capture thread replaces the slot's contents under a short-lived lock
/// and [`FrameSource::latest`] clones it out under the same lock. No lock
/// is held while a caller works on the returned frame, and only the newest
/// frame is ever kept: slow consumers silently skip frames.
pub struct FrameSource {
    /// Latest captured frame (shared with capture thread)
    frame_buffer: Arc<Mutex<Option<Frame>>>,
    /// Capture thread handle
    capture_thread: Option<JoinHandle<()>>,
    /// Signal to stop capture thread
    stop_signal: Arc<AtomicBool>,
    /// Current settings
    settings: CameraSettings,
}

impl std::fmt::Debug for FrameSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameSource")
            .field("settings", &self.settings)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl FrameSource {
    /// Create a frame source for the given settings.
    ///
    /// Nothing is opened until `start()` is called.
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            frame_buffer: Arc::new(Mutex::new(None)),
            capture_thread: None,
            stop_signal: Arc::new(AtomicBool::new(false)),
            settings,
        }
    }

    /// Create a frame source for a webcam, checking that the device exists.
    ///
    /// # Errors
    /// * `CameraError::DeviceNotFound` - If the device index doesn't exist
    /// * `CameraError::QueryFailed` - If the camera backend cannot be queried
    pub fn open(settings: CameraSettings) -> Result<Self, CameraError> {
        let devices = list_devices()?;
        if !devices.iter().any(|d| d.index == settings.device_index) {
            return Err(CameraError::DeviceNotFound(settings.device_index));
        }
        Ok(Self::new(settings))
    }

    /// Start capturing from the configured webcam.
    ///
    /// # Errors
    /// * `CameraError::AlreadyRunning` - If capture is already running
    /// * `CameraError::StreamFailed` - If the camera stream fails to start
    /// * `CameraError::PermissionDenied` - If camera access is denied (macOS)
    /// * `CameraError::OpenFailed` - If camera fails to open for other reasons
    pub fn start(&mut self) -> Result<(), CameraError> {
        let index = self.settings.device_index;
        self.start_with(move || WebcamDevice::open(index))
    }

    /// Start capturing from any device produced by `open`.
    ///
    /// `open` runs on the capture thread. This call blocks until the device
    /// has been opened (or failed to open).
    pub fn start_with<D, F>(&mut self, open: F) -> Result<(), CameraError>
    where
        D: CaptureDevice,
        F: FnOnce() -> Result<D, CameraError> + Send + 'static,
    {
        if self.is_running() {
            return Err(CameraError::AlreadyRunning);
        }
        // Reap a thread that ended on its own (device failure)
        if let Some(h) = self.capture_thread.take() {
            let _ = h.join();
        }

        self.stop_signal.store(false, Ordering::SeqCst);

        let buffer = Arc::clone(&self.frame_buffer);
        let stop = Arc::clone(&self.stop_signal);
        let mirror = self.settings.mirror;
        let (info_tx, info_rx) = mpsc::channel::<Result<(), CameraError>>();

        let handle = std::thread::Builder::new()
            .name("frame-capture".to_string())
            .spawn(move || run_capture_loop(open, mirror, buffer, stop, info_tx))
            .map_err(|e| CameraError::StreamFailed(e.to_string()))?;

        self.capture_thread = Some(handle);

        match info_rx.recv() {
            Ok(Ok(())) => {
                log::info!("Frame capture started");
                Ok(())
            }
            Ok(Err(e)) => {
                self.join_thread();
                Err(e)
            }
            Err(_) => {
                self.join_thread();
                Err(CameraError::StreamFailed(
                    "Capture thread terminated unexpectedly".to_string(),
                ))
            }
        }
    }

    /// Stop the capture thread and release the device.
    ///
    /// Safe to call more than once. The last captured frame stays readable.
    pub fn stop(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        self.join_thread();
    }

    /// Get an owned copy of the latest captured frame.
    ///
    /// Returns `None` if no frame has been captured yet.
    pub fn latest(&self) -> Option<Frame> {
        match self.frame_buffer.lock() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Capture time of the latest frame, without copying its pixels.
    pub fn latest_timestamp(&self) -> Option<Instant> {
        match self.frame_buffer.lock() {
            Ok(slot) => slot.as_ref().map(|f| f.timestamp),
            Err(poisoned) => poisoned.into_inner().as_ref().map(|f| f.timestamp),
        }
    }

    /// Check if the capture thread is currently running.
    pub fn is_running(&self) -> bool {
        self.capture_thread
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    fn join_thread(&mut self) {
        if let Some(handle) = self.capture_thread.take() {
            if handle.join().is_err() {
                log::error!("Capture thread panicked");
            }
        }
    }
}

impl Drop for FrameSource {
    fn drop(&mut self) {
        self.stop();
    }
}
