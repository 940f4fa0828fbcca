//! Background capture thread implementation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::device::CaptureDevice;
use super::frame_utils::mirror_horizontal;
use super::types::{CameraError, Frame};

/// Pause between device reads so the stop flag is observed promptly.
pub const CAPTURE_YIELD: Duration = Duration::from_millis(5);

/// Run the capture loop on the current (background) thread.
///
/// The device is opened here rather than on the caller's thread; the open
/// result is reported through `info_tx` before any frame is read. The loop
/// ends when `stop` is set or the device fails a read, and always releases
/// the device on the way out.
pub fn run_capture_loop<D, F>(
    open: F,
    mirror: bool,
    buffer: Arc<Mutex<Option<Frame>>>,
    stop: Arc<AtomicBool>,
    info_tx: Sender<Result<(), CameraError>>,
) where
    D: CaptureDevice,
    F: FnOnce() -> Result<D, CameraError>,
{
    let mut device = match open() {
        Ok(device) => device,
        Err(e) => {
            let _ = info_tx.send(Err(e));
            return;
        }
    };
    let _ = info_tx.send(Ok(()));

    let mut captured: u64 = 0;

    while !stop.load(Ordering::Relaxed) {
        match device.read_frame() {
            Ok(Some(mut frame)) => {
                if mirror {
                    mirror_horizontal(&mut frame);
                }

                // Lock only for the swap
                match buffer.lock() {
                    Ok(mut slot) => *slot = Some(frame),
                    Err(poisoned) => *poisoned.into_inner() = Some(frame),
                }
                captured += 1;
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("Capture stopped after {} frames: {}", captured, e);
                break;
            }
        }

        thread::sleep(CAPTURE_YIELD);
    }

    device.release();
    log::info!("Capture loop exited ({} frames captured)", captured);
}
