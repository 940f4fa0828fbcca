//! Camera capture module.
//!
//! - Device enumeration via [`list_devices`]
//! - Background capture into a latest-frame slot via [`FrameSource`]
//! - Pluggable devices via [`CaptureDevice`]

mod capture;
mod capture_loop;
mod device;
mod frame_utils;
mod types;

pub use capture::FrameSource;
pub use capture_loop::CAPTURE_YIELD;
pub use device::{list_devices, CaptureDevice, WebcamDevice};
pub use frame_utils::mirror_horizontal;
pub use types::{CameraError, CameraInfo, CameraSettings, Frame, FrameFormat};
