//! Camera capture module for webcam access and frame capture.

mod capture;
mod capture_loop;
mod device;
mod frame_utils;
mod types;

pub use capture::CameraCapture;
pub use device::list_devices;
pub use frame_utils::{convert_to_rgb, mirror_horizontal};
pub use types::{CameraError, CameraInfo, CameraSettings, Frame, Resolution};
