//! Camera boundary
//!
//! The scanner owns its frame source exclusively for the lifetime of one
//! session; a new session must see the previous one's `release()` before
//! opening. Concrete backends (V4L2, a phone bridge, a test double) live
//! behind [`FrameSource`].

use async_trait::async_trait;
use thiserror::Error;

use super::frame::Frame;

/// Camera acquisition/capture failures
///
/// The four variants deliberately map to distinct operator-facing messages;
/// "camera broken" without saying how is not actionable at a check-in desk.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("Camera access was denied")]
    PermissionDenied,

    #[error("This device has no supported camera")]
    NotSupported,

    #[error("The camera is in use by another session")]
    Busy,

    #[error("No camera device found")]
    NotFound,
}

impl CameraError {
    /// Message shown on the station screen
    pub fn user_message(&self) -> &'static str {
        match self {
            CameraError::PermissionDenied => {
                "Camera access was denied. Grant camera permission and try again."
            }
            CameraError::NotSupported => "This device does not support camera capture.",
            CameraError::Busy => "The camera is busy. Close the other scanning session first.",
            CameraError::NotFound => "No camera was found on this device.",
        }
    }
}

/// Which way the requested camera faces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Rear,
    Front,
}

/// Desired capture geometry
#[derive(Debug, Clone)]
pub struct CameraRequest {
    pub facing: Facing,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CameraRequest {
    /// Rear-facing 1280x720, the geometry the code cards are printed for
    fn default() -> Self {
        Self {
            facing: Facing::Rear,
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

/// A live camera stream
#[async_trait]
pub trait FrameSource: Send {
    /// Acquire the device; fails with a specific [`CameraError`]
    async fn open(&mut self, request: &CameraRequest) -> Result<(), CameraError>;

    /// Grab the current frame
    async fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Stop the stream and free the device, synchronously
    fn release(&mut self);

    fn is_open(&self) -> bool;
}
