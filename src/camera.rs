/// Errors raised by a camera collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,
    #[error("No camera device available")]
    NoDevice,
    #[error("Frame capture failed: {0}")]
    Capture(String),
}

impl CameraError {
    /// Permission or device problems that close the camera UI without retry
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CameraError::PermissionDenied | CameraError::NoDevice)
    }
}

/// Source of captured frames, encoded in any format the `image` crate reads
pub trait CameraSource {
    fn capture_frame(&mut self) -> Result<Vec<u8>, CameraError>;
}
