//! Error handling module
//!
//! This module provides error types and handling for the V4L2 camera source.

use thiserror::Error;

/// V4L2 source error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("V4L2 error: {0}")]
    V4L2Error(String),

    #[error("Invalid device path: {0}")]
    InvalidDevicePath(String),

    #[error("Pixel format not supported: {0}")]
    NotSupported(String),

    #[error("Device operation failed: {0}")]
    DeviceOperationFailed(String),
}

/// Result type for V4L2 source operations
pub type CameraResult<T> = Result<T, CameraError>;
