//! V4L2 capture source for the camera pipeline.
//!
//! This crate is the kernel-facing edge of the pipeline: open a single
//! V4L2 device, negotiate MJPEG at a requested resolution/rate, and hand
//! the capture worker a dequeue/requeue contract over a small pool of
//! local buffer slots. See [`source::V4l2Source`].

pub mod error;
pub mod source;

pub use error::{CameraError, CameraResult};
pub use source::{DequeueOutcome, V4l2Source, V4L2_BUFFER_COUNT};
