//! Display pipeline: a GStreamer media graph rendering the camera preview
//! to a native window while feeding a downsampled BGRA stream to an
//! external detector, with a pad-probe overlay drawing the detector's
//! latest results back onto the displayed frames.

pub mod detection_store;
pub mod error;
pub mod font;
pub mod overlay;
pub mod pipeline;

pub use detection_store::{DetectionBox, DetectionSetStore, MAX_FACE_BOXES};
pub use error::{PlayerError, PlayerResult};
pub use pipeline::{FrameCallback, Player, PlayerConfig, PlayerStats, StreamFormat};

/// One-shot GStreamer library init. Safe to call more than once; only the
/// first call has effect (`gstreamer::init` is itself idempotent).
pub fn init() -> PlayerResult<()> {
    gstreamer::init().map_err(|e| PlayerError::Gst(e.to_string()))
}
