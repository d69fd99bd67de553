use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("pipeline construction failed: {0}")]
    PipelineFailed(String),
    #[error("no display window has been set")]
    NoDisplay,
    #[error("invalid window handle")]
    WindowInvalid,
    #[error("GStreamer state change failed: {0}")]
    StateChange(String),
    #[error("GStreamer error: {0}")]
    Gst(String),
    #[error("unsupported stream format: {0:?}")]
    UnsupportedFormat(crate::pipeline::StreamFormat),
}

pub type PlayerResult<T> = Result<T, PlayerError>;
