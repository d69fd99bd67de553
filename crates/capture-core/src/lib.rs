//! Capture Core - frame exchange and capture worker orchestration
//!
//! Ties the V4L2 source, hardware decoder, and color converter crates
//! together into a single capture thread publishing through a
//! double-buffered frame exchange, plus the ambient config/logging stack.

pub mod config;
pub mod error;
pub mod exchange;
pub mod logger;
pub mod worker;

pub use config::{ConfigWatcher, PipelineConfig, PixelFormat};
pub use error::{Result, SmartScopeError};
pub use exchange::FrameExchange;
pub use logger::{
    get_global_logger, init_global_logger, log_from_cpp, LogLevel, LogRotation, LoggerConfig,
    UnifiedLogger,
};
pub use worker::{CaptureWorker, FrameCallback};
