use capture_core::{LogLevel, SmartScopeError};
use display_pipeline::PlayerError;

// =========================
// 错误码
// =========================

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Ok = 0,
    Error = -1,
    InitFailed = -2,
    InvalidParam = -3,
    DeviceNotFound = -4,
    DeviceBusy = -5,
    NotSupported = -6,
    PipelineFailed = -7,
    MppInitFailed = -8,
    V4l2InitFailed = -9,
    OutOfMemory = -10,
    DecodeFailed = -11,
    NotRunning = -12,
    NoDisplay = -13,
    WindowInvalid = -14,
}

impl From<&SmartScopeError> for ErrorCode {
    fn from(error: &SmartScopeError) -> Self {
        match error {
            SmartScopeError::Config(_) => ErrorCode::InvalidParam,
            SmartScopeError::TomlParse(_) => ErrorCode::InvalidParam,
            SmartScopeError::Io(_) => ErrorCode::Error,
            SmartScopeError::Source(e) => match e {
                v4l2_source::CameraError::DeviceNotFound(_) => ErrorCode::DeviceNotFound,
                v4l2_source::CameraError::PermissionDenied(_) => ErrorCode::DeviceBusy,
                v4l2_source::CameraError::NotSupported(_) => ErrorCode::NotSupported,
                _ => ErrorCode::V4l2InitFailed,
            },
            SmartScopeError::Decoder(_) => ErrorCode::MppInitFailed,
            SmartScopeError::Converter(_) => ErrorCode::DecodeFailed,
            SmartScopeError::Worker(_) => ErrorCode::NotRunning,
            SmartScopeError::Unknown(_) => ErrorCode::Error,
        }
    }
}

impl From<&PlayerError> for ErrorCode {
    fn from(error: &PlayerError) -> Self {
        match error {
            PlayerError::PipelineFailed(_) => ErrorCode::PipelineFailed,
            PlayerError::NoDisplay => ErrorCode::NoDisplay,
            PlayerError::WindowInvalid => ErrorCode::WindowInvalid,
            PlayerError::StateChange(_) => ErrorCode::PipelineFailed,
            PlayerError::Gst(_) => ErrorCode::InitFailed,
            PlayerError::UnsupportedFormat(_) => ErrorCode::NotSupported,
        }
    }
}

pub fn error_string(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::Ok => "success",
        ErrorCode::Error => "general error",
        ErrorCode::InitFailed => "initialization failed",
        ErrorCode::InvalidParam => "invalid parameter",
        ErrorCode::DeviceNotFound => "device not found",
        ErrorCode::DeviceBusy => "device busy",
        ErrorCode::NotSupported => "operation not supported",
        ErrorCode::PipelineFailed => "display pipeline failed",
        ErrorCode::MppInitFailed => "hardware decoder init failed",
        ErrorCode::V4l2InitFailed => "V4L2 init failed",
        ErrorCode::OutOfMemory => "out of memory",
        ErrorCode::DecodeFailed => "decode failed",
        ErrorCode::NotRunning => "capture worker not running",
        ErrorCode::NoDisplay => "no display window set",
        ErrorCode::WindowInvalid => "invalid window handle",
    }
}

// =========================
// 日志
// =========================

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CLogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<CLogLevel> for LogLevel {
    fn from(level: CLogLevel) -> Self {
        match level {
            CLogLevel::Trace => LogLevel::Trace,
            CLogLevel::Debug => LogLevel::Debug,
            CLogLevel::Info => LogLevel::Info,
            CLogLevel::Warn => LogLevel::Warn,
            CLogLevel::Error => LogLevel::Error,
        }
    }
}

// =========================
// 播放器流格式
// =========================

/// Mirrors `GST_PLAYER_FORMAT_*`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CStreamFormat {
    Mjpeg = 0,
    Yuy2 = 1,
    Nv12 = 2,
}

impl From<CStreamFormat> for display_pipeline::StreamFormat {
    fn from(format: CStreamFormat) -> Self {
        match format {
            CStreamFormat::Mjpeg => display_pipeline::StreamFormat::Mjpeg,
            CStreamFormat::Yuy2 => display_pipeline::StreamFormat::Yuy2,
            CStreamFormat::Nv12 => display_pipeline::StreamFormat::Nv12,
        }
    }
}

// =========================
// 帧 / 检测框 / 播放器统计
// =========================

#[repr(C)]
pub struct CFrame {
    pub data: *const u8,
    pub data_len: usize,
    pub width: u32,
    pub height: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct CDetectionBox {
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    pub score: f32,
}

impl From<CDetectionBox> for display_pipeline::DetectionBox {
    fn from(b: CDetectionBox) -> Self {
        display_pipeline::DetectionBox {
            center_x: b.center_x,
            center_y: b.center_y,
            width: b.width,
            height: b.height,
            score: b.score,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CPlayerStats {
    pub fps: f64,
    pub dropped_frames: u64,
}

impl From<display_pipeline::PlayerStats> for CPlayerStats {
    fn from(stats: display_pipeline::PlayerStats) -> Self {
        CPlayerStats { fps: stats.fps, dropped_frames: stats.dropped_frames }
    }
}
