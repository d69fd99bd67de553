//! 基础错误处理

use thiserror::Error;

/// 流水线错误类型
#[derive(Error, Debug)]
pub enum SmartScopeError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("配置解析错误: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("V4L2错误: {0}")]
    Source(#[from] v4l2_source::CameraError),

    #[error("解码器错误: {0}")]
    Decoder(#[from] rockchip_mpp::MppError),

    #[error("色彩转换错误: {0}")]
    Converter(#[from] rockchip_rga::RgaError),

    #[error("采集线程错误: {0}")]
    Worker(String),

    #[error("未知错误: {0}")]
    Unknown(String),
}

/// 流水线结果类型
pub type Result<T> = std::result::Result<T, SmartScopeError>;
