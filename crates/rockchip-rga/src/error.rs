use thiserror::Error;

#[derive(Error, Debug)]
pub enum RgaError {
    #[error("RGA operation failed with status: {0}")]
    RgaError(i32),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Operation not supported")]
    NotSupported,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type RgaResult<T> = Result<T, RgaError>;
