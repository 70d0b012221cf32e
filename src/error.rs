use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    /// A required query parameter was absent or blank.
    #[error("{0}")]
    MissingParameter(String),
    /// The upstream payload was not in the expected shape.
    #[error("{0}")]
    Upstream(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }

    pub fn missing_parameter<T: Into<String>>(msg: T) -> Self {
        AppError::MissingParameter(msg.into())
    }

    pub fn upstream<T: Into<String>>(msg: T) -> Self {
        AppError::Upstream(msg.into())
    }

    /// True for failures raised before anything was sent upstream.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::MissingParameter(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Reqwest(_))
    }
}
