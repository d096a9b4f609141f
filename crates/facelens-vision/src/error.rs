//! Vision client error types.

use thiserror::Error;

/// Result type for vision service calls.
pub type VisionResult<T> = Result<T, VisionError>;

/// Errors that can occur while talking to the vision service.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Failed to configure vision client: {0}")]
    ConfigError(String),

    #[error("Vision service request failed: {0}")]
    RequestFailed(String),

    #[error("Vision service timed out after {0} seconds")]
    Timeout(u64),
}

impl VisionError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }
}
