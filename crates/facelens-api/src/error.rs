//! API error types.
//!
//! Every failure maps to one of the public error kinds. Validation errors
//! carry a fixed message; anything else becomes `InternalServerError` with a
//! generic message, and the cause is only logged.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use facelens_vision::VisionError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unsupported image format: {0}")]
    InvalidImageFormat(String),

    #[error("Image too large: {0}")]
    ImageTooLarge(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Vision service error: {0}")]
    Vision(#[from] VisionError),
}

impl ApiError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Error type name returned to callers.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::InvalidParameter(_) => "InvalidParameterException",
            ApiError::InvalidImageFormat(_) => "InvalidImageFormatException",
            ApiError::ImageTooLarge(_) => "ImageTooLargeException",
            ApiError::RateLimited => "TooManyRequestsException",
            ApiError::Internal(_) | ApiError::Vision(_) => "InternalServerError",
        }
    }

    /// Message returned to callers.
    pub fn public_message(&self) -> &'static str {
        match self {
            ApiError::InvalidParameter(_) => {
                "An invalid parameter was specified. Please check the parameters."
            }
            ApiError::InvalidImageFormat(_) => {
                "The specified image format is not supported. Please use JPEG or PNG."
            }
            ApiError::ImageTooLarge(_) => {
                "The specified image file is too large. Please use a file of 5MB or less."
            }
            ApiError::RateLimited => "Rate limit exceeded. Please try again later.",
            ApiError::Internal(_) | ApiError::Vision(_) => {
                "An unexpected error occurred. Please try again later."
            }
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter(_)
            | ApiError::InvalidImageFormat(_)
            | ApiError::ImageTooLarge(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) | ApiError::Vision(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: &'static str,
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, kind = self.error_type(), "Upload rejected");
        }
        crate::metrics::record_error(self.error_type());

        let body = ErrorResponse {
            error: ErrorBody {
                kind: self.error_type(),
                message: self.public_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            ApiError::invalid_parameter("missing file").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::ImageTooLarge("6MB".into()).error_type(),
            "ImageTooLargeException"
        );
        let vision = ApiError::from(VisionError::Timeout(30));
        assert_eq!(vision.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(vision.error_type(), "InternalServerError");
        assert!(!vision.public_message().contains("30"));
        assert_eq!(
            ApiError::RateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
