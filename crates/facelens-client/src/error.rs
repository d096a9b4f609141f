//! Client error types.

use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Message shown for failures the user cannot fix by changing the input.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "An unexpected error occurred. Please try again later.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("An upload is already in progress")]
    Busy,

    #[error("No image selected")]
    MissingImage,

    #[error("Gateway rejected the upload ({kind}): {message}")]
    Rejected { kind: String, message: String },

    #[error("Gateway returned status {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid file: {0}")]
    InvalidFile(String),

    #[error("Invalid slot index: {0}")]
    InvalidSlot(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// The single notice shown to the user for this failure.
    ///
    /// Gateway validation errors carry a specific message; anything else is
    /// reported generically and only logged in detail.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { message, .. } => message.clone(),
            ClientError::Busy => "Please wait for the current upload to finish.".to_string(),
            ClientError::MissingImage => "Please select an image first.".to_string(),
            ClientError::InvalidFile(msg) => msg.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let rejected = ClientError::Rejected {
            kind: "ImageTooLargeException".to_string(),
            message: "too large".to_string(),
        };
        assert_eq!(rejected.user_message(), "too large");
        assert_eq!(ClientError::Status(500).user_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(
            ClientError::InvalidResponse("eof".to_string()).user_message(),
            GENERIC_FAILURE_MESSAGE
        );
    }
}
