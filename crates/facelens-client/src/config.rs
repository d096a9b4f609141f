//! Client configuration.

use std::time::Duration;

use facelens_models::{UploadPolicy, CLIENT_MAX_FILE_SIZE};

use crate::error::{ClientError, ClientResult};

/// Configuration for the transfer client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the gateway
    pub gateway_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Client-side size limit; may not exceed the gateway limit
    pub max_file_size: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(60),
            max_file_size: CLIENT_MAX_FILE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            gateway_url: std::env::var("FACELENS_GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            timeout: Duration::from_secs(
                std::env::var("FACELENS_CLIENT_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_file_size: std::env::var("FACELENS_MAX_FILE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(CLIENT_MAX_FILE_SIZE),
        }
    }

    /// Single-file upload policy for this configuration.
    pub fn policy(&self) -> ClientResult<UploadPolicy> {
        UploadPolicy::client_with_limit(self.max_file_size)
            .map_err(|e| ClientError::Config(e.to_string()))
    }

    /// URL of a gateway endpoint.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.gateway_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facelens_models::SERVER_MAX_FILE_SIZE;

    #[test]
    fn test_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.endpoint("detect"), "http://localhost:8000/detect");
        assert_eq!(config.policy().unwrap().max_file_size(), CLIENT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ClientConfig {
            gateway_url: "http://gateway:9000/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.endpoint("compare"), "http://gateway:9000/compare");
    }

    #[test]
    fn test_limit_above_gateway_rejected() {
        let config = ClientConfig {
            max_file_size: SERVER_MAX_FILE_SIZE + 1,
            ..Default::default()
        };
        assert!(matches!(config.policy(), Err(ClientError::Config(_))));
    }
}
