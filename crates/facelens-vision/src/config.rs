//! Vision client configuration.

use std::time::Duration;

use crate::error::{VisionError, VisionResult};

/// Region the service is called in unless overridden at deploy time.
pub const DEFAULT_REGION: &str = "ap-northeast-1";

/// Configuration for the Rekognition client.
#[derive(Clone)]
pub struct VisionConfig {
    /// AWS region
    pub region: String,
    /// Access key ID; the default credential chain is used when unset
    pub access_key_id: Option<String>,
    /// Secret access key
    pub secret_access_key: Option<String>,
    /// Per-call timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id.as_ref().map(|_| "<redacted>"))
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            access_key_id: None,
            secret_access_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl VisionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> VisionResult<Self> {
        let access_key_id = non_empty_var("AWS_ACCESS_KEY_ID");
        let secret_access_key = non_empty_var("AWS_SECRET_ACCESS_KEY");

        if access_key_id.is_some() != secret_access_key.is_some() {
            return Err(VisionError::config_error(
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together",
            ));
        }

        Ok(Self {
            region: std::env::var("FACELENS_AWS_REGION")
                .unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            access_key_id,
            secret_access_key,
            timeout: Duration::from_secs(
                std::env::var("VISION_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        })
    }

    /// Whether static credentials were supplied.
    pub fn has_static_credentials(&self) -> bool {
        self.access_key_id.is_some() && self.secret_access_key.is_some()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = VisionConfig::default();
        assert_eq!(config.region, "ap-northeast-1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.has_static_credentials());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = VisionConfig {
            access_key_id: Some("AKIAEXAMPLE".to_string()),
            secret_access_key: Some("very-secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("AKIAEXAMPLE"));
        assert!(config.has_static_credentials());
    }
}
