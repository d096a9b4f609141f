//! Rekognition-backed face analyzer.

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_rekognition::config::{Builder, Region};
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Attribute, Image};
use aws_sdk_rekognition::Client;
use facelens_models::{CompareFacesResult, FaceDetail};
use tracing::{debug, info};

use crate::analyzer::FaceAnalyzer;
use crate::config::VisionConfig;
use crate::convert;
use crate::error::{VisionError, VisionResult};

/// Face analyzer calling AWS Rekognition.
#[derive(Clone)]
pub struct RekognitionAnalyzer {
    client: Client,
    timeout: Duration,
}

impl RekognitionAnalyzer {
    /// Create a new analyzer from configuration.
    ///
    /// Static credentials are used when configured, otherwise the default
    /// AWS credential chain.
    pub async fn new(config: VisionConfig) -> VisionResult<Self> {
        let region = Region::new(config.region.clone());

        let client = match (&config.access_key_id, &config.secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => {
                let credentials = Credentials::new(
                    access_key_id,
                    secret_access_key,
                    None,
                    None,
                    "facelens-env",
                );

                let sdk_config = Builder::new()
                    .behavior_version(BehaviorVersion::latest())
                    .region(region)
                    .credentials_provider(credentials)
                    .build();

                Client::from_conf(sdk_config)
            }
            (None, None) => {
                let shared = aws_config::defaults(BehaviorVersion::latest())
                    .region(region)
                    .load()
                    .await;
                Client::new(&shared)
            }
            _ => {
                return Err(VisionError::config_error(
                    "access key id and secret access key must be set together",
                ))
            }
        };

        info!(region = %config.region, "Rekognition client configured");

        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> VisionResult<Self> {
        Self::new(VisionConfig::from_env()?).await
    }

    async fn with_timeout<F, T, E>(&self, operation: &str, call: F) -> VisionResult<T>
    where
        F: Future<Output = Result<T, E>>,
        E: std::error::Error,
    {
        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| VisionError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| VisionError::request_failed(DisplayErrorContext(&e).to_string()))?;

        debug!(
            operation,
            duration_ms = start.elapsed().as_millis() as u64,
            "Rekognition call completed"
        );
        Ok(result)
    }
}

fn image(bytes: Vec<u8>) -> Image {
    Image::builder().bytes(Blob::new(bytes)).build()
}

#[async_trait]
impl FaceAnalyzer for RekognitionAnalyzer {
    fn name(&self) -> &'static str {
        "rekognition"
    }

    async fn detect_faces(&self, bytes: Vec<u8>) -> VisionResult<Vec<FaceDetail>> {
        let request = self
            .client
            .detect_faces()
            .image(image(bytes))
            .attributes(Attribute::All)
            .send();

        let output = self.with_timeout("detect_faces", request).await?;
        Ok(output.face_details().iter().map(convert::face_detail).collect())
    }

    async fn compare_faces(
        &self,
        source: Vec<u8>,
        target: Vec<u8>,
        similarity_threshold: f32,
    ) -> VisionResult<CompareFacesResult> {
        let request = self
            .client
            .compare_faces()
            .source_image(image(source))
            .target_image(image(target))
            .similarity_threshold(similarity_threshold)
            .send();

        let output = self.with_timeout("compare_faces", request).await?;
        Ok(convert::compare_result(&output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn static_config() -> VisionConfig {
        VisionConfig {
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            secret_access_key: Some("secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_static_credentials() {
        let analyzer = tokio_test::block_on(RekognitionAnalyzer::new(static_config())).unwrap();
        assert_eq!(analyzer.name(), "rekognition");
    }

    #[test]
    fn test_partial_credentials_rejected() {
        let config = VisionConfig {
            secret_access_key: None,
            ..static_config()
        };
        let result = tokio_test::block_on(RekognitionAnalyzer::new(config));
        assert!(matches!(result, Err(VisionError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let config = VisionConfig {
            timeout: Duration::from_millis(10),
            ..static_config()
        };
        let analyzer = RekognitionAnalyzer::new(config).await.unwrap();

        let result = analyzer
            .with_timeout("detect_faces", std::future::pending::<Result<(), std::io::Error>>())
            .await;
        assert!(matches!(result, Err(VisionError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_call_error_keeps_context() {
        let analyzer = RekognitionAnalyzer::new(static_config()).await.unwrap();
        let failing = async { Err::<(), _>(std::io::Error::other("connection reset")) };

        let err = analyzer.with_timeout("compare_faces", failing).await.unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
