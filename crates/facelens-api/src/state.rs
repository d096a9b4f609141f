//! Application state.

use std::sync::Arc;

use facelens_vision::{FaceAnalyzer, RekognitionAnalyzer, VisionResult};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub analyzer: Arc<dyn FaceAnalyzer>,
}

impl AppState {
    /// Create state backed by Rekognition, configured from the environment.
    pub async fn new(config: ApiConfig) -> VisionResult<Self> {
        let analyzer = RekognitionAnalyzer::from_env().await?;
        Ok(Self::with_analyzer(config, Arc::new(analyzer)))
    }

    /// Create state around an existing analyzer.
    pub fn with_analyzer(config: ApiConfig, analyzer: Arc<dyn FaceAnalyzer>) -> Self {
        Self { config, analyzer }
    }
}
