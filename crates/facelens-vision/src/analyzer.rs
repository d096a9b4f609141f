//! The face analysis seam used by the gateway.

use async_trait::async_trait;
use facelens_models::{CompareFacesResult, FaceDetail};

use crate::error::VisionResult;

/// A service that detects and compares faces in raw image bytes.
#[async_trait]
pub trait FaceAnalyzer: Send + Sync {
    /// Short name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Detect every face in `image`, with all attributes.
    async fn detect_faces(&self, image: Vec<u8>) -> VisionResult<Vec<FaceDetail>>;

    /// Compare the largest face in `source` with every face in `target`.
    ///
    /// Target faces at or above `similarity_threshold` are returned as
    /// matches, the rest as unmatched faces.
    async fn compare_faces(
        &self,
        source: Vec<u8>,
        target: Vec<u8>,
        similarity_threshold: f32,
    ) -> VisionResult<CompareFacesResult>;
}
