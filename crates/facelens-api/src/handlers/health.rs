//! Health check handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub analyzer: String,
    pub max_file_size: u64,
    pub accepted_types: Vec<&'static str>,
}

/// Readiness check endpoint. The analyzer is built at startup, so a running
/// server is ready; the response describes what it accepts.
pub async fn ready(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let policy = facelens_models::UploadPolicy::server();
    Json(ReadinessResponse {
        status: "ready".to_string(),
        analyzer: state.analyzer.name().to_string(),
        max_file_size: policy.max_file_size(),
        accepted_types: facelens_models::ACCEPTED_MIME_TYPES.to_vec(),
    })
}
