//! Face detection and comparison handlers.

use std::time::Instant;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::Json;
use facelens_models::{CompareFacesResult, FaceDetail, UploadPolicy, SIMILARITY_THRESHOLD};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;
use crate::upload::{validate_images, UploadForm};

async fn read_form(multipart: Result<Multipart, MultipartRejection>) -> ApiResult<UploadForm> {
    let multipart = multipart.map_err(|e| ApiError::invalid_parameter(e.body_text()))?;
    UploadForm::read(multipart).await
}

/// `POST /detect`: faces in the `file` image, with all attributes.
pub async fn detect_faces(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Vec<FaceDetail>>> {
    let mut form = read_form(multipart).await?;
    let file = form.take("file")?;
    validate_images(&UploadPolicy::server(), &[&file])?;

    let start = Instant::now();
    let result = state.analyzer.detect_faces(file.bytes.to_vec()).await;
    metrics::record_analyzer_call("detect_faces", result.is_ok(), start.elapsed().as_secs_f64());
    let faces = result?;

    info!(
        analyzer = state.analyzer.name(),
        size = file.bytes.len(),
        faces = faces.len(),
        "Faces detected"
    );
    Ok(Json(faces))
}

/// `POST /compare`: the largest face of `source-file` against the faces of
/// `target-file`.
pub async fn compare_faces(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<CompareFacesResult>> {
    let mut form = read_form(multipart).await?;
    let source = form.take("source-file")?;
    let target = form.take("target-file")?;
    validate_images(&UploadPolicy::server(), &[&source, &target])?;

    let start = Instant::now();
    let result = state
        .analyzer
        .compare_faces(source.bytes.to_vec(), target.bytes.to_vec(), SIMILARITY_THRESHOLD)
        .await;
    metrics::record_analyzer_call("compare_faces", result.is_ok(), start.elapsed().as_secs_f64());
    let comparison = result?;

    info!(
        analyzer = state.analyzer.name(),
        matched = comparison.face_matches.len(),
        unmatched = comparison.unmatched_faces.len(),
        "Faces compared"
    );
    Ok(Json(comparison))
}
