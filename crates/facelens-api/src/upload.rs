//! Multipart upload parsing and validation.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use facelens_models::{UploadFile, UploadPolicy};
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// One file field from a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile for UploadedImage {
    fn mime_type(&self) -> &str {
        &self.content_type
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::ImageTooLarge(err.body_text())
    } else {
        ApiError::invalid_parameter(err.body_text())
    }
}

/// Named file fields of one request. The first occurrence of a field wins.
#[derive(Debug, Default)]
pub struct UploadForm {
    files: HashMap<String, UploadedImage>,
}

impl UploadForm {
    /// Read every field of `multipart`.
    pub async fn read(mut multipart: Multipart) -> ApiResult<Self> {
        let mut files = HashMap::new();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;

            debug!(field = %name, content_type = %content_type, size = bytes.len(), "Multipart field read");
            files.entry(name.clone()).or_insert(UploadedImage {
                field: name,
                file_name,
                content_type,
                bytes,
            });
        }

        Ok(Self { files })
    }

    /// Take a required file field.
    pub fn take(&mut self, name: &str) -> ApiResult<UploadedImage> {
        self.files
            .remove(name)
            .ok_or_else(|| ApiError::invalid_parameter(format!("missing field `{}`", name)))
    }
}

/// Check every image's type, then every image's size.
pub fn validate_images(policy: &UploadPolicy, images: &[&UploadedImage]) -> ApiResult<()> {
    if let Some(image) = images.iter().find(|i| !policy.accepts_mime(i.mime_type())) {
        return Err(ApiError::InvalidImageFormat(format!(
            "`{}` has type `{}`",
            image.field, image.content_type
        )));
    }

    if let Some(image) = images.iter().find(|i| i.size() > policy.max_file_size()) {
        return Err(ApiError::ImageTooLarge(format!(
            "`{}` is {} bytes",
            image.field,
            image.size()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use facelens_models::SERVER_MAX_FILE_SIZE;

    fn image(field: &str, content_type: &str, size: usize) -> UploadedImage {
        UploadedImage {
            field: field.to_string(),
            file_name: None,
            content_type: content_type.to_string(),
            bytes: Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn test_format_checked_before_size() {
        let policy = UploadPolicy::server();
        let big_png = image("source-file", "image/png", SERVER_MAX_FILE_SIZE as usize + 1);
        let gif = image("target-file", "image/gif", 10);

        let err = validate_images(&policy, &[&big_png, &gif]).unwrap_err();
        assert!(matches!(err, ApiError::InvalidImageFormat(_)));

        let err = validate_images(&policy, &[&big_png]).unwrap_err();
        assert!(matches!(err, ApiError::ImageTooLarge(_)));
    }

    #[test]
    fn test_limit_is_inclusive() {
        let policy = UploadPolicy::server();
        let exact = image("file", "image/jpeg", SERVER_MAX_FILE_SIZE as usize);
        assert!(validate_images(&policy, &[&exact]).is_ok());
    }

    #[test]
    fn test_missing_content_type_is_unsupported() {
        let policy = UploadPolicy::server();
        let untyped = image("file", "", 10);
        assert!(matches!(
            validate_images(&policy, &[&untyped]),
            Err(ApiError::InvalidImageFormat(_))
        ));
    }

    #[test]
    fn test_take_missing_field() {
        let mut form = UploadForm::default();
        assert!(matches!(form.take("file"), Err(ApiError::InvalidParameter(_))));
    }
}
