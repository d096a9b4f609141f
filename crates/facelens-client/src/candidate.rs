//! Files picked by the user.

use std::path::Path;
use std::sync::Arc;

use facelens_models::UploadFile;

use crate::error::{ClientError, ClientResult};

/// MIME type reported for files whose extension is not a known image type.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// A file selected for upload. Bytes are shared, so clones are cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadCandidate {
    name: String,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl UploadCandidate {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, deriving its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        Ok(Self::new(name, mime_type_for(path), bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Arc<[u8]> {
        &self.bytes
    }

    /// Pixel dimensions of the decoded image.
    pub fn dimensions(&self) -> ClientResult<(u32, u32)> {
        let image = image::load_from_memory(&self.bytes)
            .map_err(|e| ClientError::InvalidFile(format!("{}: {}", self.name, e)))?;
        Ok((image.width(), image.height()))
    }
}

impl UploadFile for UploadCandidate {
    fn mime_type(&self) -> &str {
        &self.mime_type
    }

    fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// MIME type for a path, from its extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME_TYPE)
}
