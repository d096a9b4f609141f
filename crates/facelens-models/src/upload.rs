//! Upload validation.
//!
//! The same rules run twice: in the client before anything is sent, and in
//! the gateway, which is the only authority on acceptance. The client limit
//! is advisory and must never exceed the gateway limit, otherwise files the
//! client lets through would be refused by the gateway.

use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One mebibyte.
pub const MIB: u64 = 1024 * 1024;

/// Largest file the gateway forwards to the vision service (5 MiB).
pub const SERVER_MAX_FILE_SIZE: u64 = 5 * MIB;

/// Default client-side limit (4.5 MiB).
pub const CLIENT_MAX_FILE_SIZE: u64 = 9 * MIB / 2;

/// MIME types the vision service accepts.
pub const ACCEPTED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Anything that can be validated as an upload.
pub trait UploadFile {
    /// Declared MIME type (as sent by the browser or guessed from the file name).
    fn mime_type(&self) -> &str;
    /// Size in bytes.
    fn size(&self) -> u64;
}

impl<T: UploadFile + ?Sized> UploadFile for &T {
    fn mime_type(&self) -> &str {
        (**self).mime_type()
    }

    fn size(&self) -> u64 {
        (**self).size()
    }
}

/// Outcome of validating a file or a batch of files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ValidationVerdict {
    Accepted,
    RejectedUnsupportedType,
    RejectedTooLarge,
    RejectedMultiple,
}

impl ValidationVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationVerdict::Accepted)
    }

    /// User-facing message for this verdict under `policy`.
    pub fn message(&self, policy: &UploadPolicy) -> String {
        match self {
            ValidationVerdict::Accepted => "File accepted.".to_string(),
            ValidationVerdict::RejectedUnsupportedType => {
                "Please select a file in a supported format.".to_string()
            }
            ValidationVerdict::RejectedTooLarge => format!(
                "The file is too large. The maximum file size is {}.",
                format_mib(policy.max_file_size())
            ),
            ValidationVerdict::RejectedMultiple => {
                "Multiple files cannot be selected. Please select a single file.".to_string()
            }
        }
    }
}

impl fmt::Display for ValidationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationVerdict::Accepted => "accepted",
            ValidationVerdict::RejectedUnsupportedType => "rejected_unsupported_type",
            ValidationVerdict::RejectedTooLarge => "rejected_too_large",
            ValidationVerdict::RejectedMultiple => "rejected_multiple",
        };
        write!(f, "{}", s)
    }
}

/// Invalid policy configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadPolicyError {
    #[error("max file size must be greater than zero")]
    ZeroFileSize,

    #[error("client max file size {0} exceeds the 5 MiB gateway limit")]
    ExceedsServerLimit(u64),

    #[error("max files must be at least 1")]
    ZeroFiles,
}

/// Acceptance rules for a batch of uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UploadPolicy {
    accepted_mime_types: Vec<String>,
    max_files: usize,
    max_file_size: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::client()
    }
}

impl UploadPolicy {
    /// Client policy: single file, jpeg/png, 4.5 MiB.
    pub fn client() -> Self {
        Self {
            accepted_mime_types: ACCEPTED_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
            max_files: 1,
            max_file_size: CLIENT_MAX_FILE_SIZE,
        }
    }

    /// Gateway policy: jpeg/png, 5 MiB per file.
    pub fn server() -> Self {
        Self {
            max_file_size: SERVER_MAX_FILE_SIZE,
            ..Self::client()
        }
    }

    /// Client policy with a custom size limit, capped by the gateway limit.
    pub fn client_with_limit(max_file_size: u64) -> Result<Self, UploadPolicyError> {
        if max_file_size == 0 {
            return Err(UploadPolicyError::ZeroFileSize);
        }
        if max_file_size > SERVER_MAX_FILE_SIZE {
            return Err(UploadPolicyError::ExceedsServerLimit(max_file_size));
        }
        Ok(Self {
            max_file_size,
            ..Self::client()
        })
    }

    /// Allow up to `max_files` files per batch.
    pub fn with_max_files(mut self, max_files: usize) -> Result<Self, UploadPolicyError> {
        if max_files == 0 {
            return Err(UploadPolicyError::ZeroFiles);
        }
        self.max_files = max_files;
        Ok(self)
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    pub fn accepts_mime(&self, mime_type: &str) -> bool {
        self.accepted_mime_types.iter().any(|m| m == mime_type)
    }

    /// Check a single file. The MIME type is checked before the size.
    pub fn check(&self, file: &impl UploadFile) -> ValidationVerdict {
        if !self.accepts_mime(file.mime_type()) {
            ValidationVerdict::RejectedUnsupportedType
        } else if file.size() > self.max_file_size {
            ValidationVerdict::RejectedTooLarge
        } else {
            ValidationVerdict::Accepted
        }
    }

    /// File extensions matching the accepted MIME types, for upload hints.
    pub fn accepted_extensions(&self) -> Vec<&'static str> {
        self.accepted_mime_types
            .iter()
            .filter_map(|m| match m.as_str() {
                "image/jpeg" => Some(".jpg"),
                "image/png" => Some(".png"),
                _ => None,
            })
            .collect()
    }

    /// Short description of the policy shown next to the upload control.
    pub fn describe(&self) -> String {
        format!(
            "Supported file formats: {}\nMaximum file size: {}",
            self.accepted_extensions().join(", "),
            format_mib(self.max_file_size)
        )
    }
}

/// Accepted files plus every verdict that fired for the batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport<F> {
    pub accepted: Vec<F>,
    /// Sorted, without duplicates. `[Accepted]` when nothing was rejected.
    pub verdicts: Vec<ValidationVerdict>,
}

impl<F> ValidationReport<F> {
    /// Whether every file in the batch was accepted.
    pub fn is_clean(&self) -> bool {
        self.verdicts.iter().all(ValidationVerdict::is_accepted)
    }

    /// Rejection verdicts only.
    pub fn rejections(&self) -> impl Iterator<Item = ValidationVerdict> + '_ {
        self.verdicts.iter().copied().filter(|v| !v.is_accepted())
    }
}

/// Validate a batch of files against `policy`.
///
/// A batch larger than the policy allows is rejected as a whole. Otherwise
/// each file is filtered on its own and the accepted ones keep their order.
pub fn validate<F: UploadFile>(policy: &UploadPolicy, files: Vec<F>) -> ValidationReport<F> {
    if files.len() > policy.max_files {
        return ValidationReport {
            accepted: Vec::new(),
            verdicts: vec![ValidationVerdict::RejectedMultiple],
        };
    }

    let mut rejections = BTreeSet::new();
    let accepted = files
        .into_iter()
        .filter(|file| match policy.check(file) {
            ValidationVerdict::Accepted => true,
            verdict => {
                rejections.insert(verdict);
                false
            }
        })
        .collect();

    let verdicts = if rejections.is_empty() {
        vec![ValidationVerdict::Accepted]
    } else {
        rejections.into_iter().collect()
    };

    ValidationReport { accepted, verdicts }
}

fn format_mib(bytes: u64) -> String {
    let mib = bytes as f64 / MIB as f64;
    format!("{}MB", (mib * 10.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct TestFile {
        mime: &'static str,
        size: u64,
    }

    impl UploadFile for TestFile {
        fn mime_type(&self) -> &str {
            self.mime
        }

        fn size(&self) -> u64 {
            self.size
        }
    }

    fn file(mime: &'static str, size: u64) -> TestFile {
        TestFile { mime, size }
    }

    #[test]
    fn test_multiple_files_rejected_as_batch() {
        let policy = UploadPolicy::client();
        let report = validate(
            &policy,
            vec![file("image/png", 10), file("image/jpeg", 10)],
        );
        assert!(report.accepted.is_empty());
        assert_eq!(report.verdicts, vec![ValidationVerdict::RejectedMultiple]);
    }

    #[test]
    fn test_unsupported_type_dropped() {
        let policy = UploadPolicy::client();
        let report = validate(&policy, vec![file("image/gif", 10)]);
        assert!(report.accepted.is_empty());
        assert_eq!(
            report.verdicts,
            vec![ValidationVerdict::RejectedUnsupportedType]
        );
    }

    #[test]
    fn test_client_size_limit() {
        let policy = UploadPolicy::client();
        let at_limit = validate(&policy, vec![file("image/jpeg", CLIENT_MAX_FILE_SIZE)]);
        assert_eq!(at_limit.accepted.len(), 1);
        assert!(at_limit.is_clean());

        let over = validate(&policy, vec![file("image/jpeg", CLIENT_MAX_FILE_SIZE + 1)]);
        assert!(over.accepted.is_empty());
        assert_eq!(over.verdicts, vec![ValidationVerdict::RejectedTooLarge]);
    }

    #[test]
    fn test_server_size_limit() {
        let policy = UploadPolicy::server();
        assert_eq!(
            policy.check(&file("image/png", 5 * MIB)),
            ValidationVerdict::Accepted
        );
        assert_eq!(
            policy.check(&file("image/png", 6 * MIB)),
            ValidationVerdict::RejectedTooLarge
        );
    }

    #[test]
    fn test_both_flags_fire_in_one_batch() {
        let policy = UploadPolicy::client().with_max_files(3).unwrap();
        let report = validate(
            &policy,
            vec![
                file("image/png", 100),
                file("text/plain", 100),
                file("image/jpeg", 10 * MIB),
            ],
        );
        assert_eq!(report.accepted, vec![file("image/png", 100)]);
        assert_eq!(
            report.verdicts,
            vec![
                ValidationVerdict::RejectedUnsupportedType,
                ValidationVerdict::RejectedTooLarge,
            ]
        );
        assert_eq!(report.rejections().count(), 2);
    }

    #[test]
    fn test_mime_checked_before_size() {
        let policy = UploadPolicy::client();
        assert_eq!(
            policy.check(&file("image/webp", 100 * MIB)),
            ValidationVerdict::RejectedUnsupportedType
        );
    }

    #[test]
    fn test_client_limit_cannot_exceed_server_limit() {
        assert!(UploadPolicy::client_with_limit(SERVER_MAX_FILE_SIZE).is_ok());
        assert_eq!(
            UploadPolicy::client_with_limit(SERVER_MAX_FILE_SIZE + 1),
            Err(UploadPolicyError::ExceedsServerLimit(SERVER_MAX_FILE_SIZE + 1))
        );
        assert_eq!(
            UploadPolicy::client_with_limit(0),
            Err(UploadPolicyError::ZeroFileSize)
        );
        assert!(UploadPolicy::client().max_file_size() <= UploadPolicy::server().max_file_size());
    }

    #[test]
    fn test_policy_description() {
        let policy = UploadPolicy::client();
        assert_eq!(policy.accepted_extensions(), vec![".jpg", ".png"]);
        assert!(policy.describe().contains("4.5MB"));
        assert!(ValidationVerdict::RejectedTooLarge
            .message(&UploadPolicy::server())
            .contains("5MB"));
    }
}
