//! Upload client for the FaceLens gateway.
//!
//! This crate provides:
//! - Upload candidates read from disk, validated before sending
//! - A multipart transfer client with a single in-flight upload
//! - Image slots that own the object URL of each selected image
//! - Detection and comparison workflows that produce HTML reports

pub mod candidate;
pub mod config;
pub mod error;
pub mod slots;
pub mod transfer;
pub mod upload_state;
pub mod workflow;

pub use candidate::UploadCandidate;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use slots::{BlobStore, ImageSlot, ObjectUrl, SlotSet};
pub use transfer::TransferClient;
pub use upload_state::{UploadGate, UploadPermit, UploadState};
pub use workflow::{ComparisonWorkflow, DetectionWorkflow, SOURCE_SLOT, TARGET_SLOT};

#[cfg(test)]
pub(crate) fn test_png(width: u32, height: u32) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    image::RgbImage::new(width, height)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
