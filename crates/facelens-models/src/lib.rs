//! Shared data models for FaceLens.
//!
//! This crate provides:
//! - Serde types mirroring the vision service's face detection and
//!   face comparison payloads
//! - Upload validation shared by the client and the gateway
//! - Normalization of service results into overlay input
//! - Fraction-to-percentage geometry for overlay markers

pub mod face;
pub mod geometry;
pub mod normalize;
pub mod upload;

pub use face::{
    AgeRange, BoundingBox, CompareFacesResult, ComparedFace, ComparedSourceImageFace, Emotion,
    FaceAttribute, FaceDetail, FaceMatch, Gender, Landmark, Pose, Quality, SIMILARITY_THRESHOLD,
};
pub use geometry::{to_percent_box, to_percent_point, PercentBox, PercentPoint};
pub use normalize::{
    comparison_source_faces, comparison_target_faces, detection_faces, person_label,
    to_overlay_geometry, OverlayFace, OverlayGeometry,
};
pub use upload::{
    validate, UploadFile, UploadPolicy, UploadPolicyError, ValidationReport, ValidationVerdict,
    ACCEPTED_MIME_TYPES, CLIENT_MAX_FILE_SIZE, MIB, SERVER_MAX_FILE_SIZE,
};
