//! Face analysis client for the managed vision service.
//!
//! This crate provides:
//! - The [`FaceAnalyzer`] trait the gateway calls
//! - A Rekognition-backed implementation
//! - Conversion from SDK types into `facelens-models` types

pub mod analyzer;
pub mod client;
pub mod config;
pub mod convert;
pub mod error;

pub use analyzer::FaceAnalyzer;
pub use client::RekognitionAnalyzer;
pub use config::VisionConfig;
pub use error::{VisionError, VisionResult};
