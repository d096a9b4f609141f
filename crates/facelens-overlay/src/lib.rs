//! HTML overlay renderer for face detection results.
//!
//! Rendering is a pure function of its input: the same image and faces
//! always produce the same markup.

pub mod details;
mod html;
pub mod overlay;
pub mod report;
pub mod style;

pub use details::{detail_rows, emotion_bars, format_confidence, render_details, DetailRow, EmotionBar};
pub use overlay::{render_overlay, SourceImage};
pub use report::{render_comparison_report, render_detection_report};
