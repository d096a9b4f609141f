//! Normalization of service results into overlay input.
//!
//! Detection and comparison responses have different shapes; both are
//! reduced here to an ordered list of [`OverlayFace`]s, which the geometry
//! step turns into [`OverlayGeometry`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::face::{BoundingBox, CompareFacesResult, FaceDetail, Landmark};
use crate::geometry::{to_percent_box, to_percent_point, PercentBox, PercentPoint};

/// One face to draw on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverlayFace {
    pub bounding_box: Option<BoundingBox>,
    pub landmarks: Vec<Landmark>,
    /// Matched faces and plain detections are drawn in the "matched" style.
    pub is_match: bool,
}

impl OverlayFace {
    pub fn matched(bounding_box: Option<BoundingBox>, landmarks: Vec<Landmark>) -> Self {
        Self {
            bounding_box,
            landmarks,
            is_match: true,
        }
    }

    pub fn unmatched(bounding_box: Option<BoundingBox>, landmarks: Vec<Landmark>) -> Self {
        Self {
            bounding_box,
            landmarks,
            is_match: false,
        }
    }
}

/// Percentage geometry of one overlay face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverlayGeometry {
    pub label: String,
    pub is_match: bool,
    pub bounds: PercentBox,
    pub points: Vec<PercentPoint>,
}

/// Label for the face at `index` (0-based): `Person001`, `Person002`, ...
pub fn person_label(index: usize) -> String {
    format!("Person{:03}", index + 1)
}

/// Faces of a detection response, in response order.
pub fn detection_faces(details: &[FaceDetail]) -> Vec<OverlayFace> {
    details
        .iter()
        .map(|d| OverlayFace::matched(d.bounding_box, d.landmarks.clone()))
        .collect()
}

/// The source image face of a comparison (zero or one entry, no landmarks).
pub fn comparison_source_faces(result: &CompareFacesResult) -> Vec<OverlayFace> {
    result
        .source_image_face
        .iter()
        .map(|face| OverlayFace::matched(face.bounding_box, Vec::new()))
        .collect()
}

/// Target image faces of a comparison: matches first, then unmatched faces.
pub fn comparison_target_faces(result: &CompareFacesResult) -> Vec<OverlayFace> {
    let matched = result.face_matches.iter().map(|m| {
        let face = m.face.as_ref();
        OverlayFace::matched(
            face.and_then(|f| f.bounding_box),
            face.map(|f| f.landmarks.clone()).unwrap_or_default(),
        )
    });
    let unmatched = result
        .unmatched_faces
        .iter()
        .map(|f| OverlayFace::unmatched(f.bounding_box, f.landmarks.clone()));

    matched.chain(unmatched).collect()
}

/// Compute marker geometry for each face. Labels follow input order.
pub fn to_overlay_geometry(faces: &[OverlayFace]) -> Vec<OverlayGeometry> {
    faces
        .iter()
        .enumerate()
        .map(|(index, face)| OverlayGeometry {
            label: person_label(index),
            is_match: face.is_match,
            bounds: to_percent_box(face.bounding_box.as_ref()),
            points: face.landmarks.iter().map(to_percent_point).collect(),
        })
        .collect()
}
