//! Face detection and comparison models.
//!
//! Field names follow the vision service's wire format (`BoundingBox`,
//! `Landmarks`, `Confidence`, ...) so gateway responses can be consumed by
//! anything that already understands that format.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minimum similarity (0-100) for a target face to count as a match.
pub const SIMILARITY_THRESHOLD: f32 = 80.0;

/// Axis-aligned face rectangle, each value a fraction of the image size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct BoundingBox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
}

impl BoundingBox {
    /// Create a fully specified box.
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            left: Some(left),
            top: Some(top),
        }
    }
}

/// A named point of interest on a face (eye, nose, mouth corner, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Landmark {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Landmark {
    pub fn new(kind: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            r#type: Some(kind.into()),
            x: Some(x),
            y: Some(y),
        }
    }
}

/// Estimated age range in years.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AgeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<i32>,
}

/// A boolean facial attribute (beard, smile, eyeglasses, ...) with its confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct FaceAttribute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl FaceAttribute {
    pub fn new(value: bool, confidence: f64) -> Self {
        Self {
            value: Some(value),
            confidence: Some(confidence),
        }
    }
}

/// Predicted gender. `value` is `Male` or `Female` as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Gender {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// One entry of the emotion distribution (`HAPPY`, `CALM`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Emotion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Head pose in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Pose {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
}

/// Image quality of the face region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Quality {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharpness: Option<f64>,
}

/// Everything the service reports about one detected face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct FaceDetail {
    /// Detection confidence (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,

    /// Landmarks in service order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub landmarks: Vec<Landmark>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<AgeRange>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beard: Option<FaceAttribute>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mustache: Option<FaceAttribute>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyeglasses: Option<FaceAttribute>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunglasses: Option<FaceAttribute>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_occluded: Option<FaceAttribute>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eyes_open: Option<FaceAttribute>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mouth_open: Option<FaceAttribute>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smile: Option<FaceAttribute>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<Emotion>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
}

/// The primary face found in the source image of a comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ComparedSourceImageFace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A face found in the target image of a comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ComparedFace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub landmarks: Vec<Landmark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pose: Option<Pose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<Quality>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emotions: Vec<Emotion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smile: Option<FaceAttribute>,
}

/// A target face whose similarity met the threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct FaceMatch {
    /// Similarity to the source face (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<ComparedFace>,
}

/// Result of comparing the largest source face against every target face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CompareFacesResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_image_face: Option<ComparedSourceImageFace>,

    /// Matches in service order
    #[serde(default)]
    pub face_matches: Vec<FaceMatch>,

    /// Target faces below the similarity threshold
    #[serde(default)]
    pub unmatched_faces: Vec<ComparedFace>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_image_orientation_correction: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_image_orientation_correction: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_detail_uses_service_field_names() {
        let face = FaceDetail {
            confidence: Some(99.5),
            bounding_box: Some(BoundingBox::new(0.25, 0.1, 0.3, 0.4)),
            landmarks: vec![Landmark::new("eyeLeft", 0.2, 0.3)],
            smile: Some(FaceAttribute::new(true, 91.0)),
            ..Default::default()
        };

        let json = serde_json::to_value(&face).unwrap();
        assert_eq!(json["Confidence"], 99.5);
        assert_eq!(json["BoundingBox"]["Top"], 0.25);
        assert_eq!(json["Landmarks"][0]["Type"], "eyeLeft");
        assert_eq!(json["Smile"]["Value"], true);
        assert!(json.get("AgeRange").is_none());
    }

    #[test]
    fn test_compare_result_parses_partial_payload() {
        let json = r#"{
            "SourceImageFace": {"BoundingBox": {"Top": 0.1, "Left": 0.2}, "Confidence": 99.9},
            "FaceMatches": [{"Similarity": 97.1, "Face": {"BoundingBox": {"Width": 0.3}}}]
        }"#;

        let result: CompareFacesResult = serde_json::from_str(json).unwrap();
        let source_box = result.source_image_face.unwrap().bounding_box.unwrap();
        assert_eq!(source_box.top, Some(0.1));
        assert_eq!(source_box.width, None);
        assert_eq!(result.face_matches[0].similarity, Some(97.1));
        assert!(result.unmatched_faces.is_empty());
    }

    #[test]
    fn test_empty_match_lists_are_serialized() {
        let json = serde_json::to_value(CompareFacesResult::default()).unwrap();
        assert_eq!(json["FaceMatches"], serde_json::json!([]));
        assert_eq!(json["UnmatchedFaces"], serde_json::json!([]));
    }
}
