//! Conversion from Rekognition SDK types into FaceLens models.

use aws_sdk_rekognition::operation::compare_faces::CompareFacesOutput;
use aws_sdk_rekognition::types as sdk;
use facelens_models::{
    AgeRange, BoundingBox, CompareFacesResult, ComparedFace, ComparedSourceImageFace, Emotion,
    FaceAttribute, FaceDetail, FaceMatch, Gender, Landmark, Pose, Quality,
};

// SDK releases differ on whether boolean attribute values are boxed.
trait IntoFlag {
    fn into_flag(self) -> Option<bool>;
}

impl IntoFlag for bool {
    fn into_flag(self) -> Option<bool> {
        Some(self)
    }
}

impl IntoFlag for Option<bool> {
    fn into_flag(self) -> Option<bool> {
        self
    }
}

trait SdkAttribute {
    fn to_attribute(&self) -> FaceAttribute;
}

macro_rules! impl_sdk_attribute {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SdkAttribute for $ty {
                fn to_attribute(&self) -> FaceAttribute {
                    FaceAttribute {
                        value: self.value().into_flag(),
                        confidence: self.confidence().map(f64::from),
                    }
                }
            }
        )*
    };
}

impl_sdk_attribute!(
    sdk::Smile,
    sdk::Eyeglasses,
    sdk::Sunglasses,
    sdk::Beard,
    sdk::Mustache,
    sdk::EyeOpen,
    sdk::MouthOpen,
    sdk::FaceOccluded,
);

fn attribute<T: SdkAttribute>(value: Option<&T>) -> Option<FaceAttribute> {
    value.map(SdkAttribute::to_attribute)
}

pub fn bounding_box(b: &sdk::BoundingBox) -> BoundingBox {
    BoundingBox {
        width: b.width().map(f64::from),
        height: b.height().map(f64::from),
        left: b.left().map(f64::from),
        top: b.top().map(f64::from),
    }
}

pub fn landmark(l: &sdk::Landmark) -> Landmark {
    Landmark {
        r#type: l.r#type().map(|t| t.as_str().to_string()),
        x: l.x().map(f64::from),
        y: l.y().map(f64::from),
    }
}

fn emotion(e: &sdk::Emotion) -> Emotion {
    Emotion {
        r#type: e.r#type().map(|t| t.as_str().to_string()),
        confidence: e.confidence().map(f64::from),
    }
}

fn pose(p: &sdk::Pose) -> Pose {
    Pose {
        roll: p.roll().map(f64::from),
        yaw: p.yaw().map(f64::from),
        pitch: p.pitch().map(f64::from),
    }
}

fn quality(q: &sdk::ImageQuality) -> Quality {
    Quality {
        brightness: q.brightness().map(f64::from),
        sharpness: q.sharpness().map(f64::from),
    }
}

/// Convert one detected face, keeping every attribute the service returned.
pub fn face_detail(face: &sdk::FaceDetail) -> FaceDetail {
    FaceDetail {
        confidence: face.confidence().map(f64::from),
        bounding_box: face.bounding_box().map(bounding_box),
        landmarks: face.landmarks().iter().map(landmark).collect(),
        age_range: face.age_range().map(|a| AgeRange {
            low: a.low(),
            high: a.high(),
        }),
        gender: face.gender().map(|g| Gender {
            value: g.value().map(|v| v.as_str().to_string()),
            confidence: g.confidence().map(f64::from),
        }),
        beard: attribute(face.beard()),
        mustache: attribute(face.mustache()),
        eyeglasses: attribute(face.eyeglasses()),
        sunglasses: attribute(face.sunglasses()),
        face_occluded: attribute(face.face_occluded()),
        eyes_open: attribute(face.eyes_open()),
        mouth_open: attribute(face.mouth_open()),
        smile: attribute(face.smile()),
        emotions: face.emotions().iter().map(emotion).collect(),
        pose: face.pose().map(pose),
        quality: face.quality().map(quality),
    }
}

fn compared_face(face: &sdk::ComparedFace) -> ComparedFace {
    ComparedFace {
        bounding_box: face.bounding_box().map(bounding_box),
        confidence: face.confidence().map(f64::from),
        landmarks: face.landmarks().iter().map(landmark).collect(),
        pose: face.pose().map(pose),
        quality: face.quality().map(quality),
        emotions: face.emotions().iter().map(emotion).collect(),
        smile: attribute(face.smile()),
    }
}

/// Convert a comparison response, dropping request metadata.
pub fn compare_result(output: &CompareFacesOutput) -> CompareFacesResult {
    CompareFacesResult {
        source_image_face: output
            .source_image_face()
            .map(|face| ComparedSourceImageFace {
                bounding_box: face.bounding_box().map(bounding_box),
                confidence: face.confidence().map(f64::from),
            }),
        face_matches: output
            .face_matches()
            .iter()
            .map(|m| FaceMatch {
                similarity: m.similarity().map(f64::from),
                face: m.face().map(compared_face),
            })
            .collect(),
        unmatched_faces: output.unmatched_faces().iter().map(compared_face).collect(),
        source_image_orientation_correction: output
            .source_image_orientation_correction()
            .map(|o| o.as_str().to_string()),
        target_image_orientation_correction: output
            .target_image_orientation_correction()
            .map(|o| o.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sdk_box(top: f32, left: f32, width: f32, height: f32) -> sdk::BoundingBox {
        sdk::BoundingBox::builder()
            .top(top)
            .left(left)
            .width(width)
            .height(height)
            .build()
    }

    #[test]
    fn test_face_detail_conversion() {
        let face = sdk::FaceDetail::builder()
            .confidence(99.5)
            .bounding_box(sdk_box(0.25, 0.5, 0.125, 0.375))
            .landmarks(
                sdk::Landmark::builder()
                    .r#type(sdk::LandmarkType::EyeLeft)
                    .x(0.25)
                    .y(0.5)
                    .build(),
            )
            .age_range(sdk::AgeRange::builder().low(25).high(35).build())
            .gender(
                sdk::Gender::builder()
                    .value(sdk::GenderType::Female)
                    .confidence(98.0)
                    .build(),
            )
            .smile(sdk::Smile::builder().value(true).confidence(90.0).build())
            .emotions(
                sdk::Emotion::builder()
                    .r#type(sdk::EmotionName::Happy)
                    .confidence(80.0)
                    .build(),
            )
            .build();

        let detail = face_detail(&face);
        assert_eq!(detail.confidence, Some(99.5));
        assert_eq!(
            detail.bounding_box,
            Some(BoundingBox::new(0.25, 0.5, 0.125, 0.375))
        );
        assert_eq!(detail.landmarks, vec![Landmark::new("eyeLeft", 0.25, 0.5)]);
        assert_eq!(detail.age_range, Some(AgeRange { low: Some(25), high: Some(35) }));
        assert_eq!(
            detail.gender.and_then(|g| g.value),
            Some("Female".to_string())
        );
        assert_eq!(detail.smile, Some(FaceAttribute::new(true, 90.0)));
        assert_eq!(detail.emotions[0].r#type.as_deref(), Some("HAPPY"));
        assert!(detail.beard.is_none());
    }

    #[test]
    fn test_compare_result_conversion() {
        let output = CompareFacesOutput::builder()
            .source_image_face(
                sdk::ComparedSourceImageFace::builder()
                    .bounding_box(sdk_box(0.5, 0.25, 0.25, 0.25))
                    .confidence(99.0)
                    .build(),
            )
            .face_matches(
                sdk::CompareFacesMatch::builder()
                    .similarity(97.5)
                    .face(
                        sdk::ComparedFace::builder()
                            .bounding_box(sdk_box(0.125, 0.125, 0.25, 0.25))
                            .build(),
                    )
                    .build(),
            )
            .unmatched_faces(
                sdk::ComparedFace::builder()
                    .bounding_box(sdk_box(0.75, 0.75, 0.125, 0.125))
                    .build(),
            )
            .build();

        let result = compare_result(&output);
        assert_eq!(
            result.source_image_face.and_then(|f| f.confidence),
            Some(99.0)
        );
        assert_eq!(result.face_matches.len(), 1);
        assert_eq!(result.face_matches[0].similarity, Some(97.5));
        assert_eq!(result.unmatched_faces.len(), 1);
        assert_eq!(
            result.unmatched_faces[0].bounding_box,
            Some(BoundingBox::new(0.75, 0.75, 0.125, 0.125))
        );
    }
}
