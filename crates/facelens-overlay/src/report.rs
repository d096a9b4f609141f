//! Standalone HTML reports for detection and comparison results.

use std::fmt::Write;

use facelens_models::{
    comparison_source_faces, comparison_target_faces, detection_faces, person_label,
    CompareFacesResult, FaceDetail,
};

use crate::details::{format_confidence, render_details};
use crate::html::escape;
use crate::overlay::{render_overlay, SourceImage};
use crate::style::STYLESHEET;

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body>{}</body></html>\n",
        escape(title),
        STYLESHEET,
        body
    )
}

/// Report for a face detection: overlay plus details per face.
pub fn render_detection_report(file_name: &str, image: &SourceImage, faces: &[FaceDetail]) -> String {
    let mut body = String::new();
    body.push_str("<h1>Detect faces in an image</h1><section class=\"fl-card\"><h2>Detection results</h2>");
    let _ = write!(
        body,
        r#"<p class="fl-description">Showing the information detected in {}. {} face(s) found.</p>"#,
        escape(file_name),
        faces.len()
    );
    body.push_str(&render_overlay(image, &detection_faces(faces)));
    body.push_str(&render_details(faces));
    body.push_str("</section>");

    document("Face detection", &body)
}

/// Report for a face comparison: source face on the left, matched then
/// unmatched target faces on the right.
pub fn render_comparison_report(
    source: &SourceImage,
    target: &SourceImage,
    result: &CompareFacesResult,
) -> String {
    let mut body = String::new();
    body.push_str("<h1>Compare faces between images</h1><section class=\"fl-card\"><h2>Comparison results</h2>");
    body.push_str(r#"<p class="fl-description">Showing the result of comparing the source image with the target image.</p><div class="fl-grid">"#);

    body.push_str(r#"<div><p class="fl-caption">Source image</p>"#);
    body.push_str(&render_overlay(source, &comparison_source_faces(result)));
    body.push_str(r#"</div><div><p class="fl-caption">Target image</p>"#);
    body.push_str(&render_overlay(target, &comparison_target_faces(result)));
    body.push_str("</div></div>");

    if !result.face_matches.is_empty() {
        body.push_str(r#"<table class="fl-details"><thead><tr><th>Face</th><th>Similarity</th></tr></thead><tbody>"#);
        for (index, face_match) in result.face_matches.iter().enumerate() {
            let _ = write!(
                body,
                "<tr><td>{}</td><td>{}</td></tr>",
                person_label(index),
                format_confidence(face_match.similarity)
            );
        }
        body.push_str("</tbody></table>");
    }
    let _ = write!(
        body,
        r#"<p class="fl-description">{} matched, {} unmatched.</p></section>"#,
        result.face_matches.len(),
        result.unmatched_faces.len()
    );

    document("Face comparison", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use facelens_models::{BoundingBox, ComparedFace, ComparedSourceImageFace, FaceMatch};

    #[test]
    fn test_detection_report() {
        let image = SourceImage::new("data:image/png;base64,AAAA", 100, 50);
        let faces = vec![FaceDetail {
            bounding_box: Some(BoundingBox::new(0.1, 0.2, 0.3, 0.4)),
            ..Default::default()
        }];

        let html = render_detection_report("<me>.png", &image, &faces);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("&lt;me&gt;.png"));
        assert!(html.contains("1 face(s) found"));
        assert!(html.contains(">Person001<"));
        assert!(html.contains("<summary>Person001</summary>"));
    }

    #[test]
    fn test_comparison_report() {
        let result = CompareFacesResult {
            source_image_face: Some(ComparedSourceImageFace {
                bounding_box: Some(BoundingBox::new(0.1, 0.1, 0.5, 0.5)),
                confidence: Some(99.9),
            }),
            face_matches: vec![FaceMatch {
                similarity: Some(99.12),
                face: Some(ComparedFace {
                    bounding_box: Some(BoundingBox::new(0.2, 0.2, 0.2, 0.2)),
                    ..Default::default()
                }),
            }],
            unmatched_faces: vec![ComparedFace::default()],
            ..Default::default()
        };

        let html = render_comparison_report(
            &SourceImage::new("a", 10, 10),
            &SourceImage::new("b", 10, 10),
            &result,
        );
        assert_eq!(html.matches("fl-box fl-matched").count(), 2);
        assert_eq!(html.matches("fl-box fl-unmatched").count(), 1);
        assert!(html.contains("<td>99.1%</td>"));
        assert!(html.contains("1 matched, 1 unmatched."));
    }
}
