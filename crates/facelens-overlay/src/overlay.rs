//! Image overlay rendering.

use std::fmt::Write;

use facelens_models::{to_overlay_geometry, OverlayFace, OverlayGeometry};
use serde::{Deserialize, Serialize};

use crate::html::{escape, number};
use crate::style::{marker_class, LABEL_OFFSET_PX};

/// The image faces are drawn on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImage {
    /// URL the browser loads the image from (object URL, data URI, ...)
    pub src: String,
    /// Natural width in pixels
    pub width: u32,
    /// Natural height in pixels
    pub height: u32,
}

impl SourceImage {
    pub fn new(src: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            src: src.into(),
            width,
            height,
        }
    }
}

/// Render `image` with a box, label and landmark dots per face.
///
/// Markers are positioned in percent of the image box, so the markup stays
/// valid when the browser scales the image down.
pub fn render_overlay(image: &SourceImage, faces: &[OverlayFace]) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<div class="fl-stage"><img class="fl-image" src="{}" alt="" width="{}" height="{}">"#,
        escape(&image.src),
        image.width,
        image.height
    );
    for geometry in to_overlay_geometry(faces) {
        write_face(&mut out, &geometry);
    }
    out.push_str("</div>");
    out
}

fn write_face(out: &mut String, face: &OverlayGeometry) {
    let class = marker_class(face.is_match);
    let b = &face.bounds;
    let top = number(b.top);
    let left = number(b.left);

    let _ = write!(
        out,
        r#"<div class="fl-face"><div class="fl-box {class}" style="top: {top}%; left: {left}%; width: {}%; height: {}%;"></div>"#,
        number(b.width),
        number(b.height),
    );
    let _ = write!(
        out,
        r#"<div class="fl-label" style="top: calc({top}% - {LABEL_OFFSET_PX}px); left: {left}%;">{}</div>"#,
        escape(&face.label),
    );
    for point in &face.points {
        let _ = write!(
            out,
            r#"<div class="fl-dot {class}" style="top: {}%; left: {}%;"></div>"#,
            number(point.y),
            number(point.x),
        );
    }
    out.push_str("</div>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use facelens_models::{BoundingBox, Landmark};

    fn image() -> SourceImage {
        SourceImage::new("blob:facelens/1", 640, 480)
    }

    #[test]
    fn test_no_faces_renders_image_only() {
        let html = render_overlay(&image(), &[]);
        assert!(html.contains(r#"src="blob:facelens/1""#));
        assert!(html.contains(r#"width="640" height="480""#));
        assert!(!html.contains("fl-box"));
        assert!(!html.contains("fl-dot"));
    }

    #[test]
    fn test_box_label_and_dots_positioned_in_percent() {
        let faces = vec![OverlayFace::matched(
            Some(BoundingBox::new(0.25, 0.1, 0.3, 0.4)),
            vec![Landmark::new("eyeLeft", 0.2, 0.35), Landmark::new("nose", 0.25, 0.4)],
        )];

        let html = render_overlay(&image(), &faces);
        assert!(html.contains(
            r#"class="fl-box fl-matched" style="top: 25%; left: 10%; width: 30%; height: 40%;""#
        ));
        assert!(html.contains(r#"style="top: calc(25% - 20px); left: 10%;">Person001<"#));
        assert!(html.contains(r#"class="fl-dot fl-matched" style="top: 35%; left: 20%;""#));
        assert_eq!(html.matches("fl-dot").count(), 2);
    }

    #[test]
    fn test_unmatched_style() {
        let faces = vec![
            OverlayFace::matched(Some(BoundingBox::new(0.1, 0.1, 0.1, 0.1)), vec![]),
            OverlayFace::unmatched(
                Some(BoundingBox::new(0.5, 0.5, 0.1, 0.1)),
                vec![Landmark::new("nose", 0.55, 0.55)],
            ),
        ];

        let html = render_overlay(&image(), &faces);
        assert!(html.contains("fl-box fl-matched"));
        assert!(html.contains("fl-box fl-unmatched"));
        assert!(html.contains("fl-dot fl-unmatched"));
        assert!(html.contains(">Person002<"));
    }

    #[test]
    fn test_missing_box_renders_at_origin() {
        let faces = vec![OverlayFace::matched(None, vec![])];
        let html = render_overlay(&image(), &faces);
        assert!(html.contains(r#"style="top: 0%; left: 0%; width: 0%; height: 0%;""#));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let faces = vec![OverlayFace::matched(
            Some(BoundingBox::new(0.33, 0.12, 0.2, 0.27)),
            vec![Landmark::new("mouthRight", 0.3, 0.5)],
        )];
        assert_eq!(
            render_overlay(&image(), &faces),
            render_overlay(&image(), &faces)
        );
    }

    #[test]
    fn test_image_src_is_escaped() {
        let html = render_overlay(&SourceImage::new(r#"x" onerror="alert(1)"#, 1, 1), &[]);
        assert!(!html.contains(r#"" onerror=""#));
    }
}
