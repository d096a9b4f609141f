//! Per-face details table.

use std::fmt::Write;

use facelens_models::{person_label, FaceAttribute, FaceDetail};

use crate::html::{escape, number};

/// One `(item, value, confidence)` row of the details table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub item: &'static str,
    pub value: String,
    pub confidence: String,
}

impl DetailRow {
    fn new(item: &'static str, value: impl Into<String>, confidence: impl Into<String>) -> Self {
        Self {
            item,
            value: value.into(),
            confidence: confidence.into(),
        }
    }
}

/// One emotion with its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionBar {
    pub label: &'static str,
    pub confidence: f64,
}

/// Confidence floored to one decimal with a percent sign, `-` when absent.
pub fn format_confidence(confidence: Option<f64>) -> String {
    match confidence {
        Some(c) => format!("{}%", (c * 10.0).floor() / 10.0),
        None => "-".to_string(),
    }
}

fn flag_row(
    item: &'static str,
    attribute: Option<&FaceAttribute>,
    yes: &'static str,
    no: &'static str,
) -> DetailRow {
    let value = match attribute.and_then(|a| a.value) {
        Some(true) => yes,
        Some(false) => no,
        None => "-",
    };
    DetailRow::new(
        item,
        value,
        format_confidence(attribute.and_then(|a| a.confidence)),
    )
}

/// Table rows for one face, in display order.
pub fn detail_rows(face: &FaceDetail) -> Vec<DetailRow> {
    let age = face
        .age_range
        .map(|range| {
            let bound = |v: Option<i32>| v.map_or_else(|| "?".to_string(), |v| v.to_string());
            format!("{} ~ {}", bound(range.low), bound(range.high))
        })
        .unwrap_or_else(|| "? ~ ?".to_string());

    let gender = face.gender.as_ref();
    let gender_value = match gender.and_then(|g| g.value.as_deref()) {
        Some("Male") => "Male",
        Some(_) => "Female",
        None => "-",
    };

    vec![
        DetailRow::new("Face confidence", "-", format_confidence(face.confidence)),
        DetailRow::new("Age", age, "-"),
        DetailRow::new(
            "Gender",
            gender_value,
            format_confidence(gender.and_then(|g| g.confidence)),
        ),
        flag_row("Beard", face.beard.as_ref(), "Yes", "No"),
        flag_row("Mustache", face.mustache.as_ref(), "Yes", "No"),
        flag_row("Eyeglasses", face.eyeglasses.as_ref(), "Yes", "No"),
        flag_row("Sunglasses", face.sunglasses.as_ref(), "Yes", "No"),
        flag_row("Face occluded", face.face_occluded.as_ref(), "Yes", "No"),
        flag_row("Eyes open", face.eyes_open.as_ref(), "Yes", "No"),
        flag_row("Mouth open", face.mouth_open.as_ref(), "Yes", "No"),
        flag_row("Smiling", face.smile.as_ref(), "Yes", "No"),
    ]
}

fn emotion_label(name: Option<&str>) -> &'static str {
    match name {
        Some("HAPPY") => "Happy",
        Some("SAD") => "Sad",
        Some("ANGRY") => "Angry",
        Some("DISGUSTED") => "Disgusted",
        Some("CONFUSED") => "Confused",
        Some("SURPRISED") => "Surprised",
        Some("CALM") => "Calm",
        Some("FEAR") => "Fear",
        _ => "Unknown",
    }
}

/// Emotions of one face in service order.
pub fn emotion_bars(face: &FaceDetail) -> Vec<EmotionBar> {
    face.emotions
        .iter()
        .map(|e| EmotionBar {
            label: emotion_label(e.r#type.as_deref()),
            confidence: e.confidence.unwrap_or(0.0),
        })
        .collect()
}

/// Collapsible details section per face, labelled like the overlay.
pub fn render_details(faces: &[FaceDetail]) -> String {
    let mut out = String::new();
    for (index, face) in faces.iter().enumerate() {
        let _ = write!(
            out,
            r#"<details class="fl-details"><summary>{}</summary><table><thead><tr><th>Item</th><th>Value</th><th>Confidence</th></tr></thead><tbody>"#,
            person_label(index)
        );
        for row in detail_rows(face) {
            let _ = write!(
                out,
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                row.item,
                escape(&row.value),
                row.confidence
            );
        }
        out.push_str(r#"</tbody></table><div class="fl-emotions"><p><strong>Emotions</strong></p><ul>"#);
        for bar in emotion_bars(face) {
            let _ = write!(
                out,
                r#"<li><span>{}</span><progress max="100" value="{}"></progress></li>"#,
                bar.label,
                number(bar.confidence)
            );
        }
        out.push_str("</ul></div></details>");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use facelens_models::{AgeRange, Emotion, Gender};

    #[test]
    fn test_confidence_floored_to_one_decimal() {
        assert_eq!(format_confidence(Some(99.98)), "99.9%");
        assert_eq!(format_confidence(Some(97.0)), "97%");
        assert_eq!(format_confidence(None), "-");
    }

    #[test]
    fn test_rows_for_sparse_face() {
        let rows = detail_rows(&FaceDetail::default());
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0], DetailRow::new("Face confidence", "-", "-"));
        assert_eq!(rows[1].value, "? ~ ?");
        assert!(rows[2..].iter().all(|r| r.value == "-" && r.confidence == "-"));
    }

    #[test]
    fn test_rows_for_full_face() {
        let face = FaceDetail {
            confidence: Some(99.99),
            age_range: Some(AgeRange {
                low: Some(22),
                high: None,
            }),
            gender: Some(Gender {
                value: Some("Male".to_string()),
                confidence: Some(99.5),
            }),
            smile: Some(FaceAttribute::new(false, 88.25)),
            eyeglasses: Some(FaceAttribute::new(true, 95.0)),
            ..Default::default()
        };

        let rows = detail_rows(&face);
        assert_eq!(rows[0].confidence, "99.9%");
        assert_eq!(rows[1].value, "22 ~ ?");
        assert_eq!(rows[2], DetailRow::new("Gender", "Male", "99.5%"));
        assert_eq!(rows[5], DetailRow::new("Eyeglasses", "Yes", "95%"));
        assert_eq!(rows[10], DetailRow::new("Smiling", "No", "88.2%"));
    }

    #[test]
    fn test_emotion_labels() {
        let face = FaceDetail {
            emotions: vec![
                Emotion {
                    r#type: Some("CALM".to_string()),
                    confidence: Some(70.5),
                },
                Emotion {
                    r#type: Some("BORED".to_string()),
                    confidence: None,
                },
            ],
            ..Default::default()
        };

        let bars = emotion_bars(&face);
        assert_eq!(bars[0], EmotionBar { label: "Calm", confidence: 70.5 });
        assert_eq!(bars[1], EmotionBar { label: "Unknown", confidence: 0.0 });
    }

    #[test]
    fn test_render_details_sections() {
        let html = render_details(&[FaceDetail::default(), FaceDetail::default()]);
        assert_eq!(html.matches("<details").count(), 2);
        assert!(html.contains("<summary>Person001</summary>"));
        assert!(html.contains("<summary>Person002</summary>"));
    }
}
