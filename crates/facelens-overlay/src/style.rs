//! Stylesheet shared by overlay and report markup.

/// Class applied to markers of matched faces and plain detections.
pub const MATCHED_CLASS: &str = "fl-matched";

/// Class applied to markers of faces below the similarity threshold.
pub const UNMATCHED_CLASS: &str = "fl-unmatched";

/// Offset of a label above its box, in pixels.
pub const LABEL_OFFSET_PX: u32 = 20;

pub fn marker_class(is_match: bool) -> &'static str {
    if is_match {
        MATCHED_CLASS
    } else {
        UNMATCHED_CLASS
    }
}

/// Overlay and report styles.
///
/// The label follows its box as a sibling so hovering the box can raise the
/// label to full opacity.
pub const STYLESHEET: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 960px; color: #0f172a; }
h1 { font-size: 1.125rem; font-weight: 700; }
.fl-card { border: 1px solid #e2e8f0; border-radius: 0.5rem; padding: 1.25rem; margin-top: 1.25rem; }
.fl-description { color: #64748b; font-size: 0.875rem; }
.fl-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 1.25rem; }
.fl-caption { font-size: 0.875rem; margin-bottom: 0.5rem; }
.fl-stage { position: relative; width: fit-content; height: fit-content; margin: 0 auto; }
.fl-image { display: block; max-height: calc(100dvh / 1.5); width: auto; pointer-events: none; }
.fl-face { position: absolute; inset: 0; pointer-events: none; }
.fl-box { position: absolute; border: 1px solid; pointer-events: auto; }
.fl-box.fl-matched { border-color: #4ade80; }
.fl-box.fl-unmatched { border-color: #ef4444; }
.fl-label { position: absolute; font-size: 0.75rem; border-radius: 9999px; background: #f1f5f9; padding: 0 0.25rem; opacity: 0.3; pointer-events: auto; }
.fl-label:hover, .fl-box:hover + .fl-label { opacity: 1; z-index: 10; }
.fl-dot { position: absolute; width: 2px; height: 2px; border-radius: 9999px; }
.fl-dot.fl-matched { background: #4ade80; }
.fl-dot.fl-unmatched { background: #ef4444; }
.fl-details { margin-top: 0.75rem; }
.fl-details summary { cursor: pointer; padding: 0.5rem 1rem; background: #f1f5f9; border-radius: 0.375rem; }
.fl-details table { width: 100%; border-collapse: collapse; font-size: 0.875rem; }
.fl-details th, .fl-details td { text-align: left; padding: 0.5rem; border-bottom: 1px solid #e2e8f0; }
.fl-emotions { border: 1px solid #e2e8f0; border-radius: 0.5rem; padding: 0.75rem; margin-top: 0.5rem; }
.fl-emotions li { display: flex; align-items: center; font-size: 0.875rem; list-style: none; }
.fl-emotions span { width: 6rem; flex-shrink: 0; }
.fl-emotions progress { flex-grow: 1; }
"#;
