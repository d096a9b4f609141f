//! Fraction-to-percentage geometry for overlay markers.
//!
//! The vision service reports positions as fractions (0.0-1.0) of the image
//! size. Scaling them by 100 gives CSS-style percentage offsets that stay
//! correct for any rendered size of the same image. Values are not clamped:
//! the service can report boxes that extend past the image edge and those
//! are drawn out of bounds rather than rejected.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::face::{BoundingBox, Landmark};

/// A box in percent of its container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PercentBox {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

/// A point in percent of its container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PercentPoint {
    pub x: f64,
    pub y: f64,
}

fn percent(fraction: Option<f64>) -> f64 {
    fraction.unwrap_or(0.0) * 100.0
}

/// Scale a bounding box to percentages. A missing box or axis counts as 0.
pub fn to_percent_box(bounding_box: Option<&BoundingBox>) -> PercentBox {
    let b = bounding_box.copied().unwrap_or_default();
    PercentBox {
        top: percent(b.top),
        left: percent(b.left),
        width: percent(b.width),
        height: percent(b.height),
    }
}

/// Scale a landmark to percentages. A missing axis counts as 0.
pub fn to_percent_point(landmark: &Landmark) -> PercentPoint {
    PercentPoint {
        x: percent(landmark.x),
        y: percent(landmark.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_box_scaled_to_percent() {
        let b = to_percent_box(Some(&BoundingBox::new(0.25, 0.1, 0.3, 0.4)));
        assert!(approx(b.top, 25.0));
        assert!(approx(b.left, 10.0));
        assert!(approx(b.width, 30.0));
        assert!(approx(b.height, 40.0));
    }

    #[test]
    fn test_missing_box_and_axes_are_zero() {
        assert_eq!(to_percent_box(None), PercentBox::default());

        let partial = BoundingBox {
            top: Some(0.5),
            ..Default::default()
        };
        let b = to_percent_box(Some(&partial));
        assert!(approx(b.top, 50.0));
        assert_eq!(b.left, 0.0);
        assert_eq!(b.width, 0.0);
        assert_eq!(b.height, 0.0);
    }

    #[test]
    fn test_out_of_range_values_are_not_clamped() {
        let b = to_percent_box(Some(&BoundingBox::new(-0.05, 0.9, 0.2, 1.2)));
        assert!(approx(b.top, -5.0));
        assert!(approx(b.left + b.width, 110.0));
        assert!(approx(b.height, 120.0));
    }

    #[test]
    fn test_point_scaled_to_percent() {
        let p = to_percent_point(&Landmark::new("nose", 0.42, 0.5));
        assert!(approx(p.x, 42.0));
        assert!(approx(p.y, 50.0));

        let p = to_percent_point(&Landmark {
            y: Some(0.1),
            ..Default::default()
        });
        assert_eq!(p.x, 0.0);
        assert!(approx(p.y, 10.0));
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let b = BoundingBox::new(0.123, 0.456, 0.0789, 0.321);
        assert_eq!(to_percent_box(Some(&b)), to_percent_box(Some(&b)));
    }
}
