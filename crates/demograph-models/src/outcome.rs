//! Per-image analysis outcomes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What happened to a single image on its way through the pipeline.
///
/// The failure variants stay distinguishable internally (and in logs); they
/// collapse to a null [`Prediction`] only at the wire boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageOutcome {
    /// The URL answered with a non-200 status.
    FetchFailed { status: u16 },
    /// The request never completed (DNS, refused, reset, timeout).
    ConnectionFailed,
    /// The body was fetched but is not a decodable image.
    DecodeFailed,
    /// The analyzer ran but found no usable face.
    NoFace,
    /// The analyzer returned attributes.
    Detected { age: u32, gender: String },
}

impl ImageOutcome {
    /// True only when the analyzer returned a usable result.
    pub fn is_detected(&self) -> bool {
        matches!(self, ImageOutcome::Detected { .. })
    }
}

/// Caller-facing attributes for one image.
///
/// Every failure mode is presented as `{age: null, gender: null}`; the
/// response shape is identical whether the image could not be fetched,
/// could not be decoded, or contained no face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Prediction {
    pub age: Option<u32>,
    pub gender: Option<String>,
}

impl Prediction {
    /// The null prediction used for every failed image.
    pub fn null() -> Self {
        Self {
            age: None,
            gender: None,
        }
    }
}

impl From<&ImageOutcome> for Prediction {
    fn from(outcome: &ImageOutcome) -> Self {
        match outcome {
            ImageOutcome::Detected { age, gender } => Prediction {
                age: Some(*age),
                gender: Some(gender.clone()),
            },
            _ => Prediction::null(),
        }
    }
}

/// Detection rate as a percentage, rounded to two decimal places.
///
/// An empty batch reports 0.0.
pub fn detection_rate(detected: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = detected as f64 / total as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_flattens_to_populated_prediction() {
        let outcome = ImageOutcome::Detected {
            age: 30,
            gender: "Man".to_string(),
        };
        let prediction = Prediction::from(&outcome);
        assert_eq!(prediction.age, Some(30));
        assert_eq!(prediction.gender.as_deref(), Some("Man"));
    }

    #[test]
    fn test_failures_flatten_identically() {
        let outcomes = [
            ImageOutcome::FetchFailed { status: 404 },
            ImageOutcome::ConnectionFailed,
            ImageOutcome::DecodeFailed,
            ImageOutcome::NoFace,
        ];
        for outcome in &outcomes {
            assert_eq!(Prediction::from(outcome), Prediction::null());
        }
    }

    #[test]
    fn test_null_prediction_serializes_with_explicit_nulls() {
        let json = serde_json::to_string(&Prediction::null()).unwrap();
        assert_eq!(json, r#"{"age":null,"gender":null}"#);
    }

    #[test]
    fn test_detection_rate_rounding() {
        assert_eq!(detection_rate(3, 4), 75.0);
        assert_eq!(detection_rate(1, 3), 33.33);
        assert_eq!(detection_rate(2, 3), 66.67);
        assert_eq!(detection_rate(0, 0), 0.0);
        assert_eq!(detection_rate(5, 5), 100.0);
    }
}
