//! Analyzer request/response types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Attribute the analyzer is asked to predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Age,
    Gender,
}

impl Action {
    /// The fixed action set sent with every request.
    pub const ALL: &'static [Action] = &[Action::Age, Action::Gender];
}

/// Face-detector backend the analyzer should run.
///
/// One backend is chosen per deployment for its speed/accuracy balance;
/// it is a configuration surface, not a per-request knob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DetectorBackend {
    Opencv,
    Ssd,
    Dlib,
    /// Relatively fast with good accuracy.
    #[default]
    Mtcnn,
    /// Slower but more accurate.
    Retinaface,
    Mediapipe,
}

impl DetectorBackend {
    pub const ALL: &'static [DetectorBackend] = &[
        DetectorBackend::Opencv,
        DetectorBackend::Ssd,
        DetectorBackend::Dlib,
        DetectorBackend::Mtcnn,
        DetectorBackend::Retinaface,
        DetectorBackend::Mediapipe,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorBackend::Opencv => "opencv",
            DetectorBackend::Ssd => "ssd",
            DetectorBackend::Dlib => "dlib",
            DetectorBackend::Mtcnn => "mtcnn",
            DetectorBackend::Retinaface => "retinaface",
            DetectorBackend::Mediapipe => "mediapipe",
        }
    }
}

impl fmt::Display for DetectorBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DetectorBackend {
    type Err = DetectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "opencv" => Ok(DetectorBackend::Opencv),
            "ssd" => Ok(DetectorBackend::Ssd),
            "dlib" => Ok(DetectorBackend::Dlib),
            "mtcnn" => Ok(DetectorBackend::Mtcnn),
            "retinaface" => Ok(DetectorBackend::Retinaface),
            "mediapipe" => Ok(DetectorBackend::Mediapipe),
            _ => Err(DetectorParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown detector backend: {0}")]
pub struct DetectorParseError(String);

/// Request for one image analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64-encoded PNG of the decoded image.
    pub image: String,
    /// Attributes to predict.
    pub actions: Vec<Action>,
    /// Face detector to run.
    pub detector_backend: DetectorBackend,
}

/// Successful per-image analysis result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceAttributes {
    pub age: u32,
    pub gender: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_parse() {
        assert_eq!(
            "mtcnn".parse::<DetectorBackend>().unwrap(),
            DetectorBackend::Mtcnn
        );
        assert_eq!(
            "RetinaFace".parse::<DetectorBackend>().unwrap(),
            DetectorBackend::Retinaface
        );
        assert!("hog".parse::<DetectorBackend>().is_err());
    }

    #[test]
    fn test_actions_serialize_lowercase() {
        let json = serde_json::to_string(Action::ALL).unwrap();
        assert_eq!(json, r#"["age","gender"]"#);
    }
}
