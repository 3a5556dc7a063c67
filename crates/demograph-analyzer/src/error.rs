//! Analyzer client error types.

use thiserror::Error;

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The service ran but found no usable face in the image.
    #[error("No face detected")]
    NoFace,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Image encode failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyzerError {
    /// Whether a retry could plausibly succeed. A `NoFace` outcome is a
    /// property of the image, never retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AnalyzerError::Network(_))
    }

    pub fn is_no_face(&self) -> bool {
        matches!(self, AnalyzerError::NoFace)
    }
}
