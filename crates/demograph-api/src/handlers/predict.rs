//! Prediction handlers.

use axum::extract::State;
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use demograph_models::{ImageBatch, Prediction, DEFAULT_MAX_IMAGES};
use demograph_queue::AnalyzeImagesJob;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Batch prediction request, shared by both delivery modes.
#[derive(Debug, Deserialize, Validate)]
pub struct PredictRequest {
    /// Caller-chosen name → image URL
    pub images: ImageBatch,
    /// Callback endpoint, required only for the deferred path
    #[serde(default)]
    pub cb_url: Option<String>,
    /// Cap on images analyzed; entries beyond it are dropped in input order
    #[serde(default = "default_max_images")]
    #[validate(range(min = 1, message = "must analyze at least one image"))]
    pub num_images_to_analyze: usize,
}

fn default_max_images() -> usize {
    DEFAULT_MAX_IMAGES
}

impl PredictRequest {
    /// Validate and truncate, once, before any network call.
    fn accepted_batch(&self) -> ApiResult<ImageBatch> {
        self.validate()?;
        if self.images.is_empty() {
            return Err(ApiError::bad_request("images must not be empty"));
        }
        Ok(self.images.truncated(self.num_images_to_analyze))
    }
}

/// Synchronous prediction response.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predictions: IndexMap<String, Prediction>,
}

/// Acknowledgment for the deferred path.
#[derive(Debug, Serialize)]
pub struct EnqueueResponse {
    #[serde(rename = "Result")]
    pub result: String,
}

/// Run the pipeline within the request and return the full mapping.
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<Json<PredictResponse>> {
    let batch = request.accepted_batch()?;
    let report = state.pipeline.run(&batch).await;

    Ok(Json(PredictResponse {
        predictions: report.predictions,
    }))
}

/// Enqueue the batch for a worker and acknowledge immediately.
///
/// The result is never returned on this path; the caller learns the
/// outcome only through the callback POST.
pub async fn predict_later(
    State(state): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> ApiResult<Json<EnqueueResponse>> {
    let batch = request.accepted_batch()?;
    let cb_url = request
        .cb_url
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("cb_url is required for deferred processing"))?;

    let job = AnalyzeImagesJob::new(batch, cb_url);
    info!("Sending job {} to worker queue", job.job_id);
    state.queue.enqueue(&job).await?;

    Ok(Json(EnqueueResponse {
        result: "Images being processed".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_cap_to_300() {
        let request: PredictRequest =
            serde_json::from_str(r#"{"images": {"a": "http://x/1.jpg"}}"#).unwrap();
        assert_eq!(request.num_images_to_analyze, 300);
        assert!(request.cb_url.is_none());
    }

    #[test]
    fn test_zero_cap_fails_validation() {
        let request: PredictRequest = serde_json::from_str(
            r#"{"images": {"a": "http://x/1.jpg"}, "num_images_to_analyze": 0}"#,
        )
        .unwrap();
        assert!(request.accepted_batch().is_err());
    }

    #[test]
    fn test_empty_images_rejected() {
        let request: PredictRequest = serde_json::from_str(r#"{"images": {}}"#).unwrap();
        assert!(request.accepted_batch().is_err());
    }

    #[test]
    fn test_accepted_batch_truncates_in_input_order() {
        let request: PredictRequest = serde_json::from_str(
            r#"{
                "images": {
                    "a": "http://x/1.jpg",
                    "b": "http://x/2.jpg",
                    "c": "http://x/3.jpg"
                },
                "num_images_to_analyze": 2
            }"#,
        )
        .unwrap();

        let batch = request.accepted_batch().unwrap();
        assert_eq!(batch.len(), 2);
        let names: Vec<&String> = batch.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_ack_serializes_with_capitalized_key() {
        let ack = EnqueueResponse {
            result: "Images being processed".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&ack).unwrap(),
            r#"{"Result":"Images being processed"}"#
        );
    }
}
