//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Callback delivery failed: {0}")]
    CallbackFailed(String),

    #[error("Queue error: {0}")]
    Queue(#[from] demograph_queue::QueueError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] demograph_pipeline::PipelineError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn callback_failed(msg: impl Into<String>) -> Self {
        Self::CallbackFailed(msg.into())
    }
}
