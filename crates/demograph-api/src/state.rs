//! Application state.

use std::sync::Arc;

use demograph_pipeline::BatchPipeline;
use demograph_queue::JobQueue;

use crate::config::ApiConfig;
use crate::error::ApiResult;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pipeline: Arc<BatchPipeline>,
    pub queue: Arc<JobQueue>,
}

impl AppState {
    /// Create new application state from the environment.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let pipeline = BatchPipeline::from_env()?;
        let queue = JobQueue::from_env()?;

        Ok(Self {
            config,
            pipeline: Arc::new(pipeline),
            queue: Arc::new(queue),
        })
    }
}
