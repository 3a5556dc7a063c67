//! Job processing logic.

use tracing::info;

use demograph_pipeline::BatchPipeline;
use demograph_queue::AnalyzeImagesJob;

use crate::callback::{summary_content, CallbackClient};
use crate::error::WorkerResult;

/// Context for job processing.
pub struct ProcessingContext {
    pub pipeline: BatchPipeline,
    pub callback: CallbackClient,
}

impl ProcessingContext {
    /// Create from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        Ok(Self {
            pipeline: BatchPipeline::from_env()?,
            callback: CallbackClient::from_env()?,
        })
    }
}

/// Process one dequeued job.
///
/// Runs the pipeline over the job's snapshot and POSTs the summary to the
/// callback URL. A callback failure propagates so the executor can log
/// it, but the job is still acked by the caller; there is exactly one
/// delivery attempt.
pub async fn process_job(ctx: &ProcessingContext, job: &AnalyzeImagesJob) -> WorkerResult<()> {
    info!(
        "Processing job {} ({} images)",
        job.job_id,
        job.images.len()
    );

    let report = ctx.pipeline.run(&job.images).await;
    info!(
        job_id = %job.job_id,
        detection_rate = report.detection_rate,
        "batch analyzed, delivering callback"
    );

    let content = summary_content(&report)?;
    ctx.callback.deliver(&job.callback_url, content).await?;

    info!("Completed job {}", job.job_id);
    Ok(())
}
