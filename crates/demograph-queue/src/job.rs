//! Job types for the queue.

use serde::{Deserialize, Serialize};

use demograph_models::{ImageBatch, JobId};

/// Job to analyze a batch of images and deliver the result to a callback.
///
/// The job is an immutable snapshot taken at submission: the batch is
/// already truncated to the request's cap, so the worker never re-applies
/// it. Consumed exactly once by one worker invocation and discarded after
/// the callback attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeImagesJob {
    /// Unique job ID
    pub job_id: JobId,
    /// Name → URL entries to analyze
    pub images: ImageBatch,
    /// Endpoint the result summary is POSTed to
    pub callback_url: String,
}

impl AnalyzeImagesJob {
    pub fn new(images: ImageBatch, callback_url: impl Into<String>) -> Self {
        Self {
            job_id: JobId::new(),
            images,
            callback_url: callback_url.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_round_trip_preserves_image_order() {
        let mut images = ImageBatch::new();
        images.insert("first", "http://x/1.jpg");
        images.insert("second", "http://x/2.jpg");

        let job = AnalyzeImagesJob::new(images, "http://callback.example/hook");
        let json = serde_json::to_string(&job).unwrap();
        let back: AnalyzeImagesJob = serde_json::from_str(&json).unwrap();

        assert_eq!(back.job_id, job.job_id);
        assert_eq!(back.callback_url, "http://callback.example/hook");
        let names: Vec<&String> = back.images.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
