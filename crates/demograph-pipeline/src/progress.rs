//! Annotation progress reporting.

use tracing::info;

/// Progress is reported after every this-many processed images, and once
/// after the last one.
pub const PROGRESS_INTERVAL: usize = 50;

/// Receives running progress while a batch is annotated.
///
/// The detection rate passed here is computed over images processed so
/// far, not the batch total.
pub trait ProgressSink: Send + Sync {
    fn report(&self, processed: usize, total: usize, detection_rate: f64);
}

/// Default sink that logs progress through tracing.
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, processed: usize, total: usize, detection_rate: f64) {
        info!(
            "{} of {} images analyzed, a face was detected in {}% so far",
            processed, total, detection_rate
        );
    }
}
