//! Batch pipeline orchestration.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::DynamicImage;
use indexmap::IndexMap;
use tracing::{info, warn};

use demograph_analyzer::AnalyzerClient;
use demograph_fetch::{decode_image, FetchResult, FetchStatus, ImageFetcher};
use demograph_models::{ImageBatch, ImageOutcome, Prediction};

use crate::annotate::Annotator;
use crate::correlate::{batch_detection_rate, correlate};
use crate::error::PipelineResult;
use crate::progress::{LogProgress, ProgressSink};

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Cap on concurrent analyzer invocations. Defaults to sequential;
    /// anything above 1 must stay bounded because the analyzer is
    /// CPU/GPU-bound.
    pub max_concurrent_analyses: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_analyses: 1,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_concurrent_analyses: std::env::var("MAX_CONCURRENT_ANALYSES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1),
        }
    }
}

/// Everything one batch run produces.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Name → prediction, in the input's (truncated) order.
    pub predictions: IndexMap<String, Prediction>,
    /// Percentage of processed images with a detected face.
    pub detection_rate: f64,
    /// Wall time of the concurrent fetch phase.
    pub fetch_elapsed: Duration,
    /// Wall time of the decode + annotate phase.
    pub analyze_elapsed: Duration,
}

/// The fetch → decode → annotate → correlate pipeline.
pub struct BatchPipeline {
    fetcher: ImageFetcher,
    annotator: Annotator,
}

impl BatchPipeline {
    pub fn new(
        fetcher: ImageFetcher,
        analyzer: AnalyzerClient,
        config: PipelineConfig,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            fetcher,
            annotator: Annotator::new(analyzer, config.max_concurrent_analyses, progress),
        }
    }

    /// Create from environment variables with the logging progress sink.
    pub fn from_env() -> PipelineResult<Self> {
        Ok(Self::new(
            ImageFetcher::from_env()?,
            AnalyzerClient::from_env()?,
            PipelineConfig::from_env(),
            Arc::new(LogProgress),
        ))
    }

    /// Run one batch end to end.
    ///
    /// The batch must already be truncated by the dispatch layer. Per-image
    /// failures degrade that image to a null prediction; the returned
    /// report always covers every input name.
    pub async fn run(&self, batch: &ImageBatch) -> BatchReport {
        let urls = batch.distinct_urls();
        info!(
            names = batch.len(),
            urls = urls.len(),
            "starting batch analysis"
        );

        let fetch_started = Instant::now();
        let mut fetched = self.fetcher.fetch_all(&urls).await;
        let fetch_elapsed = fetch_started.elapsed();
        info!(
            "image retrieval took {:.2} seconds",
            fetch_elapsed.as_secs_f64()
        );

        let analyze_started = Instant::now();
        let items: Vec<(String, Result<DynamicImage, ImageOutcome>)> = urls
            .iter()
            .map(|url| {
                let prepared = match fetched.remove(url) {
                    Some(result) => prepare(result),
                    // The fetcher guarantees one result per URL.
                    None => Err(ImageOutcome::ConnectionFailed),
                };
                (url.clone(), prepared)
            })
            .collect();

        let outcomes = self.annotator.annotate_all(items).await;
        let analyze_elapsed = analyze_started.elapsed();

        let detection_rate = batch_detection_rate(&outcomes);
        let predictions = correlate(batch, &outcomes);
        info!(
            "analyzed {} images in {:.2} seconds, face detected in {}%",
            outcomes.len(),
            analyze_elapsed.as_secs_f64(),
            detection_rate
        );

        BatchReport {
            predictions,
            detection_rate,
            fetch_elapsed,
            analyze_elapsed,
        }
    }
}

/// Turn a fetch result into either decoded pixels or its failure outcome.
fn prepare(result: FetchResult) -> Result<DynamicImage, ImageOutcome> {
    match result.status {
        FetchStatus::Http(status) => Err(ImageOutcome::FetchFailed { status }),
        FetchStatus::Connection => Err(ImageOutcome::ConnectionFailed),
        FetchStatus::Ok => {
            let payload = result.payload.unwrap_or_default();
            match decode_image(&payload) {
                Ok(image) => Ok(image),
                Err(e) => {
                    warn!(url = %result.url, "image decode failed: {e}");
                    Err(ImageOutcome::DecodeFailed)
                }
            }
        }
    }
}
