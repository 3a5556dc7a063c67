//! Per-image annotation with bounded concurrency.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::join_all;
use image::DynamicImage;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use demograph_analyzer::AnalyzerClient;
use demograph_models::{detection_rate, ImageOutcome};

use crate::progress::{ProgressSink, PROGRESS_INTERVAL};

/// Runs the external analyzer over a batch of decoded images.
///
/// The analyzer is CPU/GPU-bound, so invocations are capped by a
/// semaphore rather than launched unbounded. Items that already failed
/// upstream (fetch or decode) pass through with their outcome intact and
/// still count as processed for progress reporting.
pub struct Annotator {
    client: AnalyzerClient,
    limit: Arc<Semaphore>,
    progress: Arc<dyn ProgressSink>,
}

impl Annotator {
    pub fn new(
        client: AnalyzerClient,
        max_concurrent: usize,
        progress: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            client,
            limit: Arc::new(Semaphore::new(max_concurrent.max(1))),
            progress,
        }
    }

    /// Annotate every item, keyed by URL.
    ///
    /// Each item is either a decoded image or the failure outcome it
    /// accumulated upstream. The result map holds exactly one outcome per
    /// input URL; an analyzer failure degrades that image, never the
    /// batch.
    pub async fn annotate_all(
        &self,
        items: Vec<(String, Result<DynamicImage, ImageOutcome>)>,
    ) -> HashMap<String, ImageOutcome> {
        let total = items.len();
        let processed = AtomicUsize::new(0);
        let detected = AtomicUsize::new(0);

        let tasks = items.into_iter().map(|(url, item)| {
            let processed = &processed;
            let detected = &detected;
            async move {
                let outcome = match item {
                    Err(outcome) => outcome,
                    Ok(image) => self.analyze_one(&url, image).await,
                };

                if outcome.is_detected() {
                    detected.fetch_add(1, Ordering::SeqCst);
                }
                let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                if done % PROGRESS_INTERVAL == 0 || done == total {
                    let rate = detection_rate(detected.load(Ordering::SeqCst), done);
                    self.progress.report(done, total, rate);
                }

                (url, outcome)
            }
        });

        join_all(tasks).await.into_iter().collect()
    }

    async fn analyze_one(&self, url: &str, image: DynamicImage) -> ImageOutcome {
        let _permit = self.limit.acquire().await.unwrap();

        match self.client.analyze(&image).await {
            Ok(attributes) => ImageOutcome::Detected {
                age: attributes.age,
                gender: attributes.gender,
            },
            Err(e) if e.is_no_face() => {
                debug!(%url, "no face detected");
                ImageOutcome::NoFace
            }
            Err(e) => {
                warn!(%url, "analysis failed: {e}");
                ImageOutcome::NoFace
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use demograph_analyzer::AnalyzerConfig;

    #[derive(Default)]
    struct RecordingSink {
        reports: Mutex<Vec<(usize, usize, f64)>>,
    }

    impl ProgressSink for RecordingSink {
        fn report(&self, processed: usize, total: usize, detection_rate: f64) {
            self.reports
                .lock()
                .unwrap()
                .push((processed, total, detection_rate));
        }
    }

    fn annotator_with(sink: Arc<RecordingSink>) -> Annotator {
        // The client is never invoked: every item below carries an
        // upstream failure outcome.
        let client = AnalyzerClient::new(AnalyzerConfig::default()).unwrap();
        Annotator::new(client, 1, sink)
    }

    #[tokio::test]
    async fn test_progress_reported_every_interval_and_at_end() {
        let sink = Arc::new(RecordingSink::default());
        let annotator = annotator_with(sink.clone());

        let items: Vec<(String, Result<DynamicImage, ImageOutcome>)> = (0..120)
            .map(|i| {
                (
                    format!("http://host/{i}.jpg"),
                    Err(ImageOutcome::ConnectionFailed),
                )
            })
            .collect();

        let outcomes = annotator.annotate_all(items).await;
        assert_eq!(outcomes.len(), 120);

        let mut reports = sink.reports.lock().unwrap().clone();
        reports.sort_by_key(|(p, _, _)| *p);
        let points: Vec<usize> = reports.iter().map(|(p, _, _)| *p).collect();
        assert_eq!(points, vec![50, 100, 120]);
        // Nothing detected, so every running rate is zero.
        assert!(reports.iter().all(|(_, total, rate)| *total == 120 && *rate == 0.0));
    }

    #[tokio::test]
    async fn test_upstream_failures_pass_through_unchanged() {
        let sink = Arc::new(RecordingSink::default());
        let annotator = annotator_with(sink);

        let items = vec![
            (
                "http://host/a.jpg".to_string(),
                Err(ImageOutcome::FetchFailed { status: 404 }),
            ),
            (
                "http://host/b.jpg".to_string(),
                Err(ImageOutcome::DecodeFailed),
            ),
        ];

        let outcomes = annotator.annotate_all(items).await;
        assert_eq!(
            outcomes["http://host/a.jpg"],
            ImageOutcome::FetchFailed { status: 404 }
        );
        assert_eq!(outcomes["http://host/b.jpg"], ImageOutcome::DecodeFailed);
    }
}
