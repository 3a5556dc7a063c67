//! The batch analysis pipeline.
//!
//! This crate provides:
//! - URL deduplication, concurrent fetch, and per-item decode
//! - Bounded-concurrency annotation against the external analyzer
//! - Progress reporting every 50 processed images
//! - Correlation of per-URL outcomes back to every caller-supplied name
//!
//! Both delivery modes run the same pipeline: the API calls it inside the
//! request for the synchronous path, the worker calls it per dequeued job.

pub mod annotate;
pub mod correlate;
pub mod error;
pub mod pipeline;
pub mod progress;

pub use annotate::Annotator;
pub use correlate::{batch_detection_rate, correlate};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{BatchPipeline, BatchReport, PipelineConfig};
pub use progress::{LogProgress, ProgressSink, PROGRESS_INTERVAL};
