//! Pipeline error types.
//!
//! Only pipeline construction can fail. Per-image failures degrade that
//! image's outcome and are never surfaced as errors.

use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Fetcher error: {0}")]
    Fetch(#[from] demograph_fetch::FetchError),

    #[error("Analyzer error: {0}")]
    Analyzer(#[from] demograph_analyzer::AnalyzerError),
}
