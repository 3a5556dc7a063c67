//! Fetcher error types.

use thiserror::Error;

pub type FetcherResult<T> = Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}
