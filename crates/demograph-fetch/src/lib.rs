//! Concurrent image retrieval and decoding.
//!
//! This crate provides:
//! - A fan-out fetcher that retrieves every distinct URL of a batch at once
//! - Per-URL success/failure classification that never aborts the batch
//! - In-memory image decoding for the analyzer

pub mod decode;
pub mod error;
pub mod fetcher;

pub use decode::decode_image;
pub use error::{FetchError, FetcherResult};
pub use fetcher::{FetchConfig, FetchResult, FetchStatus, ImageFetcher};
