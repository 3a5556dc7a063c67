//! Shared data models for the Demograph backend.
//!
//! This crate provides Serde-serializable types for:
//! - Named image batches and their truncation/deduplication rules
//! - Per-image analysis outcomes and wire predictions
//! - Job identifiers
//! - Detection-rate arithmetic

pub mod batch;
pub mod job;
pub mod outcome;

// Re-export common types
pub use batch::{ImageBatch, DEFAULT_MAX_IMAGES};
pub use job::JobId;
pub use outcome::{detection_rate, ImageOutcome, Prediction};
