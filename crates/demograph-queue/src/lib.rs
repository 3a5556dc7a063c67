//! Redis Streams job queue.
//!
//! This crate provides:
//! - The deferred-analysis job payload
//! - Enqueue/consume/ack over a Redis Stream with a consumer group
//!
//! The transport gives at-least-once delivery and per-invocation
//! exclusivity through the consumer group; retry coordination and
//! dead-lettering are deliberately absent, a job is acked whether its
//! callback delivery succeeded or not.

pub mod error;
pub mod job;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use job::AnalyzeImagesJob;
pub use queue::{JobQueue, QueueConfig};
