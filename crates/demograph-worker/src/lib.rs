//! Deferred analysis worker.
//!
//! This crate provides:
//! - Job executor consuming the Redis Streams queue
//! - Per-job pipeline execution
//! - Callback delivery of the result summary
//! - Graceful shutdown

pub mod callback;
pub mod config;
pub mod error;
pub mod executor;
pub mod processor;

pub use callback::{CallbackClient, CallbackConfig};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
