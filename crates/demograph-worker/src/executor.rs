//! Job executor.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{info, warn};

use demograph_queue::JobQueue;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::processor::{process_job, ProcessingContext};

/// Job executor that processes jobs from the queue.
pub struct JobExecutor {
    config: WorkerConfig,
    queue: Arc<JobQueue>,
    job_semaphore: Arc<Semaphore>,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl JobExecutor {
    /// Create a new job executor.
    pub fn new(config: WorkerConfig, queue: Arc<JobQueue>) -> Self {
        let job_semaphore = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        let (shutdown, _) = tokio::sync::watch::channel(false);

        Self {
            config,
            queue,
            job_semaphore,
            shutdown,
        }
    }

    /// Start the executor.
    pub async fn run(&self) -> WorkerResult<()> {
        info!(
            "Starting job executor with {} max concurrent jobs",
            self.config.max_concurrent_jobs
        );

        // Initialize queue
        self.queue.init().await?;

        // Create processing context
        let ctx = Arc::new(ProcessingContext::from_env()?);

        let mut shutdown_rx = self.shutdown.subscribe();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping executor");
                        break;
                    }
                }
                next = self.queue.next_job(self.config.poll_block) => {
                    match next {
                        Ok(Some((message_id, job))) => {
                            let permit = self.job_semaphore.clone().acquire_owned().await.unwrap();
                            let ctx = ctx.clone();
                            let queue = self.queue.clone();
                            tokio::spawn(async move {
                                let _permit = permit;
                                // A failed callback is this job's final state:
                                // logged, never retried, and acked below.
                                if let Err(e) = process_job(&ctx, &job).await {
                                    warn!("Job {} failed: {}", job.job_id, e);
                                }
                                if let Err(e) = queue.ack(&message_id).await {
                                    warn!("Failed to ack message {}: {}", message_id, e);
                                }
                            });
                        }
                        Ok(None) => {
                            // Block expired with nothing to read
                        }
                        Err(e) => {
                            warn!("Queue poll failed: {}", e);
                            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                        }
                    }
                }
            }
        }

        info!("Job executor stopped");
        Ok(())
    }

    /// Signal shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}
