//! Worker binary.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use demograph_queue::JobQueue;
use demograph_worker::{JobExecutor, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = WorkerConfig::from_env();
    let queue = Arc::new(JobQueue::from_env()?);
    let executor = Arc::new(JobExecutor::new(config, queue));

    let runner = {
        let executor = executor.clone();
        tokio::spawn(async move { executor.run().await })
    };

    tokio::signal::ctrl_c().await?;
    info!("Interrupt received, shutting down");
    executor.shutdown();
    runner.await??;

    Ok(())
}
