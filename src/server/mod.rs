pub mod api;
pub mod routes;

use crate::config::AppConfig;
use crate::error::Result;
use crate::parallel::{BatchRunner, WorkerPool};

/// Shared, read-only handler state.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppState {
    pub runner: BatchRunner,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            runner: BatchRunner {
                pool: WorkerPool::with_workers(config.workers),
                parallel_threshold: config.parallel_threshold,
            },
        }
    }
}

pub async fn serve(config: &AppConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %config.bind_addr,
        workers = config.workers,
        parallel_threshold = config.parallel_threshold,
        "woundsim server listening"
    );
    axum::serve(listener, routes::router(AppState::from_config(config))).await
}

/// Blocking entry point used by the CLI.
pub fn run_server(config: &AppConfig) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(config))?;
    Ok(())
}
