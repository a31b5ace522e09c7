//! Run only the evaluation scheduler, without the HTTP server.

use std::sync::Arc;

use clap::Args;

use watchtower_core::error::AppError;

/// Arguments for the worker command
#[derive(Debug, Args)]
pub struct WorkerArgs {}

/// Execute the worker command
pub async fn execute(_args: &WorkerArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;

    let watchtower_config = config.watchtower.clone();
    let state = watchtower_api::AppState::build(config, pool)?;

    let mut scheduler =
        watchtower_worker::CronScheduler::new(Arc::clone(&state.evaluation_job)).await?;
    scheduler
        .register_evaluation_windows(&watchtower_config)
        .await?;
    scheduler.start().await?;

    println!("Evaluation scheduler running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to install Ctrl+C handler: {e}")))?;

    scheduler.shutdown().await
}
