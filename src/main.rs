//! Watchtower server: rule evaluation and alert dispatch for Automize.
//!
//! Main entry point that wires all crates together and starts the HTTP
//! server plus the in-process evaluation scheduler.

use std::sync::Arc;

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use watchtower_core::config::AppConfig;
use watchtower_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("WATCHTOWER_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Watchtower v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!("Connecting to database...");
    let db = watchtower_database::connection::DatabasePool::connect(&config.database).await?;

    tracing::info!("Running database migrations...");
    watchtower_database::migration::run_migrations(db.pool()).await?;
    tracing::info!("Database migrations complete");

    let worker_enabled = config.worker.enabled;
    let watchtower_config = config.watchtower.clone();
    let state = watchtower_api::AppState::build(config, db.pool().clone())?;

    let scheduler = if worker_enabled {
        let scheduler =
            watchtower_worker::CronScheduler::new(Arc::clone(&state.evaluation_job)).await?;
        scheduler
            .register_evaluation_windows(&watchtower_config)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("In-process scheduler disabled, relying on the external cron trigger");
        None
    };

    let result = watchtower_api::run_server(state).await;

    if let Some(mut scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    db.close().await;

    result
}
