//! CLI command definitions and dispatch.

pub mod evaluate;
pub mod migrate;
pub mod serve;
pub mod worker;

use clap::{Parser, Subcommand};

use watchtower_core::error::AppError;

/// Watchtower: rule evaluation and alert dispatch for Automize
#[derive(Debug, Parser)]
#[command(name = "watchtower", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (reads config/<env>.toml over config/default.toml)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Watchtower HTTP server
    Serve(serve::ServeArgs),
    /// Run only the in-process evaluation scheduler
    Worker(worker::WorkerArgs),
    /// Manage database migrations
    Migrate(migrate::MigrateArgs),
    /// Run one evaluation window immediately
    Evaluate(evaluate::EvaluateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.env).await,
            Commands::Worker(args) => worker::execute(args, &self.env).await,
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::Evaluate(args) => evaluate::execute(args, &self.env).await,
        }
    }
}

/// Helper: load configuration for the chosen environment
pub fn load_config(env: &str) -> Result<watchtower_core::config::AppConfig, AppError> {
    watchtower_core::config::AppConfig::load(env)
}

/// Helper: create database pool from config
pub async fn create_db_pool(
    config: &watchtower_core::config::AppConfig,
) -> Result<sqlx::PgPool, AppError> {
    let pool =
        watchtower_database::connection::DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}
