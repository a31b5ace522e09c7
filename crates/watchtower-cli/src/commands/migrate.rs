//! Database migration management commands.

use clap::{Args, Subcommand};

use watchtower_core::error::AppError;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Ping the database without migrating
    Check,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;

    match &args.command {
        MigrateCommand::Run => {
            let pool = super::create_db_pool(&config).await?;
            println!("Running database migrations...");
            watchtower_database::migration::run_migrations(&pool).await?;
            println!("All migrations applied successfully.");
        }
        MigrateCommand::Check => {
            let db =
                watchtower_database::connection::DatabasePool::connect(&config.database).await?;
            db.ping().await?;
            println!("Database connection OK.");
        }
    }

    Ok(())
}
