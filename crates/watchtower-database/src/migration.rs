//! Embedded schema migrations.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use watchtower_core::error::{AppError, ErrorKind};

/// All schema migrations, compiled into the binary from `migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the schema up to date, applying whatever migrations the
/// database has not seen yet. Safe to call on every startup.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Schema migration failed", e))?;

    info!(
        known_migrations = MIGRATOR.migrations.len(),
        "Database schema is up to date"
    );
    Ok(())
}
