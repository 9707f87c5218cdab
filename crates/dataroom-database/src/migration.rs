//! Database migration runner.

use sqlx::SqlitePool;
use tracing::debug;

use dataroom_core::error::{AppError, ErrorKind};

/// Run all pending database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    debug!("Running database migrations...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    debug!("Database migrations completed successfully");
    Ok(())
}
