//! Per-user SQLite connection pool management.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use tracing::info;

use dataroom_core::config::StorageConfig;
use dataroom_core::error::{AppError, ErrorKind};

/// Wrapper around the sqlx SQLite connection pool of one user.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    /// The underlying sqlx connection pool.
    pool: SqlitePool,
}

impl DatabasePool {
    /// Open (creating if needed) the database file belonging to `user_id`.
    pub async fn open_for_user(config: &StorageConfig, user_id: &str) -> Result<Self, AppError> {
        if user_id.trim().is_empty() {
            return Err(AppError::storage_unavailable("A user id is required"));
        }

        tokio::fs::create_dir_all(&config.data_root)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StorageUnavailable,
                    format!("Failed to create data directory '{}'", config.data_root),
                    e,
                )
            })?;

        let path = database_path(config, user_id);
        info!(path = %path.display(), "Opening user database");

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(config.busy_timeout_seconds))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StorageUnavailable,
                    format!("Failed to open database at '{}'", path.display()),
                    e,
                )
            })?;

        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// The pool is pinned to a single connection that never expires, since
    /// every SQLite in-memory connection is a separate database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| {
            AppError::with_source(
                ErrorKind::StorageUnavailable,
                "Invalid in-memory database options",
                e,
            )
        })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::StorageUnavailable,
                    "Failed to open in-memory database",
                    e,
                )
            })?;

        Ok(Self { pool })
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Return the underlying sqlx pool (consuming self).
    pub fn into_pool(self) -> SqlitePool {
        self.pool
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Health check failed", e))
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// Location of the database file for `user_id`.
///
/// The id is opaque, so it is base64url-encoded to get a file name that is
/// safe on every platform and distinct for distinct ids.
pub fn database_path(config: &StorageConfig, user_id: &str) -> PathBuf {
    let encoded = URL_SAFE_NO_PAD.encode(user_id.as_bytes());
    PathBuf::from(&config.data_root).join(format!("dataroom-{encoded}.db"))
}
