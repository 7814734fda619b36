//! Database bootstrap: lazily connect, probe, and create the contacts table once per process.

use crate::config::DatabaseSettings;
use crate::error::AppError;
use crate::sql::CREATE_TABLE;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};
use tokio::sync::OnceCell;

/// A request-scoped connection; returned to the pool when dropped.
pub type Session = PoolConnection<Postgres>;

/// Shared engine. The pool is built on first use; a failed attempt leaves it
/// unset so the next caller tries again.
pub struct Database {
    settings: DatabaseSettings,
    pool: OnceCell<PgPool>,
}

impl Database {
    pub fn new(settings: DatabaseSettings) -> Self {
        Database {
            settings,
            pool: OnceCell::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.initialized()
    }

    /// The initialized pool. Concurrent first callers wait for a single initialization.
    pub async fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool.get_or_try_init(|| self.init()).await
    }

    /// Acquire a scoped session from the pool.
    pub async fn session(&self) -> Result<Session, AppError> {
        let pool = self.pool().await?;
        pool.acquire().await.map_err(|e| {
            tracing::warn!(error = %e, "acquire connection failed");
            AppError::ServiceUnavailable(e.to_string())
        })
    }

    /// Trivial connectivity probe.
    pub async fn ping(&self) -> Result<(), AppError> {
        let mut session = self.session().await?;
        sqlx::query("SELECT 1")
            .execute(&mut *session)
            .await
            .map_err(|e| AppError::ServiceUnavailable(e.to_string()))?;
        Ok(())
    }

    async fn init(&self) -> Result<PgPool, AppError> {
        tracing::info!(host = %self.settings.host, "initializing database");
        let result = self.connect_and_prepare().await;
        match &result {
            Ok(_) => tracing::info!("database ready"),
            Err(e) => tracing::warn!(error = %e, "database initialization failed; will retry on next request"),
        }
        result
    }

    async fn connect_and_prepare(&self) -> Result<PgPool, AppError> {
        let options = self.settings.connect_options().await?;
        let pool = PgPoolOptions::new()
            .max_connections(self.settings.max_connections)
            .acquire_timeout(self.settings.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| AppError::ServiceUnavailable(format!("database connection failed: {}", e)))?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| AppError::ServiceUnavailable(format!("database probe failed: {}", e)))?;

        sqlx::query(CREATE_TABLE)
            .execute(&pool)
            .await
            .map_err(|e| AppError::Internal(format!("database initialization failed: {}", e)))?;

        Ok(pool)
    }
}
