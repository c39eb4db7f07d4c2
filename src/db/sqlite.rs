//! Provides the SQLite connection pool using `sqlx`.
//!
//! The pool is capped at a single connection: each invocation runs exactly one
//! session, and an in-memory database only lives as long as its one connection.

use super::Session;
use crate::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::{debug, error, info};

/// Default store location when neither `--database-url` nor `DATABASE_URL` is set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://users.db";

/// Represents the store and hands out scoped sessions.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Opens the store at `database_url`, creating the SQLite file if it is missing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the URL cannot be parsed and `AppError::Db`
    /// if the connection cannot be established.
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Connecting to database...");

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| {
                error!("Invalid database URL {}: {}", database_url, e);
                AppError::Config(format!("invalid database URL '{}': {}", database_url, e))
            })?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| {
                error!("Failed to connect to database: {}", e);
                AppError::from(e)
            })?;

        info!("Connected to database successfully");
        Ok(Self { pool })
    }

    /// Acquires a scoped session backed by a new transaction.
    ///
    /// Nothing is persisted unless [`Session::commit`] is called; dropping the
    /// session rolls back and returns the connection to the pool.
    pub async fn session(&self) -> Result<Session> {
        debug!("Beginning session");
        let tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to begin database transaction: {}", e);
            AppError::from(e)
        })?;
        Ok(Session::new(tx))
    }

    /// Closes the pool, waiting for the connection to be released.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Database pool closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_in_memory() {
        let db = Database::new("sqlite::memory:").await;
        assert!(db.is_ok(), "In-memory database should open");
    }

    #[tokio::test]
    async fn test_invalid_url_is_config_error() {
        let result = Database::new("sqlite://users.db?mode=bogus").await;
        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("invalid database URL")),
            Err(other) => panic!("Expected Config error, got {:?}", other),
            Ok(_) => panic!("Expected Config error, got a database"),
        }
    }

    #[tokio::test]
    async fn test_uncommitted_session_is_rolled_back() -> Result<()> {
        let db = Database::new("sqlite::memory:").await?;

        let mut session = db.session().await?;
        session.reset_schema().await?;
        session.commit().await?;

        {
            let mut session = db.session().await?;
            session
                .insert_user(&crate::models::NewUser::new("tmp", "t@x.com", "pw"))
                .await?;
            // dropped without commit
        }

        let mut session = db.session().await?;
        assert!(session.find_user_by_username("tmp").await?.is_none());
        Ok(())
    }
}
