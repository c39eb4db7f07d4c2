//! A scoped transaction on the store and the queries run through it.
//!
//! Every command acquires one `Session`, performs its reads and writes on it,
//! and calls [`Session::commit`] only when it mutated data.

use crate::error::{is_unique_violation, AppError, Result};
use crate::models::{NewUser, User};
use sqlx::{Sqlite, Transaction};
use tracing::{debug, error, info};

/// Result of inserting a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The row was inserted; carries the stored record with its new id.
    Created(User),
    /// A store constraint (the unique `username`) rejected the row.
    Conflict,
}

/// A single store transaction. Rolled back on drop unless committed.
pub struct Session {
    tx: Transaction<'static, Sqlite>,
}

impl Session {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }

    /// Drops the `users` table (if any) and recreates it empty.
    pub async fn reset_schema(&mut self) -> Result<()> {
        info!("Resetting database schema...");

        sqlx::query("DROP TABLE IF EXISTS users")
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                error!("Failed to drop users table: {}", e);
                AppError::from(e)
            })?;

        sqlx::query(
            r#"
            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL,
                password TEXT NOT NULL -- stored as given
            )
            "#,
        )
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            error!("Failed to create users table: {}", e);
            AppError::from(e)
        })?;

        info!("Database schema recreated");
        Ok(())
    }

    /// Inserts `user`, reporting a uniqueness conflict as [`InsertOutcome::Conflict`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::Db` for any store failure other than a constraint conflict.
    pub async fn insert_user(&mut self, user: &NewUser) -> Result<InsertOutcome> {
        let result = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password)
            .execute(&mut *self.tx)
            .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_rowid();
                debug!("Inserted user {} with id {}", user.username, id);
                Ok(InsertOutcome::Created(User {
                    id,
                    username: user.username.clone(),
                    email: user.email.clone(),
                    password: user.password.clone(),
                }))
            },
            Err(e) if is_unique_violation(&e) => {
                info!("Insert of {} rejected: {}", user.username, e);
                Ok(InsertOutcome::Conflict)
            },
            Err(e) => {
                error!("Failed to insert user {}: {}", user.username, e);
                Err(e.into())
            },
        }
    }

    pub async fn find_user_by_id(&mut self, id: i64) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT id, username, email, password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| {
                error!("Failed to load user {}: {}", id, e);
                AppError::from(e)
            })
    }

    /// Looks up the user with exactly this `username`.
    pub async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| {
            error!("Failed to look up user {}: {}", username, e);
            AppError::from(e)
        })
    }

    /// Fetches every user, ordered by id.
    pub async fn all_users(&mut self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password FROM users ORDER BY id",
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| {
            error!("Failed to fetch users: {}", e);
            AppError::from(e)
        })?;

        debug!("Fetched {} users", users.len());
        Ok(users)
    }

    /// Fetches one page of users ordered by id: skip `offset` rows, return at most `limit`.
    ///
    /// Values are handed to SQLite unchecked: a negative `limit` means no limit and
    /// a negative `offset` behaves like zero.
    pub async fn page_users(&mut self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, password FROM users ORDER BY id LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| {
            error!("Failed to fetch users page (limit {}, offset {}): {}", limit, offset, e);
            AppError::from(e)
        })?;

        debug!("Fetched {} users (limit {}, offset {})", users.len(), limit, offset);
        Ok(users)
    }

    pub async fn update_email(&mut self, id: i64, email: &str) -> Result<()> {
        sqlx::query("UPDATE users SET email = ? WHERE id = ?")
            .bind(email)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                error!("Failed to update email of user {}: {}", id, e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub async fn delete_user(&mut self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                error!("Failed to delete user {}: {}", id, e);
                AppError::from(e)
            })?;
        Ok(())
    }

    /// Persists everything done in this session.
    pub async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(|e| {
            error!("Failed to commit database transaction: {}", e);
            AppError::from(e)
        })?;
        debug!("Session committed");
        Ok(())
    }
}
