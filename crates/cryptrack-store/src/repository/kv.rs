//! # Key-Value Repository
//!
//! Durable string values addressed by key.
//!
//! Values are stored as TEXT. The JSON helpers encode and decode through
//! serde so callers can persist whole structs under a single key, which is
//! how the shared user profile survives restarts.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Repository for the `kv_store` table.
///
/// ## Usage
/// ```rust,ignore
/// let repo = KeyValueRepository::new(pool);
///
/// repo.set("theme", "dark").await?;
/// let theme = repo.get("theme").await?; // Some("dark")
/// ```
#[derive(Debug, Clone)]
pub struct KeyValueRepository {
    pool: SqlitePool,
}

impl KeyValueRepository {
    /// Creates a new KeyValueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KeyValueRepository { pool }
    }

    /// Returns the stored value, or `None` when the key was never written.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        debug!(key = %key, found = value.is_some(), "Read stored value");
        Ok(value)
    }

    /// Inserts or replaces the value for `key`.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Stored value");
        Ok(())
    }

    /// Deletes the value for `key`. Returns true if a row was removed.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        debug!(key = %key, removed, "Removed stored value");
        Ok(removed)
    }

    /// Reads and deserializes a JSON value.
    ///
    /// ## Errors
    /// Returns [`DbError::InvalidValue`] when the stored text is not valid
    /// JSON for `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| DbError::invalid_value(key, e)),
            None => Ok(None),
        }
    }

    /// Serializes `value` as JSON and stores it under `key`.
    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value).map_err(|e| DbError::invalid_value(key, e))?;
        self.set(key, &raw).await
    }
}
