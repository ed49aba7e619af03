//! SQLite-backed key-value store for native (non-webview) hosts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tokio::sync::Mutex;

use crate::store::{KeyValueStore, StoreError};

/// Key-value entries in a single SQLite table.
///
/// The connection pool is opened lazily on first use, so constructing a store
/// never touches the filesystem.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: Arc::new(Mutex::new(None)),
        }
    }

    /// Store at [`default_db_path`].
    pub fn open_default() -> Result<Self, StoreError> {
        Ok(Self::new(default_db_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the pool, opening the database and creating the table if needed.
    async fn pool(&self) -> anyhow::Result<SqlitePool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create store directory at {:?}", parent))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite store at {:?}", self.path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key        TEXT PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create kv_entries table")?;

        tracing::debug!(path = ?self.path, "opened billing store");
        *guard = Some(pool.clone());
        Ok(pool)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let pool = self.pool().await?;

        let row = sqlx::query(
            r#"
            SELECT value
            FROM kv_entries
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&pool)
        .await
        .with_context(|| format!("failed to read entry {key:?}"))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let value: String = row
            .try_get("value")
            .with_context(|| format!("entry {key:?} has no text value"))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let pool = self.pool().await?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_entries (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&pool)
        .await
        .with_context(|| format!("failed to upsert entry {key:?}"))?;

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let pool = self.pool().await?;

        sqlx::query(
            r#"
            DELETE FROM kv_entries
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&pool)
        .await
        .with_context(|| format!("failed to delete entry {key:?}"))?;

        Ok(())
    }
}

/// Resolve the default database path:
/// `{app_data_dir}/billing-bridge/cache.db`.
pub fn default_db_path() -> Result<PathBuf, StoreError> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or_else(|| {
            StoreError::unavailable(
                "failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share",
            )
        })?;

    dir.push("billing-bridge");
    dir.push("cache.db");
    Ok(dir)
}
