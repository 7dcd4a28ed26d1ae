//! SQLite-backed key-value cache.
//!
//! Implements the `KeyValueCache` port on a single `kv_cache` table. All
//! database operations run in `spawn_blocking` to avoid blocking the async
//! runtime.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use eventide_core::KeyValueCache;
use eventide_domain::{CacheConfig, EventideError, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::task;
use tracing::info;

use crate::errors::InfraError;

type SqlitePool = Pool<SqliteConnectionManager>;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS kv_cache (
    key TEXT PRIMARY KEY NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('bool', 'text')),
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
)";

const BUSY_TIMEOUT_MS: u32 = 5_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Bool,
    Text,
}

impl ValueKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Text => "text",
        }
    }
}

/// SQLite-backed [`KeyValueCache`].
///
/// Booleans and strings share one table; a read of the wrong kind returns
/// `None`, the same as an absent key.
pub struct SqliteKeyValueCache {
    pool: Arc<SqlitePool>,
    path: PathBuf,
}

impl SqliteKeyValueCache {
    /// Open (or create) the cache file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>, pool_size: u32) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                EventideError::Storage(format!(
                    "failed to create cache directory {}: {err}",
                    parent.display()
                ))
            })?;
        }

        let manager = SqliteConnectionManager::file(&path).with_init(|conn| {
            conn.execute_batch(&format!(
                "PRAGMA journal_mode = WAL; PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"
            ))
        });

        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .connection_timeout(Duration::from_secs(5))
            .build(manager)
            .map_err(storage_error)?;

        {
            let conn = pool.get().map_err(storage_error)?;
            conn.execute_batch(SCHEMA_SQL).map_err(storage_error)?;
        }

        info!(
            path = %path.display(),
            max_connections = pool_size.max(1),
            "key-value cache opened"
        );
        Ok(Self { pool: Arc::new(pool), path })
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::open(&config.path, config.pool_size)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self, key: &str, kind: ValueKind) -> Result<Option<String>> {
        let pool = Arc::clone(&self.pool);
        let key = key.to_string();

        task::spawn_blocking(move || -> Result<Option<String>> {
            let conn = connection(&pool)?;
            query_value(&conn, &key, kind).map_err(storage_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn write(&self, key: &str, kind: ValueKind, value: String) -> Result<()> {
        let pool = Arc::clone(&self.pool);
        let key = key.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = connection(&pool)?;
            upsert_value(&conn, &key, kind, &value).map_err(storage_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl KeyValueCache for SqliteKeyValueCache {
    async fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.read(key, ValueKind::Bool).await?.map(|raw| raw == "1"))
    }

    async fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        let raw = if value { "1" } else { "0" };
        self.write(key, ValueKind::Bool, raw.to_string()).await
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.read(key, ValueKind::Text).await
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.write(key, ValueKind::Text, value.to_string()).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let pool = Arc::clone(&self.pool);
        let key = key.to_string();

        task::spawn_blocking(move || -> Result<()> {
            let conn = connection(&pool)?;
            conn.execute("DELETE FROM kv_cache WHERE key = ?1", params![key])
                .map_err(storage_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

// ============================================================================
// Synchronous SQL Operations (called inside spawn_blocking)
// ============================================================================

fn connection(pool: &SqlitePool) -> Result<PooledConnection<SqliteConnectionManager>> {
    pool.get().map_err(storage_error)
}

fn query_value(
    conn: &Connection,
    key: &str,
    kind: ValueKind,
) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM kv_cache WHERE key = ?1 AND kind = ?2",
        params![key, kind.as_str()],
        |row| row.get::<_, String>(0),
    )
    .optional()
}

/// Insert or replace, switching kind if the key previously held the other one.
fn upsert_value(conn: &Connection, key: &str, kind: ValueKind, value: &str) -> rusqlite::Result<()> {
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT INTO kv_cache (key, kind, value, updated_at)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(key) DO UPDATE SET
            kind = excluded.kind,
            value = excluded.value,
            updated_at = excluded.updated_at",
        params![key, kind.as_str(), value, now],
    )?;
    Ok(())
}

// ============================================================================
// Error Mapping
// ============================================================================

fn storage_error<E: Into<InfraError>>(err: E) -> EventideError {
    let infra: InfraError = err.into();
    infra.into()
}

fn map_join_error(err: task::JoinError) -> EventideError {
    if err.is_cancelled() {
        EventideError::Internal("blocking task cancelled".into())
    } else {
        EventideError::Internal(format!("blocking task failed: {err}"))
    }
}
