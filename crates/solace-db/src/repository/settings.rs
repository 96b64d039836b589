//! # Settings Repository
//!
//! Durable key/value settings. Currently holds the sync mode; the schema
//! is generic so later settings need no migration.

use sqlx::SqlitePool;
use tracing::debug;

use solace_core::SyncMode;

use crate::error::DbResult;

/// Settings key for the queue's sync mode.
const KEY_SYNC_MODE: &str = "sync_mode";

/// Repository for key/value settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new repository with the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Reads a raw setting value.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// Writes a setting, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value)
            VALUES (?, ?)
            ON CONFLICT (key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        debug!(key, value, "Setting written");
        Ok(())
    }

    /// Reads the sync mode. A missing or unrecognized value yields the
    /// default (Immediate).
    pub async fn sync_mode(&self) -> DbResult<SyncMode> {
        let stored = self.get(KEY_SYNC_MODE).await?;
        Ok(stored
            .map(|s| SyncMode::parse_or_default(&s))
            .unwrap_or_default())
    }

    /// Persists the sync mode.
    pub async fn set_sync_mode(&self, mode: SyncMode) -> DbResult<()> {
        self.set(KEY_SYNC_MODE, mode.as_str()).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_none() {
        let db = test_db().await;
        assert!(db.settings().get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let db = test_db().await;
        let settings = db.settings();

        settings.set("device_id", "abc-123").await.unwrap();
        assert_eq!(
            settings.get("device_id").await.unwrap().as_deref(),
            Some("abc-123")
        );

        // Upsert replaces.
        settings.set("device_id", "def-456").await.unwrap();
        assert_eq!(
            settings.get("device_id").await.unwrap().as_deref(),
            Some("def-456")
        );
    }

    #[tokio::test]
    async fn test_sync_mode_defaults_to_immediate() {
        let db = test_db().await;
        assert_eq!(db.settings().sync_mode().await.unwrap(), SyncMode::Immediate);
    }

    #[tokio::test]
    async fn test_sync_mode_round_trips() {
        let db = test_db().await;
        let settings = db.settings();

        settings.set_sync_mode(SyncMode::Deferred).await.unwrap();
        assert_eq!(settings.sync_mode().await.unwrap(), SyncMode::Deferred);

        settings.set_sync_mode(SyncMode::Immediate).await.unwrap();
        assert_eq!(settings.sync_mode().await.unwrap(), SyncMode::Immediate);
    }

    #[tokio::test]
    async fn test_garbage_sync_mode_falls_back_to_default() {
        let db = test_db().await;
        db.settings().set("sync_mode", "telepathy").await.unwrap();
        assert_eq!(db.settings().sync_mode().await.unwrap(), SyncMode::Immediate);
    }
}
