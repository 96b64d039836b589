//! # Pending Action Queue Repository
//!
//! Persistence for the durable action outbox.
//!
//! ## Outbox Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      pending_actions Lifecycle                          │
//! │                                                                         │
//! │  insert(action) ──► row written (attempts = 0)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  pending() ──► rows in insertion order (id ASC)                        │
//! │       │                                                                 │
//! │       ├── backend accepted ──► remove(id)          row gone            │
//! │       │                                                                 │
//! │       └── delivery failed  ──► record_failure(id)  attempts += 1,      │
//! │                                                    last_error updated,  │
//! │                                                    row stays queued     │
//! │                                                                         │
//! │  Removal happens AFTER acknowledgment. A crash between delivery and    │
//! │  removal re-sends the item on the next drain (at-least-once).          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use solace_core::{ActionKind, KindCount, NewAction, QueueItem, QueueStats};

use crate::error::{DbError, DbResult};

/// Repository for the pending action outbox.
#[derive(Debug, Clone)]
pub struct QueueRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct QueueRow {
    id: i64,
    kind: String,
    payload: String,
    enqueued_at: String,
    attempts: i64,
    last_error: Option<String>,
}

impl QueueRow {
    fn into_item(self) -> DbResult<QueueItem> {
        let kind = ActionKind::parse(&self.kind)
            .map_err(|e| DbError::corrupt("pending_actions", e.to_string()))?;
        let enqueued_at = DateTime::parse_from_rfc3339(&self.enqueued_at)
            .map_err(|e| DbError::corrupt("pending_actions", format!("enqueued_at: {e}")))?
            .with_timezone(&Utc);

        Ok(QueueItem {
            id: self.id,
            kind,
            payload: self.payload,
            enqueued_at,
            attempts: self.attempts,
            last_error: self.last_error,
        })
    }
}

impl QueueRepository {
    /// Creates a new repository with the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        QueueRepository { pool }
    }

    /// Appends an action to the queue and returns the stored item.
    ///
    /// The payload is serialized once here; replay later sends exactly
    /// these bytes.
    pub async fn insert(&self, action: &NewAction) -> DbResult<QueueItem> {
        let payload = serde_json::to_string(&action.payload)
            .map_err(|e| DbError::Internal(format!("payload serialization: {e}")))?;
        let enqueued_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO pending_actions (kind, payload, enqueued_at, attempts)
            VALUES (?, ?, ?, 0)
            "#,
        )
        .bind(action.kind.as_str())
        .bind(&payload)
        .bind(enqueued_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, kind = %action.kind, "Action enqueued");

        Ok(QueueItem {
            id,
            kind: action.kind,
            payload,
            enqueued_at,
            attempts: 0,
            last_error: None,
        })
    }

    /// Returns all pending items in insertion order (oldest first).
    pub async fn pending(&self) -> DbResult<Vec<QueueItem>> {
        let rows: Vec<QueueRow> = sqlx::query_as(
            r#"
            SELECT id, kind, payload, enqueued_at, attempts, last_error
            FROM pending_actions
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(QueueRow::into_item).collect()
    }

    /// Fetches a single pending item by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<QueueItem>> {
        let row: Option<QueueRow> = sqlx::query_as(
            r#"
            SELECT id, kind, payload, enqueued_at, attempts, last_error
            FROM pending_actions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row.into_item()?)),
            None => Ok(None),
        }
    }

    /// Removes an item after the backend acknowledged it. Idempotent.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM pending_actions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id, "Action removed from queue");
        Ok(())
    }

    /// Records a failed delivery attempt: bumps `attempts`, stores the
    /// error text. The row stays queued.
    pub async fn record_failure(&self, id: i64, error: &str) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE pending_actions
            SET attempts = attempts + 1, last_error = ?
            WHERE id = ?
            "#,
        )
        .bind(error)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                entity: "PendingAction".to_string(),
                id: id.to_string(),
            });
        }

        debug!(id, error, "Delivery failure recorded");
        Ok(())
    }

    /// Deletes every pending item. Used when the local account is wiped.
    pub async fn purge(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM pending_actions")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Returns the total pending count and a per-kind breakdown.
    pub async fn stats(&self) -> DbResult<QueueStats> {
        let pending: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pending_actions")
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT kind, COUNT(*) as count
            FROM pending_actions
            GROUP BY kind
            ORDER BY kind ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let by_kind = rows
            .into_iter()
            .map(|(kind, count)| {
                let kind = ActionKind::parse(&kind)
                    .map_err(|e| DbError::corrupt("pending_actions", e.to_string()))?;
                Ok(KindCount { kind, count })
            })
            .collect::<DbResult<Vec<_>>>()?;

        Ok(QueueStats { pending, by_kind })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use serde_json::json;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn note(text: &str) -> NewAction {
        NewAction::new(ActionKind::Note, json!({ "text": text }))
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let db = test_db().await;
        let queue = db.queue();

        let a = queue.insert(&note("first")).await.unwrap();
        let b = queue.insert(&note("second")).await.unwrap();

        assert!(b.id > a.id);
        assert_eq!(a.attempts, 0);
        assert!(a.last_error.is_none());
    }

    #[tokio::test]
    async fn test_pending_returns_insertion_order() {
        let db = test_db().await;
        let queue = db.queue();

        queue.insert(&note("first")).await.unwrap();
        queue
            .insert(&NewAction::new(ActionKind::Message, json!({ "body": "hi" })))
            .await
            .unwrap();
        queue.insert(&note("third")).await.unwrap();

        let items = queue.pending().await.unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(items[1].kind, ActionKind::Message);
    }

    #[tokio::test]
    async fn test_remove_deletes_only_target_row() {
        let db = test_db().await;
        let queue = db.queue();

        let a = queue.insert(&note("keep")).await.unwrap();
        let b = queue.insert(&note("drop")).await.unwrap();

        queue.remove(b.id).await.unwrap();

        let items = queue.pending().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, a.id);

        // Removing an already-removed row is fine.
        queue.remove(b.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_record_failure_bumps_attempts_and_keeps_row() {
        let db = test_db().await;
        let queue = db.queue();

        let item = queue.insert(&note("flaky")).await.unwrap();
        queue.record_failure(item.id, "connection refused").await.unwrap();
        queue.record_failure(item.id, "timeout").await.unwrap();

        let stored = queue.get(item.id).await.unwrap().unwrap();
        assert_eq!(stored.attempts, 2);
        assert_eq!(stored.last_error.as_deref(), Some("timeout"));
        // Payload untouched by failure bookkeeping.
        assert_eq!(stored.payload, item.payload);
    }

    #[tokio::test]
    async fn test_record_failure_on_missing_row_is_not_found() {
        let db = test_db().await;
        let err = db.queue().record_failure(42, "boom").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_purge_empties_queue() {
        let db = test_db().await;
        let queue = db.queue();

        queue.insert(&note("a")).await.unwrap();
        queue.insert(&note("b")).await.unwrap();

        assert_eq!(queue.purge().await.unwrap(), 2);
        assert!(queue.pending().await.unwrap().is_empty());
        assert_eq!(queue.purge().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stats_breaks_down_by_kind() {
        let db = test_db().await;
        let queue = db.queue();

        queue.insert(&note("a")).await.unwrap();
        queue.insert(&note("b")).await.unwrap();
        queue
            .insert(&NewAction::new(ActionKind::Feedback, json!({ "stars": 5 })))
            .await
            .unwrap();

        let stats = queue.stats().await.unwrap();
        assert_eq!(stats.pending, 3);
        assert_eq!(stats.by_kind.len(), 2);

        let notes = stats
            .by_kind
            .iter()
            .find(|kc| kc.kind == ActionKind::Note)
            .unwrap();
        assert_eq!(notes.count, 2);
    }

    #[tokio::test]
    async fn test_unknown_kind_surfaces_corrupt_record() {
        let db = test_db().await;

        sqlx::query(
            r#"
            INSERT INTO pending_actions (kind, payload, enqueued_at, attempts)
            VALUES ('selfie', '{}', '2026-01-01T00:00:00+00:00', 0)
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db.queue().pending().await.unwrap_err();
        assert!(matches!(err, DbError::CorruptRecord { .. }));
    }
}
