//! # Action Queue
//!
//! The durable outbox for user actions, with immediate or deferred
//! delivery.
//!
//! ## Drain Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           drain()                                       │
//! │                                                                         │
//! │  try_lock drain mutex ──── already held ──► empty report, no error     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for item in pending (FIFO by id):                                      │
//! │       │  stop requested? ──► break, rest stays queued                   │
//! │       │                                                                 │
//! │       ├─ Delivered ──► remove row, succeeded += 1                       │
//! │       └─ Failed    ──► record attempt + error, failed += 1,             │
//! │                        CONTINUE to the next item                        │
//! │                        (no head-of-line blocking)                       │
//! │                                                                         │
//! │  Removal strictly follows acknowledgment. A crash or cancellation       │
//! │  between the two re-sends the item next drain: at-least-once, never    │
//! │  silent loss.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Immediate mode is a latency optimization only: the append happens first
//! either way, and an immediate delivery failure simply leaves the row for
//! the next drain.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use solace_core::{DrainReport, NewAction, QueueItem, QueueStats, SyncMode};
use solace_db::Database;

use crate::coordinator::{DeliveryOutcome, SyncCoordinator};
use crate::error::SyncResult;

/// The durable action queue.
#[derive(Clone)]
pub struct ActionQueue {
    db: Database,
    coordinator: SyncCoordinator,

    /// Held for the duration of a drain; `try_lock` makes drains
    /// single-flight without ever blocking a caller.
    drain_lock: Arc<Mutex<()>>,

    /// Cooperative cancellation, checked between items.
    stop: Arc<AtomicBool>,
}

impl ActionQueue {
    /// Creates a queue over the given database and coordinator.
    pub fn new(db: Database, coordinator: SyncCoordinator) -> Self {
        ActionQueue {
            db,
            coordinator,
            drain_lock: Arc::new(Mutex::new(())),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Appends an action durably, then (in Immediate mode) attempts to
    /// deliver it right away.
    ///
    /// The append is unconditional and comes first: by the time any
    /// network is involved the action already survives a crash. The
    /// returned item reflects the row's state after the attempt.
    pub async fn enqueue(&self, action: NewAction) -> SyncResult<QueueItem> {
        let item = self.db.queue().insert(&action).await?;
        let mode = self.db.settings().sync_mode().await?;

        if mode == SyncMode::Deferred {
            return Ok(item);
        }

        match self.coordinator.deliver(&item).await {
            DeliveryOutcome::Delivered => {
                self.db.queue().remove(item.id).await?;
                debug!(id = item.id, "Immediate delivery succeeded");
                Ok(item)
            }
            DeliveryOutcome::Failed { reason, .. } => {
                self.db.queue().record_failure(item.id, &reason).await?;
                debug!(id = item.id, "Immediate delivery failed; item stays queued");
                // Re-read so attempts/last_error are current.
                Ok(self.db.queue().get(item.id).await?.unwrap_or(item))
            }
        }
    }

    /// Delivers all pending items in FIFO order.
    ///
    /// Single-flight: a drain that finds another in progress returns an
    /// empty report immediately. Failures are counted, not propagated; a
    /// failed item stays queued and the drain moves on.
    pub async fn drain(&self) -> SyncResult<DrainReport> {
        let Ok(_guard) = self.drain_lock.try_lock() else {
            debug!("Drain already in progress; skipping");
            return Ok(DrainReport::default());
        };

        self.stop.store(false, Ordering::SeqCst);

        let pending = self.db.queue().pending().await?;
        if pending.is_empty() {
            return Ok(DrainReport::default());
        }

        info!(count = pending.len(), "Draining action queue");
        let mut report = DrainReport::default();

        for item in pending {
            if self.stop.load(Ordering::SeqCst) {
                info!(
                    delivered = report.succeeded,
                    "Drain cancelled; remaining items stay queued"
                );
                break;
            }

            match self.coordinator.deliver(&item).await {
                DeliveryOutcome::Delivered => {
                    self.db.queue().remove(item.id).await?;
                    report.succeeded += 1;
                }
                DeliveryOutcome::Failed { reason, .. } => {
                    self.db.queue().record_failure(item.id, &reason).await?;
                    report.failed += 1;
                }
            }
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "Drain complete"
        );
        Ok(report)
    }

    /// Requests that an in-progress drain stop after the current item.
    /// Items not yet acknowledged stay queued. No-op when nothing drains.
    pub fn stop_drain(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// All pending items, oldest first, without delivering anything.
    pub async fn peek_all(&self) -> SyncResult<Vec<QueueItem>> {
        Ok(self.db.queue().pending().await?)
    }

    /// Deletes every pending item, returning how many were dropped.
    pub async fn purge(&self) -> SyncResult<u64> {
        let dropped = self.db.queue().purge().await?;
        info!(dropped, "Queue purged");
        Ok(dropped)
    }

    /// Pending count and per-kind breakdown.
    pub async fn stats(&self) -> SyncResult<QueueStats> {
        Ok(self.db.queue().stats().await?)
    }

    /// Current sync mode.
    pub async fn mode(&self) -> SyncResult<SyncMode> {
        Ok(self.db.settings().sync_mode().await?)
    }

    /// Switches the sync mode. Takes effect on the next enqueue; already
    /// queued items are unaffected either way.
    pub async fn set_mode(&self, mode: SyncMode) -> SyncResult<()> {
        self.db.settings().set_sync_mode(mode).await?;
        info!(mode = %mode, "Sync mode changed");
        Ok(())
    }
}
