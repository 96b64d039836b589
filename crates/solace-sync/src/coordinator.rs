//! # Sync Coordinator
//!
//! Translates backend results into delivery outcomes for the queue.
//!
//! The coordinator is the only place that talks to [`RemoteBackend::submit`]
//! and the only place that decides retryability. A backend error never
//! escapes as an error: the queue sees an outcome, acts on it, and moves to
//! the next item.

use std::sync::Arc;

use tracing::{debug, warn};

use solace_core::QueueItem;

use crate::backend::RemoteBackend;

/// Result of attempting to deliver one queue item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The backend acknowledged the item; it can be removed.
    Delivered,

    /// Delivery failed; the item stays queued.
    Failed {
        /// Whether a later identical attempt can succeed on its own.
        retryable: bool,
        /// Human-readable cause, recorded on the row for diagnostics.
        reason: String,
    },
}

/// Delivers queue items to the remote backend and classifies the results.
#[derive(Clone)]
pub struct SyncCoordinator {
    backend: Arc<dyn RemoteBackend>,
}

impl SyncCoordinator {
    /// Creates a coordinator over the given backend.
    pub fn new(backend: Arc<dyn RemoteBackend>) -> Self {
        SyncCoordinator { backend }
    }

    /// Attempts to deliver one item. Infallible by design: every backend
    /// result maps to an outcome.
    pub async fn deliver(&self, item: &QueueItem) -> DeliveryOutcome {
        match self.backend.submit(item.kind, &item.payload).await {
            Ok(()) => {
                debug!(id = item.id, kind = %item.kind, "Action delivered");
                DeliveryOutcome::Delivered
            }
            Err(err) => {
                let retryable = err.is_retryable();
                warn!(
                    id = item.id,
                    kind = %item.kind,
                    retryable,
                    error = %err,
                    "Action delivery failed"
                );
                DeliveryOutcome::Failed {
                    retryable,
                    reason: err.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use crate::mock::MockBackend;
    use chrono::Utc;
    use solace_core::ActionKind;

    fn item() -> QueueItem {
        QueueItem {
            id: 1,
            kind: ActionKind::Note,
            payload: r#"{"text":"hello"}"#.to_string(),
            enqueued_at: Utc::now(),
            attempts: 0,
            last_error: None,
        }
    }

    #[tokio::test]
    async fn test_acknowledged_submit_is_delivered() {
        let backend = Arc::new(MockBackend::new());
        let coordinator = SyncCoordinator::new(backend.clone());

        assert_eq!(coordinator.deliver(&item()).await, DeliveryOutcome::Delivered);
        assert_eq!(backend.submit_calls(), 1);
    }

    #[tokio::test]
    async fn test_connection_failure_is_retryable() {
        let backend = Arc::new(MockBackend::new());
        backend.push_submit_result(Err(BackendError::Connection("refused".into())));
        let coordinator = SyncCoordinator::new(backend);

        match coordinator.deliver(&item()).await {
            DeliveryOutcome::Failed { retryable, reason } => {
                assert!(retryable);
                assert!(reason.contains("refused"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rejection_is_not_retryable() {
        let backend = Arc::new(MockBackend::new());
        backend.push_submit_result(Err(BackendError::Rejected("too large".into())));
        let coordinator = SyncCoordinator::new(backend);

        match coordinator.deliver(&item()).await {
            DeliveryOutcome::Failed { retryable, .. } => assert!(!retryable),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
