//! # Remote Backend Trait
//!
//! The seam between this library and whatever transport the embedding app
//! uses to reach the remote service. Everything above deals in this trait;
//! nothing here knows about HTTP, gRPC, or anything else.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sign_in(account, secret) ──► Session      credentials accepted        │
//! │                          └──► BackendError credentials rejected or     │
//! │                                            unreachable                 │
//! │                                                                         │
//! │  submit(kind, payload)   ──► Ok(())        action durably accepted     │
//! │                          └──► BackendError see is_retryable()          │
//! │                                                                         │
//! │  submit may be called more than once for the same action (crash        │
//! │  between delivery and local removal); the backend must tolerate        │
//! │  duplicates.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use thiserror::Error;

use solace_core::ActionKind;

// =============================================================================
// Session
// =============================================================================

/// An active remote session, returned from a successful sign-in.
#[derive(Debug, Clone)]
pub struct Session {
    /// The account this session belongs to.
    pub account_identifier: String,

    /// Opaque session token, held for the backend's benefit.
    pub token: String,
}

// =============================================================================
// Backend Errors
// =============================================================================

/// Errors a backend implementation can report.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The backend could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The request timed out.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The presented credentials were rejected.
    #[error("Credentials rejected")]
    Unauthorized,

    /// The backend understood the request and refused it.
    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl BackendError {
    /// True when the same request can succeed later without changes.
    ///
    /// Connection failures and timeouts are transient; a rejection or an
    /// authorization failure will repeat until something else changes.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BackendError::Connection(_) | BackendError::Timeout(_)
        )
    }
}

// =============================================================================
// Backend Trait
// =============================================================================

/// The remote service, as seen from this library.
///
/// Implementations are injected by the embedding app; tests use
/// [`crate::mock::MockBackend`].
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Authenticates with the remote service.
    async fn sign_in(&self, account: &str, secret: &[u8]) -> Result<Session, BackendError>;

    /// Submits one user action. `payload` is the exact JSON enqueued.
    async fn submit(&self, kind: ActionKind, payload: &str) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_backend_errors() {
        assert!(BackendError::Connection("refused".into()).is_retryable());
        assert!(BackendError::Timeout(30).is_retryable());

        assert!(!BackendError::Unauthorized.is_retryable());
        assert!(!BackendError::Rejected("payload too large".into()).is_retryable());
    }
}
