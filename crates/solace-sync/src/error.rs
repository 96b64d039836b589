//! # Sync Error Types
//!
//! Error types for the orchestration layer.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Authentication │  │    Transport    │  │     Configuration       │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidPin     │  │  Connection     │  │  ConfigLoadFailed       │ │
//! │  │  IncorrectPin   │  │  (retryable)    │  │  ConfigSaveFailed       │ │
//! │  │  NoVault…       │  │                 │  │                         │ │
//! │  │  RemoteAuth…    │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  IncorrectPin deliberately covers both a wrong PIN and an encrypted    │
//! │  secret that fails to open: the user-facing answer is the same, and    │
//! │  distinguishing them would leak which digits of the vault are intact.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use solace_core::{AuthState, ValidationError};
use solace_crypto::CryptoError;
use solace_db::DbError;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Error type covering the orchestration layer.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Authentication Errors
    // =========================================================================
    /// The PIN does not have the required format.
    #[error(transparent)]
    InvalidPin(#[from] ValidationError),

    /// No credential vault is configured on this device.
    #[error("No credential vault configured on this device")]
    NoVaultConfigured,

    /// The PIN failed verification, or the sealed secret failed to open.
    #[error("Incorrect PIN")]
    IncorrectPin,

    /// The remote backend rejected the stored credentials. The local vault
    /// is left intact; only an explicit clear removes it.
    #[error("Remote sign-in rejected: {0}")]
    RemoteAuthRejected(String),

    /// No active session for an operation that requires one.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The requested operation is not valid in the current session state.
    #[error("Operation not valid in session state {0:?}")]
    InvalidState(AuthState),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Could not reach the remote backend. Retryable.
    #[error("Connection failed: {0}")]
    Connection(String),

    // =========================================================================
    // Storage and Serialization Errors
    // =========================================================================
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Payload (de)serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Failed to load the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<DbError> for SyncError {
    fn from(err: DbError) -> Self {
        SyncError::Database(err.to_string())
    }
}

/// Crypto failures collapse into the auth vocabulary: a failed decryption
/// IS a wrong PIN as far as anything above this layer is concerned.
impl From<CryptoError> for SyncError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::DecryptFailed => SyncError::IncorrectPin,
            other => SyncError::Internal(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization (for retry logic)
// =============================================================================

impl SyncError {
    /// Returns true if retrying the same operation later can succeed
    /// without any user intervention.
    ///
    /// ## Retryable
    /// - Connection failures (network issues)
    ///
    /// ## Non-Retryable
    /// - Wrong PIN, missing vault, rejected credentials (user must act)
    /// - Configuration and serialization errors (code/data must change)
    pub fn is_retryable(&self) -> bool {
        matches!(self, SyncError::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(SyncError::Connection("dns failure".into()).is_retryable());

        assert!(!SyncError::IncorrectPin.is_retryable());
        assert!(!SyncError::NoVaultConfigured.is_retryable());
        assert!(!SyncError::RemoteAuthRejected("expired".into()).is_retryable());
        assert!(!SyncError::Serialization("bad json".into()).is_retryable());
    }

    #[test]
    fn test_decrypt_failure_maps_to_incorrect_pin() {
        let err: SyncError = CryptoError::DecryptFailed.into();
        assert!(matches!(err, SyncError::IncorrectPin));

        let err: SyncError = CryptoError::Encrypt.into();
        assert!(matches!(err, SyncError::Internal(_)));
    }
}
