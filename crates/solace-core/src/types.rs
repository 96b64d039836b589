//! # Domain Types
//!
//! Data model for the credential vault and the offline action queue.
//!
//! ## Ownership Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Who May Touch What                                 │
//! │                                                                         │
//! │  VaultRecord      written only by CredentialVault (solace-sync)        │
//! │  QueueItem        mutated only by ActionQueue (attempts/last_error)    │
//! │  SyncMode         read on every enqueue, switched by the user          │
//! │                                                                         │
//! │  No other component reads raw encrypted bytes or raw queue payloads.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// =============================================================================
// Action Kinds
// =============================================================================

/// Category of a queued user action.
///
/// The payload attached to each kind is opaque to the queue; the kind only
/// tells the backend which endpoint the payload belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// A chat/support message written by the user.
    Message,
    /// A free-form journal note.
    Note,
    /// A structured log entry (mood, habit, symptom tracking).
    StructuredLog,
    /// User feedback on app content.
    Feedback,
}

impl ActionKind {
    /// All kinds, in a stable order (used for stats breakdowns).
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Message,
        ActionKind::Note,
        ActionKind::StructuredLog,
        ActionKind::Feedback,
    ];

    /// The storage representation of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Message => "message",
            ActionKind::Note => "note",
            ActionKind::StructuredLog => "structured_log",
            ActionKind::Feedback => "feedback",
        }
    }

    /// Parses the storage representation back into a kind.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "message" => Ok(ActionKind::Message),
            "note" => Ok(ActionKind::Note),
            "structured_log" => Ok(ActionKind::StructuredLog),
            "feedback" => Ok(ActionKind::Feedback),
            other => Err(CoreError::UnknownActionKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Queue Items
// =============================================================================

/// A user action waiting to be created on the queue.
///
/// This is what the UI layers hand over; the queue assigns the id and
/// timestamp when the row is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAction {
    /// Action category.
    pub kind: ActionKind,

    /// Category-specific structured payload. Opaque to the queue.
    pub payload: serde_json::Value,
}

impl NewAction {
    pub fn new(kind: ActionKind, payload: serde_json::Value) -> Self {
        NewAction { kind, payload }
    }
}

/// A durable queue entry awaiting delivery to the remote backend.
///
/// ## Mutation Rules
/// After insertion only `attempts` and `last_error` ever change. A failed
/// delivery leaves the row in place (bumping `attempts`) rather than
/// rewriting it, so replay after restart sends exactly the bytes the user
/// produced. Exactly-once delivery is explicitly NOT guaranteed; the
/// backend is expected to tolerate duplicate inserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    /// Creation-ordered id (SQLite AUTOINCREMENT).
    pub id: i64,

    /// Action category.
    pub kind: ActionKind,

    /// JSON payload, opaque to the queue.
    pub payload: String,

    /// When the action was enqueued.
    pub enqueued_at: DateTime<Utc>,

    /// Count of delivery attempts so far. Diagnostics only.
    pub attempts: i64,

    /// Most recent delivery error, if any. Diagnostics only.
    pub last_error: Option<String>,
}

// =============================================================================
// Drain Reporting
// =============================================================================

/// Aggregate result of one drain pass.
///
/// Failures are surfaced here (and as a pending count), never as a blocking
/// error: a failed item simply stays queued for the next drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainReport {
    /// Items confirmed by the backend and removed from the queue.
    pub succeeded: u32,

    /// Items that failed delivery and remain queued.
    pub failed: u32,
}

impl DrainReport {
    /// Total number of items a delivery was attempted for.
    pub fn attempted(&self) -> u32 {
        self.succeeded + self.failed
    }
}

/// Pending count for one action kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCount {
    pub kind: ActionKind,
    pub count: i64,
}

/// Queue statistics for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Total items awaiting delivery.
    pub pending: i64,

    /// Per-kind breakdown (kinds with zero pending are omitted).
    pub by_kind: Vec<KindCount>,
}

// =============================================================================
// Sync Mode
// =============================================================================

/// Whether new actions attempt synchronous delivery or merely enqueue.
///
/// ## Mode Behavior
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  IMMEDIATE (default)                                                    │
/// │  ───────────────────                                                    │
/// │  • enqueue() appends durably, then attempts delivery right away        │
/// │  • a delivery failure leaves the row queued for the next drain         │
/// │  • a latency optimization, NOT a reliability distinction               │
/// │                                                                         │
/// │  DEFERRED                                                               │
/// │  ────────                                                               │
/// │  • enqueue() only appends                                               │
/// │  • delivery happens solely via an explicit drain()                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Attempt synchronous delivery on every enqueue.
    #[default]
    Immediate,

    /// Append only; deliver on explicit drain.
    Deferred,
}

impl SyncMode {
    /// The storage representation of this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Immediate => "immediate",
            SyncMode::Deferred => "deferred",
        }
    }

    /// Parses the storage representation; unknown values fall back to the
    /// default rather than failing, so a downgraded app keeps working.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "deferred" => SyncMode::Deferred,
            _ => SyncMode::Immediate,
        }
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Vault Record
// =============================================================================

/// The durable local credential record. At most one exists per device.
///
/// ## Invariant
/// `pin_hash` and `encrypted_secret` exist together or not at all: the
/// record is written and cleared wholesale, never field by field. Neither
/// the plaintext PIN nor the plaintext secret is ever part of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultRecord {
    /// The remote account's login identifier (e.g. email).
    pub account_identifier: String,

    /// Argon2id PHC string used only for PIN verification.
    /// Independent of the encryption key derivation.
    pub pin_hash: String,

    /// The remote account's password, sealed under a PIN-derived key.
    /// Format: version byte, KDF salt, nonce, ciphertext+tag.
    pub encrypted_secret: Vec<u8>,

    /// Whether biometric gating is layered in front of PIN entry.
    pub biometric_enabled: bool,

    /// When the vault was (re-)configured.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_kind_round_trip() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn test_action_kind_unknown() {
        assert!(ActionKind::parse("selfie").is_err());
        assert!(ActionKind::parse("").is_err());
        // Storage strings are snake_case, not the Rust variant names.
        assert!(ActionKind::parse("StructuredLog").is_err());
    }

    #[test]
    fn test_action_kind_serde_uses_snake_case() {
        let json = serde_json::to_string(&ActionKind::StructuredLog).unwrap();
        assert_eq!(json, "\"structured_log\"");
    }

    #[test]
    fn test_sync_mode_defaults_to_immediate() {
        assert_eq!(SyncMode::default(), SyncMode::Immediate);
        assert_eq!(SyncMode::parse_or_default("immediate"), SyncMode::Immediate);
        assert_eq!(SyncMode::parse_or_default("deferred"), SyncMode::Deferred);
        assert_eq!(SyncMode::parse_or_default("garbage"), SyncMode::Immediate);
    }

    #[test]
    fn test_drain_report_attempted() {
        let report = DrainReport {
            succeeded: 2,
            failed: 1,
        };
        assert_eq!(report.attempted(), 3);
        assert_eq!(DrainReport::default().attempted(), 0);
    }
}
