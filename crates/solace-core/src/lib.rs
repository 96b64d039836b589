//! # solace-core: Pure Domain Logic for Solace
//!
//! This crate is the I/O-free heart of the Solace wellness app core:
//! the data model for the credential vault and the offline action queue,
//! PIN format validation, and the authentication session state machine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Solace Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    App / UI (out of scope)                      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    solace-sync (orchestration)                  │   │
//! │  │    CredentialVault · AuthFlow · ActionQueue · SyncCoordinator   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ solace-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  session  │  │ validation│  │   error   │  │   │
//! │  │   │ QueueItem │  │ AuthState │  │ PIN rules │  │  typed    │  │   │
//! │  │   │ SyncMode  │  │  machine  │  │           │  │  errors   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO CRYPTO                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (QueueItem, ActionKind, SyncMode, VaultRecord)
//! - [`session`] - The authentication session state machine
//! - [`validation`] - PIN format and input validation
//! - [`error`] - Domain error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use session::{AuthEvent, AuthSessionMachine, AuthState, Transition};
pub use types::{
    ActionKind, DrainReport, KindCount, NewAction, QueueItem, QueueStats, SyncMode, VaultRecord,
};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of digits a valid PIN has.
///
/// The PIN space is deliberately tiny (10^4 values); the security of the
/// vault rests on the slow key derivation in solace-crypto, not on PIN
/// entropy. The format is still enforced strictly so every other layer can
/// assume it.
pub const PIN_LENGTH: usize = 4;
