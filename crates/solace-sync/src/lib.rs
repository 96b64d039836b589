//! # solace-sync: Orchestration Layer for Solace
//!
//! Composes the pure domain logic (solace-core), the crypto primitives
//! (solace-crypto), and the persistence layer (solace-db) into the four
//! services the embedding app talks to.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        solace-sync                                      │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌───────────────────────────┐  │
//! │  │   AuthFlow   │──►│CredentialVault│──►│ solace-crypto (seal/hash) │  │
//! │  │ (session     │   │ (PIN-guarded │   └───────────────────────────┘  │
//! │  │  machine)    │   │  storage)    │──► solace-db (vault row)         │
//! │  └──────┬───────┘   └──────────────┘                                   │
//! │         │                                                              │
//! │         ▼                                                              │
//! │  ┌──────────────┐   ┌──────────────┐                                   │
//! │  │ ActionQueue  │──►│SyncCoordinator│──► RemoteBackend (trait, injected)│
//! │  │ (durable     │   │ (delivery +  │                                   │
//! │  │  outbox)     │   │  outcomes)   │                                   │
//! │  └──────────────┘   └──────────────┘                                   │
//! │         │                                                              │
//! │         ▼                                                              │
//! │  solace-db (pending_actions, settings)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`auth`] - The authentication session flow
//! - [`vault`] - PIN-guarded credential storage
//! - [`queue`] - The durable action queue
//! - [`coordinator`] - Delivery and outcome classification
//! - [`backend`] - The remote backend trait
//! - [`biometric`] - The biometric capability seam
//! - [`config`] - TOML configuration
//! - [`mock`] - In-memory collaborators for tests and previews
//! - [`error`] - Error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod backend;
pub mod biometric;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod mock;
pub mod queue;
pub mod vault;

// =============================================================================
// Re-exports
// =============================================================================

pub use auth::AuthFlow;
pub use backend::{BackendError, RemoteBackend, Session};
pub use biometric::{BiometricAuthenticator, Biometrics};
pub use config::SyncConfig;
pub use coordinator::{DeliveryOutcome, SyncCoordinator};
pub use error::{SyncError, SyncResult};
pub use queue::ActionQueue;
pub use vault::{CredentialVault, UnlockedCredentials, VaultStatus};
