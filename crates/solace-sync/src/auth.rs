//! # Authentication Flow
//!
//! Drives the pure session machine against the vault, the remote backend,
//! and the biometric capability.
//!
//! ## Flow Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     First Run                                           │
//! │                                                                         │
//! │  bootstrap ─► NoLocalAuth                                              │
//! │       │                                                                 │
//! │  sign_in_first_time(account, secret)                                   │
//! │       │  remote accepts; credentials held in memory (zeroized)         │
//! │       ▼                                                                 │
//! │  PinSetup ── complete_pin_setup(pin) ──► vault written, Authenticated  │
//! │              (no second network round trip)                            │
//! │                                                                         │
//! │                     Returning User                                      │
//! │                                                                         │
//! │  bootstrap ─► QuickUnlock                                              │
//! │       │  begin_unlock: biometric gate iff enabled AND available        │
//! │       ▼                                                                 │
//! │  BiometricPrompt ── complete_biometric ──► PinEntry (pass OR fail)     │
//! │       │                                                                 │
//! │  PinEntry ── submit_pin(pin):                                          │
//! │       │        wrong PIN            ─► IncorrectPin, stays PinEntry    │
//! │       │        remote rejects       ─► RemoteAuthRejected, stays       │
//! │       │                                PinEntry, vault INTACT          │
//! │       │        offline              ─► Connection, stays PinEntry      │
//! │       ▼        both succeed         ─► Authenticated                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{info, warn};
use zeroize::Zeroizing;

use solace_core::{AuthEvent, AuthSessionMachine, AuthState};

use crate::backend::{BackendError, RemoteBackend, Session};
use crate::biometric::Biometrics;
use crate::error::{SyncError, SyncResult};
use crate::vault::{CredentialVault, VaultStatus};

/// Credentials accepted remotely but not yet vaulted, held only between
/// first sign-in and PIN setup.
struct PendingCredentials {
    account_identifier: String,
    secret: Zeroizing<Vec<u8>>,
}

/// Orchestrates the authentication session.
pub struct AuthFlow {
    vault: CredentialVault,
    backend: Arc<dyn RemoteBackend>,
    biometrics: Biometrics,
    machine: AuthSessionMachine,
    session: Option<Session>,
    pending: Option<PendingCredentials>,
    failed_attempts: u32,
}

impl AuthFlow {
    /// Builds the flow and restores the session state from storage.
    ///
    /// A readable vault starts at `QuickUnlock`; no vault, or an
    /// unreadable one, starts at `NoLocalAuth` (fail closed).
    pub async fn bootstrap(
        vault: CredentialVault,
        backend: Arc<dyn RemoteBackend>,
        biometrics: Biometrics,
    ) -> SyncResult<Self> {
        let initial = match vault.status().await? {
            VaultStatus::Configured { .. } => AuthState::QuickUnlock,
            VaultStatus::NotConfigured => AuthState::NoLocalAuth,
        };

        info!(state = ?initial, "Auth flow bootstrapped");

        Ok(AuthFlow {
            vault,
            backend,
            biometrics,
            machine: AuthSessionMachine::new(initial),
            session: None,
            pending: None,
            failed_attempts: 0,
        })
    }

    /// Current session state.
    pub fn state(&self) -> AuthState {
        self.machine.state()
    }

    /// Consecutive failed unlock attempts since the last success.
    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    /// The active remote session, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// First-run remote sign-in. On success the credentials are held in
    /// memory so PIN setup can vault them without another round trip.
    pub async fn sign_in_first_time(&mut self, account: &str, secret: &[u8]) -> SyncResult<()> {
        self.require_state(AuthState::NoLocalAuth)?;

        let session = self
            .backend
            .sign_in(account, secret)
            .await
            .map_err(map_sign_in_error)?;

        self.session = Some(session);
        self.pending = Some(PendingCredentials {
            account_identifier: account.to_string(),
            secret: Zeroizing::new(secret.to_vec()),
        });
        self.machine.apply(AuthEvent::RemoteSignInSucceeded);

        info!(account, "First-run remote sign-in succeeded");
        Ok(())
    }

    /// Vaults the pending credentials under the chosen PIN.
    pub async fn complete_pin_setup(&mut self, pin: &str, enable_biometric: bool) -> SyncResult<()> {
        self.require_state(AuthState::PinSetup)?;

        let pending = self
            .pending
            .take()
            .ok_or_else(|| SyncError::Internal("PinSetup state without pending credentials".into()))?;

        let enable_biometric = enable_biometric && self.biometrics.is_available();

        if let Err(e) = self
            .vault
            .setup(&pending.account_identifier, pin, &pending.secret, enable_biometric)
            .await
        {
            // Setup failed (e.g. bad PIN format); keep the credentials so
            // the user can try another PIN.
            self.pending = Some(pending);
            return Err(e);
        }

        self.machine.apply(AuthEvent::VaultConfigured);
        self.failed_attempts = 0;
        Ok(())
    }

    /// Starts an unlock. Routes through the biometric prompt only when the
    /// vault opted in AND the device can show one.
    pub async fn begin_unlock(&mut self) -> SyncResult<AuthState> {
        self.require_state(AuthState::QuickUnlock)?;

        let biometric_enabled = match self.vault.status().await? {
            VaultStatus::Configured { biometric_enabled, .. } => biometric_enabled,
            VaultStatus::NotConfigured => {
                // The vault disappeared underneath an open session surface.
                warn!("Vault vanished between bootstrap and unlock");
                self.machine.apply(AuthEvent::VaultCleared);
                return Err(SyncError::NoVaultConfigured);
            }
        };

        let gate = biometric_enabled && self.biometrics.is_available();
        self.machine.apply(AuthEvent::UnlockRequested { biometric_gate: gate });
        Ok(self.state())
    }

    /// Runs the biometric prompt. Pass and fail both land on PIN entry;
    /// the prompt is a gate, not a credential.
    pub async fn complete_biometric(&mut self) -> SyncResult<AuthState> {
        self.require_state(AuthState::BiometricPrompt)?;

        let passed = self.biometrics.prompt().await;
        self.machine.apply(if passed {
            AuthEvent::BiometricPassed
        } else {
            AuthEvent::BiometricFailed
        });

        Ok(self.state())
    }

    /// A PIN attempt: unlock the vault, then sign in remotely.
    ///
    /// Every failure leaves the machine on `PinEntry` and the vault
    /// intact; only the error variant tells the UI what to say.
    pub async fn submit_pin(&mut self, pin: &str) -> SyncResult<()> {
        self.require_state(AuthState::PinEntry)?;

        let creds = match self.vault.unlock(pin).await {
            Ok(creds) => creds,
            Err(e) => {
                self.failed_attempts += 1;
                self.machine.apply(AuthEvent::UnlockFailed);
                warn!(attempts = self.failed_attempts, "PIN unlock failed");
                return Err(e);
            }
        };

        match self
            .backend
            .sign_in(&creds.account_identifier, &creds.secret)
            .await
        {
            Ok(session) => {
                self.session = Some(session);
                self.failed_attempts = 0;
                self.machine.apply(AuthEvent::UnlockSucceeded);
                info!(account = %creds.account_identifier, "Unlock complete");
                Ok(())
            }
            Err(err) => {
                // The PIN was right; the remote said no (or was offline).
                // The vault stays; clearing it is only ever explicit.
                self.machine.apply(AuthEvent::UnlockFailed);
                Err(map_sign_in_error(err))
            }
        }
    }

    /// Ends the session. The vault stays; the next unlock starts at
    /// `QuickUnlock`.
    pub fn sign_out(&mut self) -> SyncResult<()> {
        self.require_state(AuthState::Authenticated)?;
        self.session = None;
        self.machine.apply(AuthEvent::SignedOut);
        info!("Signed out");
        Ok(())
    }

    /// Removes the vault and forgets everything local. Legal from any
    /// state; the next start is a first run.
    pub async fn clear_local_auth(&mut self) -> SyncResult<()> {
        self.vault.clear().await?;
        self.session = None;
        self.pending = None;
        self.failed_attempts = 0;
        self.machine.apply(AuthEvent::VaultCleared);
        info!("Local auth cleared");
        Ok(())
    }

    fn require_state(&self, expected: AuthState) -> SyncResult<()> {
        if self.state() == expected {
            Ok(())
        } else {
            Err(SyncError::InvalidState(self.state()))
        }
    }
}

fn map_sign_in_error(err: BackendError) -> SyncError {
    if err.is_retryable() {
        SyncError::Connection(err.to_string())
    } else {
        SyncError::RemoteAuthRejected(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBackend, MockBiometrics};
    use solace_db::{Database, DbConfig};

    async fn flow_with(backend: Arc<MockBackend>, biometrics: Biometrics) -> AuthFlow {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AuthFlow::bootstrap(CredentialVault::new(db), backend, biometrics)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_run_to_authenticated_single_round_trip() {
        let backend = Arc::new(MockBackend::new().with_account("user@example.com", b"pw"));
        let mut flow = flow_with(backend.clone(), Biometrics::Unavailable).await;

        assert_eq!(flow.state(), AuthState::NoLocalAuth);

        flow.sign_in_first_time("user@example.com", b"pw").await.unwrap();
        assert_eq!(flow.state(), AuthState::PinSetup);

        flow.complete_pin_setup("4821", false).await.unwrap();
        assert_eq!(flow.state(), AuthState::Authenticated);

        // Exactly one network sign-in for the whole setup.
        assert_eq!(backend.sign_in_calls(), 1);
    }

    #[tokio::test]
    async fn test_rejected_first_sign_in_stays_no_local_auth() {
        let backend = Arc::new(MockBackend::new());
        let mut flow = flow_with(backend, Biometrics::Unavailable).await;

        let err = flow.sign_in_first_time("who@example.com", b"nope").await.unwrap_err();
        assert!(matches!(err, SyncError::RemoteAuthRejected(_)));
        assert_eq!(flow.state(), AuthState::NoLocalAuth);
    }

    #[tokio::test]
    async fn test_bad_pin_format_during_setup_keeps_pending_credentials() {
        let backend = Arc::new(MockBackend::new().with_account("user@example.com", b"pw"));
        let mut flow = flow_with(backend, Biometrics::Unavailable).await;
        flow.sign_in_first_time("user@example.com", b"pw").await.unwrap();

        assert!(flow.complete_pin_setup("12", false).await.is_err());
        assert_eq!(flow.state(), AuthState::PinSetup);

        // A second attempt with a valid PIN still works.
        flow.complete_pin_setup("4821", false).await.unwrap();
        assert_eq!(flow.state(), AuthState::Authenticated);
    }

    #[tokio::test]
    async fn test_operations_rejected_in_wrong_state() {
        let backend = Arc::new(MockBackend::new());
        let mut flow = flow_with(backend, Biometrics::Unavailable).await;

        assert!(matches!(
            flow.submit_pin("4821").await,
            Err(SyncError::InvalidState(AuthState::NoLocalAuth))
        ));
        assert!(matches!(
            flow.begin_unlock().await,
            Err(SyncError::InvalidState(_))
        ));
        assert!(flow.sign_out().is_err());
    }

    #[tokio::test]
    async fn test_biometric_disabled_skips_prompt() {
        let backend = Arc::new(MockBackend::new().with_account("user@example.com", b"pw"));
        let mut flow = flow_with(
            backend,
            Biometrics::Available(Arc::new(MockBiometrics::with_outcome(true))),
        )
        .await;

        flow.sign_in_first_time("user@example.com", b"pw").await.unwrap();
        flow.complete_pin_setup("4821", false).await.unwrap();
        flow.sign_out().unwrap();

        // Biometrics available but not enabled on the vault.
        assert_eq!(flow.begin_unlock().await.unwrap(), AuthState::PinEntry);
    }

    #[tokio::test]
    async fn test_enabled_but_unavailable_biometrics_skip_prompt() {
        let backend = Arc::new(MockBackend::new().with_account("user@example.com", b"pw"));
        let mut flow = flow_with(backend, Biometrics::Unavailable).await;

        flow.sign_in_first_time("user@example.com", b"pw").await.unwrap();
        // Asking for biometrics on an Unavailable device degrades to off.
        flow.complete_pin_setup("4821", true).await.unwrap();
        flow.sign_out().unwrap();

        assert_eq!(flow.begin_unlock().await.unwrap(), AuthState::PinEntry);
    }
}
