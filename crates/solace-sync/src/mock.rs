//! # Mock Collaborators
//!
//! In-process stand-ins for the remote backend and the biometric prompt.
//! They live in the library (not behind `cfg(test)`) so integration tests
//! and the embedding app's previews can share them.
//!
//! ## MockBackend Scripting
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit results      a FIFO script; when empty, submits succeed        │
//! │  sign-in accounts    (account, secret) pairs that authenticate         │
//! │  sign-in failure     one forced error, consumed by the next attempt    │
//! │  gate                optional semaphore; submit counts the call, THEN  │
//! │                      waits on a permit, so tests can deterministically │
//! │                      hold a drain mid-item without sleeping            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use solace_core::ActionKind;

use crate::backend::{BackendError, RemoteBackend, Session};
use crate::biometric::BiometricAuthenticator;

// =============================================================================
// Mock Backend
// =============================================================================

/// A scripted in-memory backend.
#[derive(Default)]
pub struct MockBackend {
    /// Accounts that sign in successfully: (account, secret).
    accounts: Mutex<Vec<(String, Vec<u8>)>>,

    /// One-shot forced sign-in error.
    sign_in_failure: Mutex<Option<BackendError>>,

    /// FIFO of scripted submit results. Empty means success.
    submit_script: Mutex<VecDeque<Result<(), BackendError>>>,

    /// Every submit, in order.
    submissions: Mutex<Vec<(ActionKind, String)>>,

    /// Total submit calls, counted before any gating.
    submit_count: AtomicUsize,

    /// Total sign-in calls.
    sign_in_count: AtomicUsize,

    /// Optional gate: each submit consumes one permit after counting.
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        MockBackend::default()
    }

    /// Registers credentials that `sign_in` will accept.
    pub fn with_account(self, account: &str, secret: &[u8]) -> Self {
        self.add_account(account, secret);
        self
    }

    /// Registers credentials on an existing mock.
    pub fn add_account(&self, account: &str, secret: &[u8]) {
        self.accounts
            .lock()
            .unwrap()
            .push((account.to_string(), secret.to_vec()));
    }

    /// Forces the next sign-in attempt to fail with `err`.
    pub fn fail_next_sign_in(&self, err: BackendError) {
        *self.sign_in_failure.lock().unwrap() = Some(err);
    }

    /// Appends a scripted submit result. Results are consumed in FIFO
    /// order; once the script runs dry, submits succeed.
    pub fn push_submit_result(&self, result: Result<(), BackendError>) {
        self.submit_script.lock().unwrap().push_back(result);
    }

    /// Installs a semaphore gate on submit. Tests control progress by
    /// adding permits.
    pub fn set_gate(&self, gate: Arc<Semaphore>) {
        *self.gate.lock().unwrap() = Some(gate);
    }

    /// Number of submit calls made so far.
    pub fn submit_calls(&self) -> usize {
        self.submit_count.load(Ordering::SeqCst)
    }

    /// Number of sign-in calls made so far.
    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_count.load(Ordering::SeqCst)
    }

    /// Everything submitted, in call order.
    pub fn submissions(&self) -> Vec<(ActionKind, String)> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteBackend for MockBackend {
    async fn sign_in(&self, account: &str, secret: &[u8]) -> Result<Session, BackendError> {
        self.sign_in_count.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.sign_in_failure.lock().unwrap().take() {
            return Err(err);
        }

        let known = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .any(|(a, s)| a == account && s == secret);

        if known {
            Ok(Session {
                account_identifier: account.to_string(),
                token: format!("mock-token-{}", self.sign_in_calls()),
            })
        } else {
            Err(BackendError::Unauthorized)
        }
    }

    async fn submit(&self, kind: ActionKind, payload: &str) -> Result<(), BackendError> {
        // Count and record before gating, so a test can observe that the
        // call arrived while still holding it.
        self.submit_count.fetch_add(1, Ordering::SeqCst);
        self.submissions
            .lock()
            .unwrap()
            .push((kind, payload.to_string()));

        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| BackendError::Connection("gate closed".into()))?;
            permit.forget();
        }

        self.submit_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

// =============================================================================
// Mock Biometrics
// =============================================================================

/// A biometric adapter with a fixed outcome.
pub struct MockBiometrics {
    outcome: bool,
    prompts: AtomicUsize,
}

impl MockBiometrics {
    /// An adapter whose prompt always reports `outcome`.
    pub fn with_outcome(outcome: bool) -> Self {
        MockBiometrics {
            outcome,
            prompts: AtomicUsize::new(0),
        }
    }

    /// Number of prompts shown.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BiometricAuthenticator for MockBiometrics {
    async fn authenticate(&self) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registered_account_signs_in() {
        let backend = MockBackend::new().with_account("user@example.com", b"hunter2");

        let session = backend.sign_in("user@example.com", b"hunter2").await.unwrap();
        assert_eq!(session.account_identifier, "user@example.com");

        let err = backend.sign_in("user@example.com", b"wrong").await.unwrap_err();
        assert!(matches!(err, BackendError::Unauthorized));
    }

    #[tokio::test]
    async fn test_submit_script_is_fifo_then_success() {
        let backend = MockBackend::new();
        backend.push_submit_result(Err(BackendError::Timeout(5)));

        assert!(backend.submit(ActionKind::Note, "{}").await.is_err());
        assert!(backend.submit(ActionKind::Note, "{}").await.is_ok());
        assert_eq!(backend.submit_calls(), 2);
    }

    #[tokio::test]
    async fn test_forced_sign_in_failure_is_one_shot() {
        let backend = MockBackend::new().with_account("a", b"s");
        backend.fail_next_sign_in(BackendError::Connection("offline".into()));

        assert!(backend.sign_in("a", b"s").await.is_err());
        assert!(backend.sign_in("a", b"s").await.is_ok());
    }
}
