//! # Biometric Capability
//!
//! Platform biometric prompts, behind a trait so the library never touches
//! OS APIs. The capability is resolved once at startup: either an adapter
//! is provided or the device has none, and the auth flow routes around it.
//!
//! Biometrics gate the PIN screen; they never substitute for the PIN. A
//! passed prompt still leads to PIN entry, because only the PIN can derive
//! the key that opens the vault.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

/// A platform biometric prompt (fingerprint, face).
#[async_trait]
pub trait BiometricAuthenticator: Send + Sync {
    /// Shows the platform prompt and waits for the outcome.
    ///
    /// Returns `false` for failure, cancellation, and any platform error;
    /// the caller falls back to PIN entry in every non-true case.
    async fn authenticate(&self) -> bool;
}

/// The device's biometric capability, fixed at startup.
#[derive(Clone)]
pub enum Biometrics {
    /// An adapter is available.
    Available(Arc<dyn BiometricAuthenticator>),

    /// No biometric hardware, or the platform refused enrollment.
    Unavailable,
}

impl Biometrics {
    /// Whether a prompt can be shown at all.
    pub fn is_available(&self) -> bool {
        matches!(self, Biometrics::Available(_))
    }

    /// Runs the prompt. `Unavailable` reports failure, which the auth flow
    /// treats as a fallback to PIN entry.
    pub async fn prompt(&self) -> bool {
        match self {
            Biometrics::Available(auth) => auth.authenticate().await,
            Biometrics::Unavailable => false,
        }
    }
}

impl fmt::Debug for Biometrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Biometrics::Available(_) => f.write_str("Biometrics::Available"),
            Biometrics::Unavailable => f.write_str("Biometrics::Unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysPass;

    #[async_trait]
    impl BiometricAuthenticator for AlwaysPass {
        async fn authenticate(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_unavailable_prompt_fails() {
        let b = Biometrics::Unavailable;
        assert!(!b.is_available());
        assert!(!b.prompt().await);
    }

    #[tokio::test]
    async fn test_available_delegates_to_adapter() {
        let b = Biometrics::Available(Arc::new(AlwaysPass));
        assert!(b.is_available());
        assert!(b.prompt().await);
    }
}
