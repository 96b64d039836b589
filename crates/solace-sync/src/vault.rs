//! # Credential Vault
//!
//! Stores the remote account's credentials on-device, guarded by a PIN.
//!
//! ## What Is Stored
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     credential_vault row                                │
//! │                                                                         │
//! │  account_identifier   plaintext (it is not a secret)                   │
//! │  pin_hash             Argon2id PHC string - verification only          │
//! │  encrypted_secret     the account password, sealed under a key         │
//! │                       derived from the PIN                             │
//! │                                                                         │
//! │  NEVER stored: the PIN, the plaintext secret, the derived key.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fail-Closed Rules
//! - A wrong PIN and a corrupt sealed blob both surface as
//!   [`SyncError::IncorrectPin`]; nothing above this layer can tell them
//!   apart.
//! - An unreadable vault row is treated as "no vault configured". The user
//!   re-runs setup; the library never guesses at corrupted contents.

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use zeroize::Zeroizing;

use solace_core::validation::{validate_account_identifier, validate_pin, validate_secret};
use solace_core::VaultRecord;
use solace_crypto::{pin_hash, seal};
use solace_db::{Database, DbError};

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Types
// =============================================================================

/// Credentials recovered by a successful unlock. The secret zeroizes on
/// drop; hold this only as long as the sign-in call needs it.
pub struct UnlockedCredentials {
    /// The remote account's login identifier.
    pub account_identifier: String,

    /// The remote account's plaintext secret.
    pub secret: Zeroizing<Vec<u8>>,
}

/// What the UI needs to know about the vault without unlocking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultStatus {
    /// A vault exists and is readable.
    Configured {
        account_identifier: String,
        biometric_enabled: bool,
        created_at: DateTime<Utc>,
    },

    /// No vault, or an unreadable one (fail closed).
    NotConfigured,
}

// =============================================================================
// Credential Vault
// =============================================================================

/// PIN-guarded storage for the remote account's credentials.
#[derive(Clone)]
pub struct CredentialVault {
    db: Database,
}

impl CredentialVault {
    /// Creates a vault over the given database.
    pub fn new(db: Database) -> Self {
        CredentialVault { db }
    }

    /// Configures (or reconfigures) the vault.
    ///
    /// Validates all inputs first, then writes the verification hash and
    /// the sealed secret as one row. A previous vault is overwritten
    /// wholesale; there is never a row with one half updated.
    pub async fn setup(
        &self,
        account_identifier: &str,
        pin: &str,
        secret: &[u8],
        biometric_enabled: bool,
    ) -> SyncResult<()> {
        validate_account_identifier(account_identifier)?;
        validate_pin(pin)?;
        validate_secret(secret)?;

        let record = VaultRecord {
            account_identifier: account_identifier.to_string(),
            pin_hash: pin_hash::hash(pin)?,
            encrypted_secret: seal::seal(secret, pin)?,
            biometric_enabled,
            created_at: Utc::now(),
        };

        self.db.vault().replace(&record).await?;

        info!(account = %account_identifier, biometric_enabled, "Vault configured");
        Ok(())
    }

    /// Checks a PIN attempt against the verification hash without touching
    /// the sealed secret.
    pub async fn verify(&self, pin: &str) -> SyncResult<bool> {
        validate_pin(pin)?;
        let record = self.readable_record().await?.ok_or(SyncError::NoVaultConfigured)?;
        Ok(pin_hash::verify(pin, &record.pin_hash))
    }

    /// Unlocks the vault, recovering the plaintext credentials.
    ///
    /// ## Errors
    /// * [`SyncError::NoVaultConfigured`] - no vault (or unreadable row)
    /// * [`SyncError::IncorrectPin`] - wrong PIN, or a sealed blob that
    ///   fails authentication
    pub async fn unlock(&self, pin: &str) -> SyncResult<UnlockedCredentials> {
        validate_pin(pin)?;

        let record = self.readable_record().await?.ok_or(SyncError::NoVaultConfigured)?;

        if !pin_hash::verify(pin, &record.pin_hash) {
            return Err(SyncError::IncorrectPin);
        }

        // The verification hash passed, so a failure here means the blob
        // itself is bad; it still surfaces as IncorrectPin.
        let secret = seal::open(&record.encrypted_secret, pin)?;

        Ok(UnlockedCredentials {
            account_identifier: record.account_identifier,
            secret,
        })
    }

    /// Removes the vault row. Idempotent; the action queue is untouched.
    pub async fn clear(&self) -> SyncResult<()> {
        self.db.vault().clear().await?;
        Ok(())
    }

    /// Toggles biometric gating on the existing vault.
    pub async fn set_biometric_enabled(&self, enabled: bool) -> SyncResult<()> {
        self.db.vault().set_biometric_enabled(enabled).await.map_err(|e| match e {
            DbError::NotFound { .. } => SyncError::NoVaultConfigured,
            other => other.into(),
        })
    }

    /// Reports the vault's state for the UI.
    pub async fn status(&self) -> SyncResult<VaultStatus> {
        match self.readable_record().await? {
            Some(record) => Ok(VaultStatus::Configured {
                account_identifier: record.account_identifier,
                biometric_enabled: record.biometric_enabled,
                created_at: record.created_at,
            }),
            None => Ok(VaultStatus::NotConfigured),
        }
    }

    /// Reads the vault row, collapsing a corrupt row into `None`.
    async fn readable_record(&self) -> SyncResult<Option<VaultRecord>> {
        match self.db.vault().get().await {
            Ok(record) => Ok(record),
            Err(DbError::CorruptRecord { table, reason }) => {
                warn!(table, reason, "Unreadable vault row; treating as not configured");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use solace_db::DbConfig;

    async fn vault() -> CredentialVault {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CredentialVault::new(db)
    }

    #[tokio::test]
    async fn test_setup_then_unlock_round_trips() {
        let vault = vault().await;
        vault
            .setup("user@example.com", "4821", b"remote-password", false)
            .await
            .unwrap();

        let creds = vault.unlock("4821").await.unwrap();
        assert_eq!(creds.account_identifier, "user@example.com");
        assert_eq!(creds.secret.as_slice(), b"remote-password");
    }

    #[tokio::test]
    async fn test_wrong_pin_is_incorrect_pin() {
        let vault = vault().await;
        vault
            .setup("user@example.com", "4821", b"remote-password", false)
            .await
            .unwrap();

        assert!(matches!(
            vault.unlock("0000").await,
            Err(SyncError::IncorrectPin)
        ));
        assert!(!vault.verify("0000").await.unwrap());
        assert!(vault.verify("4821").await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_pin_rejected_before_any_crypto() {
        let vault = vault().await;
        assert!(matches!(
            vault.unlock("12a4").await,
            Err(SyncError::InvalidPin(_))
        ));
        assert!(matches!(
            vault.setup("user@example.com", "123", b"s", false).await,
            Err(SyncError::InvalidPin(_))
        ));
    }

    #[tokio::test]
    async fn test_unlock_without_vault() {
        let vault = vault().await;
        assert!(matches!(
            vault.unlock("4821").await,
            Err(SyncError::NoVaultConfigured)
        ));
        assert_eq!(vault.status().await.unwrap(), VaultStatus::NotConfigured);
    }

    #[tokio::test]
    async fn test_clear_returns_to_not_configured() {
        let vault = vault().await;
        vault
            .setup("user@example.com", "4821", b"secret", true)
            .await
            .unwrap();

        vault.clear().await.unwrap();
        assert_eq!(vault.status().await.unwrap(), VaultStatus::NotConfigured);
        assert!(matches!(
            vault.unlock("4821").await,
            Err(SyncError::NoVaultConfigured)
        ));

        // Idempotent.
        vault.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_reconfigure_replaces_previous_vault() {
        let vault = vault().await;
        vault.setup("a@example.com", "1111", b"old", false).await.unwrap();
        vault.setup("b@example.com", "2222", b"new", false).await.unwrap();

        // Old PIN no longer works; new one recovers the new secret.
        assert!(matches!(
            vault.unlock("1111").await,
            Err(SyncError::IncorrectPin)
        ));
        let creds = vault.unlock("2222").await.unwrap();
        assert_eq!(creds.account_identifier, "b@example.com");
        assert_eq!(creds.secret.as_slice(), b"new");
    }

    #[tokio::test]
    async fn test_biometric_toggle_requires_vault() {
        let vault = vault().await;
        assert!(matches!(
            vault.set_biometric_enabled(true).await,
            Err(SyncError::NoVaultConfigured)
        ));

        vault.setup("user@example.com", "4821", b"s", false).await.unwrap();
        vault.set_biometric_enabled(true).await.unwrap();

        match vault.status().await.unwrap() {
            VaultStatus::Configured { biometric_enabled, .. } => assert!(biometric_enabled),
            other => panic!("unexpected status: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_corrupt_row_fails_closed_to_not_configured() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let vault = CredentialVault::new(db.clone());

        sqlx::query(
            r#"
            INSERT INTO credential_vault
                (id, account_identifier, pin_hash, encrypted_secret, biometric_enabled, created_at)
            VALUES (1, 'user@example.com', 'hash', X'01', 0, 'garbage')
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        assert_eq!(vault.status().await.unwrap(), VaultStatus::NotConfigured);
        assert!(matches!(
            vault.unlock("4821").await,
            Err(SyncError::NoVaultConfigured)
        ));
    }
}
