//! # Credential Vault Repository
//!
//! Persistence for the single credential vault row.
//!
//! ## Single-Row Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  credential_vault                                                       │
//! │                                                                         │
//! │  id = 1 ── enforced by CHECK (id = 1) in the schema                    │
//! │                                                                         │
//! │  At most one local identity per device. `replace` overwrites the       │
//! │  whole row atomically; there is no partial update of the sealed        │
//! │  secret, so a crash mid-setup leaves either the old vault or the       │
//! │  new one, never a mix.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fail-Closed Reads
//! A row that cannot be decoded (bad timestamp, empty hash) surfaces as
//! [`DbError::CorruptRecord`]. Callers treat that the same as "no vault":
//! re-setup is the only way out, never guessing at the contents.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use solace_core::VaultRecord;

use crate::error::{DbError, DbResult};

/// Repository for the credential vault row.
#[derive(Debug, Clone)]
pub struct VaultRepository {
    pool: SqlitePool,
}

/// Raw row shape, decoded leniently so corruption can be reported with
/// table-level context instead of a generic sqlx decode error.
#[derive(Debug, sqlx::FromRow)]
struct VaultRow {
    account_identifier: String,
    pin_hash: String,
    encrypted_secret: Vec<u8>,
    biometric_enabled: i64,
    created_at: String,
}

impl VaultRow {
    fn into_record(self) -> DbResult<VaultRecord> {
        if self.account_identifier.is_empty() {
            return Err(DbError::corrupt("credential_vault", "empty account identifier"));
        }
        if self.pin_hash.is_empty() {
            return Err(DbError::corrupt("credential_vault", "empty pin hash"));
        }
        if self.encrypted_secret.is_empty() {
            return Err(DbError::corrupt("credential_vault", "empty sealed secret"));
        }

        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| DbError::corrupt("credential_vault", format!("created_at: {e}")))?
            .with_timezone(&Utc);

        Ok(VaultRecord {
            account_identifier: self.account_identifier,
            pin_hash: self.pin_hash,
            encrypted_secret: self.encrypted_secret,
            biometric_enabled: self.biometric_enabled != 0,
            created_at,
        })
    }
}

impl VaultRepository {
    /// Creates a new repository with the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        VaultRepository { pool }
    }

    /// Writes the vault row, replacing any previous one.
    ///
    /// `INSERT OR REPLACE` keeps this a single atomic statement; the CHECK
    /// constraint pins the id to 1.
    pub async fn replace(&self, record: &VaultRecord) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO credential_vault
                (id, account_identifier, pin_hash, encrypted_secret, biometric_enabled, created_at)
            VALUES (1, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.account_identifier)
        .bind(&record.pin_hash)
        .bind(&record.encrypted_secret)
        .bind(record.biometric_enabled as i64)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        info!(
            account = %record.account_identifier,
            "Credential vault written"
        );
        Ok(())
    }

    /// Reads the vault row, if one exists.
    ///
    /// ## Returns
    /// * `Ok(Some(record))` - A decodable vault is configured
    /// * `Ok(None)` - No vault row
    /// * `Err(DbError::CorruptRecord)` - A row exists but cannot be trusted
    pub async fn get(&self) -> DbResult<Option<VaultRecord>> {
        let row: Option<VaultRow> = sqlx::query_as(
            r#"
            SELECT account_identifier, pin_hash, encrypted_secret, biometric_enabled, created_at
            FROM credential_vault
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row.into_record()?)),
            None => Ok(None),
        }
    }

    /// Returns whether a vault row exists, without decoding it.
    pub async fn exists(&self) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM credential_vault WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Updates the biometric preference on the existing vault row.
    pub async fn set_biometric_enabled(&self, enabled: bool) -> DbResult<()> {
        let result =
            sqlx::query("UPDATE credential_vault SET biometric_enabled = ? WHERE id = 1")
                .bind(enabled as i64)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                entity: "CredentialVault".to_string(),
                id: "1".to_string(),
            });
        }

        debug!(enabled, "Biometric preference updated");
        Ok(())
    }

    /// Deletes the vault row. Idempotent.
    pub async fn clear(&self) -> DbResult<()> {
        sqlx::query("DELETE FROM credential_vault WHERE id = 1")
            .execute(&self.pool)
            .await?;

        info!("Credential vault cleared");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
