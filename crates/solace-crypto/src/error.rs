//! Crypto error types.
//!
//! `DecryptFailed` is intentionally a unit variant: wrong PIN, truncated
//! blob, unknown format version, and tampered ciphertext all collapse into
//! the same error, carrying no material and no hint of where the failure
//! occurred.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    /// Argon2 rejected its inputs (parameter or salt length problem).
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// Encryption failed. Should not happen with valid key material.
    #[error("Encryption failed")]
    Encrypt,

    /// Decryption or authentication failed. Deliberately carries no detail.
    #[error("Decryption failed")]
    DecryptFailed,

    /// Producing the PIN verification hash failed.
    #[error("Hashing failed: {0}")]
    Hash(String),
}

/// Result type alias for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
