//! Authenticated sealing of the vaulted secret.
//!
//! XChaCha20-Poly1305 (192-bit random nonce, 16-byte tag) under a key
//! derived from the PIN.
//!
//! Blob wire format:
//! ```text
//!   [ version (1) | kdf salt (16) | nonce (24) | ciphertext + tag ]
//! ```
//!
//! The salt travels inside the blob so `open` needs only the blob and the
//! PIN. The version byte is bound as AEAD associated data, so a blob cannot
//! be replayed under a future format.

use chacha20poly1305::{
    aead::{Aead, AeadCore, KeyInit, OsRng as AeadOsRng, Payload},
    XChaCha20Poly1305,
};
use zeroize::Zeroizing;

use crate::error::CryptoError;
use crate::kdf::{self, SALT_LEN};

/// Current blob format version.
const FORMAT_VERSION: u8 = 1;

/// Associated data binding the format version into the authentication tag.
const AAD: &[u8] = b"solace-credential-vault-v1";

/// XChaCha20 nonce length in bytes.
const NONCE_LEN: usize = 24;

/// Poly1305 tag length in bytes.
const TAG_LEN: usize = 16;

/// Minimum plausible blob: header plus an empty ciphertext's tag.
const MIN_BLOB_LEN: usize = 1 + SALT_LEN + NONCE_LEN + TAG_LEN;

/// Seals `secret` under a key derived from `pin`.
///
/// Generates a fresh salt and nonce on every call; sealing the same secret
/// twice yields unrelated blobs.
pub fn seal(secret: &[u8], pin: &str) -> Result<Vec<u8>, CryptoError> {
    let salt = kdf::generate_salt();
    let key = kdf::derive_key(pin, &salt)?;

    let cipher =
        XChaCha20Poly1305::new_from_slice(key.as_bytes()).map_err(|_| CryptoError::Encrypt)?;
    let nonce = XChaCha20Poly1305::generate_nonce(&mut AeadOsRng);

    let ciphertext = cipher
        .encrypt(&nonce, Payload { msg: secret, aad: AAD })
        .map_err(|_| CryptoError::Encrypt)?;

    let mut blob = Vec::with_capacity(1 + SALT_LEN + NONCE_LEN + ciphertext.len());
    blob.push(FORMAT_VERSION);
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Opens a sealed blob with `pin`.
///
/// Fails closed: a wrong PIN, a truncated blob, an unknown version, and a
/// tampered ciphertext all return [`CryptoError::DecryptFailed`] with no
/// further detail and no partial plaintext.
pub fn open(blob: &[u8], pin: &str) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if blob.len() < MIN_BLOB_LEN || blob[0] != FORMAT_VERSION {
        return Err(CryptoError::DecryptFailed);
    }

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&blob[1..1 + SALT_LEN]);
    let nonce_bytes = &blob[1 + SALT_LEN..1 + SALT_LEN + NONCE_LEN];
    let ciphertext = &blob[1 + SALT_LEN + NONCE_LEN..];

    // The KDF itself cannot tell a wrong PIN from a right one; only the
    // authentication tag decides.
    let key = kdf::derive_key(pin, &salt).map_err(|_| CryptoError::DecryptFailed)?;

    let cipher = XChaCha20Poly1305::new_from_slice(key.as_bytes())
        .map_err(|_| CryptoError::DecryptFailed)?;
    let nonce = chacha20poly1305::XNonce::from_slice(nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, Payload { msg: ciphertext, aad: AAD })
        .map_err(|_| CryptoError::DecryptFailed)?;

    Ok(Zeroizing::new(plaintext))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let blob = seal(b"s3cret-password", "4821").unwrap();
        let opened = open(&blob, "4821").unwrap();
        assert_eq!(opened.as_slice(), b"s3cret-password");
    }

    #[test]
    fn test_wrong_pin_fails_closed() {
        let blob = seal(b"s3cret-password", "4821").unwrap();
        assert!(matches!(
            open(&blob, "0000"),
            Err(CryptoError::DecryptFailed)
        ));
    }

    #[test]
    fn test_sealing_twice_yields_distinct_blobs() {
        let a = seal(b"same secret", "4821").unwrap();
        let b = seal(b"same secret", "4821").unwrap();
        // Fresh salt + fresh nonce every time.
        assert_ne!(a, b);
    }

    #[test]
    fn test_tampered_ciphertext_detected() {
        let mut blob = seal(b"s3cret", "4821").unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert!(matches!(
            open(&blob, "4821"),
            Err(CryptoError::DecryptFailed)
        ));
    }

    #[test]
    fn test_tampered_salt_detected() {
        let mut blob = seal(b"s3cret", "4821").unwrap();
        blob[3] ^= 0xff; // inside the embedded salt
        assert!(matches!(
            open(&blob, "4821"),
            Err(CryptoError::DecryptFailed)
        ));
    }

    #[test]
    fn test_truncated_blob_rejected() {
        let blob = seal(b"s3cret", "4821").unwrap();
        assert!(open(&blob[..MIN_BLOB_LEN - 1], "4821").is_err());
        assert!(open(&[], "4821").is_err());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut blob = seal(b"s3cret", "4821").unwrap();
        blob[0] = 2;
        assert!(matches!(
            open(&blob, "4821"),
            Err(CryptoError::DecryptFailed)
        ));
    }

    #[test]
    fn test_blob_layout() {
        let blob = seal(b"abc", "4821").unwrap();
        assert_eq!(blob[0], FORMAT_VERSION);
        // header + 3 plaintext bytes + tag
        assert_eq!(blob.len(), 1 + SALT_LEN + NONCE_LEN + 3 + TAG_LEN);
    }
}
