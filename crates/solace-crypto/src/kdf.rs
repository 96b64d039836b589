//! Key derivation: Argon2id over the PIN.
//!
//! Derives the 32-byte key used to seal the vaulted secret. The salt is
//! generated once per vault and stored inside the sealed blob (it is not
//! secret); re-running setup generates a fresh salt.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::ZeroizeOnDrop;

use crate::error::CryptoError;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (XChaCha20-Poly1305 key size).
pub const KEY_LEN: usize = 32;

/// 32-byte sealing key derived from the PIN. Zeroized on drop.
#[derive(ZeroizeOnDrop)]
pub struct PinKey(pub(crate) [u8; KEY_LEN]);

impl PinKey {
    /// Read access for the sealing cipher. Not exposed outside this crate.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Argon2id parameters for the sealing key.
///
/// 64 MiB / 3 iterations / 1 lane, tuned for an interactive unlock on a
/// phone-class device (~hundreds of milliseconds). With a 10,000-value PIN
/// space this puts an offline sweep of every PIN in the range of an hour
/// of dedicated memory-hard computation per vault, which is the entire
/// defense; there is no entropy to fall back on.
fn sealing_params() -> Params {
    Params::new(
        64 * 1024, // m_cost: 64 MiB
        3,         // t_cost: 3 iterations
        1,         // p_cost: 1 lane
        Some(KEY_LEN),
    )
    .expect("static Argon2 params are valid")
}

/// Derives the sealing key from a PIN and a 16-byte salt.
pub fn derive_key(pin: &str, salt: &[u8; SALT_LEN]) -> Result<PinKey, CryptoError> {
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, sealing_params());
    let mut output = [0u8; KEY_LEN];
    argon2
        .hash_password_into(pin.as_bytes(), salt, &mut output)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    Ok(PinKey(output))
}

/// Generates a fresh random salt. Called once per vault setup.
pub fn generate_salt() -> [u8; SALT_LEN] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    salt
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // Lighter params would make these tests faster, but running the real
    // parameters is the point: they must produce a usable key.

    #[test]
    fn test_same_pin_same_salt_same_key() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key("4821", &salt).unwrap();
        let b = derive_key("4821", &salt).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let a = derive_key("4821", &[1u8; SALT_LEN]).unwrap();
        let b = derive_key("4821", &[2u8; SALT_LEN]).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_different_pin_different_key() {
        let salt = [9u8; SALT_LEN];
        let a = derive_key("4821", &salt).unwrap();
        let b = derive_key("4822", &salt).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_generated_salts_are_unique() {
        assert_ne!(generate_salt(), generate_salt());
    }
}
