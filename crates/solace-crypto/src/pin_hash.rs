//! PIN verification hashing.
//!
//! An Argon2id PHC string with its own random salt and lighter parameters
//! than the sealing KDF. This lets the UI answer "is this PIN even
//! plausible" without touching the encrypted secret and without paying the
//! full sealing-KDF cost on every failed guess.
//!
//! Verification goes through the argon2 crate's `verify_password`, which
//! compares in constant time; a mismatch leaks nothing about where the
//! hashes diverge.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version,
};

use crate::error::CryptoError;

/// Argon2id parameters for the verification hash.
///
/// Lighter than the sealing KDF (16 MiB / 2 / 2): this hash gates the UI,
/// so it must stay interactive, while remaining far from free for an
/// offline attacker. The two derivations share no salt and no output.
fn verify_params() -> Params {
    Params::new(
        16 * 1024, // m_cost: 16 MiB
        2,         // t_cost
        2,         // p_cost
        None,
    )
    .expect("static Argon2 params are valid")
}

fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, verify_params())
}

/// Hashes a PIN into a self-describing PHC string (salt and parameters
/// embedded). Every call generates a fresh salt.
pub fn hash(pin: &str) -> Result<String, CryptoError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()
        .hash_password(pin.as_bytes(), &salt)
        .map_err(|e| CryptoError::Hash(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Verifies a PIN attempt against a stored PHC string.
///
/// Returns `false` both for a wrong PIN and for an unparseable hash; a
/// corrupted stored hash must fail closed, not error differently.
pub fn verify(pin: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(pin.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_correct_pin() {
        let h = hash("4821").unwrap();
        assert!(verify("4821", &h));
    }

    #[test]
    fn test_verify_rejects_wrong_pin() {
        let h = hash("4821").unwrap();
        for wrong in ["0000", "4822", "1248", ""] {
            assert!(!verify(wrong, &h), "expected {wrong:?} to be rejected");
        }
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash("4821").unwrap();
        let b = hash("4821").unwrap();
        assert_ne!(a, b);
        assert!(verify("4821", &a));
        assert!(verify("4821", &b));
    }

    #[test]
    fn test_hash_is_phc_argon2id() {
        let h = hash("4821").unwrap();
        assert!(h.starts_with("$argon2id$"));
    }

    #[test]
    fn test_corrupt_stored_hash_fails_closed() {
        assert!(!verify("4821", "not-a-phc-string"));
        assert!(!verify("4821", ""));
    }
}
