//! # solace-crypto: PIN-Derived Crypto Primitives for Solace
//!
//! Three small, sharply separated concerns:
//!
//! - [`kdf`] - Argon2id derivation of a symmetric key from the PIN, with a
//!   per-vault random salt. Deliberately slow: the 10,000-value PIN space
//!   means the derivation cost is the only meaningful brute-force cost.
//! - [`seal`] - authenticated encryption (XChaCha20-Poly1305) of the remote
//!   secret under the derived key. Wrong PIN or corrupted bytes are
//!   *detected*, never returned as garbage plaintext.
//! - [`pin_hash`] - an independent one-way verification hash of the PIN, so
//!   a PIN attempt can be checked without touching the encrypted secret and
//!   without paying the sealing KDF cost twice.
//!
//! ## Why two Argon2 derivations?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   PIN ──┬── kdf::derive_key (salt A) ──► 32-byte key ──► seal/open     │
//! │         │                                                               │
//! │         └── pin_hash::hash  (salt B) ──► PHC string  ──► verify        │
//! │                                                                         │
//! │  Separate salts, separate parameters, separate outputs. Verifying a    │
//! │  PIN attempt never exposes or exercises the encryption key, and an     │
//! │  unlock failure is distinguishable from vault corruption internally    │
//! │  while staying merged at the user-facing boundary.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No function here logs, stores, or leaks its inputs; all key material and
//! decrypted plaintexts are zeroized on drop.

pub mod error;
pub mod kdf;
pub mod pin_hash;
pub mod seal;

pub use error::CryptoError;
pub use kdf::PinKey;
