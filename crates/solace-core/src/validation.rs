//! # Input Validation
//!
//! Format rules checked before any expensive work (key derivation, network)
//! happens. A rejected input never reaches solace-crypto or the backend.

use crate::error::ValidationError;
use crate::PIN_LENGTH;

/// Validates the PIN format: exactly [`PIN_LENGTH`] ASCII digits.
///
/// This is a *format* check only. Whether the PIN is correct for the vault
/// is decided by the verification hash in solace-crypto.
///
/// ## Example
/// ```rust
/// use solace_core::validation::validate_pin;
///
/// assert!(validate_pin("4821").is_ok());
/// assert!(validate_pin("482").is_err());
/// assert!(validate_pin("48215").is_err());
/// assert!(validate_pin("4a21").is_err());
/// ```
pub fn validate_pin(pin: &str) -> Result<(), ValidationError> {
    if pin.len() != PIN_LENGTH || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidPinFormat {
            expected: PIN_LENGTH,
        });
    }
    Ok(())
}

/// Validates that the account identifier is non-empty.
pub fn validate_account_identifier(account: &str) -> Result<(), ValidationError> {
    if account.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "account identifier",
        });
    }
    Ok(())
}

/// Validates that the secret to vault is non-empty.
///
/// An empty secret would "round-trip" fine but could never sign in
/// anywhere, so it is rejected up front.
pub fn validate_secret(secret: &[u8]) -> Result<(), ValidationError> {
    if secret.is_empty() {
        return Err(ValidationError::Required { field: "secret" });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pins() {
        for pin in ["0000", "4821", "9999", "0001"] {
            assert!(validate_pin(pin).is_ok(), "expected {pin} to be valid");
        }
    }

    #[test]
    fn test_invalid_pin_lengths() {
        for pin in ["", "1", "123", "12345", "000000"] {
            assert!(validate_pin(pin).is_err(), "expected {pin} to be invalid");
        }
    }

    #[test]
    fn test_non_digit_pins_rejected() {
        for pin in ["12a4", "١٢٣٤", "12.4", " 123", "12 4", "-123"] {
            assert!(validate_pin(pin).is_err(), "expected {pin} to be invalid");
        }
    }

    #[test]
    fn test_account_identifier_required() {
        assert!(validate_account_identifier("user@example.com").is_ok());
        assert!(validate_account_identifier("").is_err());
        assert!(validate_account_identifier("   ").is_err());
    }

    #[test]
    fn test_secret_required() {
        assert!(validate_secret(b"s3cret").is_ok());
        assert!(validate_secret(b"").is_err());
    }
}
