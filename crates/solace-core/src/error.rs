//! # Error Types
//!
//! Domain-specific error types for solace-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  solace-core errors (this file)                                        │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  solace-crypto errors (separate crate)                                 │
//! │  └── CryptoError      - KDF / seal / verify failures                   │
//! │                                                                         │
//! │  solace-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  solace-sync errors (separate crate)                                   │
//! │  └── SyncError        - What the embedding app sees                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Errors are enum variants, never String
//! 3. Each variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A stored action kind string could not be parsed.
    ///
    /// ## When This Occurs
    /// - A queue row was written by a newer app version with a kind this
    ///   version does not know
    /// - Storage corruption
    #[error("Unknown action kind: {0}")]
    UnknownActionKind(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements, and are surfaced
/// to the user immediately rather than retried.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// PIN does not have the required shape (exactly 4 ASCII digits).
    ///
    /// The message deliberately restates the rule and nothing about what
    /// was actually entered.
    #[error("PIN must be exactly {expected} digits")]
    InvalidPinFormat { expected: usize },

    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: &'static str },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::InvalidPinFormat { expected: 4 };
        assert_eq!(err.to_string(), "PIN must be exactly 4 digits");

        let err = ValidationError::Required {
            field: "account identifier",
        };
        assert_eq!(err.to_string(), "account identifier is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::InvalidPinFormat { expected: 4 };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_unknown_kind_message_includes_input() {
        let err = CoreError::UnknownActionKind("selfie".to_string());
        assert!(err.to_string().contains("selfie"));
    }
}
