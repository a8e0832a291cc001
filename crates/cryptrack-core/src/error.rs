//! # Error Types
//!
//! Validation errors for cryptrack-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cryptrack-core errors (this file)                                     │
//! │  └── ValidationError  - Local input failures (no network involved)     │
//! │                                                                         │
//! │  cryptrack-store errors (separate crate)                               │
//! │  └── DbError          - Local persistence failures                     │
//! │                                                                         │
//! │  cryptrack-profile errors (separate crate)                             │
//! │  └── ProfileError     - Upload / update / fetch / availability         │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What the user sees (inline or alert)           │
//! │                                                                         │
//! │  Flow: ValidationError → ProfileError → ApiError → Screen              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field in every message
//! 3. Errors are enum variants, never String
//! 4. Validation errors are surfaced inline, next to the field

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors block a submission before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., invalid UUID, unsupported image type).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is already taken by another record.
    ///
    /// ## When This Occurs
    /// - The availability check found another profile with this username
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A remote check for this field has not settled yet.
    ///
    /// ## When This Occurs
    /// - Submit pressed while the username availability check is in flight
    /// - The last settled check was for a different candidate
    #[error("{field} is still being checked")]
    Pending { field: String },
}

impl ValidationError {
    /// Creates a TooShort error.
    pub fn too_short(field: impl Into<String>, min: usize) -> Self {
        ValidationError::TooShort {
            field: field.into(),
            min,
        }
    }

    /// Returns the name of the offending field (for inline display).
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::Duplicate { field, .. }
            | ValidationError::Pending { field } => field,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "username".to_string(),
        };
        assert_eq!(err.to_string(), "username is required");

        let err = ValidationError::too_short("username", 3);
        assert_eq!(err.to_string(), "username must be at least 3 characters");

        let err = ValidationError::Duplicate {
            field: "username".to_string(),
            value: "alice".to_string(),
        };
        assert_eq!(err.to_string(), "username 'alice' already exists");
    }

    #[test]
    fn test_field_accessor() {
        let err = ValidationError::Pending {
            field: "username".to_string(),
        };
        assert_eq!(err.field(), "username");
    }
}
