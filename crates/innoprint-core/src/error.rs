//! # Error Types
//!
//! Domain-specific error types for innoprint-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  innoprint-core errors (this file)                                     │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  innoprint-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  innoprint-app errors                                                  │
//! │  ├── SessionError     - Unauthenticated / ownership / store failures   │
//! │  └── ApiError         - What the storefront sees (serialized)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Storefront             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (option id, file name, etc.)
//! 3. Errors are enum variants, never String
//!
//! Pricing itself has no error channel: once a request is resolved against
//! the option catalog, the computation cannot fail.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A catalogue model cannot be found.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// A print request named an option id missing from the option catalog.
    ///
    /// ## When This Occurs
    /// - Stale storefront bundle sending a retired material id
    /// - Catalog reconfigured without the id the request uses
    #[error("Unknown {kind} option: '{id}'")]
    UnknownOption { kind: OptionKind, id: String },

    /// Uploaded model file has an extension the printers cannot slice.
    #[error("Unsupported file format '{extension}'. Supported formats: {supported}")]
    UnsupportedFileFormat {
        extension: String,
        supported: String,
    },

    /// Uploaded model file exceeds the size limit.
    #[error("File size {size_bytes} bytes exceeds the {max_bytes} byte limit")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Which option table a lookup was made against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Material,
    Quality,
    Size,
    Color,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionKind::Material => write!(f, "material"),
            OptionKind::Quality => write!(f, "quality"),
            OptionKind::Size => write!(f, "size"),
            OptionKind::Color => write!(f, "color"),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any store call runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, malformed postal code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., two catalog options sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

impl ValidationError {
    /// Creates a `Required` error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
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
        let err = CoreError::UnknownOption {
            kind: OptionKind::Material,
            id: "nylon".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown material option: 'nylon'");

        let err = CoreError::FileTooLarge {
            size_bytes: 60,
            max_bytes: 50,
        };
        assert_eq!(
            err.to_string(),
            "File size 60 bytes exceeds the 50 byte limit"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("zip_code");
        assert_eq!(err.to_string(), "zip_code is required");

        let err = ValidationError::InvalidFormat {
            field: "zip_code".to_string(),
            reason: "must be 6 digits".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "zip_code has invalid format: must be 6 digits"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("name").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
