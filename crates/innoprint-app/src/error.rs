//! # API Error Type
//!
//! Unified error type for app commands, plus the session-level error the
//! AddressBook raises.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Innoprint                              │
//! │                                                                         │
//! │  Storefront UI                Rust Backend                              │
//! │  ─────────────                ────────────                              │
//! │                                                                         │
//! │  save_address(form)                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Not signed in? ──── SessionError::Unauthenticated ─┐            │  │
//! │  │         │                                           │            │  │
//! │  │         ▼                                           ▼            │  │
//! │  │  Store failed? ───── DbError ─► SessionError ───── ApiError ────►│  │
//! │  │         │                                           ▲            │  │
//! │  │         ▼                                           │            │  │
//! │  │  Bad input? ──────── ValidationError / CoreError ───┘            │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "UNAUTHENTICATED", "message": "Sign in to manage ..." }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors are serializable so any UI (CLI, web bridge) gets both a
//! machine-readable `code` and a human-readable `message`.

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use innoprint_core::{CoreError, ValidationError};
use innoprint_db::DbError;

use crate::state::ConfigError;

// =============================================================================
// Session Errors
// =============================================================================

/// Failures of AddressBook operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A mutation was attempted with nobody signed in. No store call is made.
    #[error("Sign in to manage saved addresses")]
    Unauthenticated,

    /// The address belongs to another user. No store call is made.
    #[error("Address {address_id} does not belong to the signed-in user")]
    Ownership { address_id: String },

    /// The submitted address form is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The address store failed. The store's message is kept as-is.
    #[error(transparent)]
    Store(#[from] DbError),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

// =============================================================================
// API Error
// =============================================================================

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Model not found: 42"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// No signed-in identity (401)
    Unauthenticated,

    /// Signed in, but not the owner (403)
    Forbidden,

    /// Database operation failed (500)
    DatabaseError,

    /// Uploaded file rejected
    UploadError,

    /// Internal error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ModelNotFound(id) => ApiError::not_found("Model", &id),
            CoreError::UnknownOption { .. } => ApiError::validation(err.to_string()),
            CoreError::UnsupportedFileFormat { .. } | CoreError::FileTooLarge { .. } => {
                ApiError::new(ErrorCode::UploadError, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Unauthenticated => {
                ApiError::new(ErrorCode::Unauthenticated, err.to_string())
            }
            SessionError::Ownership { .. } => ApiError::new(ErrorCode::Forbidden, err.to_string()),
            SessionError::Validation(e) => e.into(),
            SessionError::Store(e) => e.into(),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_errors_map_to_codes() {
        let api: ApiError = SessionError::Unauthenticated.into();
        assert_eq!(api.code, ErrorCode::Unauthenticated);

        let api: ApiError = SessionError::Ownership {
            address_id: "a-1".into(),
        }
        .into();
        assert_eq!(api.code, ErrorCode::Forbidden);
        assert!(api.message.contains("a-1"));

        let api: ApiError = SessionError::Store(DbError::not_found("Address", "a-2")).into();
        assert_eq!(api.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_store_message_is_kept_by_session_error() {
        let err = SessionError::from(DbError::ConnectionFailed("Pool is closed".into()));
        assert_eq!(err.to_string(), "Connection failed: Pool is closed");
    }

    #[test]
    fn test_upload_errors() {
        let api: ApiError = CoreError::FileTooLarge {
            size_bytes: 10,
            max_bytes: 5,
        }
        .into();
        assert_eq!(api.code, ErrorCode::UploadError);
    }

    #[test]
    fn test_serializes_screaming_code() {
        let json = serde_json::to_value(ApiError::not_found("Model", "9")).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Model not found: 9");
    }
}
