//! # API Error Type
//!
//! Unified error type for profile commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Crypto Tracker                         │
//! │                                                                         │
//! │  Screen                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  submit_profile()                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Gate failed? ─── ProfileError::Validation ──► inline, no alert  │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Upload failed? ─ ProfileError::Upload ──► "Error uploading      │  │
//! │  │         │                                   avatar" alert        │  │
//! │  │         ▼                                                        │  │
//! │  │  Write failed? ── ProfileError::Update ──► "Error updating       │  │
//! │  │         │                                   profile" alert       │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ─────────────────────► "Profile updated successfully"   │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Availability check failures are logged by the checker and never       │
//! │  reach this type.                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::error;

use cryptrack_profile::ProfileError;
use cryptrack_store::DbError;

/// Confirmation shown after a successful submit.
pub const SUCCESS_MESSAGE: &str = "Profile updated successfully";

/// API error returned from profile commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "UPLOAD_FAILED",
///   "title": "Error uploading avatar",
///   "message": "HTTP 413: Payload too large"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Alert title
    pub title: String,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before any remote call (shown inline)
    ValidationError,

    /// Avatar pick, read or upload failed
    UploadFailed,

    /// Profile record write failed
    UpdateFailed,

    /// Profile record read failed
    FetchFailed,

    /// A submit is already running
    Busy,

    /// No editor is open, or it was closed mid-call
    EditorClosed,

    /// Backend or session not configured
    ConfigError,

    /// Local database failed
    DatabaseError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, title: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError {
            code,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, "Invalid profile", message)
    }

    /// Creates an error for commands that need an open editor.
    pub fn editor_closed() -> Self {
        ApiError::new(
            ErrorCode::EditorClosed,
            "Profile editor",
            "Profile editor is not open",
        )
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, "Something went wrong", message)
    }

    /// Returns true if the screen should raise an alert for this error.
    ///
    /// Validation, busy and closed-editor errors stay inline.
    pub fn is_blocking(&self) -> bool {
        !matches!(
            self.code,
            ErrorCode::ValidationError | ErrorCode::Busy | ErrorCode::EditorClosed
        )
    }
}

/// Converts workflow errors to API errors.
impl From<ProfileError> for ApiError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::Validation(e) => ApiError::validation(e.to_string()),
            ProfileError::Upload(e) => {
                ApiError::new(ErrorCode::UploadFailed, "Error uploading avatar", e.to_string())
            }
            ProfileError::Update(e) => {
                ApiError::new(ErrorCode::UpdateFailed, "Error updating profile", e.to_string())
            }
            ProfileError::Fetch(e) => {
                ApiError::new(ErrorCode::FetchFailed, "Error loading profile", e.to_string())
            }
            ProfileError::AvailabilityCheck(e) => {
                error!("Availability failure escaped the checker: {}", e);
                ApiError::internal("Username availability check failed")
            }
            ProfileError::SubmitInProgress => ApiError::new(
                ErrorCode::Busy,
                "Profile update",
                ProfileError::SubmitInProgress.to_string(),
            ),
            ProfileError::EditorClosed => ApiError::editor_closed(),
            ProfileError::Persistence(e) => {
                error!("Profile persistence failed: {}", e);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    "Storage error",
                    "Could not save profile locally",
                )
            }
            other if other.is_config_error() => {
                ApiError::new(ErrorCode::ConfigError, "Configuration error", other.to_string())
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) => ApiError::new(
                ErrorCode::DatabaseError,
                "Storage error",
                "Database connection failed",
            ),
            DbError::MigrationFailed(_) => ApiError::new(
                ErrorCode::DatabaseError,
                "Storage error",
                "Database migration failed",
            ),
            other => {
                // Log the actual error but return a generic message
                error!("Database operation failed: {}", other);
                ApiError::new(
                    ErrorCode::DatabaseError,
                    "Storage error",
                    "Database operation failed",
                )
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl std::error::Error for ApiError {}
