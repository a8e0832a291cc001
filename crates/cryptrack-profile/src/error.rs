//! # Profile Error Types
//!
//! Error types for the profile edit workflow.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Profile Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Workflow      │  │     Local State         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Validation     │  │  SubmitInProgress       │ │
//! │  │  InvalidUrl     │  │  Upload         │  │  EditorClosed           │ │
//! │  │  MissingBackend │  │  Update         │  │  Persistence            │ │
//! │  │  MissingSession │  │  Fetch          │  │                         │ │
//! │  │  ConfigLoad/Save│  │  Availability*  │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  * AvailabilityCheck is logged by the checker and never returned.      │
//! │                                                                         │
//! │  ServiceError (transport) ──► wrapped by Upload / Update / Fetch       │
//! │                               at the operation boundary                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use cryptrack_core::ValidationError;
use cryptrack_store::DbError;
use thiserror::Error;

/// Result type alias for workflow operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Result type alias for collaborator (backend, storage, picker) calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Service Errors
// =============================================================================

/// Failure reported by an external collaborator.
///
/// Never surfaced raw: the workflow wraps it in the [`ProfileError`]
/// variant naming the operation that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("Request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The requested row or object does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The response body did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// Credentials were missing or rejected.
    #[error("Not authorized")]
    Unauthorized,

    /// Local file access failed (image picker, file reads).
    #[error("I/O error: {0}")]
    Io(String),
}

impl ServiceError {
    /// Maps an HTTP status and body to a service error.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            401 | 403 => ServiceError::Unauthorized,
            404 | 406 => ServiceError::NotFound(message.into()),
            _ => ServiceError::Status {
                status,
                message: message.into(),
            },
        }
    }

    /// Returns true if repeating the call could succeed.
    ///
    /// The workflow never retries on its own; callers use this to decide
    /// whether to offer the user a retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Request(_) | ServiceError::Timeout => true,
            ServiceError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else if err.is_decode() {
            ServiceError::InvalidResponse(err.to_string())
        } else if let Some(status) = err.status() {
            ServiceError::from_status(status.as_u16(), err.to_string())
        } else {
            ServiceError::Request(err.to_string())
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::InvalidResponse(err.to_string())
    }
}

impl From<url::ParseError> for ServiceError {
    fn from(err: url::ParseError) -> Self {
        ServiceError::Request(format!("invalid request URL: {}", err))
    }
}

// =============================================================================
// Profile Errors
// =============================================================================

/// Error type covering every profile workflow failure.
#[derive(Debug, Error)]
pub enum ProfileError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid profile configuration: {0}")]
    InvalidConfig(String),

    /// Backend URL could not be parsed.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// No backend URL/key configured.
    #[error("Backend not configured. Set CRYPTRACK_SUPABASE_URL and CRYPTRACK_SUPABASE_ANON_KEY.")]
    MissingBackend,

    /// No signed-in user.
    #[error("No signed-in user. Set CRYPTRACK_USER_ID.")]
    MissingSession,

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Workflow Errors
    // =========================================================================
    /// Input did not pass the submit gate.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Remote username lookup failed. Logged by the checker only.
    #[error("Username availability check failed: {0}")]
    AvailabilityCheck(#[source] ServiceError),

    /// Picking, reading or uploading the avatar failed.
    #[error("Error uploading avatar: {0}")]
    Upload(#[source] ServiceError),

    /// Writing the profile record failed.
    #[error("Error updating profile: {0}")]
    Update(#[source] ServiceError),

    /// Reading the profile record failed.
    #[error("Error fetching profile: {0}")]
    Fetch(#[source] ServiceError),

    // =========================================================================
    // Local State Errors
    // =========================================================================
    /// A submit is already running for this controller.
    #[error("A profile update is already in progress")]
    SubmitInProgress,

    /// The editor was closed; the call had no effect.
    #[error("Profile editor is closed")]
    EditorClosed,

    /// Local persistence of the shared profile failed.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<DbError> for ProfileError {
    fn from(err: DbError) -> Self {
        ProfileError::Persistence(err.to_string())
    }
}

impl From<url::ParseError> for ProfileError {
    fn from(err: url::ParseError) -> Self {
        ProfileError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ProfileError {
    fn from(err: std::io::Error) -> Self {
        ProfileError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ProfileError {
    fn from(err: toml::de::Error) -> Self {
        ProfileError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ProfileError {
    fn from(err: toml::ser::Error) -> Self {
        ProfileError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ProfileError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ProfileError::InvalidConfig(_)
                | ProfileError::InvalidUrl(_)
                | ProfileError::MissingBackend
                | ProfileError::MissingSession
                | ProfileError::ConfigLoadFailed(_)
                | ProfileError::ConfigSaveFailed(_)
        )
    }

    /// Returns the underlying service error for remote failures.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            ProfileError::AvailabilityCheck(e)
            | ProfileError::Upload(e)
            | ProfileError::Update(e)
            | ProfileError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServiceError::from_status(401, "jwt expired"), ServiceError::Unauthorized);
        assert!(matches!(
            ServiceError::from_status(406, "0 rows"),
            ServiceError::NotFound(_)
        ));
        assert!(matches!(
            ServiceError::from_status(409, "duplicate key"),
            ServiceError::Status { status: 409, .. }
        ));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(ServiceError::Timeout.is_retryable());
        assert!(ServiceError::Request("reset".into()).is_retryable());
        assert!(ServiceError::from_status(503, "busy").is_retryable());

        assert!(!ServiceError::Unauthorized.is_retryable());
        assert!(!ServiceError::from_status(400, "bad").is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = ProfileError::Upload(ServiceError::from_status(413, "Payload too large"));
        assert_eq!(
            err.to_string(),
            "Error uploading avatar: HTTP 413: Payload too large"
        );

        let err = ProfileError::from(ValidationError::too_short("username", 3));
        assert!(err.to_string().contains("username"));
    }

    #[test]
    fn test_categorization() {
        assert!(ProfileError::MissingBackend.is_config_error());
        assert!(!ProfileError::SubmitInProgress.is_config_error());
        assert_eq!(
            ProfileError::Fetch(ServiceError::Timeout).service_error(),
            Some(&ServiceError::Timeout)
        );
        assert_eq!(ProfileError::EditorClosed.service_error(), None);
    }
}
