//! # Validation Module
//!
//! Input validation utilities for the profile editor.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (local, free)                                    │
//! │  ├── Username length                                                   │
//! │  ├── User id format                                                    │
//! │  └── Avatar file type                                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: AvailabilityChecker (remote, debounced)                      │
//! │  └── Username uniqueness, excluding the current user                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend (Postgres)                                           │
//! │  └── UNIQUE constraint on profiles.username                            │
//! │                                                                         │
//! │  Layer 2 can race; layer 3 is the final word.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cryptrack_core::validation::{validate_username, image_extension};
//!
//! assert!(validate_username("alice", 3).is_ok());
//! assert!(validate_username("ab", 3).is_err());
//! assert_eq!(image_extension("file:///tmp/cat.PNG").unwrap(), "png");
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Image file extensions accepted for avatars.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic"];

// =============================================================================
// String Validators
// =============================================================================

/// Validates a username candidate.
///
/// ## Rules
/// - Must be at least `min_length` characters (counted as `char`s, so
///   multi-byte letters count once)
/// - No upper bound
///
/// ## Example
/// ```rust
/// use cryptrack_core::validation::validate_username;
///
/// assert!(validate_username("bob", 3).is_ok());
/// assert!(validate_username("", 3).is_err());
/// ```
pub fn validate_username(username: &str, min_length: usize) -> ValidationResult<()> {
    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.chars().count() < min_length {
        return Err(ValidationError::too_short("username", min_length));
    }

    Ok(())
}

/// Returns true when a candidate is long enough to be worth a remote check.
#[inline]
pub fn meets_min_length(candidate: &str, min_length: usize) -> bool {
    candidate.chars().count() >= min_length
}

/// Validates a user id (backend auth ids are UUIDs).
///
/// ## Example
/// ```rust
/// use cryptrack_core::validation::validate_user_id;
///
/// assert!(validate_user_id("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_user_id("not-a-uuid").is_err());
/// ```
pub fn validate_user_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "user id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "user id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Avatar Validators
// =============================================================================

/// Extracts the lowercased file extension from a local image uri.
///
/// The extension is the text after the last `.` of the final path segment.
///
/// ## Example
/// ```rust
/// use cryptrack_core::validation::image_extension;
///
/// assert_eq!(image_extension("/photos/me.jpeg").unwrap(), "jpeg");
/// assert!(image_extension("/photos/me").is_err());
/// assert!(image_extension("/photos/me.pdf").is_err());
/// ```
pub fn image_extension(uri: &str) -> ValidationResult<String> {
    let file_name = uri
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(uri);

    let ext = match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => {
            return Err(ValidationError::InvalidFormat {
                field: "avatar".to_string(),
                reason: "image file has no extension".to_string(),
            })
        }
    };

    if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ValidationError::InvalidFormat {
            field: "avatar".to_string(),
            reason: format!("unsupported image type '{}'", ext),
        });
    }

    Ok(ext)
}

/// Returns the MIME content type for an avatar extension.
///
/// `jpg` maps to `image/jpeg`; everything else is `image/{ext}`.
pub fn image_content_type(ext: &str) -> String {
    match ext {
        "jpg" => "image/jpeg".to_string(),
        other => format!("image/{}", other),
    }
}

/// Builds the storage object path for an avatar.
///
/// Objects are scoped under the owning user's id: `{user_id}/{name}.{ext}`.
pub fn avatar_object_path(user_id: &str, name: &str, ext: &str) -> String {
    format!("{}/{}.{}", user_id, name, ext)
}

// =============================================================================
// Unit Tests
// =============================================================================
