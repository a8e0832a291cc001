//! # Domain Types
//!
//! Core profile types used throughout Crypto Tracker.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Profile Types                                   │
//! │                                                                         │
//! │  REMOTE (backend)            LOCAL (editor)          SHARED (app-wide)  │
//! │  ┌─────────────────┐   ┌──────────────────────┐   ┌─────────────────┐  │
//! │  │ ProfileRecord   │──►│ EditableProfileDraft │   │SharedUserProfile│  │
//! │  │  id (UUID)      │   │  username            │   │  avatar_url     │  │
//! │  │  username       │   │  full_name           │   │  username       │  │
//! │  │  full_name      │   │  avatar_url          │   └────────▲────────┘  │
//! │  │  avatar_url     │   │  pending_local_image │            │           │
//! │  │  updated_at     │   └──────────┬───────────┘            │           │
//! │  └────────▲────────┘              │ submit                  │           │
//! │           │        ProfileUpdate  │                         │           │
//! │           └───────────────────────┴─────────────────────────┘           │
//! │                                                                         │
//! │  UsernameAvailability: { candidate, is_available, is_checking }        │
//! │  AvatarState: Idle → Previewing → Uploading → Committed | Failed       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The draft itself lives in [`crate::draft`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

use crate::validation::{image_extension, ValidationResult};
use crate::DEFAULT_DISPLAY_USERNAME;

/// Deserializes a nullable string column as an empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Profile Record
// =============================================================================

/// A row of the remote `profiles` table.
///
/// `id` is the auth user id and never changes. `username` is unique across
/// all records (enforced remotely).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileRecord {
    /// Auth user id (UUID).
    pub id: String,

    /// Unique handle, at least three characters once set.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,

    /// Free-text display name.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub full_name: String,

    /// Public URL of the avatar image, if one was ever uploaded.
    #[serde(default)]
    pub avatar_url: Option<String>,

    /// Last write time (set by the client on every update).
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileRecord {
    /// Creates a record with no avatar and no timestamp.
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        ProfileRecord {
            id: id.into(),
            username: username.into(),
            full_name: full_name.into(),
            avatar_url: None,
            updated_at: None,
        }
    }

    /// Sets the avatar URL (builder style).
    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

/// Fields written to the `profiles` table on submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileUpdate {
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ProfileUpdate {
    /// Creates an update stamped with the current time.
    pub fn new(username: String, full_name: String, avatar_url: Option<String>) -> Self {
        ProfileUpdate {
            username,
            full_name,
            avatar_url,
            updated_at: Utc::now(),
        }
    }

    /// Applies this update on top of an existing record.
    ///
    /// Used when the post-write read-back is unavailable.
    pub fn apply_to(&self, user_id: &str) -> ProfileRecord {
        ProfileRecord {
            id: user_id.to_string(),
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            avatar_url: self.avatar_url.clone(),
            updated_at: Some(self.updated_at),
        }
    }
}

// =============================================================================
// Local Image
// =============================================================================

/// A locally selected image that has not been uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LocalImage {
    /// Platform uri of the picked file.
    pub uri: String,

    /// Lowercased file extension (`png`, `jpg`, ...).
    pub extension: String,
}

impl LocalImage {
    /// Creates a local image reference, validating its file type.
    pub fn from_uri(uri: impl Into<String>) -> ValidationResult<Self> {
        let uri = uri.into();
        let extension = image_extension(&uri)?;
        Ok(LocalImage { uri, extension })
    }
}

/// Options passed to the platform image picker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ImagePickOptions {
    /// Crop aspect ratio (width, height).
    pub aspect: [u32; 2],

    /// Compression quality, 0.0 to 1.0.
    pub quality: f32,

    /// Let the user crop before returning.
    pub allows_editing: bool,
}

impl ImagePickOptions {
    /// Square crop, full quality.
    pub const fn square() -> Self {
        ImagePickOptions {
            aspect: [1, 1],
            quality: 1.0,
            allows_editing: true,
        }
    }

    /// Overrides the compression quality.
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality.clamp(0.0, 1.0);
        self
    }
}

impl Default for ImagePickOptions {
    fn default() -> Self {
        ImagePickOptions::square()
    }
}

/// Raw result of the platform picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerResult {
    /// The user dismissed the picker.
    pub cancelled: bool,

    /// Uris of the picked files (first one wins).
    pub assets: Vec<String>,
}

impl PickerResult {
    /// A picker result for one chosen file.
    pub fn picked(uri: impl Into<String>) -> Self {
        PickerResult {
            cancelled: false,
            assets: vec![uri.into()],
        }
    }

    /// A dismissed picker.
    pub fn cancelled() -> Self {
        PickerResult {
            cancelled: true,
            assets: Vec::new(),
        }
    }
}

/// Outcome of a pick: either a local image or nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(LocalImage),
    Cancelled,
}

// =============================================================================
// Avatar State
// =============================================================================

/// Lifecycle of the avatar being edited.
///
/// ```text
/// Idle ──pick──► Previewing ──submit──► Uploading ──┬──► Committed
///                    ▲                               └──► Failed
///                    └──────── pick again ◄──────────────────┘
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum AvatarState {
    #[default]
    Idle,
    Previewing { image: LocalImage },
    Uploading { image: LocalImage },
    Committed { url: String },
    Failed { reason: String },
}

impl AvatarState {
    /// Returns true while bytes are being uploaded.
    pub fn is_uploading(&self) -> bool {
        matches!(self, AvatarState::Uploading { .. })
    }
}

// =============================================================================
// Username Availability
// =============================================================================

/// Result of the debounced uniqueness check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UsernameAvailability {
    /// The username this state refers to.
    pub candidate: String,

    /// No other profile uses `candidate`.
    pub is_available: bool,

    /// A check for `candidate` is scheduled or in flight.
    pub is_checking: bool,
}

impl UsernameAvailability {
    /// Availability of the username the editor was opened with.
    ///
    /// The user's own current handle is never a collision.
    pub fn confirmed(candidate: impl Into<String>) -> Self {
        UsernameAvailability {
            candidate: candidate.into(),
            is_available: true,
            is_checking: false,
        }
    }

    /// Returns true when a finished check for exactly `candidate` exists.
    pub fn is_settled_for(&self, candidate: &str) -> bool {
        !self.is_checking && self.candidate == candidate
    }
}

// =============================================================================
// Shared User Profile
// =============================================================================

/// Reduced projection of the profile visible to every screen.
///
/// Empty strings mean "unknown" (the app starts with an empty profile).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SharedUserProfile {
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub username: String,
}

impl SharedUserProfile {
    /// Creates a shared profile from optional avatar and username.
    pub fn new(avatar_url: Option<&str>, username: &str) -> Self {
        SharedUserProfile {
            avatar_url: avatar_url.unwrap_or_default().to_string(),
            username: username.to_string(),
        }
    }

    /// Returns true until the first profile fetch populated it.
    pub fn is_empty(&self) -> bool {
        self.avatar_url.is_empty() && self.username.is_empty()
    }

    /// Username for headers, `"User"` when unknown.
    pub fn display_username(&self) -> &str {
        if self.username.is_empty() {
            DEFAULT_DISPLAY_USERNAME
        } else {
            &self.username
        }
    }

    /// Avatar URL for headers, the placeholder when unknown.
    pub fn display_avatar_url<'a>(&'a self, placeholder: &'a str) -> &'a str {
        if self.avatar_url.is_empty() {
            placeholder
        } else {
            &self.avatar_url
        }
    }
}

// =============================================================================
// Session
// =============================================================================

/// The signed-in user, as provided by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Auth user id (UUID), also the profile id.
    pub user_id: String,

    /// Account email (read-only in the editor).
    pub email: Option<String>,

    /// Bearer token for backend calls.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
}

impl Session {
    /// Creates a session for a user id.
    pub fn new(user_id: impl Into<String>) -> Self {
        Session {
            user_id: user_id.into(),
            email: None,
            access_token: None,
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
    fn test_profile_record_null_columns() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "username": null,
            "full_name": null,
            "avatar_url": null
        }"#;
        let record: ProfileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.username, "");
        assert_eq!(record.full_name, "");
        assert_eq!(record.avatar_url, None);
        assert_eq!(record.updated_at, None);
    }

    #[test]
    fn test_profile_update_serializes_snake_case() {
        let update = ProfileUpdate::new("alice".into(), "Alice A".into(), None);
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["username"], "alice");
        assert_eq!(value["full_name"], "Alice A");
        assert!(value["avatar_url"].is_null());
        assert!(value["updated_at"].is_string());
    }

    #[test]
    fn test_update_apply_to() {
        let update = ProfileUpdate::new(
            "alice".into(),
            "Alice A".into(),
            Some("https://cdn/a.png".into()),
        );
        let record = update.apply_to("user-1");
        assert_eq!(record.id, "user-1");
        assert_eq!(record.avatar_url.as_deref(), Some("https://cdn/a.png"));
        assert_eq!(record.updated_at, Some(update.updated_at));
    }

    #[test]
    fn test_local_image_from_uri() {
        let image = LocalImage::from_uri("file:///cache/crop-1.PNG").unwrap();
        assert_eq!(image.extension, "png");
        assert!(LocalImage::from_uri("file:///cache/crop").is_err());
    }

    #[test]
    fn test_pick_options_default_is_square() {
        let options = ImagePickOptions::default();
        assert_eq!(options.aspect, [1, 1]);
        assert!(options.allows_editing);
        assert_eq!(options.with_quality(3.0).quality, 1.0);
    }

    #[test]
    fn test_availability_settled_for() {
        let state = UsernameAvailability::confirmed("alice");
        assert!(state.is_settled_for("alice"));
        assert!(!state.is_settled_for("alice2"));

        let checking = UsernameAvailability {
            candidate: "alice".into(),
            is_available: true,
            is_checking: true,
        };
        assert!(!checking.is_settled_for("alice"));
    }

    #[test]
    fn test_shared_profile_display_fallbacks() {
        let empty = SharedUserProfile::default();
        assert!(empty.is_empty());
        assert_eq!(empty.display_username(), "User");
        assert_eq!(empty.display_avatar_url("https://placeholder"), "https://placeholder");

        let shared = SharedUserProfile::new(Some("https://cdn/a.png"), "alice");
        assert!(!shared.is_empty());
        assert_eq!(shared.display_username(), "alice");
        assert_eq!(shared.display_avatar_url("https://placeholder"), "https://cdn/a.png");
    }

    #[test]
    fn test_avatar_state_serialization() {
        let state = AvatarState::Committed {
            url: "https://cdn/a.png".into(),
        };
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["state"], "committed");
        assert_eq!(value["url"], "https://cdn/a.png");
        assert!(!state.is_uploading());
    }

    #[test]
    fn test_session_never_serializes_token() {
        let mut session = Session::new("user-1");
        session.access_token = Some("secret".into());
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("secret"));
    }
}
