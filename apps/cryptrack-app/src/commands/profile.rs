//! # Profile Commands
//!
//! Commands behind the profile tab and the edit-profile screen.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Edit Profile Flow                                    │
//! │                                                                         │
//! │  open_editor ──► fetch record, load draft (own username = available)   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  set_username ──► schedule debounced check ──► wait_for_availability   │
//! │  set_full_name                                                          │
//! │  pick_avatar  ──► preview only, nothing uploaded                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  submit_profile                                                         │
//! │   gate ─► upload pending avatar ─► write record ─► shared profile      │
//! │       │                                                                 │
//! │       ├── ok     ──► "Profile updated successfully"                    │
//! │       ├── upload ──► "Error uploading avatar" alert                    │
//! │       └── update ──► "Error updating profile" alert                    │
//! │                                                                         │
//! │  close_editor ──► late responses become no-ops                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use cryptrack_core::{AvatarState, PickOutcome, ProfileRecord, UsernameAvailability};
use cryptrack_profile::ProfileEditor;

use crate::error::{ApiError, SUCCESS_MESSAGE};
use crate::state::{EditorState, SessionState};

// =============================================================================
// DTOs
// =============================================================================

/// What the profile tab shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileOverviewDto {
    pub username: String,
    pub avatar_url: String,
    pub email: Option<String>,
}

/// Snapshot of the edit screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorDto {
    pub username: String,
    pub full_name: String,
    /// Pending pick, else stored avatar, else placeholder.
    pub avatar_preview: String,
    pub has_pending_avatar: bool,
    pub email: Option<String>,
    pub availability: UsernameAvailability,
    pub avatar: AvatarState,
    pub can_submit: bool,
}

impl EditorDto {
    fn from_editor(editor: &ProfileEditor) -> Self {
        let draft = editor.draft();
        EditorDto {
            has_pending_avatar: draft.pending_local_image.is_some(),
            avatar_preview: editor.avatar_preview(),
            username: draft.username,
            full_name: draft.full_name,
            email: editor.email().map(str::to_string),
            availability: editor.availability(),
            avatar: editor.avatar_state(),
            can_submit: editor.can_submit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarPickDto {
    pub cancelled: bool,
    pub preview_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

impl From<ProfileRecord> for ProfileDto {
    fn from(r: ProfileRecord) -> Self {
        ProfileDto {
            id: r.id,
            username: r.username,
            full_name: r.full_name,
            avatar_url: r.avatar_url,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultDto {
    pub message: String,
    pub profile: ProfileDto,
}

// =============================================================================
// Commands
// =============================================================================

/// Returns the shared profile shown outside the editor.
///
/// An empty shared profile triggers one fetch. If that fails the tab
/// shows the defaults ("User" and the placeholder avatar).
pub async fn get_profile_overview(session: &SessionState) -> Result<ProfileOverviewDto, ApiError> {
    if session.shared().read().is_empty() {
        debug!("Shared profile empty, fetching");
        if let Err(e) = session.controller().refresh().await {
            warn!(error = %e, "Could not fetch profile for overview");
        }
    }

    let profile = session.shared().read();
    Ok(ProfileOverviewDto {
        username: profile.display_username().to_string(),
        avatar_url: profile
            .display_avatar_url(&session.settings().placeholder_avatar_url)
            .to_string(),
        email: session.session().email.clone(),
    })
}

/// Opens a new edit session, closing any previous one.
pub async fn open_editor(
    session: &SessionState,
    editor: &EditorState,
) -> Result<EditorDto, ApiError> {
    let start = Instant::now();
    let new_editor = Arc::new(session.new_editor());
    new_editor.open().await?;

    let dto = EditorDto::from_editor(&new_editor);
    editor.replace(new_editor);

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        username = %dto.username,
        "open_editor complete"
    );
    Ok(dto)
}

/// Sets the username and schedules its availability check.
///
/// Returns immediately; the returned availability is still checking
/// unless the name is too short to look up.
pub fn set_username(editor: &EditorState, username: String) -> Result<EditorDto, ApiError> {
    debug!(username = %username, "set_username command");
    let current = editor.current()?;
    let handle = current.set_username(username)?;
    editor.set_pending_check(handle);
    Ok(EditorDto::from_editor(&current))
}

/// Waits for the latest scheduled availability check to settle.
pub async fn wait_for_availability(editor: &EditorState) -> Result<UsernameAvailability, ApiError> {
    let current = editor.current()?;
    if let Some(handle) = editor.take_pending_check() {
        handle
            .await
            .map_err(|e| ApiError::internal(format!("Availability check aborted: {}", e)))?;
    }
    Ok(current.availability())
}

pub fn set_full_name(editor: &EditorState, full_name: String) -> Result<EditorDto, ApiError> {
    let current = editor.current()?;
    current.set_full_name(full_name)?;
    Ok(EditorDto::from_editor(&current))
}

/// Picks a new avatar for preview. `path` preselects the file for the
/// host picker; without one the pick is treated as cancelled.
pub async fn pick_avatar(
    session: &SessionState,
    editor: &EditorState,
    path: Option<PathBuf>,
) -> Result<AvatarPickDto, ApiError> {
    let current = editor.current()?;
    if let Some(path) = path {
        session.picker().select(path);
    }

    let outcome = current.pick_avatar().await?;
    Ok(AvatarPickDto {
        cancelled: outcome == PickOutcome::Cancelled,
        preview_url: current.avatar_preview(),
    })
}

/// Submits the draft.
pub async fn submit_profile(editor: &EditorState) -> Result<SubmitResultDto, ApiError> {
    let start = Instant::now();
    let current = editor.current()?;

    let record = current.submit().await?;

    info!(
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        username = %record.username,
        "submit_profile complete"
    );
    Ok(SubmitResultDto {
        message: SUCCESS_MESSAGE.to_string(),
        profile: ProfileDto::from(record),
    })
}

/// Closes the edit session. Returns false if none was open.
pub fn close_editor(editor: &EditorState) -> bool {
    editor.close()
}
