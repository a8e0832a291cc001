//! # Profile Draft
//!
//! The locally held, possibly unsaved copy of the user's profile.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Draft Lifecycle                                 │
//! │                                                                         │
//! │  Editor opened ──► fetch ProfileRecord ──► ProfileState::load()        │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                        set_username / set_full_name / set_pending_image │
//! │                                                  │                      │
//! │                                                  ▼                      │
//! │                  submit ok ──► re-fetch ──► ProfileState::load()        │
//! │                  submit err ─► draft untouched, still editable          │
//! │                                                                         │
//! │  Editor closed ──► draft dropped                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is plain field assignment; there are no error cases.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{LocalImage, ProfileRecord, ProfileUpdate};

/// Editable copy of the profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EditableProfileDraft {
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    /// Picked but not yet uploaded.
    pub pending_local_image: Option<LocalImage>,
}

impl From<&ProfileRecord> for EditableProfileDraft {
    fn from(record: &ProfileRecord) -> Self {
        EditableProfileDraft {
            username: record.username.clone(),
            full_name: record.full_name.clone(),
            avatar_url: record.avatar_url.clone().filter(|url| !url.is_empty()),
            pending_local_image: None,
        }
    }
}

/// Holder of the draft with controlled setters.
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    draft: EditableProfileDraft,
}

impl ProfileState {
    /// Creates an empty state (before the first fetch).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state loaded from a record.
    pub fn from_record(record: &ProfileRecord) -> Self {
        ProfileState {
            draft: EditableProfileDraft::from(record),
        }
    }

    /// Overwrites the whole draft from a record and drops any pending image.
    pub fn load(&mut self, record: &ProfileRecord) {
        self.draft = EditableProfileDraft::from(record);
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.draft.username = username.into();
    }

    pub fn set_full_name(&mut self, full_name: impl Into<String>) {
        self.draft.full_name = full_name.into();
    }

    /// Records a locally selected image, or clears it with `None`.
    pub fn set_pending_image(&mut self, image: Option<LocalImage>) {
        self.draft.pending_local_image = image;
    }

    /// Returns the current draft.
    pub fn draft(&self) -> &EditableProfileDraft {
        &self.draft
    }

    pub fn username(&self) -> &str {
        &self.draft.username
    }

    /// Returns the picked image waiting for upload, if any.
    pub fn pending_image(&self) -> Option<&LocalImage> {
        self.draft.pending_local_image.as_ref()
    }

    pub fn has_pending_image(&self) -> bool {
        self.draft.pending_local_image.is_some()
    }

    /// Builds the record write for a submit.
    ///
    /// `resolved_avatar_url` is the freshly committed upload, if there was
    /// one; otherwise the draft's current avatar URL is kept.
    pub fn merged_update(&self, resolved_avatar_url: Option<String>) -> ProfileUpdate {
        ProfileUpdate::new(
            self.draft.username.clone(),
            self.draft.full_name.clone(),
            resolved_avatar_url.or_else(|| self.draft.avatar_url.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ProfileRecord {
        ProfileRecord::new("user-1", "alice", "Alice A").with_avatar_url("https://cdn/old.png")
    }

    fn image() -> LocalImage {
        LocalImage::from_uri("file:///tmp/new.png").unwrap()
    }

    #[test]
    fn test_load_overwrites_and_clears_pending_image() {
        let mut state = ProfileState::new();
        state.set_username("draft-name");
        state.set_pending_image(Some(image()));

        state.load(&record());

        assert_eq!(state.username(), "alice");
        assert_eq!(state.draft().full_name, "Alice A");
        assert_eq!(state.draft().avatar_url.as_deref(), Some("https://cdn/old.png"));
        assert!(!state.has_pending_image());
    }

    #[test]
    fn test_empty_avatar_url_loads_as_none() {
        let state = ProfileState::from_record(&ProfileRecord::new("u", "bob", "").with_avatar_url(""));
        assert_eq!(state.draft().avatar_url, None);
    }

    #[test]
    fn test_setters_are_plain_assignment() {
        let mut state = ProfileState::from_record(&record());
        state.set_username("al");
        state.set_full_name("");
        assert_eq!(state.username(), "al");
        assert_eq!(state.draft().full_name, "");
        // Avatar untouched by field edits
        assert_eq!(state.draft().avatar_url.as_deref(), Some("https://cdn/old.png"));

        state.set_pending_image(Some(image()));
        assert_eq!(state.pending_image(), Some(&image()));
        state.set_pending_image(None);
        assert!(!state.has_pending_image());
    }

    #[test]
    fn test_merged_update_prefers_committed_avatar() {
        let state = ProfileState::from_record(&record());

        let keep = state.merged_update(None);
        assert_eq!(keep.avatar_url.as_deref(), Some("https://cdn/old.png"));
        assert_eq!(keep.username, "alice");
        assert_eq!(keep.full_name, "Alice A");

        let replaced = state.merged_update(Some("https://cdn/new.png".into()));
        assert_eq!(replaced.avatar_url.as_deref(), Some("https://cdn/new.png"));
    }
}
