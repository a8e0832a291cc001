//! # External Collaborators
//!
//! Traits for everything the workflow consumes but does not implement:
//! the profile table, object storage, the platform image picker and the
//! local persistence of the shared profile.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProfileService      get_profile / update_profile / find_by_username   │
//! │  StorageService      upload_blob / public_url                          │
//! │  ImagePicker         pick_image / read_bytes                           │
//! │  ProfilePersistence  load / save                                       │
//! │                                                                         │
//! │  Production: SupabaseClient (HTTP), FileImagePicker (app),             │
//! │              KeyValueRepository (SQLite)                               │
//! │  Tests:      crate::mock                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;

use cryptrack_core::{
    ImagePickOptions, LocalImage, PickerResult, ProfileRecord, ProfileUpdate, SharedUserProfile,
};

use crate::error::{ProfileResult, ServiceResult};

/// Remote profile table.
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Reads the profile row for `user_id`.
    async fn get_profile(&self, user_id: &str) -> ServiceResult<ProfileRecord>;

    /// Writes `update` to the row for `user_id`.
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> ServiceResult<()>;

    /// Returns a record other than `exclude_user_id` that already uses
    /// `username`, if any.
    async fn find_by_username(
        &self,
        username: &str,
        exclude_user_id: &str,
    ) -> ServiceResult<Option<ProfileRecord>>;
}

/// Remote object storage.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Stores `bytes` at `path` inside `bucket`.
    async fn upload_blob(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<()>;

    /// Public URL of an object. Pure, no network.
    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Platform image picker.
#[async_trait]
pub trait ImagePicker: Send + Sync {
    /// Lets the user choose an image.
    async fn pick_image(&self, options: &ImagePickOptions) -> ServiceResult<PickerResult>;

    /// Reads the raw bytes of a picked image.
    async fn read_bytes(&self, image: &LocalImage) -> ServiceResult<Vec<u8>>;
}

/// Durable storage for the shared user profile.
#[async_trait]
pub trait ProfilePersistence: Send + Sync {
    /// Loads the stored profile, `None` if nothing was stored yet.
    async fn load(&self) -> ProfileResult<Option<SharedUserProfile>>;

    /// Replaces the stored profile.
    async fn save(&self, profile: &SharedUserProfile) -> ProfileResult<()>;
}
