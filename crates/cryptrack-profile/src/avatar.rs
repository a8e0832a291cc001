//! # Avatar Upload Pipeline
//!
//! Two-phase avatar change: a local pick that only previews, and a commit
//! that uploads during submit.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Idle ──pick_image()──► Previewing(image)                             │
//! │    ▲                          │                                         │
//! │    │ reset()                  │ commit(image)  (during submit)          │
//! │    │                          ▼                                         │
//! │    │                     Uploading(image)                              │
//! │    │                      │          │                                  │
//! │    │                      ▼          ▼                                  │
//! │    └────────────── Committed(url)   Failed(reason)                     │
//! │                                                                         │
//! │   Cancelled picks leave the state alone. Nothing reaches storage       │
//! │   until commit().                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Object Layout
//! `{bucket}/{user_id}/{random}.{ext}` with content type `image/{ext}`
//! (`jpg` sent as `image/jpeg`).

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info};
use uuid::Uuid;

use cryptrack_core::validation::{avatar_object_path, image_content_type};
use cryptrack_core::{AvatarState, ImagePickOptions, LocalImage, PickOutcome};

use crate::error::{ProfileError, ProfileResult};
use crate::service::{ImagePicker, StorageService};

/// Pick-then-commit avatar pipeline.
pub struct AvatarUploadPipeline {
    picker: Arc<dyn ImagePicker>,
    storage: Arc<dyn StorageService>,
    user_id: String,
    bucket: String,
    placeholder_url: String,
    options: ImagePickOptions,
    state: watch::Sender<AvatarState>,
}

impl AvatarUploadPipeline {
    pub fn new(
        picker: Arc<dyn ImagePicker>,
        storage: Arc<dyn StorageService>,
        user_id: impl Into<String>,
        bucket: impl Into<String>,
        placeholder_url: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(AvatarState::Idle);
        AvatarUploadPipeline {
            picker,
            storage,
            user_id: user_id.into(),
            bucket: bucket.into(),
            placeholder_url: placeholder_url.into(),
            options: ImagePickOptions::square(),
            state,
        }
    }

    /// Opens the picker and previews the chosen image.
    ///
    /// Cancelling (or a result without assets) returns
    /// [`PickOutcome::Cancelled`] and leaves the state unchanged.
    pub async fn pick_image(&self) -> ProfileResult<PickOutcome> {
        let result = self
            .picker
            .pick_image(&self.options)
            .await
            .map_err(ProfileError::Upload)?;

        let uri = match result.assets.into_iter().next() {
            Some(uri) if !result.cancelled => uri,
            _ => {
                debug!("Image pick cancelled");
                return Ok(PickOutcome::Cancelled);
            }
        };

        let image = LocalImage::from_uri(uri)?;
        debug!(uri = %image.uri, extension = %image.extension, "Image picked");

        self.state.send_replace(AvatarState::Previewing {
            image: image.clone(),
        });
        Ok(PickOutcome::Picked(image))
    }

    /// Uploads `image` and returns its public URL.
    ///
    /// ## Errors
    /// [`ProfileError::Upload`] if the file cannot be read or the upload
    /// is rejected. The caller's avatar URL must stay as it was.
    pub async fn commit(&self, image: &LocalImage) -> ProfileResult<String> {
        self.state.send_replace(AvatarState::Uploading {
            image: image.clone(),
        });

        match self.upload(image).await {
            Ok(url) => {
                info!(url = %url, "Avatar uploaded");
                self.state
                    .send_replace(AvatarState::Committed { url: url.clone() });
                Ok(url)
            }
            Err(e) => {
                error!(error = %e, uri = %image.uri, "Avatar upload failed");
                self.state.send_replace(AvatarState::Failed {
                    reason: e.to_string(),
                });
                Err(ProfileError::Upload(e))
            }
        }
    }

    async fn upload(&self, image: &LocalImage) -> crate::error::ServiceResult<String> {
        let bytes = self.picker.read_bytes(image).await?;

        let name = Uuid::new_v4().simple().to_string();
        let path = avatar_object_path(&self.user_id, &name, &image.extension);
        let content_type = image_content_type(&image.extension);

        debug!(
            bucket = %self.bucket,
            path = %path,
            content_type = %content_type,
            bytes = bytes.len(),
            "Uploading avatar"
        );
        self.storage
            .upload_blob(&self.bucket, &path, bytes, &content_type)
            .await?;

        Ok(self.storage.public_url(&self.bucket, &path))
    }

    /// Resolves a stored avatar reference to something displayable.
    ///
    /// ```text
    /// "https://..."         → as is
    /// "user-1/abc.png"      → public URL in the avatar bucket
    /// None / "" / "  "      → placeholder
    /// ```
    pub fn display_url(&self, avatar_url: Option<&str>) -> String {
        match avatar_url.map(str::trim) {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.to_string()
            }
            Some(path) if !path.is_empty() => self
                .storage
                .public_url(&self.bucket, path.trim_start_matches('/')),
            _ => self.placeholder_url.clone(),
        }
    }

    /// Returns to `Idle`.
    pub fn reset(&self) {
        self.state.send_replace(AvatarState::Idle);
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> AvatarState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<AvatarState> {
        self.state.subscribe()
    }
}
