//! # Profile Submit Controller
//!
//! Gated, strictly sequential profile save.
//!
//! ## Submit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  submit(state, availability)                                           │
//! │       │                                                                 │
//! │       ├── another submit running? ──► SubmitInProgress                 │
//! │       │                                                                 │
//! │  1. Gate (no network)                                                  │
//! │       ├── still checking / candidate mismatch ──► Validation(Pending)  │
//! │       ├── shorter than minimum ──────────────────► Validation(TooShort)│
//! │       └── taken ─────────────────────────────────► Validation(Dup...)  │
//! │       │                                                                 │
//! │  2. Pending image? ── commit() ── fails ──► Upload (nothing written)   │
//! │       │                                                                 │
//! │  3. update_profile(merged) ── fails ──► Update (shared untouched)      │
//! │       │                                                                 │
//! │  4. SharedProfileWriter::write(avatar_url, username)                   │
//! │       │                                                                 │
//! │  5. get_profile() ── ok ──► canonical record                           │
//! │                     └ fails ► merged record (logged)                    │
//! │                                                                         │
//! │  No automatic retries.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An avatar uploaded in step 2 stays in storage when step 3 fails.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use cryptrack_core::validation::validate_username;
use cryptrack_core::{
    EditableProfileDraft, ProfileRecord, ProfileState, SharedUserProfile, UsernameAvailability,
    ValidationError,
};

use crate::avatar::AvatarUploadPipeline;
use crate::error::{ProfileError, ProfileResult};
use crate::service::ProfileService;
use crate::shared::SharedProfileWriter;

/// Orchestrates saving the draft. Owns the shared profile writer.
pub struct ProfileSubmitController {
    user_id: String,
    min_length: usize,
    service: Arc<dyn ProfileService>,
    avatar: Arc<AvatarUploadPipeline>,
    shared: SharedProfileWriter,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag however the submit ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ProfileSubmitController {
    pub fn new(
        user_id: impl Into<String>,
        min_length: usize,
        service: Arc<dyn ProfileService>,
        avatar: Arc<AvatarUploadPipeline>,
        shared: SharedProfileWriter,
    ) -> Self {
        ProfileSubmitController {
            user_id: user_id.into(),
            min_length,
            service,
            avatar,
            shared,
            in_flight: AtomicBool::new(false),
        }
    }

    /// The avatar pipeline used for commits.
    pub fn avatar(&self) -> &Arc<AvatarUploadPipeline> {
        &self.avatar
    }

    /// The signed-in user this controller writes for.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns true while a submit is running.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Gate
    // =========================================================================

    /// Checks the submit preconditions without touching the network.
    pub fn check_gate(
        &self,
        draft: &EditableProfileDraft,
        availability: &UsernameAvailability,
    ) -> ProfileResult<()> {
        let pending = || ValidationError::Pending {
            field: "username".to_string(),
        };

        if availability.is_checking {
            return Err(pending().into());
        }

        validate_username(&draft.username, self.min_length)?;

        if availability.candidate != draft.username {
            return Err(pending().into());
        }

        if !availability.is_available {
            return Err(ValidationError::Duplicate {
                field: "username".to_string(),
                value: draft.username.clone(),
            }
            .into());
        }

        Ok(())
    }

    /// Returns true if a submit would pass the gate right now.
    pub fn can_submit(
        &self,
        draft: &EditableProfileDraft,
        availability: &UsernameAvailability,
    ) -> bool {
        !self.is_submitting() && self.check_gate(draft, availability).is_ok()
    }

    // =========================================================================
    // Submit
    // =========================================================================

    /// Saves the draft and returns the record to reload the draft from.
    pub async fn submit(
        &self,
        state: &ProfileState,
        availability: &UsernameAvailability,
    ) -> ProfileResult<ProfileRecord> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Submit rejected: another submit is running");
            return Err(ProfileError::SubmitInProgress);
        }
        let _guard = InFlightGuard(&self.in_flight);

        if let Err(e) = self.check_gate(state.draft(), availability) {
            debug!(error = %e, "Submit blocked by gate");
            return Err(e);
        }

        let committed_url = match state.pending_image() {
            Some(image) => Some(self.avatar.commit(image).await?),
            None => None,
        };

        let update = state.merged_update(committed_url);
        info!(user_id = %self.user_id, username = %update.username, "Updating profile");

        if let Err(e) = self.service.update_profile(&self.user_id, &update).await {
            error!(error = %e, "Profile update failed");
            return Err(ProfileError::Update(e));
        }

        self.shared
            .write(update.avatar_url.as_deref(), &update.username)
            .await;

        let record = match self.service.get_profile(&self.user_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(error = %e, "Read-back after update failed, using submitted values");
                update.apply_to(&self.user_id)
            }
        };

        info!(username = %record.username, "Profile updated successfully");
        Ok(record)
    }

    // =========================================================================
    // Fetch
    // =========================================================================

    /// Fetches the canonical record.
    ///
    /// Populates the shared profile if it is still empty.
    pub async fn refresh(&self) -> ProfileResult<ProfileRecord> {
        let record = self
            .service
            .get_profile(&self.user_id)
            .await
            .map_err(|e| {
                warn!(error = %e, "Error fetching profile");
                ProfileError::Fetch(e)
            })?;

        if self.shared.current().is_empty() {
            self.shared
                .write(record.avatar_url.as_deref(), &record.username)
                .await;
        }

        Ok(record)
    }

    /// Snapshot of the shared profile as last written.
    pub fn shared_profile(&self) -> SharedUserProfile {
        self.shared.current()
    }
}
