//! # Profile Editor Session
//!
//! One editing session: the draft, its availability checker and a
//! liveness flag, wired to the shared submit controller.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open()          fetch record ──► load draft, availability = own name  │
//! │  set_username()  assign ──► checker.check()                            │
//! │  set_full_name() assign                                                │
//! │  pick_avatar()   picker ──► pending image (preview only)               │
//! │  submit()        controller.submit() ──► reload draft from result      │
//! │  close()         liveness off                                          │
//! │                                                                         │
//! │  Every mutation after an await point checks liveness first; once       │
//! │  closed, late results are dropped and calls return EditorClosed.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::{debug, info};

use cryptrack_core::{
    AvatarState, EditableProfileDraft, PickOutcome, ProfileRecord, ProfileState, Session,
    UsernameAvailability,
};

use crate::availability::AvailabilityChecker;
use crate::config::EditorSettings;
use crate::debounce::Liveness;
use crate::error::{ProfileError, ProfileResult};
use crate::service::ProfileService;
use crate::submit::ProfileSubmitController;

/// Screen-level profile editing session.
pub struct ProfileEditor {
    controller: Arc<ProfileSubmitController>,
    checker: AvailabilityChecker,
    state: Mutex<ProfileState>,
    liveness: Liveness,
    email: Option<String>,
}

impl ProfileEditor {
    /// Creates a session for the signed-in user. Call
    /// [`open`](Self::open) to load the draft.
    pub fn new(
        controller: Arc<ProfileSubmitController>,
        service: Arc<dyn ProfileService>,
        session: &Session,
        settings: &EditorSettings,
    ) -> Self {
        let liveness = Liveness::new();
        let checker = AvailabilityChecker::new(
            service,
            controller.user_id(),
            settings.debounce_window(),
            settings.min_username_length,
            liveness.clone(),
        );

        ProfileEditor {
            controller,
            checker,
            state: Mutex::new(ProfileState::new()),
            liveness,
            email: session.email.clone(),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ProfileState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn ensure_open(&self) -> ProfileResult<()> {
        if self.liveness.is_alive() {
            Ok(())
        } else {
            Err(ProfileError::EditorClosed)
        }
    }

    /// Loads `record` into the draft. The loaded username is the user's
    /// own, so it starts out available.
    fn load(&self, record: &ProfileRecord) {
        self.lock_state().load(record);
        self.checker
            .reset(UsernameAvailability::confirmed(record.username.clone()));
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Fetches the profile and loads it into the draft.
    pub async fn open(&self) -> ProfileResult<EditableProfileDraft> {
        self.ensure_open()?;

        let record = self.controller.refresh().await?;
        self.ensure_open()?;

        self.load(&record);
        self.controller.avatar().reset();
        debug!(username = %record.username, "Profile editor opened");
        Ok(self.draft())
    }

    /// Assigns the username and schedules an availability check.
    pub fn set_username(&self, username: impl Into<String>) -> ProfileResult<Option<JoinHandle<()>>> {
        self.ensure_open()?;
        let username = username.into();
        self.lock_state().set_username(username.clone());
        Ok(self.checker.check(username))
    }

    /// Assigns the full name.
    pub fn set_full_name(&self, full_name: impl Into<String>) -> ProfileResult<()> {
        self.ensure_open()?;
        self.lock_state().set_full_name(full_name);
        Ok(())
    }

    /// Opens the picker and keeps the chosen image as a pending avatar.
    pub async fn pick_avatar(&self) -> ProfileResult<PickOutcome> {
        self.ensure_open()?;

        let outcome = self.controller.avatar().pick_image().await?;
        self.ensure_open()?;

        if let PickOutcome::Picked(image) = &outcome {
            self.lock_state().set_pending_image(Some(image.clone()));
        }
        Ok(outcome)
    }

    /// Submits the draft and reloads it from the saved record.
    pub async fn submit(&self) -> ProfileResult<ProfileRecord> {
        self.ensure_open()?;

        let snapshot = self.lock_state().clone();
        let availability = self.checker.current();

        let record = self.controller.submit(&snapshot, &availability).await?;

        if self.liveness.is_alive() {
            self.load(&record);
        } else {
            debug!("Editor closed during submit, not reloading draft");
        }
        Ok(record)
    }

    /// Ends the session. Pending checks and late results become no-ops.
    pub fn close(&self) {
        if self.liveness.is_alive() {
            info!("Profile editor closed");
        }
        self.liveness.shutdown();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns true if the submit button should be enabled.
    pub fn can_submit(&self) -> bool {
        self.liveness.is_alive()
            && self
                .controller
                .can_submit(self.lock_state().draft(), &self.checker.current())
    }

    /// Current draft.
    pub fn draft(&self) -> EditableProfileDraft {
        self.lock_state().draft().clone()
    }

    /// Current availability state.
    pub fn availability(&self) -> UsernameAvailability {
        self.checker.current()
    }

    /// Current avatar pipeline state.
    pub fn avatar_state(&self) -> AvatarState {
        self.controller.avatar().state()
    }

    /// Avatar to display: pending pick, else stored URL, else placeholder.
    pub fn avatar_preview(&self) -> String {
        let draft = self.draft();
        match draft.pending_local_image {
            Some(image) => image.uri,
            None => self
                .controller
                .avatar()
                .display_url(draft.avatar_url.as_deref()),
        }
    }

    /// Signed-in email, shown read-only.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.liveness.is_alive()
    }
}

impl Drop for ProfileEditor {
    fn drop(&mut self) {
        self.liveness.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::AvatarUploadPipeline;
    use crate::mock::{MockPicker, MockProfileService, MockStorage, USER_ID};
    use crate::shared::{SharedProfileReader, SharedProfileStore};
    use cryptrack_core::{LocalImage, PickerResult, SharedUserProfile};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    const PLACEHOLDER: &str = "https://placeholder.test/avatar.png";

    struct Harness {
        service: Arc<MockProfileService>,
        storage: Arc<MockStorage>,
        picker: Arc<MockPicker>,
        shared: SharedProfileReader,
        editor: ProfileEditor,
    }

    fn harness() -> Harness {
        let service = MockProfileService::seeded();
        let storage = Arc::new(MockStorage::default());
        let picker = Arc::new(MockPicker::default());
        let avatar = Arc::new(AvatarUploadPipeline::new(
            picker.clone(),
            storage.clone(),
            USER_ID,
            "avatars",
            PLACEHOLDER,
        ));
        let (shared, writer) = SharedProfileStore::in_memory().split();
        let controller = Arc::new(ProfileSubmitController::new(
            USER_ID,
            3,
            service.clone(),
            avatar,
            writer,
        ));

        let mut session = Session::new(USER_ID);
        session.email = Some("alice@example.com".into());
        let editor = ProfileEditor::new(controller, service.clone(), &session, &EditorSettings::default());

        Harness {
            service,
            storage,
            picker,
            shared,
            editor,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_loads_draft_and_shared_profile() {
        let h = harness();

        let draft = h.editor.open().await.unwrap();

        assert_eq!(draft.username, "alice");
        assert_eq!(draft.full_name, "Alice A");
        assert_eq!(draft.avatar_url.as_deref(), Some("https://cdn.test/old.png"));
        assert_eq!(h.editor.availability(), UsernameAvailability::confirmed("alice"));
        assert_eq!(h.editor.email(), Some("alice@example.com"));
        assert_eq!(h.shared.read().username, "alice");
        assert!(h.editor.can_submit());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rename_flow() {
        let h = harness();
        h.editor.open().await.unwrap();

        h.editor.set_username("ali").unwrap();
        h.editor.set_username("alic").unwrap();
        let last = h.editor.set_username("alice2").unwrap().unwrap();
        assert!(!h.editor.can_submit());

        last.await.unwrap();
        assert!(h.editor.can_submit());
        assert_eq!(h.service.lookups(), vec!["alice2".to_string()]);

        let record = h.editor.submit().await.unwrap();

        assert_eq!(record.username, "alice2");
        assert_eq!(h.editor.draft().username, "alice2");
        assert_eq!(h.shared.read().username, "alice2");
        assert!(h.storage.uploads().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_taken_username_blocks_submit() {
        let h = harness();
        h.editor.open().await.unwrap();

        h.editor.set_username("bob").unwrap().unwrap().await.unwrap();

        assert!(!h.editor.availability().is_available);
        assert!(!h.editor.can_submit());
        assert!(matches!(
            h.editor.submit().await,
            Err(ProfileError::Validation(_))
        ));
        assert!(h.service.updates().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_lookup_does_not_approve_new_username() {
        let h = harness();
        h.editor.open().await.unwrap();
        h.service.fail_lookup.store(true, Ordering::SeqCst);

        h.editor.set_username("carol").unwrap().unwrap().await.unwrap();

        let availability = h.editor.availability();
        assert_eq!(availability.candidate, "carol");
        assert!(!availability.is_available);
        assert!(!availability.is_checking);
        assert!(!h.editor.can_submit());
        assert!(matches!(
            h.editor.submit().await,
            Err(ProfileError::Validation(_))
        ));
        assert!(h.service.updates().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_username_blocks_submit() {
        let h = harness();
        h.editor.open().await.unwrap();

        assert!(h.editor.set_username("al").unwrap().is_none());

        assert!(!h.editor.can_submit());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(h.service.lookups().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_pick_leaves_draft_unchanged() {
        let h = harness();
        h.editor.open().await.unwrap();
        let before = h.editor.draft();
        h.picker.push(Ok(PickerResult::cancelled()));

        assert_eq!(h.editor.pick_avatar().await.unwrap(), PickOutcome::Cancelled);

        assert_eq!(h.editor.draft(), before);
        assert_eq!(h.editor.avatar_state(), AvatarState::Idle);
        assert_eq!(h.editor.avatar_preview(), "https://cdn.test/old.png");
    }

    #[tokio::test(start_paused = true)]
    async fn test_avatar_change_flow() {
        let h = harness();
        h.editor.open().await.unwrap();
        h.picker.push(Ok(PickerResult::picked("file:///cache/crop.png")));

        h.editor.pick_avatar().await.unwrap();
        let draft = h.editor.draft();
        assert_eq!(
            draft.pending_local_image,
            Some(LocalImage::from_uri("file:///cache/crop.png").unwrap())
        );
        assert_eq!(h.editor.avatar_preview(), "file:///cache/crop.png");
        assert!(h.storage.uploads().is_empty());

        let record = h.editor.submit().await.unwrap();

        let uploads = h.storage.uploads();
        assert_eq!(uploads.len(), 1);
        let url = format!("https://cdn.test/avatars/{}", uploads[0].path);
        assert_eq!(record.avatar_url.as_deref(), Some(url.as_str()));

        let draft = h.editor.draft();
        assert_eq!(draft.avatar_url.as_deref(), Some(url.as_str()));
        assert_eq!(draft.pending_local_image, None);
        assert_eq!(h.shared.read(), SharedUserProfile::new(Some(url.as_str()), "alice"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_failure_keeps_draft_for_retry() {
        let h = harness();
        h.editor.open().await.unwrap();
        h.picker.push(Ok(PickerResult::picked("file:///cache/crop.png")));
        h.editor.pick_avatar().await.unwrap();
        h.storage.fail_upload.store(true, Ordering::SeqCst);

        assert!(matches!(h.editor.submit().await, Err(ProfileError::Upload(_))));

        let draft = h.editor.draft();
        assert_eq!(draft.avatar_url.as_deref(), Some("https://cdn.test/old.png"));
        assert!(draft.pending_local_image.is_some());
        assert!(h.service.updates().is_empty());
        assert_eq!(h.shared.read().avatar_url, "https://cdn.test/old.png");
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_failure_keeps_draft() {
        let h = harness();
        h.editor.open().await.unwrap();
        h.editor.set_full_name("Alice Liddell").unwrap();
        h.service.fail_update.store(true, Ordering::SeqCst);

        assert!(matches!(h.editor.submit().await, Err(ProfileError::Update(_))));
        assert_eq!(h.editor.draft().full_name, "Alice Liddell");
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_editor() {
        let h = harness();
        h.editor.open().await.unwrap();
        h.service.delay_lookup("carol", Duration::from_secs(1));

        let pending = h.editor.set_username("carol").unwrap().unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        h.editor.close();
        pending.await.unwrap();

        assert!(h.editor.availability().is_checking);
        assert!(!h.editor.is_open());
        assert!(!h.editor.can_submit());
        assert!(matches!(h.editor.set_full_name("x"), Err(ProfileError::EditorClosed)));
        assert!(matches!(h.editor.set_username("dave"), Err(ProfileError::EditorClosed)));
        assert!(matches!(h.editor.pick_avatar().await, Err(ProfileError::EditorClosed)));
        assert!(matches!(h.editor.submit().await, Err(ProfileError::EditorClosed)));
        assert!(matches!(h.editor.open().await, Err(ProfileError::EditorClosed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_failure_is_fetch_error() {
        let h = harness();
        h.service.fail_get.store(true, Ordering::SeqCst);

        assert!(matches!(h.editor.open().await, Err(ProfileError::Fetch(_))));
        assert_eq!(h.editor.draft(), EditableProfileDraft::default());
    }
}
