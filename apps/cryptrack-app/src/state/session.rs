//! # Session State
//!
//! Everything bound to the signed-in user: the session itself, editor
//! settings, the submit controller and a reader of the shared profile.
//! Read-only after initialization.

use std::sync::Arc;

use cryptrack_core::Session;
use cryptrack_profile::{
    EditorSettings, ProfileEditor, ProfileService, ProfileSubmitController, SharedProfileReader,
};

use crate::picker::FileImagePicker;

pub struct SessionState {
    session: Session,
    settings: EditorSettings,
    controller: Arc<ProfileSubmitController>,
    service: Arc<dyn ProfileService>,
    picker: Arc<FileImagePicker>,
    shared: SharedProfileReader,
}

impl SessionState {
    pub fn new(
        session: Session,
        settings: EditorSettings,
        controller: Arc<ProfileSubmitController>,
        service: Arc<dyn ProfileService>,
        picker: Arc<FileImagePicker>,
        shared: SharedProfileReader,
    ) -> Self {
        SessionState {
            session,
            settings,
            controller,
            service,
            picker,
            shared,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn controller(&self) -> &Arc<ProfileSubmitController> {
        &self.controller
    }

    /// Host picker; select a file before calling `pick_avatar`.
    pub fn picker(&self) -> &FileImagePicker {
        &self.picker
    }

    /// Reader of the profile shown outside the editor.
    pub fn shared(&self) -> &SharedProfileReader {
        &self.shared
    }

    /// Creates a fresh, unopened editor for this session.
    pub fn new_editor(&self) -> ProfileEditor {
        ProfileEditor::new(
            Arc::clone(&self.controller),
            Arc::clone(&self.service),
            &self.session,
            &self.settings,
        )
    }
}

impl std::fmt::Debug for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionState")
            .field("user_id", &self.session.user_id)
            .field("settings", &self.settings)
            .finish()
    }
}
