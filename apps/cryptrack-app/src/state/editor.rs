//! # Editor State
//!
//! Holds the open profile editor, if any, and the handle of its latest
//! availability check. Opening a new editor closes the previous one.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::debug;

use cryptrack_profile::ProfileEditor;

use crate::error::ApiError;

#[derive(Default)]
struct EditorSlot {
    editor: Option<Arc<ProfileEditor>>,
    pending_check: Option<JoinHandle<()>>,
}

#[derive(Default)]
pub struct EditorState {
    slot: Mutex<EditorSlot>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EditorSlot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Installs `editor` as the open one, closing any previous editor.
    pub fn replace(&self, editor: Arc<ProfileEditor>) {
        let previous = {
            let mut slot = self.lock();
            slot.pending_check = None;
            slot.editor.replace(editor)
        };
        if let Some(previous) = previous {
            debug!("Closing previous profile editor");
            previous.close();
        }
    }

    /// Returns the open editor.
    pub fn current(&self) -> Result<Arc<ProfileEditor>, ApiError> {
        match self.lock().editor.as_ref() {
            Some(editor) if editor.is_open() => Ok(Arc::clone(editor)),
            _ => Err(ApiError::editor_closed()),
        }
    }

    /// Remembers the latest scheduled availability check.
    ///
    /// An older handle is dropped; its task still runs but its result is
    /// discarded by the checker.
    pub fn set_pending_check(&self, handle: Option<JoinHandle<()>>) {
        self.lock().pending_check = handle;
    }

    pub fn take_pending_check(&self) -> Option<JoinHandle<()>> {
        self.lock().pending_check.take()
    }

    /// Closes and forgets the open editor. Returns false if none was open.
    pub fn close(&self) -> bool {
        let editor = {
            let mut slot = self.lock();
            slot.pending_check = None;
            slot.editor.take()
        };
        match editor {
            Some(editor) => {
                editor.close();
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.lock();
        f.debug_struct("EditorState")
            .field("open", &slot.editor.as_ref().is_some_and(|e| e.is_open()))
            .field("pending_check", &slot.pending_check.is_some())
            .finish()
    }
}
