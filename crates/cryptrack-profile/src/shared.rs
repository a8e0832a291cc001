//! # Shared User Profile
//!
//! Process-wide `{ avatar_url, username }` shown outside the editor
//! (home header, profile tab).
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   SharedProfileStore::restore(persistence)                             │
//! │        │                                                                │
//! │        ├──► SharedProfileReader (Clone)  ──► any screen: read/subscribe│
//! │        │                                                                │
//! │        └──► SharedProfileWriter (one)    ──► ProfileSubmitController   │
//! │                     │                                                   │
//! │                     ├── watch::Sender (in-memory, notifies readers)    │
//! │                     └── ProfilePersistence::save (best effort)         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The writer is not `Clone`; whoever holds it is the only code path
//! that can change the shared profile.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use cryptrack_core::SharedUserProfile;

use crate::service::ProfilePersistence;

/// Factory for the reader/writer pair.
pub struct SharedProfileStore {
    reader: SharedProfileReader,
    writer: SharedProfileWriter,
}

impl SharedProfileStore {
    /// Creates a store holding `initial`, persisting writes through
    /// `persistence` when given.
    pub fn new(
        initial: SharedUserProfile,
        persistence: Option<Arc<dyn ProfilePersistence>>,
    ) -> Self {
        let (tx, rx) = watch::channel(initial);
        SharedProfileStore {
            reader: SharedProfileReader { rx },
            writer: SharedProfileWriter { tx, persistence },
        }
    }

    /// Creates an empty, non-persistent store.
    pub fn in_memory() -> Self {
        Self::new(SharedUserProfile::default(), None)
    }

    /// Loads the persisted profile and creates a store around it.
    ///
    /// Missing or unreadable data starts from an empty profile.
    pub async fn restore(persistence: Arc<dyn ProfilePersistence>) -> Self {
        let initial = match persistence.load().await {
            Ok(Some(profile)) => {
                info!(username = %profile.username, "Restored shared profile");
                profile
            }
            Ok(None) => {
                debug!("No stored shared profile, starting empty");
                SharedUserProfile::default()
            }
            Err(e) => {
                warn!(error = %e, "Could not restore shared profile, starting empty");
                SharedUserProfile::default()
            }
        };

        Self::new(initial, Some(persistence))
    }

    /// Returns a reader handle.
    pub fn reader(&self) -> SharedProfileReader {
        self.reader.clone()
    }

    /// Splits into the reader and the single writer.
    pub fn split(self) -> (SharedProfileReader, SharedProfileWriter) {
        (self.reader, self.writer)
    }
}

// =============================================================================
// Reader
// =============================================================================

/// Read-only handle to the shared profile.
#[derive(Debug, Clone)]
pub struct SharedProfileReader {
    rx: watch::Receiver<SharedUserProfile>,
}

impl SharedProfileReader {
    /// Returns a snapshot of the current profile.
    pub fn read(&self) -> SharedUserProfile {
        self.rx.borrow().clone()
    }

    /// Returns a receiver notified on every write.
    pub fn subscribe(&self) -> watch::Receiver<SharedUserProfile> {
        self.rx.clone()
    }
}

// =============================================================================
// Writer
// =============================================================================

/// The only handle able to change the shared profile.
pub struct SharedProfileWriter {
    tx: watch::Sender<SharedUserProfile>,
    persistence: Option<Arc<dyn ProfilePersistence>>,
}

impl std::fmt::Debug for SharedProfileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedProfileWriter")
            .field("current", &*self.tx.borrow())
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}

impl SharedProfileWriter {
    /// Replaces the shared profile and persists it.
    ///
    /// Persistence failures are logged; the in-memory value is updated
    /// regardless.
    pub async fn write(&self, avatar_url: Option<&str>, username: &str) -> SharedUserProfile {
        let profile = SharedUserProfile::new(avatar_url, username);
        self.tx.send_replace(profile.clone());
        debug!(username = %profile.username, "Shared profile updated");

        if let Some(persistence) = &self.persistence {
            if let Err(e) = persistence.save(&profile).await {
                warn!(error = %e, "Failed to persist shared profile");
            }
        }

        profile
    }

    /// Returns a snapshot of the current profile.
    pub fn current(&self) -> SharedUserProfile {
        self.tx.borrow().clone()
    }
}
