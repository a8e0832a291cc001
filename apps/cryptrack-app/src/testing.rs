//! Test fixtures: an in-memory stand-in for the hosted backend and a
//! context wired to it with an in-memory database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cryptrack_core::{ProfileRecord, ProfileUpdate, Session};
use cryptrack_profile::{ProfileConfig, ProfileService, ServiceError, ServiceResult, StorageService};
use cryptrack_store::{Database, DbConfig};

use crate::AppContext;

pub const USER_ID: &str = "3f2b1c9e-7a4d-4e8b-9c1a-2d5e6f708192";
pub const OTHER_ID: &str = "9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d";

/// Profiles table plus avatar bucket, all in memory.
#[derive(Default)]
pub struct FakeBackend {
    profiles: Mutex<HashMap<String, ProfileRecord>>,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    updates: Mutex<Vec<ProfileUpdate>>,
    pub fail_get: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_upload: AtomicBool,
}

impl FakeBackend {
    /// Backend with the signed-in "satoshi" and another user "vitalik".
    pub fn seeded() -> Arc<Self> {
        let backend = FakeBackend::default();
        backend.put(ProfileRecord::new(USER_ID, "satoshi", "Satoshi N"));
        backend.put(ProfileRecord::new(OTHER_ID, "vitalik", "Vitalik B"));
        Arc::new(backend)
    }

    pub fn put(&self, record: ProfileRecord) {
        self.profiles
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    pub fn profile(&self, id: &str) -> Option<ProfileRecord> {
        self.profiles.lock().unwrap().get(id).cloned()
    }

    pub fn object_paths(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn fail(&self, flag: &AtomicBool) {
        flag.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileService for FakeBackend {
    async fn get_profile(&self, user_id: &str) -> ServiceResult<ProfileRecord> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(ServiceError::Request("network unreachable".into()));
        }
        self.profile(user_id)
            .ok_or_else(|| ServiceError::NotFound(user_id.to_string()))
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> ServiceResult<()> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(ServiceError::from_status(503, "service unavailable"));
        }
        self.updates.lock().unwrap().push(update.clone());
        self.put(update.apply_to(user_id));
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
        exclude_user_id: &str,
    ) -> ServiceResult<Option<ProfileRecord>> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .values()
            .find(|r| r.username == username && r.id != exclude_user_id)
            .cloned())
    }
}

#[async_trait]
impl StorageService for FakeBackend {
    async fn upload_blob(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> ServiceResult<()> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(ServiceError::from_status(413, "Payload too large"));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(format!("{}/{}", bucket, path), bytes);
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("https://storage.test/{}/{}", bucket, path)
    }
}

/// Config with a short debounce so tests run on the real clock.
pub fn test_config() -> ProfileConfig {
    let mut config = ProfileConfig::default();
    config.editor.debounce_ms = 10;
    config
}

pub fn test_session() -> Session {
    let mut session = Session::new(USER_ID);
    session.email = Some("satoshi@example.com".into());
    session
}

/// Context over `backend` with a fresh in-memory database.
pub async fn test_context(backend: Arc<FakeBackend>) -> AppContext {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    context_with_db(backend, db).await
}

pub async fn context_with_db(backend: Arc<FakeBackend>, db: Database) -> AppContext {
    AppContext::assemble(
        &test_config(),
        test_session(),
        db,
        backend.clone(),
        backend,
    )
    .await
}
