//! In-memory collaborators for unit tests.
//!
//! Every mock records the calls it receives and can be switched into a
//! failing mode, so tests can assert on what was (not) sent.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use cryptrack_core::{
    ImagePickOptions, LocalImage, PickerResult, ProfileRecord, ProfileUpdate, SharedUserProfile,
};

use crate::error::{ProfileError, ProfileResult, ServiceError, ServiceResult};
use crate::service::{ImagePicker, ProfilePersistence, ProfileService, StorageService};

pub const USER_ID: &str = "550e8400-e29b-41d4-a716-446655440000";
pub const OTHER_ID: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

// =============================================================================
// Profile Service
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileCall {
    Get(String),
    Update(String, ProfileUpdate),
    FindByUsername(String, String),
}

#[derive(Default)]
pub struct MockProfileService {
    records: Mutex<HashMap<String, ProfileRecord>>,
    calls: Mutex<Vec<ProfileCall>>,
    lookup_delays: Mutex<HashMap<String, Duration>>,
    pub fail_get: AtomicBool,
    pub fail_update: AtomicBool,
    pub fail_lookup: AtomicBool,
}

impl MockProfileService {
    /// Service holding the signed-in user "alice" and another user "bob".
    pub fn seeded() -> Arc<Self> {
        let service = MockProfileService::default();
        service.insert(
            ProfileRecord::new(USER_ID, "alice", "Alice A").with_avatar_url("https://cdn.test/old.png"),
        );
        service.insert(ProfileRecord::new(OTHER_ID, "bob", "Bob B"));
        Arc::new(service)
    }

    pub fn insert(&self, record: ProfileRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    pub fn record(&self, id: &str) -> Option<ProfileRecord> {
        self.records.lock().unwrap().get(id).cloned()
    }

    /// Delays the lookup response for one username.
    pub fn delay_lookup(&self, username: &str, delay: Duration) {
        self.lookup_delays
            .lock()
            .unwrap()
            .insert(username.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<ProfileCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProfileCall::FindByUsername(name, _) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn updates(&self) -> Vec<ProfileUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ProfileCall::Update(_, update) => Some(update),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ProfileService for MockProfileService {
    async fn get_profile(&self, user_id: &str) -> ServiceResult<ProfileRecord> {
        self.calls
            .lock()
            .unwrap()
            .push(ProfileCall::Get(user_id.to_string()));

        if self.fail_get.load(Ordering::SeqCst) {
            return Err(ServiceError::Timeout);
        }

        self.record(user_id)
            .ok_or_else(|| ServiceError::NotFound(user_id.to_string()))
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> ServiceResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(ProfileCall::Update(user_id.to_string(), update.clone()));

        if self.fail_update.load(Ordering::SeqCst) {
            return Err(ServiceError::from_status(500, "update failed"));
        }

        self.insert(update.apply_to(user_id));
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
        exclude_user_id: &str,
    ) -> ServiceResult<Option<ProfileRecord>> {
        self.calls.lock().unwrap().push(ProfileCall::FindByUsername(
            username.to_string(),
            exclude_user_id.to_string(),
        ));

        let delay = self.lookup_delays.lock().unwrap().get(username).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(ServiceError::Request("connection reset".into()));
        }

        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|r| r.username == username && r.id != exclude_user_id)
            .cloned())
    }
}

// =============================================================================
// Storage Service
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub bucket: String,
    pub path: String,
    pub size: usize,
    pub content_type: String,
}

#[derive(Default)]
pub struct MockStorage {
    uploads: Mutex<Vec<Upload>>,
    pub fail_upload: AtomicBool,
}

impl MockStorage {
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageService for MockStorage {
    async fn upload_blob(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<()> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(ServiceError::from_status(413, "Payload too large"));
        }

        self.uploads.lock().unwrap().push(Upload {
            bucket: bucket.to_string(),
            path: path.to_string(),
            size: bytes.len(),
            content_type: content_type.to_string(),
        });
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("https://cdn.test/{}/{}", bucket, path)
    }
}

// =============================================================================
// Image Picker
// =============================================================================

#[derive(Default)]
pub struct MockPicker {
    responses: Mutex<VecDeque<ServiceResult<PickerResult>>>,
    reads: Mutex<Vec<String>>,
    pub fail_read: AtomicBool,
}

impl MockPicker {
    pub fn returning(result: ServiceResult<PickerResult>) -> Arc<Self> {
        let picker = MockPicker::default();
        picker.push(result);
        Arc::new(picker)
    }

    pub fn push(&self, result: ServiceResult<PickerResult>) {
        self.responses.lock().unwrap().push_back(result);
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImagePicker for MockPicker {
    async fn pick_image(&self, _options: &ImagePickOptions) -> ServiceResult<PickerResult> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(PickerResult::cancelled()))
    }

    async fn read_bytes(&self, image: &LocalImage) -> ServiceResult<Vec<u8>> {
        self.reads.lock().unwrap().push(image.uri.clone());
        if self.fail_read.load(Ordering::SeqCst) {
            return Err(ServiceError::Io("file vanished".into()));
        }
        Ok(vec![0xFF, 0xD8, 0xFF, 0xE0])
    }
}

// =============================================================================
// Persistence
// =============================================================================

#[derive(Default)]
pub struct MemoryPersistence {
    stored: Mutex<Option<SharedUserProfile>>,
    pub fail_save: AtomicBool,
    pub fail_load: AtomicBool,
}

impl MemoryPersistence {
    pub fn with(profile: SharedUserProfile) -> Arc<Self> {
        let persistence = MemoryPersistence::default();
        *persistence.stored.lock().unwrap() = Some(profile);
        Arc::new(persistence)
    }

    pub fn stored(&self) -> Option<SharedUserProfile> {
        self.stored.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProfilePersistence for MemoryPersistence {
    async fn load(&self) -> ProfileResult<Option<SharedUserProfile>> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(ProfileError::Persistence("corrupt store".into()));
        }
        Ok(self.stored())
    }

    async fn save(&self, profile: &SharedUserProfile) -> ProfileResult<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(ProfileError::Persistence("disk full".into()));
        }
        *self.stored.lock().unwrap() = Some(profile.clone());
        Ok(())
    }
}
