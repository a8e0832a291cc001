//! Shared profile persistence on top of the local key-value store.
//!
//! The profile is stored as JSON under [`USER_STORE_KEY`]
//! (`fintechcrypto-user-store`).

use async_trait::async_trait;
use tracing::debug;

use cryptrack_core::{SharedUserProfile, USER_STORE_KEY};
use cryptrack_store::KeyValueRepository;

use crate::error::ProfileResult;
use crate::service::ProfilePersistence;

#[async_trait]
impl ProfilePersistence for KeyValueRepository {
    async fn load(&self) -> ProfileResult<Option<SharedUserProfile>> {
        let profile = self.get_json::<SharedUserProfile>(USER_STORE_KEY).await?;
        debug!(found = profile.is_some(), "Loaded shared profile from store");
        Ok(profile)
    }

    async fn save(&self, profile: &SharedUserProfile) -> ProfileResult<()> {
        self.set_json(USER_STORE_KEY, profile).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::SharedProfileStore;
    use cryptrack_store::{Database, DbConfig};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_profile_survives_restart() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let (_, writer) = SharedProfileStore::restore(Arc::new(db.kv())).await.split();
        writer.write(Some("https://cdn.test/a.png"), "alice").await;

        let restored = SharedProfileStore::restore(Arc::new(db.kv())).await;
        assert_eq!(
            restored.reader().read(),
            SharedUserProfile::new(Some("https://cdn.test/a.png"), "alice")
        );
    }

    #[tokio::test]
    async fn test_stored_as_camel_case_json() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.kv();

        repo.save(&SharedUserProfile::new(None, "alice")).await.unwrap();

        let raw = repo.get(USER_STORE_KEY).await.unwrap().unwrap();
        assert!(raw.contains("\"avatarUrl\""));
        assert!(raw.contains("\"username\":\"alice\""));
    }

    #[tokio::test]
    async fn test_corrupt_value_restores_empty() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.kv().set(USER_STORE_KEY, "not json").await.unwrap();

        assert!(db.kv().load().await.is_err());

        let store = SharedProfileStore::restore(Arc::new(db.kv())).await;
        assert!(store.reader().read().is_empty());
    }
}
