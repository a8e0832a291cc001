//! # Supabase Client
//!
//! HTTP implementation of [`ProfileService`] and [`StorageService`]
//! against a hosted Supabase project.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PostgREST                                                             │
//! │  ─────────                                                             │
//! │  GET   /rest/v1/profiles?select=...&id=eq.{id}                         │
//! │        Accept: application/vnd.pgrst.object+json  (406 = no row)      │
//! │  PATCH /rest/v1/profiles?id=eq.{id}            body: ProfileUpdate     │
//! │  GET   /rest/v1/profiles?select=id,username                            │
//! │            &username=eq.{name}&id=neq.{me}&limit=1                     │
//! │                                                                         │
//! │  Storage                                                               │
//! │  ───────                                                               │
//! │  POST  /storage/v1/object/{bucket}/{path}      body: image bytes       │
//! │  URL   /storage/v1/object/public/{bucket}/{path}                       │
//! │                                                                         │
//! │  Every request: apikey: {anon key}                                     │
//! │                 Authorization: Bearer {access token | anon key}        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info};
use url::Url;

use cryptrack_core::{ProfileRecord, ProfileUpdate};

use crate::config::BackendSettings;
use crate::error::{ProfileError, ProfileResult, ServiceError, ServiceResult};
use crate::service::{ProfileService, StorageService};

const PGRST_OBJECT: &str = "application/vnd.pgrst.object+json";
const PROFILE_COLUMNS: &str = "id,username,full_name,avatar_url,updated_at";

/// Supabase REST + Storage client.
#[derive(Clone)]
pub struct SupabaseClient {
    http: Client,
    base_url: Url,
    anon_key: String,
    access_token: Option<String>,
    table: String,
}

impl std::fmt::Debug for SupabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseClient")
            .field("base_url", &self.base_url.as_str())
            .field("table", &self.table)
            .field("has_access_token", &self.access_token.is_some())
            .finish()
    }
}

impl SupabaseClient {
    /// Creates a client from backend settings.
    ///
    /// `access_token` is the signed-in user's JWT; without it requests
    /// run as the anonymous role.
    pub fn new(settings: &BackendSettings, access_token: Option<String>) -> ProfileResult<Self> {
        let (url, anon_key) = match (settings.url.as_deref(), settings.anon_key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => (url, key),
            _ => return Err(ProfileError::MissingBackend),
        };

        // Url::join replaces the last segment unless the base ends in '/'
        let mut base_url = Url::parse(url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ProfileError::InvalidConfig(format!("HTTP client: {}", e)))?;

        info!(base_url = %base_url, table = %settings.profiles_table, "Supabase client created");

        Ok(SupabaseClient {
            http,
            base_url,
            anon_key: anon_key.to_string(),
            access_token,
            table: settings.profiles_table.clone(),
        })
    }

    // =========================================================================
    // Request Building
    // =========================================================================

    fn endpoint(&self, path: &str) -> ServiceResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    fn table_url(&self) -> ServiceResult<Url> {
        self.endpoint(&format!("rest/v1/{}", self.table))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        builder.header("apikey", &self.anon_key).bearer_auth(bearer)
    }

    fn get_profile_request(&self, user_id: &str) -> ServiceResult<RequestBuilder> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", PROFILE_COLUMNS)
            .append_pair("id", &format!("eq.{}", user_id));

        Ok(self.authorize(self.http.get(url)).header(ACCEPT, PGRST_OBJECT))
    }

    fn update_profile_request(
        &self,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> ServiceResult<RequestBuilder> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", user_id));

        Ok(self
            .authorize(self.http.patch(url))
            .header("Prefer", "return=minimal")
            .json(update))
    }

    fn find_by_username_request(
        &self,
        username: &str,
        exclude_user_id: &str,
    ) -> ServiceResult<RequestBuilder> {
        let mut url = self.table_url()?;
        url.query_pairs_mut()
            .append_pair("select", "id,username")
            .append_pair("username", &format!("eq.{}", username))
            .append_pair("id", &format!("neq.{}", exclude_user_id))
            .append_pair("limit", "1");

        Ok(self.authorize(self.http.get(url)))
    }

    fn upload_request(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<RequestBuilder> {
        let url = self.endpoint(&format!("storage/v1/object/{}/{}", bucket, path))?;

        Ok(self
            .authorize(self.http.post(url))
            .header(CONTENT_TYPE, content_type)
            .body(bytes))
    }

    /// Sends a request and maps non-success statuses.
    async fn send(&self, request: RequestBuilder) -> ServiceResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        debug!(status = status.as_u16(), body = %body, "Supabase request failed");
        Err(ServiceError::from_status(status.as_u16(), body))
    }
}

#[async_trait]
impl ProfileService for SupabaseClient {
    async fn get_profile(&self, user_id: &str) -> ServiceResult<ProfileRecord> {
        debug!(user_id = %user_id, "Fetching profile");
        let response = self.send(self.get_profile_request(user_id)?).await?;
        Ok(response.json::<ProfileRecord>().await?)
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> ServiceResult<()> {
        debug!(user_id = %user_id, "Writing profile");
        self.send(self.update_profile_request(user_id, update)?)
            .await?;
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &str,
        exclude_user_id: &str,
    ) -> ServiceResult<Option<ProfileRecord>> {
        let response = self
            .send(self.find_by_username_request(username, exclude_user_id)?)
            .await?;
        let rows = response.json::<Vec<ProfileRecord>>().await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl StorageService for SupabaseClient {
    async fn upload_blob(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> ServiceResult<()> {
        self.send(self.upload_request(bucket, path, bytes, content_type)?)
            .await?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            bucket,
            path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;
    use reqwest::Method;

    fn settings() -> BackendSettings {
        BackendSettings {
            url: Some("https://abc.supabase.co".into()),
            anon_key: Some("anon-key".into()),
            ..BackendSettings::default()
        }
    }

    fn client() -> SupabaseClient {
        SupabaseClient::new(&settings(), Some("user-jwt".into())).unwrap()
    }

    fn query_pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_requires_url_and_key() {
        let mut settings = settings();
        settings.anon_key = None;
        assert!(matches!(
            SupabaseClient::new(&settings, None),
            Err(ProfileError::MissingBackend)
        ));
    }

    #[test]
    fn test_get_profile_request() {
        let request = client().get_profile_request("user-1").unwrap().build().unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().path(), "/rest/v1/profiles");
        assert_eq!(
            query_pairs(request.url()),
            vec![
                ("select".to_string(), PROFILE_COLUMNS.to_string()),
                ("id".to_string(), "eq.user-1".to_string()),
            ]
        );
        assert_eq!(request.headers()[ACCEPT], PGRST_OBJECT);
        assert_eq!(request.headers()["apikey"], "anon-key");
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer user-jwt");
    }

    #[test]
    fn test_anonymous_bearer_falls_back_to_anon_key() {
        let client = SupabaseClient::new(&settings(), None).unwrap();
        let request = client.get_profile_request("user-1").unwrap().build().unwrap();
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer anon-key");
    }

    #[test]
    fn test_update_profile_request() {
        let update = ProfileUpdate::new("alice".into(), "Alice A".into(), None);
        let request = client()
            .update_profile_request("user-1", &update)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::PATCH);
        assert_eq!(
            query_pairs(request.url()),
            vec![("id".to_string(), "eq.user-1".to_string())]
        );
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");

        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["full_name"], "Alice A");
    }

    #[test]
    fn test_find_by_username_request() {
        let request = client()
            .find_by_username_request("bob smith", "user-1")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            query_pairs(request.url()),
            vec![
                ("select".to_string(), "id,username".to_string()),
                ("username".to_string(), "eq.bob smith".to_string()),
                ("id".to_string(), "neq.user-1".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_upload_request() {
        let request = client()
            .upload_request("avatars", "user-1/abc.png", vec![1, 2, 3], "image/png")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://abc.supabase.co/storage/v1/object/avatars/user-1/abc.png"
        );
        assert_eq!(request.headers()[CONTENT_TYPE], "image/png");
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            client().public_url("avatars", "user-1/abc.png"),
            "https://abc.supabase.co/storage/v1/object/public/avatars/user-1/abc.png"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let mut settings = settings();
        settings.url = Some("https://gateway.example/supabase".into());
        let client = SupabaseClient::new(&settings, None).unwrap();

        assert_eq!(
            client.table_url().unwrap().as_str(),
            "https://gateway.example/supabase/rest/v1/profiles"
        );
        assert_eq!(
            client.public_url("avatars", "a.png"),
            "https://gateway.example/supabase/storage/v1/object/public/avatars/a.png"
        );
    }
}
