//! # Profile Configuration
//!
//! Configuration management for the profile workflow.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CRYPTRACK_SUPABASE_URL=https://abc.supabase.co                     │
//! │     CRYPTRACK_DEBOUNCE_MS=300                                          │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/crypto-tracker/profile.toml (Linux)                      │
//! │     ~/Library/Application Support/com.cryptrack.crypto-tracker/...     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     300ms debounce, 3 character usernames, "avatars" bucket            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # profile.toml
//! [backend]
//! url = "https://abc.supabase.co"
//! anon_key = "eyJhbGciOi..."
//! profiles_table = "profiles"
//! avatar_bucket = "avatars"
//! timeout_secs = 30
//!
//! [editor]
//! debounce_ms = 300
//! min_username_length = 3
//!
//! [storage]
//! db_path = "/var/lib/cryptrack/cryptrack.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use cryptrack_core::validation::validate_user_id;
use cryptrack_core::{
    Session, AVATAR_BUCKET, DEFAULT_DEBOUNCE_MS, DEFAULT_PLACEHOLDER_AVATAR_URL,
    MIN_USERNAME_LENGTH, PROFILES_TABLE,
};

use crate::error::{ProfileError, ProfileResult};

// =============================================================================
// Backend Settings
// =============================================================================

/// Connection settings for the hosted backend (REST + object storage).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Project base URL, e.g. `https://abc.supabase.co`.
    #[serde(default)]
    pub url: Option<String>,

    /// Public anonymous API key sent as `apikey`.
    #[serde(default)]
    pub anon_key: Option<String>,

    /// Table holding profile rows.
    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,

    /// Storage bucket for avatar images.
    #[serde(default = "default_avatar_bucket")]
    pub avatar_bucket: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_profiles_table() -> String {
    PROFILES_TABLE.to_string()
}

fn default_avatar_bucket() -> String {
    AVATAR_BUCKET.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            url: None,
            anon_key: None,
            profiles_table: default_profiles_table(),
            avatar_bucket: default_avatar_bucket(),
            timeout_secs: default_timeout(),
        }
    }
}

impl BackendSettings {
    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Editor Settings
// =============================================================================

/// Behaviour of the profile editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Quiet window before a username check is sent (milliseconds).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Minimum username length in characters.
    #[serde(default = "default_min_username_length")]
    pub min_username_length: usize,

    /// Avatar shown when a profile has none.
    #[serde(default = "default_placeholder_avatar_url")]
    pub placeholder_avatar_url: String,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_min_username_length() -> usize {
    MIN_USERNAME_LENGTH
}

fn default_placeholder_avatar_url() -> String {
    DEFAULT_PLACEHOLDER_AVATAR_URL.to_string()
}

impl Default for EditorSettings {
    fn default() -> Self {
        EditorSettings {
            debounce_ms: default_debounce_ms(),
            min_username_length: default_min_username_length(),
            placeholder_avatar_url: default_placeholder_avatar_url(),
        }
    }
}

impl EditorSettings {
    /// Returns the debounce window.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Local database location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file path. Defaults to the platform data directory.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

// =============================================================================
// Main Profile Configuration
// =============================================================================

/// Complete profile workflow configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendSettings,

    /// Editor behaviour.
    #[serde(default)]
    pub editor: EditorSettings,

    /// Local storage settings.
    #[serde(default)]
    pub storage: StorageSettings,
}

impl ProfileConfig {
    /// Creates a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (profile.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ProfileResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading profile config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load profile config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ProfileResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ProfileError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ProfileError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ProfileError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Profile config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ProfileResult<()> {
        if let Some(ref raw) = self.backend.url {
            let url = Url::parse(raw)?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ProfileError::InvalidUrl(format!(
                    "Backend URL must start with http:// or https://, got: {}",
                    raw
                )));
            }
        }

        if self.backend.profiles_table.trim().is_empty() {
            return Err(ProfileError::InvalidConfig(
                "profiles_table must not be empty".into(),
            ));
        }

        if self.backend.avatar_bucket.trim().is_empty() {
            return Err(ProfileError::InvalidConfig(
                "avatar_bucket must not be empty".into(),
            ));
        }

        if self.backend.timeout_secs == 0 {
            return Err(ProfileError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.editor.min_username_length == 0 {
            return Err(ProfileError::InvalidConfig(
                "min_username_length must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (environment in production).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CRYPTRACK_SUPABASE_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.url = Some(url);
        }

        if let Some(key) = lookup("CRYPTRACK_SUPABASE_ANON_KEY") {
            self.backend.anon_key = Some(key);
        }

        if let Some(bucket) = lookup("CRYPTRACK_AVATAR_BUCKET") {
            self.backend.avatar_bucket = bucket;
        }

        if let Some(ms) = lookup("CRYPTRACK_DEBOUNCE_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => {
                    debug!(debounce_ms = ms, "Overriding debounce window from environment");
                    self.editor.debounce_ms = ms;
                }
                Err(_) => warn!(value = %ms, "Ignoring invalid CRYPTRACK_DEBOUNCE_MS"),
            }
        }

        if let Some(len) = lookup("CRYPTRACK_MIN_USERNAME_LENGTH") {
            match len.parse::<usize>() {
                Ok(len) => self.editor.min_username_length = len,
                Err(_) => warn!(value = %len, "Ignoring invalid CRYPTRACK_MIN_USERNAME_LENGTH"),
            }
        }

        if let Some(path) = lookup("CRYPTRACK_DB_PATH") {
            self.storage.db_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("profile.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the configured database path, or the platform default.
    pub fn db_path(&self) -> Option<PathBuf> {
        self.storage
            .db_path
            .clone()
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("cryptrack.db")))
    }

    /// Returns the backend URL and key, or `MissingBackend`.
    pub fn backend_credentials(&self) -> ProfileResult<(&str, &str)> {
        match (self.backend.url.as_deref(), self.backend.anon_key.as_deref()) {
            (Some(url), Some(key)) if !url.is_empty() && !key.is_empty() => Ok((url, key)),
            _ => Err(ProfileError::MissingBackend),
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "cryptrack", "crypto-tracker")
}

// =============================================================================
// Session
// =============================================================================

/// Reads the signed-in user from `CRYPTRACK_USER_ID`,
/// `CRYPTRACK_USER_EMAIL` and `CRYPTRACK_ACCESS_TOKEN`.
pub fn session_from_env() -> ProfileResult<Session> {
    session_from_lookup(|key| std::env::var(key).ok())
}

fn session_from_lookup<F>(lookup: F) -> ProfileResult<Session>
where
    F: Fn(&str) -> Option<String>,
{
    let user_id = lookup("CRYPTRACK_USER_ID")
        .filter(|id| !id.trim().is_empty())
        .ok_or(ProfileError::MissingSession)?;

    validate_user_id(&user_id)?;

    let mut session = Session::new(user_id);
    session.email = lookup("CRYPTRACK_USER_EMAIL");
    session.access_token = lookup("CRYPTRACK_ACCESS_TOKEN");
    Ok(session)
}
