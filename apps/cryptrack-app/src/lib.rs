//! # Crypto Tracker App Library
//!
//! Host side of the profile workflow: wires config, the local store and
//! the backend client into the command layer used by the screens and by
//! the `cryptrack` binary.
//!
//! ## Module Organization
//! ```text
//! cryptrack_app/
//! ├── lib.rs          ◄─── You are here (AppContext, tracing)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── db.rs       ◄─── Database state wrapper
//! │   ├── session.rs  ◄─── Signed-in user, controller, shared reader
//! │   └── editor.rs   ◄─── Open editor and pending check
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   └── profile.rs  ◄─── Profile tab and edit commands
//! ├── picker.rs       ◄─── File-backed image picker
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod picker;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cryptrack_core::Session;
use cryptrack_profile::{
    AvatarUploadPipeline, ProfileConfig, ProfilePersistence, ProfileService,
    ProfileSubmitController, SharedProfileStore, StorageService, SupabaseClient,
};
use cryptrack_store::{Database, DbConfig};

use error::ApiError;
use picker::FileImagePicker;
use state::{DbState, EditorState, SessionState};

/// Everything the commands need, built once per signed-in session.
#[derive(Debug)]
pub struct AppContext {
    pub db: DbState,
    pub session: SessionState,
    pub editor: EditorState,
}

impl AppContext {
    /// Builds the context against the configured backend.
    ///
    /// ## Startup Sequence
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────────┐
    /// │                       Application Startup                               │
    /// │                                                                         │
    /// │  1. Open Database ────────────────────────────────────────────────────► │
    /// │     • CRYPTRACK_DB_PATH / storage.db_path, else platform data dir       │
    /// │     • Run pending migrations                                            │
    /// │                                                                         │
    /// │  2. Build Backend Client ─────────────────────────────────────────────► │
    /// │     • Requires backend url + anon key                                   │
    /// │     • Session access token as bearer                                    │
    /// │                                                                         │
    /// │  3. Restore Shared Profile ───────────────────────────────────────────► │
    /// │     • fintechcrypto-user-store key, empty if missing                    │
    /// │                                                                         │
    /// │  4. Wire Workflow ────────────────────────────────────────────────────► │
    /// │     • FileImagePicker → AvatarUploadPipeline → SubmitController         │
    /// └─────────────────────────────────────────────────────────────────────────┘
    /// ```
    pub async fn init(config: &ProfileConfig, session: Session) -> Result<Self, ApiError> {
        let client = Arc::new(SupabaseClient::new(
            &config.backend,
            session.access_token.clone(),
        )?);
        let db = open_database(config).await?;
        info!("Database connected and migrations applied");

        Ok(Self::assemble(config, session, db, client.clone(), client).await)
    }

    /// Builds the context from explicit collaborators.
    pub async fn assemble(
        config: &ProfileConfig,
        session: Session,
        db: Database,
        service: Arc<dyn ProfileService>,
        storage: Arc<dyn StorageService>,
    ) -> Self {
        let persistence: Arc<dyn ProfilePersistence> = Arc::new(db.kv());
        let (reader, writer) = SharedProfileStore::restore(persistence).await.split();

        let picker = Arc::new(FileImagePicker::new());
        let avatar = Arc::new(AvatarUploadPipeline::new(
            picker.clone(),
            storage,
            session.user_id.clone(),
            config.backend.avatar_bucket.clone(),
            config.editor.placeholder_avatar_url.clone(),
        ));
        let controller = Arc::new(ProfileSubmitController::new(
            session.user_id.clone(),
            config.editor.min_username_length,
            service.clone(),
            avatar,
            writer,
        ));

        debug!(user_id = %session.user_id, "Profile state initialized");

        AppContext {
            db: DbState::new(db),
            session: SessionState::new(
                session,
                config.editor.clone(),
                controller,
                service,
                picker,
                reader,
            ),
            editor: EditorState::new(),
        }
    }
}

/// Opens the local database, creating its directory if needed.
///
/// Falls back to an in-memory database when no data directory exists.
async fn open_database(config: &ProfileConfig) -> Result<Database, ApiError> {
    let db_config = match config.db_path() {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ApiError::internal(format!("Could not create {}: {}", parent.display(), e))
                })?;
            }
            info!(?path, "Database path determined");
            DbConfig::new(path)
        }
        None => {
            info!("No data directory, using in-memory database");
            DbConfig::in_memory()
        }
    };

    Ok(Database::new(db_config).await?)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cryptrack=trace` - Show trace for cryptrack crates only
/// - Default: `info,cryptrack=debug,sqlx=warn`
///
/// Logs go to stderr so command output stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cryptrack=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
