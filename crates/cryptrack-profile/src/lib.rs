//! # cryptrack-profile: Profile Edit Workflow for Crypto Tracker
//!
//! The asynchronous half of profile editing: debounced username checks,
//! two-phase avatar upload, the gated submit, and the shared profile the
//! rest of the app reads.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Profile Edit Workflow                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  ProfileEditor (one per screen)                  │  │
//! │  │   ProfileState (draft)  ·  AvailabilityChecker  ·  Liveness      │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │ submit / pick                           │
//! │                               ▼                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │            ProfileSubmitController (one per session)             │  │
//! │  │   gate ─► AvatarUploadPipeline::commit ─► update ─► shared write │  │
//! │  └───────┬──────────────────────┬────────────────────────┬─────────┘  │
//! │          ▼                      ▼                        ▼             │
//! │   ProfileService          StorageService         SharedProfileWriter   │
//! │   (SupabaseClient)        (SupabaseClient)       (watch + persistence) │
//! │                                                          │             │
//! │                                       SharedProfileReader ◄┘  (Clone)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`availability`] - Debounced username checker
//! - [`avatar`] - Pick/commit avatar pipeline
//! - [`config`] - Profile configuration (TOML + env)
//! - [`debounce`] - Sequence tokens and liveness flag
//! - [`editor`] - Editing session
//! - [`error`] - Profile and service error types
//! - [`persistence`] - Shared profile on the local key-value store
//! - [`service`] - Collaborator traits
//! - [`shared`] - Shared user profile store
//! - [`submit`] - Submit controller
//! - [`supabase`] - HTTP backend client

// =============================================================================
// Module Declarations
// =============================================================================

pub mod availability;
pub mod avatar;
pub mod config;
pub mod debounce;
pub mod editor;
pub mod error;
pub mod persistence;
pub mod service;
pub mod shared;
pub mod submit;
pub mod supabase;

#[cfg(test)]
pub(crate) mod mock;

// =============================================================================
// Re-exports
// =============================================================================

pub use availability::AvailabilityChecker;
pub use avatar::AvatarUploadPipeline;
pub use config::{session_from_env, BackendSettings, EditorSettings, ProfileConfig, StorageSettings};
pub use debounce::{DebounceTokens, Liveness, Token};
pub use editor::ProfileEditor;
pub use error::{ProfileError, ProfileResult, ServiceError, ServiceResult};
pub use service::{ImagePicker, ProfilePersistence, ProfileService, StorageService};
pub use shared::{SharedProfileReader, SharedProfileStore, SharedProfileWriter};
pub use submit::ProfileSubmitController;
pub use supabase::SupabaseClient;
