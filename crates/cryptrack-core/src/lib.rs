//! # cryptrack-core: Pure Profile Logic for Crypto Tracker
//!
//! This crate holds the profile types and rules shared by every other
//! crate, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Crypto Tracker Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile Frontend                              │   │
//! │  │    Profile ──► Edit Profile ──► Avatar Picker                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           cryptrack-profile (workflow, remote calls)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ cryptrack-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   draft   │  │ validation│                  │   │
//! │  │   │  Profile  │  │  Profile  │  │  username │                  │   │
//! │  │   │  Shared   │  │  State    │  │  avatar   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO STORAGE                              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Remote record, shared profile, availability, avatar state
//! - [`draft`] - The editable draft and its setters
//! - [`error`] - Validation error type
//! - [`validation`] - Username, user id and avatar file rules
//!
//! ## Example Usage
//!
//! ```rust
//! use cryptrack_core::{ProfileRecord, ProfileState};
//!
//! let record = ProfileRecord::new("550e8400-e29b-41d4-a716-446655440000", "alice", "Alice A");
//! let mut state = ProfileState::from_record(&record);
//!
//! state.set_full_name("Alice Anderson");
//! let update = state.merged_update(None);
//! assert_eq!(update.full_name, "Alice Anderson");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use draft::{EditableProfileDraft, ProfileState};
pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shortest username accepted (and worth a remote availability check).
pub const MIN_USERNAME_LENGTH: usize = 3;

/// Quiet window of the username availability debounce, in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Storage bucket holding avatar images.
pub const AVATAR_BUCKET: &str = "avatars";

/// Backend table holding profile records.
pub const PROFILES_TABLE: &str = "profiles";

/// Key of the persisted shared user store.
pub const USER_STORE_KEY: &str = "fintechcrypto-user-store";

/// Username shown when none is known yet.
pub const DEFAULT_DISPLAY_USERNAME: &str = "User";

/// Avatar shown when none is known yet or the stored one cannot be resolved.
pub const DEFAULT_PLACEHOLDER_AVATAR_URL: &str =
    "https://img.freepik.com/free-vector/cheerful-square-character-illustration_1308-164239.jpg";
