//! # State Module
//!
//! Application state for the profile host.
//!
//! Separate state types instead of one `AppState`: each command takes only
//! the state it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      AppContext::init                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────────┐  ┌──────────────────┐          │
//! │  │   DbState    │  │  SessionState    │  │   EditorState    │          │
//! │  │              │  │                  │  │                  │          │
//! │  │  Database    │  │  controller      │  │  open editor     │          │
//! │  │  (SQLite     │  │  shared reader   │  │  pending check   │          │
//! │  │   pool)      │  │  picker, session │  │                  │          │
//! │  └──────────────┘  └──────────────────┘  └──────────────────┘          │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • SessionState: read-only after init; the controller guards submit    │
//! │  • EditorState: Mutex, never held across an await                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod db;
mod editor;
mod session;

pub use db::DbState;
pub use editor::EditorState;
pub use session::SessionState;
