//! # Commands Module
//!
//! All commands exposed to the profile screens and the CLI.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! └── profile.rs  ◄─── Profile tab, editor, submit
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Screen / CLI                                                           │
//! │  ────────────                                                           │
//! │  open_editor(&ctx.session, &ctx.editor)                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Rust Backend                                                           │
//! │  ────────────                                                           │
//! │  async fn open_editor(                                                  │
//! │      session: &SessionState,  ◄── only the state it needs              │
//! │      editor: &EditorState,                                              │
//! │  ) -> Result<EditorDto, ApiError>                                       │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  Screen receives: EditorDto                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod profile;
