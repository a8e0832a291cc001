//! # Repository Module
//!
//! Repository implementations for the local store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  SharedProfileStore (cryptrack-profile)                                │
//! │       │                                                                 │
//! │       │  db.kv().set_json("fintechcrypto-user-store", &profile)        │
//! │       ▼                                                                 │
//! │  KeyValueRepository                                                    │
//! │  ├── get / set / remove        (raw strings)                           │
//! │  └── get_json / set_json       (serde values)                          │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database (kv_store)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`KeyValueRepository`](kv::KeyValueRepository) - Durable string/JSON values by key

pub mod kv;
