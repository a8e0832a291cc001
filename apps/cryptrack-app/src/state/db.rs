//! # Database State
//!
//! Wraps the local `Database` for use in commands. The pool is
//! thread-safe, so no extra locking.

use cryptrack_store::{Database, KeyValueRepository};

#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Key-value store holding the persisted shared profile.
    pub fn kv(&self) -> KeyValueRepository {
        self.db.kv()
    }
}
