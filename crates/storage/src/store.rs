// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Embedded SQLite persistence for agentic state and the audit sink.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::Connection;

use crate::error::StorageError;
use crate::schema::run_migrations;

/// Thread-safe handle to the agentic SQLite database. Cheap to clone; all
/// clones share the same connection and lock.
#[derive(Clone)]
pub struct AgenticStore {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl AgenticStore {
    /// Open (or create) a database file on disk and run migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.query_row("PRAGMA journal_mode=WAL", [], |_| Ok(()))?;
        run_migrations(&conn)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }

    /// In-memory database — used by tests and by agents that opt out of
    /// persistence.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self { conn: Arc::new(Mutex::new(conn)) })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
