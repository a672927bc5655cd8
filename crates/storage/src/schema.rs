// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Idempotent schema migrations, versions 900+.
//!
//! `CREATE TABLE IF NOT EXISTS` makes every migration safe to re-apply, so
//! the tracking table below only exists to answer "what version is this
//! database at", not to gate whether a migration runs.

use rusqlite::Connection;

use crate::error::StorageError;

struct Migration {
    version: i64,
    name: &'static str,
    up_sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 900,
        name: "agentic_goals",
        up_sql: r#"
            CREATE TABLE IF NOT EXISTS agent_goals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                description TEXT DEFAULT '',
                priority INTEGER DEFAULT 50,
                status TEXT DEFAULT 'active',
                progress REAL DEFAULT 0.0,
                metadata TEXT DEFAULT '{}',
                created_at TEXT DEFAULT (datetime('now')),
                updated_at TEXT DEFAULT (datetime('now'))
            );
        "#,
    },
    Migration {
        version: 901,
        name: "agentic_action_log",
        up_sql: r#"
            CREATE TABLE IF NOT EXISTS action_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tick_number INTEGER DEFAULT 0,
                action_type TEXT NOT NULL,
                target TEXT DEFAULT '',
                target_number INTEGER DEFAULT 0,
                repo TEXT DEFAULT '',
                priority INTEGER DEFAULT 0,
                reasoning TEXT DEFAULT '',
                success INTEGER DEFAULT 0,
                result TEXT DEFAULT '',
                error TEXT DEFAULT '',
                duration_ms REAL DEFAULT 0.0,
                created_at TEXT DEFAULT (datetime('now'))
            );
        "#,
    },
    Migration {
        version: 902,
        name: "agentic_learnings",
        up_sql: r#"
            CREATE TABLE IF NOT EXISTS agent_learnings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT DEFAULT '',
                insight TEXT NOT NULL,
                confidence REAL DEFAULT 0.5,
                source TEXT DEFAULT 'reflection',
                source_tick INTEGER DEFAULT 0,
                source_ref TEXT DEFAULT NULL,
                created_at TEXT DEFAULT (datetime('now'))
            );
        "#,
    },
    Migration {
        version: 903,
        name: "agentic_tick_log",
        up_sql: r#"
            CREATE TABLE IF NOT EXISTS tick_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                tick_number INTEGER NOT NULL,
                started_at TEXT DEFAULT '',
                completed_at TEXT DEFAULT '',
                observations_count INTEGER DEFAULT 0,
                actions_planned INTEGER DEFAULT 0,
                actions_executed INTEGER DEFAULT 0,
                actions_succeeded INTEGER DEFAULT 0,
                reasoning_summary TEXT DEFAULT '',
                duration_ms REAL DEFAULT 0.0
            );
        "#,
    },
    Migration {
        version: 904,
        name: "audit_log",
        up_sql: r#"
            CREATE TABLE IF NOT EXISTS audit_log (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp REAL NOT NULL,
                action TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT 'general',
                identity TEXT NOT NULL,
                plugin TEXT,
                details TEXT,
                success INTEGER NOT NULL DEFAULT 1,
                duration_ms REAL,
                error TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON audit_log(timestamp);
            CREATE INDEX IF NOT EXISTS idx_audit_action ON audit_log(action);
            CREATE INDEX IF NOT EXISTS idx_audit_category ON audit_log(category);
        "#,
    },
];

pub fn run_migrations(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT DEFAULT (datetime('now'))
        );",
    )?;

    for migration in MIGRATIONS {
        conn.execute_batch(migration.up_sql)?;
        conn.execute(
            "INSERT OR IGNORE INTO schema_migrations (version, name) VALUES (?1, ?2)",
            rusqlite::params![migration.version, migration.name],
        )?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
