// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only audit log sink. Write-only from the core's perspective: the
//! Supervisor and Router write one row per privileged operation or routing
//! decision; nothing downstream of this module reads them back except for
//! operator tooling.

use ob_core::AuditEntry;
use rusqlite::{params, Row};

use crate::error::StorageError;
use crate::store::AgenticStore;

impl AgenticStore {
    /// Append one audit row. Never fails the caller's operation if this
    /// fails to write — callers should log and move on, per the "keep the
    /// fleet running" error policy.
    pub fn write_audit(&self, entry: &AuditEntry) -> Result<i64, StorageError> {
        let details_json = match &entry.details {
            Some(value) => Some(serde_json::to_string(value)?),
            None => None,
        };
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO audit_log \
             (timestamp, action, category, identity, plugin, details, success, duration_ms, error) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                entry.timestamp,
                entry.action,
                entry.category,
                entry.identity,
                entry.plugin,
                details_json,
                entry.success,
                entry.duration_ms,
                entry.error,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recently written audit rows, newest first. Operator tooling only.
    pub fn get_recent_audit(&self, limit: u32) -> Result<Vec<AuditEntry>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT timestamp, action, category, identity, plugin, details, success, \
                    duration_ms, error \
             FROM audit_log ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], row_to_audit)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn row_to_audit(row: &Row) -> rusqlite::Result<AuditEntry> {
    let details_json: Option<String> = row.get(5)?;
    let details = details_json.and_then(|s| serde_json::from_str(&s).ok());
    Ok(AuditEntry {
        timestamp: row.get(0)?,
        action: row.get(1)?,
        category: row.get(2)?,
        identity: row.get(3)?,
        plugin: row.get(4)?,
        details,
        success: row.get(6)?,
        duration_ms: row.get(7)?,
        error: row.get(8)?,
    })
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
