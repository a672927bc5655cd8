// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ob_core::TickLog;
use rusqlite::{params, Row};

use crate::error::StorageError;
use crate::store::AgenticStore;

impl AgenticStore {
    /// Persist one completed tick's summary row.
    pub fn insert_tick_log(&self, tick: &TickLog) -> Result<i64, StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tick_log \
             (tick_number, started_at, completed_at, observations_count, actions_planned, \
              actions_executed, actions_succeeded, reasoning_summary, duration_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                tick.tick_number,
                tick.started_at,
                tick.completed_at,
                tick.observations_count,
                tick.actions_planned,
                tick.actions_executed,
                tick.actions_succeeded,
                tick.reasoning_summary,
                tick.duration_ms,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// The highest tick number persisted so far, or 0 if no tick has run yet.
    /// The next tick to run is always `last_tick_number() + 1`: this is how
    /// the tick counter survives a restart.
    pub fn last_tick_number(&self) -> Result<u64, StorageError> {
        let conn = self.conn.lock();
        let max: Option<i64> =
            conn.query_row("SELECT MAX(tick_number) FROM tick_log", [], |row| row.get(0))?;
        Ok(max.unwrap_or(0).max(0) as u64)
    }

    /// Most recently logged tick rows, newest first.
    pub fn get_recent_ticks(&self, limit: u32) -> Result<Vec<TickLog>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT tick_number, started_at, completed_at, observations_count, actions_planned, \
                    actions_executed, actions_succeeded, reasoning_summary, duration_ms \
             FROM tick_log ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], row_to_tick)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn row_to_tick(row: &Row) -> rusqlite::Result<TickLog> {
    Ok(TickLog {
        tick_number: row.get::<_, i64>(0)? as u64,
        started_at: row.get(1)?,
        completed_at: row.get(2)?,
        observations_count: row.get::<_, i64>(3)? as usize,
        actions_planned: row.get::<_, i64>(4)? as usize,
        actions_executed: row.get::<_, i64>(5)? as usize,
        actions_succeeded: row.get::<_, i64>(6)? as usize,
        reasoning_summary: row.get(7)?,
        duration_ms: row.get(8)?,
    })
}

#[cfg(test)]
#[path = "ticks_tests.rs"]
mod tests;
