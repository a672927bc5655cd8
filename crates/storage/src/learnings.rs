// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ob_core::AgentLearning;
use rusqlite::{params, Row};

use crate::error::StorageError;
use crate::store::AgenticStore;

impl AgenticStore {
    /// Insert one reflection-extracted learning.
    pub fn insert_learning(&self, learning: &AgentLearning) -> Result<i64, StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO agent_learnings \
             (category, insight, confidence, source, source_tick, source_ref) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                learning.category,
                learning.insight,
                learning.confidence,
                learning.source,
                learning.source_tick,
                learning.source_ref,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recently inserted learnings, newest first.
    pub fn get_recent_learnings(&self, limit: u32) -> Result<Vec<AgentLearning>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, category, insight, confidence, source, source_tick, source_ref, created_at \
             FROM agent_learnings ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit], row_to_learning)?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn row_to_learning(row: &Row) -> rusqlite::Result<AgentLearning> {
    Ok(AgentLearning {
        id: row.get(0)?,
        category: row.get(1)?,
        insight: row.get(2)?,
        confidence: row.get(3)?,
        source: row.get(4)?,
        source_tick: row.get(5)?,
        source_ref: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
#[path = "learnings_tests.rs"]
mod tests;
