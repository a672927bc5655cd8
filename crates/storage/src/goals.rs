// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ob_core::{AgentGoal, GoalStatus};
use rusqlite::{params, Row};
use std::str::FromStr;

use crate::error::StorageError;
use crate::store::AgenticStore;

impl AgenticStore {
    /// All goals with the given status, highest priority first.
    pub fn get_goals(&self, status: GoalStatus) -> Result<Vec<AgentGoal>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, priority, status, progress, metadata, created_at, updated_at \
             FROM agent_goals WHERE status = ?1 ORDER BY priority DESC",
        )?;
        let rows = stmt
            .query_map(params![status.as_str()], row_to_goal)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_goal_by_name(&self, name: &str) -> Result<Option<AgentGoal>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, description, priority, status, progress, metadata, created_at, updated_at \
             FROM agent_goals WHERE name = ?1",
        )?;
        let mut rows = stmt.query_map(params![name], row_to_goal)?;
        rows.next().transpose().map_err(StorageError::from)
    }

    /// Clamp `progress` to `[0.0, 1.0]` and persist it for the named goal.
    pub fn update_progress(&self, name: &str, progress: f64) -> Result<(), StorageError> {
        let clamped = progress.clamp(0.0, 1.0);
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE agent_goals SET progress = ?1, updated_at = datetime('now') WHERE name = ?2",
            params![clamped, name],
        )?;
        Ok(())
    }

    /// Insert a new goal, or update an existing one with the same name.
    pub fn upsert_goal(&self, goal: &AgentGoal) -> Result<i64, StorageError> {
        let metadata_json =
            if goal.metadata.is_empty() { "{}".to_string() } else { serde_json::to_string(&goal.metadata)? };
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO agent_goals (name, description, priority, status, progress, metadata) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT(name) DO UPDATE SET \
                description = excluded.description, \
                priority = excluded.priority, \
                status = excluded.status, \
                progress = excluded.progress, \
                metadata = excluded.metadata, \
                updated_at = datetime('now')",
            params![
                goal.name,
                goal.description,
                goal.priority,
                goal.status.as_str(),
                goal.progress,
                metadata_json,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn row_to_goal(row: &Row) -> rusqlite::Result<AgentGoal> {
    let status_str: String = row.get(4)?;
    let metadata_json: String = row.get(6)?;
    let metadata = serde_json::from_str(&metadata_json).unwrap_or_default();
    Ok(AgentGoal {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        priority: row.get(3)?,
        status: GoalStatus::from_str(&status_str).unwrap_or(GoalStatus::Active),
        progress: row.get(5)?,
        metadata,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

#[cfg(test)]
#[path = "goals_tests.rs"]
mod tests;
