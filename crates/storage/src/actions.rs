// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use ob_core::ActionOutcome;
use rusqlite::params;

use crate::error::StorageError;
use crate::store::AgenticStore;

impl AgenticStore {
    /// Record one executed action against the tick it ran in.
    pub fn log_action(&self, tick_number: u64, outcome: &ActionOutcome) -> Result<i64, StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO action_log \
             (tick_number, action_type, target, target_number, repo, priority, reasoning, \
              success, result, error, duration_ms) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                tick_number,
                outcome.action.action_type,
                outcome.action.target,
                outcome.action.target_number,
                outcome.action.repo,
                outcome.action.priority,
                outcome.action.reasoning,
                outcome.success,
                outcome.result,
                outcome.error,
                outcome.duration_ms,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recently logged actions, newest first.
    pub fn get_recent_actions(&self, limit: u32) -> Result<Vec<ActionOutcome>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT action_type, target, target_number, repo, priority, reasoning, \
                    success, result, error, duration_ms \
             FROM action_log ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(ActionOutcome {
                    action: ob_core::PlannedAction {
                        action_type: row.get(0)?,
                        target: row.get(1)?,
                        target_number: row.get(2)?,
                        repo: row.get(3)?,
                        priority: row.get(4)?,
                        reasoning: row.get(5)?,
                        params: Default::default(),
                    },
                    success: row.get(6)?,
                    result: row.get(7)?,
                    error: row.get(8)?,
                    duration_ms: row.get(9)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
