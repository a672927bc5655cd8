// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Goal Tracker: loads an agent's active goals, seeds plugin-provided
//! defaults on first run, and formats them for the planner prompt.

use std::sync::Arc;

use ob_core::{AgentGoal, GoalStatus};
use ob_storage::{AgenticStore, StorageError};

pub struct GoalTracker {
    store: Arc<AgenticStore>,
}

impl GoalTracker {
    pub fn new(store: Arc<AgenticStore>) -> Self {
        Self { store }
    }

    /// If no Active goal exists yet, insert every plugin-provided default.
    /// `upsert_goal`'s `ON CONFLICT(name)` makes inserting the same name
    /// twice a no-op update rather than a duplicate row.
    pub fn seed_defaults(&self, defaults: &[AgentGoal]) -> Result<(), StorageError> {
        if !self.store.get_goals(GoalStatus::Active)?.is_empty() {
            return Ok(());
        }
        for goal in defaults {
            self.store.upsert_goal(goal)?;
        }
        Ok(())
    }

    /// Active goals, already sorted by priority descending.
    pub fn active_goals(&self) -> Result<Vec<AgentGoal>, StorageError> {
        self.store.get_goals(GoalStatus::Active)
    }

    pub fn update_progress(&self, name: &str, progress: f64) -> Result<(), StorageError> {
        self.store.update_progress(name, progress)
    }
}

/// Render active goals as a bulleted list for the ACTIVE GOALS prompt
/// section. Empty input renders as a single line saying so, so the
/// section is never blank.
pub fn format_goals(goals: &[AgentGoal]) -> String {
    if goals.is_empty() {
        return "No active goals.".to_string();
    }
    goals
        .iter()
        .map(|g| format!("- {} (priority {}, {:.0}% done): {}", g.name, g.priority, g.progress * 100.0, g.description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "goal_tracker_tests.rs"]
mod tests;
