// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle state of one agent goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Paused,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown goal status: {other}")),
        }
    }
}

/// A named, prioritized objective tracked for one agent, persisted across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentGoal {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_status")]
    pub status: GoalStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

fn default_priority() -> i32 {
    50
}

fn default_status() -> GoalStatus {
    GoalStatus::Active
}

impl AgentGoal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: String::new(),
            priority: default_priority(),
            status: default_status(),
            progress: 0.0,
            metadata: HashMap::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Clamp to [0.0, 1.0], matching `update_progress`'s contract.
    pub fn set_progress(&mut self, progress: f64) {
        self.progress = progress.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_goal_is_active_with_priority_fifty() {
        let goal = AgentGoal::new("fix-flaky-tests");
        assert_eq!(goal.priority, 50);
        assert_eq!(goal.status, GoalStatus::Active);
        assert_eq!(goal.progress, 0.0);
    }

    #[test]
    fn set_progress_clamps_to_unit_interval() {
        let mut goal = AgentGoal::new("x");
        goal.set_progress(1.5);
        assert_eq!(goal.progress, 1.0);
        goal.set_progress(-0.2);
        assert_eq!(goal.progress, 0.0);
    }

    #[test]
    fn status_round_trips_through_str() {
        assert_eq!(GoalStatus::from_str("paused").unwrap(), GoalStatus::Paused);
        assert_eq!(GoalStatus::Completed.as_str(), "completed");
        assert!(GoalStatus::from_str("bogus").is_err());
    }

    use std::str::FromStr;
}
