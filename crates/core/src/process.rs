// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-managed-child bookkeeping: identity, plugins, lifecycle state, restarts.

use serde::{Deserialize, Serialize};

/// Lifecycle state of one managed agent subprocess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    Starting,
    Running,
    Stopping,
    Stopped,
    Crashed,
}

impl std::fmt::Display for AgentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
            Self::Crashed => "crashed",
        })
    }
}

/// Default maximum restart attempts before the Supervisor gives up on an agent.
pub const DEFAULT_MAX_RESTARTS: u32 = 3;

/// Bookkeeping the Supervisor keeps for one managed child process.
///
/// This does not hold the actual OS process handle (that lives in the daemon
/// crate alongside `tokio::process::Child`, which is not `Clone`/`Serialize`);
/// it is the serializable, status-reportable view of one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProcessRecord {
    pub identity: String,
    pub plugins: Vec<String>,
    pub state: AgentState,
    pub restart_count: u32,
    pub max_restarts: u32,
    pub exit_code: Option<i32>,
}

impl AgentProcessRecord {
    pub fn new(identity: impl Into<String>, plugins: Vec<String>) -> Self {
        Self {
            identity: identity.into(),
            plugins,
            state: AgentState::Starting,
            restart_count: 0,
            max_restarts: DEFAULT_MAX_RESTARTS,
            exit_code: None,
        }
    }

    pub fn with_max_restarts(mut self, max_restarts: u32) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    /// Whether the restart policy still permits another auto-restart.
    pub fn can_restart(&self) -> bool {
        self.restart_count < self.max_restarts
    }

    /// Linear backoff before the next restart attempt: `2s * restart_count`.
    pub fn backoff(&self) -> std::time::Duration {
        std::time::Duration::from_secs(2 * self.restart_count as u64)
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
