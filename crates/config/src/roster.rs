// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The agent roster: a small TOML file telling the Supervisor which
//! identities to start, per `SPEC_FULL.md` §10. `spec.md` itself is silent
//! on how the roster is assembled; the reference supervisor's constructor
//! takes `identities`/`plugins` directly from its embedder.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

fn default_max_restarts() -> u32 {
    3
}

fn default_max_queue_size() -> usize {
    100
}

/// One `[[agent]]` table in the roster file.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentEntry {
    pub identity: String,
    #[serde(default)]
    pub plugins: Vec<String>,
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_max_restarts")]
    pub max_restarts: u32,
    #[serde(default)]
    pub accepted_types: HashSet<String>,
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
}

/// The parsed roster file: `identity = [[agent]] ...`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Roster {
    #[serde(default, rename = "agent")]
    pub agents: Vec<AgentEntry>,
}

impl Roster {
    /// Load and validate a roster file. Duplicate identities and an empty
    /// roster are both fatal configuration errors at startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let roster: Roster = toml::from_str(contents)
            .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })?;
        roster.validate()?;
        Ok(roster)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.agents.is_empty() {
            return Err(ConfigError::Empty);
        }
        let mut seen = HashSet::new();
        for agent in &self.agents {
            if !seen.insert(agent.identity.clone()) {
                return Err(ConfigError::DuplicateIdentity(agent.identity.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "roster_tests.rs"]
mod tests;
