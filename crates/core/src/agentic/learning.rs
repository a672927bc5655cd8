// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// One LLM-extracted insight, stored for later tick contextualization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentLearning {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub category: String,
    pub insight: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub source_tick: u64,
    #[serde(default)]
    pub source_ref: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

fn default_confidence() -> f64 {
    0.5
}

fn default_source() -> String {
    "reflection".to_string()
}

impl AgentLearning {
    pub fn new(insight: impl Into<String>) -> Self {
        Self {
            id: 0,
            category: String::new(),
            insight: insight.into(),
            confidence: default_confidence(),
            source: default_source(),
            source_tick: 0,
            source_ref: None,
            created_at: String::new(),
        }
    }

    pub fn from_reflection(insight: impl Into<String>, source_tick: u64) -> Self {
        Self {
            source_tick,
            ..Self::new(insight)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let learning = AgentLearning::new("agents that poll too fast get rate-limited");
        assert_eq!(learning.confidence, 0.5);
        assert_eq!(learning.source, "reflection");
        assert_eq!(learning.source_tick, 0);
    }

    #[test]
    fn from_reflection_stamps_source_tick() {
        let learning = AgentLearning::from_reflection("insight", 42);
        assert_eq!(learning.source_tick, 42);
        assert_eq!(learning.source, "reflection");
    }
}
