// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Maximum length of the stored `reasoning_summary`, in characters.
pub const REASONING_SUMMARY_MAX_CHARS: usize = 500;

/// One completed (or zero-action) tick of an agent's loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickLog {
    pub tick_number: u64,
    pub started_at: String,
    pub completed_at: String,
    #[serde(default)]
    pub observations_count: usize,
    #[serde(default)]
    pub actions_planned: usize,
    #[serde(default)]
    pub actions_executed: usize,
    #[serde(default)]
    pub actions_succeeded: usize,
    #[serde(default)]
    pub reasoning_summary: String,
    #[serde(default)]
    pub duration_ms: f64,
}

impl TickLog {
    pub fn new(tick_number: u64, started_at: impl Into<String>) -> Self {
        Self {
            tick_number,
            started_at: started_at.into(),
            completed_at: String::new(),
            observations_count: 0,
            actions_planned: 0,
            actions_executed: 0,
            actions_succeeded: 0,
            reasoning_summary: String::new(),
            duration_ms: 0.0,
        }
    }

    /// Truncate to `REASONING_SUMMARY_MAX_CHARS` characters (not bytes; this
    /// is reporting text, not wire-critical, so character-boundary truncation
    /// is correct even for multi-byte summaries).
    pub fn set_reasoning_summary(&mut self, summary: &str) {
        self.reasoning_summary = truncate_chars(summary, REASONING_SUMMARY_MAX_CHARS);
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasoning_summary_truncates_at_500_chars() {
        let mut tick = TickLog::new(1, "2026-07-27T00:00:00Z");
        let long = "a".repeat(600);
        tick.set_reasoning_summary(&long);
        assert_eq!(tick.reasoning_summary.chars().count(), 500);
    }

    #[test]
    fn reasoning_summary_untouched_when_short() {
        let mut tick = TickLog::new(1, "2026-07-27T00:00:00Z");
        tick.set_reasoning_summary("short and sweet");
        assert_eq!(tick.reasoning_summary, "short and sweet");
    }
}
