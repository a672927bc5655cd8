// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// One action the planner wants executed. `action_type` is an opaque string
/// key; handlers register under the same key and the Executor matches on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannedAction {
    pub action_type: String,
    #[serde(default)]
    pub target: String,
    #[serde(default, deserialize_with = "deserialize_target_number")]
    pub target_number: i64,
    #[serde(default)]
    pub repo: String,
    #[serde(default = "default_priority", deserialize_with = "deserialize_priority")]
    pub priority: i32,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub params: HashMap<String, serde_json::Value>,
}

fn default_priority() -> i32 {
    50
}

/// An LLM commonly emits a numeric field as a JSON string (`"priority":
/// "80"`). Coerce number-or-numeric-string into the field's default rather
/// than letting a single malformed field fail the whole action (and, via
/// `RawPlan`, the whole plan) — `spec.md` §4.7's "coerce numeric fields and
/// collect defaults".
fn coerce_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn deserialize_priority<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_number(&value).map(|n| n as i32).unwrap_or_else(default_priority))
}

fn deserialize_target_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(coerce_number(&value).map(|n| n as i64).unwrap_or(0))
}

impl PlannedAction {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            priority: default_priority(),
            ..Default::default()
        }
    }
}

/// Result of dispatching one `PlannedAction` to its handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: PlannedAction,
    pub success: bool,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub error: String,
    pub duration_ms: f64,
}

impl ActionOutcome {
    pub fn success(action: PlannedAction, result: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            action,
            success: true,
            result: result.into(),
            error: String::new(),
            duration_ms,
        }
    }

    pub fn failure(action: PlannedAction, error: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            action,
            success: false,
            result: String::new(),
            error: error.into(),
            duration_ms,
        }
    }
}
