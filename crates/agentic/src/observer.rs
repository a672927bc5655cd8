// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Observer plug-in point: domain-specific world snapshot, opaque to
//! the loop beyond its JSON shape.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ObserveError;

#[async_trait]
pub trait Observer: Send + Sync {
    /// Produce one opaque observation. `spec.md` §4.6 step 2: any error here
    /// shortens the tick to a no-op — no `TickLog`, no persisted tick-number
    /// advance.
    async fn observe(&self) -> Result<Value, ObserveError>;

    /// Render an observation as planner-facing text for the CURRENT STATE
    /// section of the prompt.
    fn format_for_planner(&self, observation: &Value) -> String;
}

/// §4.6 "Observation counting": a map counts as the sum of each value's own
/// count (list-or-map values count by length, everything else counts 1); a
/// bare array counts by length; any other JSON value counts as 1.
pub fn count_observations(observation: &Value) -> usize {
    match observation {
        Value::Object(map) => map
            .values()
            .map(|v| match v {
                Value::Array(items) => items.len(),
                Value::Object(inner) => inner.len(),
                _ => 1,
            })
            .sum(),
        Value::Array(items) => items.len(),
        _ => 1,
    }
}

#[cfg(test)]
#[path = "observer_tests.rs"]
mod tests;
