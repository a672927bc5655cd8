// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Action Executor: dispatches each `PlannedAction` by `action_type` to a
//! registered handler. `spec.md` §4.6: unknown types and handler failures
//! both become a failed `ActionOutcome`, never an aborted tick.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use ob_core::{ActionOutcome, PlannedAction};
use serde_json::Value;

pub const DEFAULT_MAX_ACTIONS_PER_TICK: usize = 5;

#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Run one action against the tick's observation. `Err` becomes the
    /// outcome's error text, prefixed with "Unhandled error: " by the
    /// Executor — handlers should not prefix it themselves.
    async fn handle(&self, action: &PlannedAction, observation: &Value) -> Result<String, String>;
}

pub struct Executor {
    handlers: HashMap<String, Arc<dyn ActionHandler>>,
    max_actions_per_tick: usize,
}

impl Default for Executor {
    fn default() -> Self {
        Self { handlers: HashMap::new(), max_actions_per_tick: DEFAULT_MAX_ACTIONS_PER_TICK }
    }
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_actions_per_tick(mut self, max_actions_per_tick: usize) -> Self {
        self.max_actions_per_tick = max_actions_per_tick;
        self
    }

    pub fn max_actions_per_tick(&self) -> usize {
        self.max_actions_per_tick
    }

    pub fn register(&mut self, action_type: impl Into<String>, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(action_type.into(), handler);
    }

    /// Dispatch every action in the plan, capped at `max_actions_per_tick`.
    /// The planner already truncates to this same cap, so the cap here is
    /// a defensive second line, not the primary enforcement point.
    pub async fn execute(&self, actions: &[PlannedAction], observation: &Value) -> Vec<ActionOutcome> {
        let mut outcomes = Vec::with_capacity(actions.len().min(self.max_actions_per_tick));
        for action in actions.iter().take(self.max_actions_per_tick) {
            let start = Instant::now();
            let outcome = match self.handlers.get(&action.action_type) {
                None => ActionOutcome::failure(
                    action.clone(),
                    format!("No handler registered for action type: {}", action.action_type),
                    start.elapsed().as_secs_f64() * 1000.0,
                ),
                Some(handler) => match handler.handle(action, observation).await {
                    Ok(result) => {
                        ActionOutcome::success(action.clone(), result, start.elapsed().as_secs_f64() * 1000.0)
                    }
                    Err(message) => ActionOutcome::failure(
                        action.clone(),
                        format!("Unhandled error: {message}"),
                        start.elapsed().as_secs_f64() * 1000.0,
                    ),
                },
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
