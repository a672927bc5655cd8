// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The OBSERVE -> THINK -> PLAN -> ACT -> REFLECT cycle itself, wiring the
//! Observer, Goal Tracker, Planner, Executor, and Reflection pipeline
//! together per `spec.md` §4.6's eight-step algorithm.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use ob_core::TickLog;
use ob_storage::AgenticStore;
use tracing::{error, warn};

use crate::executor::Executor;
use crate::goal_tracker::{format_goals, GoalTracker};
use crate::observer::{count_observations, Observer};
use crate::planner::{PlanContext, Planner};
use crate::reflection::Reflection;

const RECENT_ACTIONS_LIMIT: u32 = 10;
const RECENT_LEARNINGS_LIMIT: u32 = 10;

/// Evaluated once per tick to append caller-supplied context (e.g. an
/// operator's standing instruction) to the PRIORITY CONTEXT prompt section.
pub trait ExtraContext: Send + Sync {
    fn evaluate(&self) -> Option<String>;
}

pub struct AgenticLoop {
    store: Arc<AgenticStore>,
    observer: Arc<dyn Observer>,
    goal_tracker: GoalTracker,
    executor: Executor,
    planner: Planner,
    reflection: Reflection,
    extra_context: Option<Arc<dyn ExtraContext>>,
}

impl AgenticLoop {
    pub fn new(
        store: Arc<AgenticStore>,
        observer: Arc<dyn Observer>,
        executor: Executor,
        planner: Planner,
        reflection: Reflection,
    ) -> Self {
        let goal_tracker = GoalTracker::new(store.clone());
        Self { store, observer, goal_tracker, executor, planner, reflection, extra_context: None }
    }

    pub fn with_extra_context(mut self, extra_context: Arc<dyn ExtraContext>) -> Self {
        self.extra_context = Some(extra_context);
        self
    }

    pub fn goal_tracker(&self) -> &GoalTracker {
        &self.goal_tracker
    }

    /// Run one tick. Returns `None` only when OBSERVE fails — the one case
    /// `spec.md` §4.6 carves out as producing no `TickLog` at all. The
    /// persisted tick counter is read fresh from `last_tick_number()` on
    /// every call and nothing is written until a `TickLog` row is inserted,
    /// so a failed OBSERVE never advances it: the next tick recomputes the
    /// same `tick_number`.
    pub async fn tick(&self) -> Option<TickLog> {
        let tick_number = match self.store.last_tick_number() {
            Ok(n) => n + 1,
            Err(e) => {
                error!("failed to read last tick number: {e}");
                return None;
            }
        };
        let started_at = unix_now_string();
        let wall_clock = Instant::now();

        let observation = match self.observer.observe().await {
            Ok(observation) => observation,
            Err(e) => {
                warn!("observe failed on tick {tick_number}: {e}");
                return None;
            }
        };

        let formatted_observation = self.observer.format_for_planner(&observation);
        let observations_count = count_observations(&observation);

        let active_goals = self.goal_tracker.active_goals().unwrap_or_else(|e| {
            error!("failed to load active goals: {e}");
            Vec::new()
        });
        let formatted_goals = format_goals(&active_goals);

        let recent_actions = self.store.get_recent_actions(RECENT_ACTIONS_LIMIT).unwrap_or_default();
        let formatted_actions = format_actions(&recent_actions);

        let recent_learnings = self.store.get_recent_learnings(RECENT_LEARNINGS_LIMIT).unwrap_or_default();
        let formatted_learnings = format_learnings(&recent_learnings);

        let priority_context = self.extra_context.as_ref().and_then(|ctx| ctx.evaluate());

        let plan = self
            .planner
            .plan(PlanContext {
                priority_context: priority_context.as_deref(),
                current_state: &formatted_observation,
                active_goals: &formatted_goals,
                recent_actions: (!recent_actions.is_empty()).then_some(formatted_actions.as_str()),
                learnings: (!recent_learnings.is_empty()).then_some(formatted_learnings.as_str()),
                max_actions: self.executor.max_actions_per_tick(),
            })
            .await;

        let mut tick = TickLog::new(tick_number, started_at);
        tick.observations_count = observations_count;
        tick.actions_planned = plan.actions.len();
        tick.set_reasoning_summary(&plan.reasoning);

        if plan.actions.is_empty() {
            return Some(self.finish(tick, wall_clock));
        }

        let outcomes = self.executor.execute(&plan.actions, &observation).await;
        for outcome in &outcomes {
            if let Err(e) = self.store.log_action(tick_number, outcome) {
                error!("failed to log action for tick {tick_number}: {e}");
            }
        }
        tick.actions_executed = outcomes.len();
        tick.actions_succeeded = outcomes.iter().filter(|o| o.success).count();

        self.reflection.reflect(&self.store, tick_number, &outcomes, &plan.reasoning).await;

        Some(self.finish(tick, wall_clock))
    }

    fn finish(&self, mut tick: TickLog, wall_clock: Instant) -> TickLog {
        tick.completed_at = unix_now_string();
        tick.duration_ms = wall_clock.elapsed().as_secs_f64() * 1000.0;
        if let Err(e) = self.store.insert_tick_log(&tick) {
            error!("failed to persist tick log for tick {}: {e}", tick.tick_number);
        }
        tick
    }
}

fn format_actions(actions: &[ob_core::ActionOutcome]) -> String {
    if actions.is_empty() {
        return String::new();
    }
    actions
        .iter()
        .map(|o| {
            format!(
                "- {} ({}): {}",
                o.action.action_type,
                if o.success { "succeeded" } else { "failed" },
                if o.success { &o.result } else { &o.error }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_learnings(learnings: &[ob_core::AgentLearning]) -> String {
    if learnings.is_empty() {
        return String::new();
    }
    learnings
        .iter()
        .map(|l| format!("- [{}] {} (confidence {:.2})", l.category, l.insight, l.confidence))
        .collect::<Vec<_>>()
        .join("\n")
}

fn unix_now_string() -> String {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs_f64()).unwrap_or(0.0);
    format!("{secs:.3}")
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
