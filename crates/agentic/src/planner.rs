// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Planner: turns observations, goals, history, and learnings into a
//! prioritized `ActionPlan` via one trusted LLM call. `spec.md` §4.7.

use std::collections::HashSet;
use std::sync::Arc;

use ob_core::{extract_json, ChatMessage, ChatOptions, Complexity, LlmPipeline, PlannedAction, Priority};
use serde::Deserialize;

/// One planner turn's output: the model's stated reasoning plus the
/// validated, sorted, truncated action list.
#[derive(Debug, Clone, Default)]
pub struct ActionPlan {
    pub reasoning: String,
    pub actions: Vec<PlannedAction>,
}

impl ActionPlan {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Domain configuration supplied by the embedding plugin.
pub struct PlannerConfig {
    /// The plugin's role prompt, e.g. "You are a diligent OSS maintainer agent.".
    pub role_prompt: String,
    /// Listing of actions the planner may propose, rendered verbatim into
    /// the system prompt.
    pub available_actions: Vec<String>,
    pub safety_rules: String,
    /// When `Some`, any proposed action whose `action_type` is absent is
    /// dropped silently rather than passed to the Executor (which would
    /// report a "No handler registered" failure instead).
    pub valid_actions: Option<HashSet<String>>,
    pub complexity: Complexity,
}

/// Everything one `plan()` call needs beyond static configuration.
pub struct PlanContext<'a> {
    pub priority_context: Option<&'a str>,
    pub current_state: &'a str,
    pub active_goals: &'a str,
    pub recent_actions: Option<&'a str>,
    pub learnings: Option<&'a str>,
    pub max_actions: usize,
}

pub struct Planner {
    llm: Arc<dyn LlmPipeline>,
    config: PlannerConfig,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmPipeline>, config: PlannerConfig) -> Self {
        Self { llm, config }
    }

    pub async fn plan(&self, ctx: PlanContext<'_>) -> ActionPlan {
        let system = self.system_prompt(ctx.max_actions);
        let user = self.user_prompt(&ctx);
        let messages = [ChatMessage::system(system), ChatMessage::user(user)];

        let options = ChatOptions {
            complexity: self.config.complexity,
            priority: Priority::Low,
            skip_safety_checks: true,
        };

        let response = match self.llm.chat(&messages, options).await {
            Ok(result) if result.is_usable() => result.content,
            _ => return ActionPlan::empty(),
        };

        let Some(parsed) = extract_json(&response) else {
            return ActionPlan::empty();
        };

        let raw: RawPlan = match serde_json::from_value(parsed) {
            Ok(raw) => raw,
            Err(_) => return ActionPlan::empty(),
        };

        ActionPlan { reasoning: raw.reasoning, actions: self.validate(raw.actions, ctx.max_actions) }
    }

    /// Drop actions outside `valid_actions` (when configured), sort
    /// survivors by priority descending, then truncate — the order
    /// `spec.md`'s prose literally states, which this implementation
    /// follows over the reference Python's truncate-before-sort behavior.
    fn validate(&self, actions: Vec<PlannedAction>, max_actions: usize) -> Vec<PlannedAction> {
        let mut actions: Vec<PlannedAction> = match &self.config.valid_actions {
            Some(valid) => actions.into_iter().filter(|a| valid.contains(&a.action_type)).collect(),
            None => actions,
        };
        actions.sort_by(|a, b| b.priority.cmp(&a.priority));
        actions.truncate(max_actions);
        actions
    }

    fn system_prompt(&self, max_actions: usize) -> String {
        format!(
            "{}\n\nAvailable actions:\n{}\n\n{}\n\nPlan at most {} actions, ordered by priority. \
             Respond with strict JSON matching this schema: {{\"reasoning\": \"...\", \"actions\": \
             [{{\"action_type\": \"...\", \"target\": \"...\", \"target_number\": 0, \"repo\": \"...\", \
             \"priority\": 50, \"reasoning\": \"...\"}}]}}",
            self.config.role_prompt,
            self.config.available_actions.join("\n"),
            self.config.safety_rules,
            max_actions,
        )
    }

    fn user_prompt(&self, ctx: &PlanContext<'_>) -> String {
        let mut sections = Vec::new();
        if let Some(priority_context) = ctx.priority_context {
            sections.push(format!("PRIORITY CONTEXT:\n{priority_context}"));
        }
        sections.push(format!("CURRENT STATE:\n{}", ctx.current_state));
        sections.push(format!("ACTIVE GOALS:\n{}", ctx.active_goals));
        if let Some(recent_actions) = ctx.recent_actions {
            sections.push(format!("RECENT ACTIONS:\n{recent_actions}"));
        }
        if let Some(learnings) = ctx.learnings {
            sections.push(format!("LEARNINGS:\n{learnings}"));
        }
        sections.push("Plan your actions now.".to_string());
        sections.join("\n\n")
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawPlan {
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    actions: Vec<PlannedAction>,
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
