// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reflection: best-effort extraction of learnings from a tick's outcomes.
//! `spec.md` §4.7 — any failure here is swallowed; reflection never affects
//! the tick's own result.

use std::sync::Arc;

use ob_core::{AgentLearning, ChatMessage, ChatOptions, LlmPipeline};
use ob_storage::AgenticStore;
use serde::Deserialize;
use tracing::debug;

use ob_core::{extract_json, ActionOutcome};

const REFLECTION_ROLE: &str =
    "You are reflecting on one completed tick of an autonomous agent. Extract any durable \
     learnings worth remembering for future ticks. Respond with strict JSON: \
     {\"learnings\": [{\"category\": \"...\", \"insight\": \"...\", \"confidence\": 0.0}], \
     \"tick_summary\": \"...\"}.";

pub struct Reflection {
    llm: Option<Arc<dyn LlmPipeline>>,
}

impl Reflection {
    pub fn new(llm: Option<Arc<dyn LlmPipeline>>) -> Self {
        Self { llm }
    }

    pub async fn reflect(
        &self,
        store: &AgenticStore,
        tick_number: u64,
        outcomes: &[ActionOutcome],
        reasoning: &str,
    ) {
        if outcomes.is_empty() {
            return;
        }
        let Some(llm) = &self.llm else { return };

        let bullets = outcomes
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
            .join("\n");
        let summary = format!("Planner reasoning: {reasoning}\nOutcomes:\n{bullets}");

        let messages = [ChatMessage::system(REFLECTION_ROLE), ChatMessage::user(summary)];
        let response = match llm.chat(&messages, ChatOptions::default()).await {
            Ok(result) if result.is_usable() => result.content,
            _ => return,
        };

        let Some(parsed) = extract_json(&response) else { return };
        let Ok(raw) = serde_json::from_value::<RawReflection>(parsed) else { return };

        for learning in raw.learnings {
            if learning.insight.trim().is_empty() {
                continue;
            }
            let mut entry = AgentLearning::from_reflection(learning.insight, tick_number);
            entry.category = learning.category;
            entry.confidence = learning.confidence;
            if let Err(e) = store.insert_learning(&entry) {
                debug!("failed to persist reflection learning: {e}");
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawReflection {
    #[serde(default)]
    learnings: Vec<RawLearning>,
    #[serde(default)]
    #[allow(dead_code)]
    tick_summary: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawLearning {
    #[serde(default)]
    category: String,
    #[serde(default)]
    insight: String,
    #[serde(default = "default_confidence")]
    confidence: f64,
}

fn default_confidence() -> f64 {
    0.5
}

#[cfg(test)]
#[path = "reflection_tests.rs"]
mod tests;
