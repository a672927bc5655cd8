// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Email consultation handler: an agent unsure how to treat an inbound
//! email asks the supervisor for an advised action.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use ob_core::{extract_json, AuditEntry, ChatMessage, ChatOptions, IpcMessage, LlmPipeline};
use ob_storage::AgenticStore;
use ob_wire::MessageHandler;
use serde_json::json;
use tracing::warn;

const VALID_ACTIONS: [&str; 4] = ["ignore", "notify", "reply", "ask_boss"];

pub struct EmailConsultationHandler {
    llm: Arc<dyn LlmPipeline>,
    audit: Arc<AgenticStore>,
    clock: fn() -> f64,
}

impl EmailConsultationHandler {
    pub fn new(llm: Arc<dyn LlmPipeline>, audit: Arc<AgenticStore>) -> Self {
        Self { llm, audit, clock: unix_now }
    }

    async fn run(
        &self,
        question: &str,
        email_from: &str,
        email_subject: &str,
        tentative_intent: &str,
        confidence: f64,
    ) -> (String, String) {
        let messages = [
            ChatMessage::system(
                "You are the supervisor acting as a consultation advisor for an email-handling \
                 agent. Choose exactly one advised_action from: ignore, notify, reply, ask_boss. \
                 Respond with strict JSON: {\"advised_action\": \"...\", \"reasoning\": \"...\"}.",
            ),
            ChatMessage::user(format!(
                "Question: {question}\nFrom: {email_from}\nSubject: {email_subject}\n\
                 The agent's tentative intent: {tentative_intent} (confidence {confidence:.2})"
            )),
        ];

        let response = match self.llm.chat(&messages, ChatOptions::default()).await {
            Ok(result) if result.is_usable() => result.content,
            _ => return (fallback_action(tentative_intent), "llm unavailable".to_string()),
        };

        if let Some(parsed) = extract_json(&response) {
            if let Some(action) = parsed.get("advised_action").and_then(|v| v.as_str()) {
                if VALID_ACTIONS.contains(&action) {
                    let reasoning =
                        parsed.get("reasoning").and_then(|v| v.as_str()).unwrap_or("").to_string();
                    return (action.to_string(), reasoning);
                }
            }
        }

        if let Some(action) = keyword_scan(&response) {
            return (action.to_string(), response);
        }

        (fallback_action(tentative_intent), response)
    }

    fn audit_inbound(&self, sender: &str, question: &str, duration_ms: f64) {
        let entry = AuditEntry::new(sender, "email_consultation", (self.clock)())
            .with_category("privileged_handler")
            .with_details(json!({"question": question}))
            .with_duration_ms(duration_ms);
        if let Err(e) = self.audit.write_audit(&entry) {
            warn!("failed to write audit entry: {e}");
        }
    }
}

/// Scan free text for one of the four action words, in priority order so a
/// response that mentions several picks the most specific one first.
fn keyword_scan(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    if lower.contains("ask_boss") || lower.contains("ask boss") {
        return Some("ask_boss");
    }
    for candidate in ["reply", "notify", "ignore"] {
        if lower.contains(candidate) {
            return Some(candidate);
        }
    }
    None
}

fn fallback_action(tentative_intent: &str) -> String {
    if VALID_ACTIONS.contains(&tentative_intent) {
        tentative_intent.to_string()
    } else {
        "notify".to_string()
    }
}

fn unix_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[async_trait]
impl MessageHandler for EmailConsultationHandler {
    async fn handle(&self, message: IpcMessage) -> Option<IpcMessage> {
        let start = Instant::now();
        let question = message.get_str("question").unwrap_or("").to_string();
        let email_from = message.get_str("email_from").unwrap_or("").to_string();
        let email_subject = message.get_str("email_subject").unwrap_or("").to_string();
        let tentative_intent = message.get_str("tentative_intent").unwrap_or("notify").to_string();
        let confidence = message.get_f64("confidence").unwrap_or(0.0);

        let (advised_action, reasoning) =
            self.run(&question, &email_from, &email_subject, &tentative_intent, confidence).await;
        self.audit_inbound(&message.sender, &question, start.elapsed().as_secs_f64() * 1000.0);

        Some(
            IpcMessage::new("email_consultation_response").with_payload(std::collections::HashMap::from([
                ("advised_action".to_string(), json!(advised_action)),
                ("reasoning".to_string(), json!(reasoning)),
            ])),
        )
    }
}

#[cfg(test)]
#[path = "email_consultation_tests.rs"]
mod tests;
