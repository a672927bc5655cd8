// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Health inquiry handler: an asking agent wants a characterful read on
//! supervisor/host health, not just raw numbers.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use ob_core::{AuditEntry, ChatMessage, ChatOptions, IpcMessage, LlmPipeline};
use ob_storage::AgenticStore;
use ob_wire::MessageHandler;
use serde_json::json;
use tracing::warn;

use crate::health::{collect_host_health, HostHealthSnapshot};

const SUPERVISOR_PERSONA: &str = "You are the Överblick supervisor, a dry, dependable coordinator of a \
fleet of autonomous agents. You speak in your own voice: brief, a little wry, never robotic.";

pub struct HealthInquiryHandler {
    llm: Arc<dyn LlmPipeline>,
    audit: Arc<AgenticStore>,
    clock: fn() -> f64,
}

impl HealthInquiryHandler {
    pub fn new(llm: Arc<dyn LlmPipeline>, audit: Arc<AgenticStore>) -> Self {
        Self { llm, audit, clock: unix_now }
    }

    async fn run(&self, sender: &str, motivation: &str, previous_context: Option<&str>) -> serde_json::Value {
        let snapshot = collect_host_health().await;
        let grade = snapshot.grade();
        let summary = snapshot.summary();

        let response_text = match self.ask_llm(sender, motivation, previous_context, &snapshot).await {
            Some(text) => text,
            None => fallback_text(&snapshot),
        };

        json!({
            "responder": "supervisor",
            "response_text": response_text,
            "health_grade": grade.as_str(),
            "health_summary": summary,
        })
    }

    async fn ask_llm(
        &self,
        sender: &str,
        motivation: &str,
        previous_context: Option<&str>,
        snapshot: &HostHealthSnapshot,
    ) -> Option<String> {
        let mut user_text = format!(
            "Agent '{sender}' is asking about your health.\nTheir stated motivation: {motivation}\n"
        );
        if let Some(context) = previous_context {
            user_text.push_str(&format!(
                "They also shared this prior context (do not echo it back verbatim): {context}\n"
            ));
        }
        user_text.push_str(&format!("\nCurrent health summary:\n{}\n", snapshot.summary()));
        user_text.push_str("\nReply in 2-4 sentences, in character. Vary your phrasing across calls.");

        let messages = [
            ChatMessage::system(format!("{SUPERVISOR_PERSONA} Right now you are acting as the health responder.")),
            ChatMessage::user(user_text),
        ];

        match self.llm.chat(&messages, ChatOptions::default()).await {
            Ok(result) if result.is_usable() => Some(result.content),
            _ => None,
        }
    }

    fn audit_inbound(&self, sender: &str, motivation: &str, duration_ms: f64) {
        let entry = AuditEntry::new(sender, "health_inquiry", (self.clock)())
            .with_category("privileged_handler")
            .with_details(json!({"motivation": motivation}))
            .with_duration_ms(duration_ms);
        if let Err(e) = self.audit.write_audit(&entry) {
            warn!("failed to write audit entry: {e}");
        }
    }
}

fn fallback_text(snapshot: &HostHealthSnapshot) -> String {
    format!(
        "Health check (llm unavailable): grade {}, {}",
        snapshot.grade().as_str(),
        snapshot.summary()
    )
}

fn unix_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[async_trait]
impl MessageHandler for HealthInquiryHandler {
    async fn handle(&self, message: IpcMessage) -> Option<IpcMessage> {
        let start = Instant::now();
        let motivation = message.get_str("motivation").unwrap_or("").to_string();
        let previous_context = message.get_str("previous_context").map(str::to_string);

        let payload = self.run(&message.sender, &motivation, previous_context.as_deref()).await;
        self.audit_inbound(&message.sender, &motivation, start.elapsed().as_secs_f64() * 1000.0);

        Some(
            IpcMessage::new("health_response")
                .with_payload(payload.as_object().cloned().unwrap_or_default().into_iter().collect()),
        )
    }
}

#[cfg(test)]
#[path = "health_inquiry_tests.rs"]
mod tests;
