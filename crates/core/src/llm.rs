// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The seam between the agentic core and a concrete LLM client.
//!
//! `spec.md` explicitly places concrete LLM clients out of scope, but the
//! Planner, Reflection pipeline, and the three privileged handlers all
//! describe observable behavior around one — `blocked` output, empty
//! responses, "LLM unavailable" fallbacks. [`LlmPipeline`] is that
//! observable seam: one async method, implementations live in `ob-handlers`.

use async_trait::async_trait;
use thiserror::Error;

/// One role-tagged message in a chat-style LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: ChatRole::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A hint about how much reasoning the call warrants; concrete pipelines may
/// use this to pick a cheaper model or a shorter timeout for low-stakes
/// internal calls such as planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Complexity {
    Low,
    #[default]
    Normal,
    High,
}

/// Scheduling priority hint; the planner runs at `Low` priority relative to
/// interactive privileged-handler calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
}

/// Parameters accompanying one chat call, beyond the message list itself.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub complexity: Complexity,
    pub priority: Priority,
    /// Skip the client's own pre-flight safety/content checks. Only ever set
    /// by trusted internal callers (the planner) per `spec.md` §4.7.
    pub skip_safety_checks: bool,
}

/// The result of one chat call.
#[derive(Debug, Clone, Default)]
pub struct ChatResult {
    pub content: String,
    pub blocked: bool,
    pub block_reason: Option<String>,
}

impl ChatResult {
    pub fn is_usable(&self) -> bool {
        !self.blocked && !self.content.trim().is_empty()
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("llm connection refused")]
    ConnectionRefused,
    #[error("llm call timed out")]
    Timeout,
    #[error("llm returned non-success status: {0}")]
    BadStatus(u16),
    #[error("llm response had no choices")]
    EmptyResponse,
    #[error("llm transport error: {0}")]
    Transport(String),
}

/// One async method: turn a conversation into a reply. Implementations are
/// supplied by `ob-handlers`; this core crate only depends on the trait so
/// that the Planner, Reflection pipeline, and privileged handlers can share
/// it without any of them depending on a concrete HTTP client.
#[async_trait]
pub trait LlmPipeline: Send + Sync {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<ChatResult, LlmError>;
}
