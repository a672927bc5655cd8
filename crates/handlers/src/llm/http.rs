// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An HTTP-backed [`LlmPipeline`], modeled on a local model-gateway chat
//! completions endpoint (OpenAI-compatible `/v1/chat/completions` shape).
//! Concrete LLM client implementations are out of scope per `spec.md` §1;
//! this adapter exists so the workspace has one real, swappable
//! implementation of the seam rather than forcing every caller to depend on
//! a fake.

use std::time::Duration;

use async_trait::async_trait;
use ob_core::{ChatMessage, ChatOptions, ChatResult, ChatRole, LlmError, LlmPipeline};
use serde::Deserialize;
use serde_json::json;

/// Default request timeout for a chat call, per `spec.md` §5's "180 s typical".
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

pub struct HttpLlmPipeline {
    client: reqwest::Client,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl HttpLlmPipeline {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[async_trait]
impl LlmPipeline for HttpLlmPipeline {
    async fn chat(&self, messages: &[ChatMessage], _options: ChatOptions) -> Result<ChatResult, LlmError> {
        let payload = json!({
            "model": self.model,
            "messages": messages.iter().map(|m| json!({
                "role": match m.role {
                    ChatRole::System => "system",
                    ChatRole::User => "user",
                    ChatRole::Assistant => "assistant",
                },
                "content": m.content,
            })).collect::<Vec<_>>(),
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else if e.is_connect() {
                    LlmError::ConnectionRefused
                } else {
                    LlmError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(LlmError::BadStatus(response.status().as_u16()));
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| LlmError::Transport(e.to_string()))?;

        let choice = parsed.choices.into_iter().next().ok_or(LlmError::EmptyResponse)?;
        let blocked = choice.finish_reason.as_deref() == Some("content_filter");
        Ok(ChatResult {
            content: choice.message.content,
            blocked,
            block_reason: if blocked { Some("content_filter".to_string()) } else { None },
        })
    }
}
