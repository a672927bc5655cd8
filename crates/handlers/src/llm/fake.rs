// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory fake pipeline so the planner, reflection, and the
//! privileged handlers are exercisable end-to-end without a real model
//! server (`spec.md` §4.5's "tests use an in-memory fake pipeline").

use async_trait::async_trait;
use ob_core::{ChatMessage, ChatOptions, ChatResult, LlmError, LlmPipeline};
use parking_lot::Mutex;

/// Replays scripted responses, one per call, in order. Records every call's
/// messages for assertions. Defaults to [`LlmError::ConnectionRefused`] once
/// the script is exhausted.
pub struct FakeLlmPipeline {
    script: Mutex<Vec<Result<ChatResult, LlmError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeLlmPipeline {
    pub fn new(script: Vec<Result<ChatResult, LlmError>>) -> Self {
        // Reverse so `pop()` yields scripted responses in call order.
        let mut script = script;
        script.reverse();
        Self { script: Mutex::new(script), calls: Mutex::new(Vec::new()) }
    }

    pub fn replying(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(ChatResult { content: text.into(), blocked: false, block_reason: None })])
    }

    pub fn always_erroring() -> Self {
        Self::new(vec![])
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl LlmPipeline for FakeLlmPipeline {
    async fn chat(&self, messages: &[ChatMessage], _options: ChatOptions) -> Result<ChatResult, LlmError> {
        self.calls.lock().push(messages.to_vec());
        self.script.lock().pop().unwrap_or(Err(LlmError::ConnectionRefused))
    }
}
