// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ob-core: shared data model for the Överblick supervisor and its agents.

pub mod macros;

pub mod agentic;
pub mod audit;
pub mod auth;
pub mod clock;
pub mod error;
pub mod id;
pub mod ipc;
pub mod json;
pub mod llm;
pub mod process;
pub mod routing;

pub use agentic::{ActionOutcome, AgentGoal, AgentLearning, GoalStatus, PlannedAction, TickLog};
pub use audit::AuditEntry;
pub use auth::AuthToken;
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::CoreError;
pub use id::short;
pub use ipc::{IpcMessage, MAX_MESSAGE_BYTES};
pub use json::extract_json;
pub use llm::{ChatMessage, ChatOptions, ChatResult, ChatRole, Complexity, LlmError, LlmPipeline, Priority};
pub use process::{AgentProcessRecord, AgentState};
pub use routing::{AgentCapabilities, RouteStatus, RoutedMessage};
