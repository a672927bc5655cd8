// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ob-handlers: the supervisor's three privileged, LLM-backed handlers
//! (health inquiry, research, email consultation) plus the Host Health
//! Snapshot collectors they share and the [`ob_core::LlmPipeline`]
//! implementations that back them.

mod email_consultation;
mod error;
mod health;
mod health_inquiry;
pub mod llm;
mod research;

pub use email_consultation::EmailConsultationHandler;
pub use error::HandlerError;
pub use health::{collect_host_health, HealthGrade, HostHealthSnapshot};
pub use health_inquiry::HealthInquiryHandler;
pub use llm::HttpLlmPipeline;
pub use research::ResearchHandler;

#[cfg(any(test, feature = "test-support"))]
pub use llm::FakeLlmPipeline;
