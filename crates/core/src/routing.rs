// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Data model for inter-agent message routing. The routing *algorithm* lives
//! in `ob-daemon::router`; this module only holds the shapes it operates on.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Status of one routed message as it moves through the router's lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    Pending,
    Delivered,
    Rejected,
    DeadLetter,
    Expired,
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Delivered => "delivered",
            Self::Rejected => "rejected",
            Self::DeadLetter => "dead_letter",
            Self::Expired => "expired",
        })
    }
}

/// Default time-to-live for a routed message before it is considered expired.
pub const DEFAULT_TTL_SECONDS: f64 = 300.0;

/// A message in flight between two agents, mediated by the Supervisor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutedMessage {
    pub message_id: String,
    pub source_agent: String,
    pub target_agent: String,
    pub message_type: String,
    #[serde(default)]
    pub payload: HashMap<String, serde_json::Value>,
    pub status: RouteStatus,
    pub created_at: f64,
    #[serde(default)]
    pub delivered_at: Option<f64>,
    #[serde(default)]
    pub response: Option<HashMap<String, serde_json::Value>>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default = "default_ttl")]
    pub ttl_seconds: f64,
}

fn default_ttl() -> f64 {
    DEFAULT_TTL_SECONDS
}

impl RoutedMessage {
    pub fn is_expired(&self, now: f64) -> bool {
        (now - self.created_at) > self.ttl_seconds
    }

    /// The public dictionary form returned to clients (mirrors the reference
    /// `to_dict`: omits `response` and `ttl_seconds`).
    pub fn to_public_json(&self) -> serde_json::Value {
        serde_json::json!({
            "message_id": self.message_id,
            "source_agent": self.source_agent,
            "target_agent": self.target_agent,
            "message_type": self.message_type,
            "payload": self.payload,
            "status": self.status.to_string(),
            "created_at": self.created_at,
            "delivered_at": self.delivered_at,
            "error": self.error,
        })
    }
}

/// Default maximum pending-queue depth for one registered agent.
pub const DEFAULT_MAX_QUEUE_SIZE: usize = 100;

/// Declares which message types an agent accepts and how deep its queue may grow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentCapabilities {
    pub identity: String,
    #[serde(default)]
    pub accepted_types: HashSet<String>,
    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: usize,
}

fn default_max_queue_size() -> usize {
    DEFAULT_MAX_QUEUE_SIZE
}

impl AgentCapabilities {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            accepted_types: HashSet::new(),
            max_queue_size: DEFAULT_MAX_QUEUE_SIZE,
        }
    }

    /// An empty `accepted_types` set means accept-all.
    pub fn accepts(&self, message_type: &str) -> bool {
        self.accepted_types.is_empty() || self.accepted_types.contains(message_type)
    }
}

#[cfg(test)]
#[path = "routing_tests.rs"]
mod tests;
