// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The wire envelope carried between agents and the Supervisor.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maximum serialized size of one envelope, including the trailing newline.
pub const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// One IPC envelope: one line of newline-terminated UTF-8 JSON on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IpcMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(default)]
    pub payload: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default)]
    pub auth_token: String,
}

impl IpcMessage {
    /// Construct a message with only the fields that matter for a handler's
    /// reply; `sender`, `timestamp`, and `auth_token` are filled by the
    /// transport layer as appropriate for the direction of travel.
    pub fn new(msg_type: impl Into<String>) -> Self {
        Self {
            msg_type: msg_type.into(),
            payload: HashMap::new(),
            sender: String::new(),
            timestamp: String::new(),
            request_id: None,
            auth_token: String::new(),
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    pub fn with_payload(mut self, payload: HashMap<String, serde_json::Value>) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Serialize as a single newline-terminated line.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut s = serde_json::to_string(self)?;
        s.push('\n');
        Ok(s)
    }

    /// Parse a single line (without its trailing newline).
    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.payload.get(key).and_then(|v| v.as_f64())
    }
}

#[cfg(test)]
#[path = "ipc_tests.rs"]
mod tests;
