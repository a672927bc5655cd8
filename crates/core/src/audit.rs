// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shape of one row in the append-only audit log sink (`ob-storage` owns the
//! actual table; this is the value object handlers and the router build).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: f64,
    pub action: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub identity: String,
    #[serde(default)]
    pub plugin: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub duration_ms: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_success() -> bool {
    true
}

impl AuditEntry {
    pub fn new(identity: impl Into<String>, action: impl Into<String>, timestamp: f64) -> Self {
        Self {
            timestamp,
            action: action.into(),
            category: default_category(),
            identity: identity.into(),
            plugin: None,
            details: None,
            success: true,
            duration_ms: None,
            error: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = Some(plugin.into());
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.success = false;
        self
    }
}
