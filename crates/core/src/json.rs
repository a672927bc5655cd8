// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort JSON extraction from LLM text, shared by the Planner,
//! Reflection, and the email-consultation handler (`spec.md` §4.7's "JSON
//! extraction").

use serde_json::Value;

/// Try, in order: (1) parse the whole string as JSON; (2) find a fenced
/// ```` ```json ```` or plain ```` ``` ```` block and parse its contents;
/// (3) take the substring from the first `{` to the last `}` and parse
/// that. The first step that produces valid JSON wins; otherwise `None`.
pub fn extract_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(text.trim()) {
        return Some(value);
    }

    if let Some(block) = fenced_block(text) {
        if let Ok(value) = serde_json::from_str(block.trim()) {
            return Some(value);
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Find the first fenced code block, preferring one tagged ```` ```json ````
/// but falling back to a plain ```` ``` ```` fence.
fn fenced_block(text: &str) -> Option<&str> {
    const JSON_FENCE: &str = "```json";
    const PLAIN_FENCE: &str = "```";

    if let Some(start) = text.find(JSON_FENCE) {
        let body_start = start + JSON_FENCE.len();
        if let Some(end_offset) = text[body_start..].find(PLAIN_FENCE) {
            return Some(&text[body_start..body_start + end_offset]);
        }
    }

    let start = text.find(PLAIN_FENCE)?;
    let body_start = start + PLAIN_FENCE.len();
    let end_offset = text[body_start..].find(PLAIN_FENCE)?;
    Some(&text[body_start..body_start + end_offset])
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;
