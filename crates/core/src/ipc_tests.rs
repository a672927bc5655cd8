// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn round_trips_through_json() {
    let mut payload = HashMap::new();
    payload.insert("x".to_string(), serde_json::json!(1));

    let msg = IpcMessage::new("status_request")
        .with_sender("anomal")
        .with_payload(payload)
        .with_timestamp("2026-07-27T00:00:00Z");

    let line = msg.to_line().expect("serialize");
    assert!(line.ends_with('\n'));

    let parsed = IpcMessage::from_line(line.trim_end_matches('\n')).expect("parse");
    assert_eq!(parsed, msg);
}

#[test]
fn missing_optional_fields_default() {
    let parsed = IpcMessage::from_line(r#"{"type":"shutdown"}"#).expect("parse");
    assert_eq!(parsed.msg_type, "shutdown");
    assert!(parsed.payload.is_empty());
    assert_eq!(parsed.sender, "");
    assert_eq!(parsed.request_id, None);
    assert_eq!(parsed.auth_token, "");
}

#[test]
fn malformed_json_fails_to_parse() {
    assert!(IpcMessage::from_line("not json").is_err());
    assert!(IpcMessage::from_line(r#"{"payload": 5}"#).is_err());
}

#[test]
fn get_str_and_get_f64_accessors() {
    let mut payload = HashMap::new();
    payload.insert("query".to_string(), serde_json::json!("rust async"));
    payload.insert("confidence".to_string(), serde_json::json!(0.75));
    let msg = IpcMessage::new("research_request").with_payload(payload);

    assert_eq!(msg.get_str("query"), Some("rust async"));
    assert_eq!(msg.get_f64("confidence"), Some(0.75));
    assert_eq!(msg.get_str("missing"), None);
}
