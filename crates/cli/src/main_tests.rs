// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn status_request_has_empty_payload() {
    let msg = build_request(Command::Status, "tok").unwrap();
    assert_eq!(msg.msg_type, "status_request");
    assert!(msg.payload.is_empty());
    assert_eq!(msg.auth_token, "tok");
}

#[test]
fn route_request_carries_target_type_and_data() {
    let msg = build_request(
        Command::Route {
            target: "mailer".to_string(),
            message_type: "ping".to_string(),
            payload: r#"{"x":1}"#.to_string(),
            ttl_seconds: Some(60.0),
        },
        "tok",
    )
    .unwrap();
    assert_eq!(msg.msg_type, "route_message");
    assert_eq!(msg.get_str("target"), Some("mailer"));
    assert_eq!(msg.get_str("message_type"), Some("ping"));
    assert_eq!(msg.get_f64("ttl_seconds"), Some(60.0));
    assert_eq!(msg.payload.get("data").and_then(|v| v.get("x")).and_then(|v| v.as_i64()), Some(1));
}

#[test]
fn route_request_rejects_non_object_payload() {
    let err = build_request(
        Command::Route {
            target: "mailer".to_string(),
            message_type: "ping".to_string(),
            payload: "[1,2,3]".to_string(),
            ttl_seconds: None,
        },
        "tok",
    )
    .unwrap_err();
    assert!(matches!(err, CliError::PayloadNotObject));
}

#[test]
fn read_token_reads_trimmed_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("overblick-supervisor.token"), "sekret\n").unwrap();
    let token = read_token(dir.path(), "supervisor").unwrap();
    assert_eq!(token, "sekret\n");
}

#[test]
fn read_token_missing_file_is_a_token_file_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_token(dir.path(), "supervisor").unwrap_err();
    assert!(matches!(err, CliError::TokenFile { .. }));
}

#[test]
fn route_request_rejects_invalid_json() {
    let err = build_request(
        Command::Route {
            target: "mailer".to_string(),
            message_type: "ping".to_string(),
            payload: "not json".to_string(),
            ttl_seconds: None,
        },
        "tok",
    )
    .unwrap_err();
    assert!(matches!(err, CliError::InvalidPayload(_)));
}
