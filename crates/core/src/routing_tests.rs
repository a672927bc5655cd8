// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn empty_accepted_types_means_accept_all() {
    let caps = AgentCapabilities::new("cherry");
    assert!(caps.accepts("anything"));
}

#[test]
fn nonempty_accepted_types_filters() {
    let mut caps = AgentCapabilities::new("cherry");
    caps.accepted_types.insert("email_compose".to_string());
    assert!(caps.accepts("email_compose"));
    assert!(!caps.accepts("status_query"));
}

#[test]
fn is_expired_compares_against_ttl() {
    let msg = RoutedMessage {
        message_id: "route-000001".into(),
        source_agent: "a".into(),
        target_agent: "b".into(),
        message_type: "hello".into(),
        payload: HashMap::new(),
        status: RouteStatus::Pending,
        created_at: 1000.0,
        delivered_at: None,
        response: None,
        error: None,
        ttl_seconds: 300.0,
    };
    assert!(!msg.is_expired(1299.0));
    assert!(msg.is_expired(1301.0));
}

#[test]
fn display_matches_snake_case_names() {
    assert_eq!(RouteStatus::DeadLetter.to_string(), "dead_letter");
    assert_eq!(RouteStatus::Pending.to_string(), "pending");
}
