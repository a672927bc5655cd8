// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;

use ob_core::AgentCapabilities;
use serde_json::json;

use super::*;

fn payload(n: i64) -> HashMap<String, Value> {
    HashMap::from([("n".to_string(), json!(n))])
}

/// S2 — route then collect.
#[test]
fn route_then_collect_round_trip() {
    let mut router = Router::new();
    router.register(AgentCapabilities::new("a"));
    router.register(AgentCapabilities::new("b"));

    let routed = router.route("a", "b", "hello", HashMap::from([("x".to_string(), json!(1))]), None);
    assert_eq!(routed.status, RouteStatus::Pending);
    assert_eq!(routed.message_id, "route-000001");

    let collected = router.collect("b");
    assert_eq!(collected.len(), 1);
    assert_eq!(collected[0].source_agent, "a");
    assert_eq!(collected[0].status, RouteStatus::Delivered);

    assert!(router.collect("b").is_empty());
}

/// S3 — dead-letter on unknown target.
#[test]
fn unknown_target_is_dead_lettered() {
    let mut router = Router::new();
    router.register(AgentCapabilities::new("a"));

    let routed = router.route("a", "ghost", "x", HashMap::new(), None);
    assert_eq!(routed.status, RouteStatus::DeadLetter);
    assert!(routed.error.as_deref().unwrap().contains("Unknown target"));

    let dead_letters = router.dead_letters();
    assert_eq!(dead_letters.len(), 1);
    assert_eq!(dead_letters[0].message_id, routed.message_id);
}

/// S4 — queue overflow.
#[test]
fn fourth_route_past_max_queue_is_rejected() {
    let mut router = Router::new();
    router.register(AgentCapabilities::new("s"));
    let mut small = AgentCapabilities::new("small");
    small.max_queue_size = 3;
    router.register(small);

    let mut statuses = Vec::new();
    for i in 0..4 {
        let routed = router.route("s", "small", "m", payload(i), None);
        statuses.push(routed);
    }

    assert_eq!(statuses[0].status, RouteStatus::Pending);
    assert_eq!(statuses[1].status, RouteStatus::Pending);
    assert_eq!(statuses[2].status, RouteStatus::Pending);
    assert_eq!(statuses[3].status, RouteStatus::Rejected);
    assert!(statuses[3].error.as_deref().unwrap().contains("queue full"));
}

#[test]
fn non_accepted_message_type_is_rejected() {
    let mut router = Router::new();
    router.register(AgentCapabilities::new("a"));
    let mut picky = AgentCapabilities::new("picky");
    picky.accepted_types = std::collections::HashSet::from(["only_this".to_string()]);
    router.register(picky);

    let routed = router.route("a", "picky", "something_else", HashMap::new(), None);
    assert_eq!(routed.status, RouteStatus::Rejected);
}

#[test]
fn broadcast_skips_source_and_excluded() {
    let mut router = Router::new();
    router.register(AgentCapabilities::new("a"));
    router.register(AgentCapabilities::new("b"));
    router.register(AgentCapabilities::new("c"));

    let routed = router.broadcast("a", "ping", HashMap::new(), &["c".to_string()]);
    let targets: Vec<&str> = routed.iter().map(|m| m.target_agent.as_str()).collect();
    assert_eq!(targets, vec!["b"]);
}

#[test]
fn unregister_leaves_queued_messages_in_place() {
    let mut router = Router::new();
    router.register(AgentCapabilities::new("a"));
    router.register(AgentCapabilities::new("b"));
    router.route("a", "b", "hello", HashMap::new(), None);

    router.unregister("b");
    assert_eq!(router.pending_count("b"), 1);
}

#[test]
fn cleanup_expired_moves_stale_pending_to_dead_letters() {
    let mut router = Router::new();
    router.register(AgentCapabilities::new("a"));
    router.register(AgentCapabilities::new("b"));
    router.route("a", "b", "hello", HashMap::new(), Some(0.0));
    // simulate an already-expired message sitting in the queue
    if let Some(queue) = router.pending.get_mut("b") {
        queue[0].created_at -= 10.0;
    }

    router.cleanup_expired();
    assert_eq!(router.pending_count("b"), 0);
    assert_eq!(router.dead_letters().len(), 1);
}

#[test]
fn stats_report_totals_and_rejections() {
    let mut router = Router::new();
    router.register(AgentCapabilities::new("a"));
    router.route("a", "ghost", "x", HashMap::new(), None);

    let stats = router.stats();
    assert_eq!(stats.total_dead_lettered, 1);
}
