// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn new_record_starts_in_starting_state() {
    let record = AgentProcessRecord::new("anomal", vec!["moltbook".to_string()]);
    assert_eq!(record.state, AgentState::Starting);
    assert_eq!(record.restart_count, 0);
    assert_eq!(record.max_restarts, DEFAULT_MAX_RESTARTS);
}

#[test]
fn can_restart_respects_max() {
    let mut record = AgentProcessRecord::new("anomal", vec![]).with_max_restarts(2);
    assert!(record.can_restart());
    record.restart_count = 2;
    assert!(!record.can_restart());
}

#[test]
fn backoff_is_linear_in_restart_count() {
    let mut record = AgentProcessRecord::new("anomal", vec![]);
    assert_eq!(record.backoff().as_secs(), 0);
    record.restart_count = 3;
    assert_eq!(record.backoff().as_secs(), 6);
}

#[test]
fn display_matches_snake_case_names() {
    assert_eq!(AgentState::Running.to_string(), "running");
    assert_eq!(AgentState::Crashed.to_string(), "crashed");
}
