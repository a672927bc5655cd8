// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::store::AgenticStore;

#[test]
fn upsert_then_get_by_name_round_trips() {
    let store = AgenticStore::in_memory().unwrap();
    let goal = AgentGoal::new("fix-flaky-tests").with_priority(80);
    store.upsert_goal(&goal).unwrap();

    let fetched = store.get_goal_by_name("fix-flaky-tests").unwrap().unwrap();
    assert_eq!(fetched.priority, 80);
    assert_eq!(fetched.status, GoalStatus::Active);
}

#[test]
fn upsert_same_name_updates_in_place() {
    let store = AgenticStore::in_memory().unwrap();
    store.upsert_goal(&AgentGoal::new("x").with_priority(10)).unwrap();
    store.upsert_goal(&AgentGoal::new("x").with_priority(90)).unwrap();

    let goals = store.get_goals(GoalStatus::Active).unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].priority, 90);
}

#[test]
fn get_goals_filters_by_status_and_orders_by_priority() {
    let store = AgenticStore::in_memory().unwrap();
    store.upsert_goal(&AgentGoal::new("low").with_priority(10)).unwrap();
    store.upsert_goal(&AgentGoal::new("high").with_priority(90)).unwrap();
    let mut paused = AgentGoal::new("paused-goal");
    paused.status = GoalStatus::Paused;
    store.upsert_goal(&paused).unwrap();

    let active = store.get_goals(GoalStatus::Active).unwrap();
    assert_eq!(active.len(), 2);
    assert_eq!(active[0].name, "high");
    assert_eq!(active[1].name, "low");
}

#[test]
fn get_goal_by_name_missing_returns_none() {
    let store = AgenticStore::in_memory().unwrap();
    assert!(store.get_goal_by_name("nope").unwrap().is_none());
}

#[test]
fn update_progress_clamps_to_unit_interval() {
    let store = AgenticStore::in_memory().unwrap();
    store.upsert_goal(&AgentGoal::new("x")).unwrap();

    store.update_progress("x", 1.5).unwrap();
    assert_eq!(store.get_goal_by_name("x").unwrap().unwrap().progress, 1.0);

    store.update_progress("x", -3.0).unwrap();
    assert_eq!(store.get_goal_by_name("x").unwrap().unwrap().progress, 0.0);

    store.update_progress("x", 0.42).unwrap();
    assert_eq!(store.get_goal_by_name("x").unwrap().unwrap().progress, 0.42);
}

#[test]
fn update_progress_on_unknown_name_is_a_no_op() {
    let store = AgenticStore::in_memory().unwrap();
    store.update_progress("ghost", 0.9).unwrap();
}
