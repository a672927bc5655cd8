// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::store::AgenticStore;

#[test]
fn insert_then_recent_returns_newest_first() {
    let store = AgenticStore::in_memory().unwrap();
    store.insert_learning(&AgentLearning::new("first insight")).unwrap();
    store.insert_learning(&AgentLearning::from_reflection("second insight", 7)).unwrap();

    let recent = store.get_recent_learnings(10).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].insight, "second insight");
    assert_eq!(recent[0].source_tick, 7);
    assert_eq!(recent[1].insight, "first insight");
}

#[test]
fn recent_learnings_respects_limit() {
    let store = AgenticStore::in_memory().unwrap();
    for i in 0..5 {
        store.insert_learning(&AgentLearning::new(format!("insight {i}"))).unwrap();
    }
    assert_eq!(store.get_recent_learnings(3).unwrap().len(), 3);
}
