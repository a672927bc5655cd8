// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn open_on_disk_creates_schema() {
    let dir = tempfile::tempdir().unwrap();
    let store = AgenticStore::open(dir.path().join("agentic.db")).unwrap();
    let conn = store.conn.lock();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type='table'", [], |r| r.get(0))
        .unwrap();
    assert!(count > 0);
}

#[test]
fn in_memory_stores_are_independent() {
    let a = AgenticStore::in_memory().unwrap();
    let b = AgenticStore::in_memory().unwrap();
    a.conn.lock().execute("INSERT INTO agent_goals (name) VALUES ('only-in-a')", []).unwrap();

    let count_b: i64 =
        b.conn.lock().query_row("SELECT COUNT(*) FROM agent_goals", [], |r| r.get(0)).unwrap();
    assert_eq!(count_b, 0);
}

#[test]
fn clone_shares_underlying_connection() {
    let store = AgenticStore::in_memory().unwrap();
    let clone = store.clone();
    store.conn.lock().execute("INSERT INTO agent_goals (name) VALUES ('shared')", []).unwrap();

    let count: i64 =
        clone.conn.lock().query_row("SELECT COUNT(*) FROM agent_goals", [], |r| r.get(0)).unwrap();
    assert_eq!(count, 1);
}
