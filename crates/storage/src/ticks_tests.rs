// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::store::AgenticStore;

#[test]
fn last_tick_number_is_zero_before_any_tick() {
    let store = AgenticStore::in_memory().unwrap();
    assert_eq!(store.last_tick_number().unwrap(), 0);
}

#[test]
fn last_tick_number_tracks_highest_inserted() {
    let store = AgenticStore::in_memory().unwrap();
    store.insert_tick_log(&TickLog::new(1, "t1")).unwrap();
    store.insert_tick_log(&TickLog::new(2, "t2")).unwrap();
    assert_eq!(store.last_tick_number().unwrap(), 2);
}

#[test]
fn recent_ticks_newest_first() {
    let store = AgenticStore::in_memory().unwrap();
    store.insert_tick_log(&TickLog::new(1, "t1")).unwrap();
    store.insert_tick_log(&TickLog::new(2, "t2")).unwrap();

    let recent = store.get_recent_ticks(10).unwrap();
    assert_eq!(recent[0].tick_number, 2);
    assert_eq!(recent[1].tick_number, 1);
}
