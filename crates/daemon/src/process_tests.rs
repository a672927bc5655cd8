// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn spec() -> AgentSpec {
    AgentSpec {
        identity: "watcher".to_string(),
        plugins: vec!["log-scan".to_string()],
        command: "true".to_string(),
        args: vec![],
        max_restarts: 3,
        accepted_types: Default::default(),
        max_queue_size: 100,
    }
}

#[tokio::test]
async fn start_transitions_to_running_and_monitor_reports_stopped_on_clean_exit() {
    let mut process = AgentProcess::new(spec());
    process.start("/tmp/overblick").unwrap();
    assert_eq!(process.record().state, AgentState::Running);

    let state = process.monitor().await.unwrap();
    assert_eq!(state, AgentState::Stopped);
    assert_eq!(process.record().exit_code, Some(0));
}

#[tokio::test]
async fn non_zero_exit_is_reported_as_crashed() {
    let mut crash_spec = spec();
    crash_spec.command = "false".to_string();
    let mut process = AgentProcess::new(crash_spec);
    process.start("/tmp/overblick").unwrap();

    let state = process.monitor().await.unwrap();
    assert_eq!(state, AgentState::Crashed);
    assert_eq!(process.record().exit_code, Some(1));
}

#[test]
fn restart_policy_stops_after_max_restarts() {
    let mut process = AgentProcess::new(spec());
    assert!(process.note_crash_and_can_restart());
    assert!(process.note_crash_and_can_restart());
    assert!(process.note_crash_and_can_restart());
    assert!(!process.note_crash_and_can_restart());
    assert_eq!(process.record().restart_count, 3);
}

#[test]
fn backoff_is_linear_in_restart_count() {
    let mut process = AgentProcess::new(spec());
    process.note_crash_and_can_restart();
    assert_eq!(process.backoff(), Duration::from_secs(2));
    process.note_crash_and_can_restart();
    assert_eq!(process.backoff(), Duration::from_secs(4));
}

#[tokio::test]
async fn stop_without_a_running_child_is_a_no_op() {
    let mut process = AgentProcess::new(spec());
    process.stop().await;
    assert_eq!(process.record().state, AgentState::Stopped);
}

/// `stop()` must send an orderly `SIGTERM` first: a child that traps it and
/// exits cleanly should finish well inside the grace period, not be
/// SIGKILLed after waiting out the full `STOP_GRACE_PERIOD`.
#[tokio::test]
async fn stop_sends_sigterm_before_the_grace_period_kill() {
    let mut trap_spec = spec();
    trap_spec.command = "sh".to_string();
    trap_spec.args = vec!["-c".to_string(), "trap 'exit 0' TERM; sleep 30 & wait".to_string()];
    let mut process = AgentProcess::new(trap_spec);
    process.start("/tmp/overblick").unwrap();

    let started = std::time::Instant::now();
    process.stop().await;

    assert_eq!(process.record().state, AgentState::Stopped);
    assert_eq!(process.record().exit_code, Some(0));
    assert!(
        started.elapsed() < STOP_GRACE_PERIOD,
        "orderly SIGTERM exit took as long as the grace period timeout"
    );
}
