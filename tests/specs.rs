// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end acceptance tests against the compiled `overblickd` binary,
//! exercising the scenarios named in `spec.md` §8 (S1-S4) across a real
//! process boundary rather than in-process function calls. The
//! component-level scenarios (S5, S6, and most of the invariants) already
//! have focused unit coverage inside their owning crates
//! (`ob-agentic::engine_tests`, `ob-daemon::{router,supervisor}_tests`);
//! this suite only adds what those can't: a real socket, a real child
//! process, and a real roster file on disk.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::time::{Duration, Instant};

use assert_cmd::cargo::cargo_bin;
use serde_json::{json, Value};
use serial_test::serial;

struct RunningSupervisor {
    child: Child,
    socket_dir: PathBuf,
    socket_name: String,
}

impl Drop for RunningSupervisor {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn write_roster(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("overblick.toml");
    std::fs::write(&path, contents).expect("write roster");
    path
}

fn start_supervisor(tmp: &Path, socket_name: &str, roster_contents: &str) -> RunningSupervisor {
    let roster = write_roster(tmp, roster_contents);
    let child = Command::new(cargo_bin("overblickd"))
        .arg("--roster")
        .arg(&roster)
        .arg("--socket-dir")
        .arg(tmp)
        .arg("--socket-name")
        .arg(socket_name)
        .arg("--data-dir")
        .arg(tmp)
        .spawn()
        .expect("spawn overblickd");

    let socket_dir = tmp.to_path_buf();
    let supervisor = RunningSupervisor { child, socket_dir, socket_name: socket_name.to_string() };
    wait_for_token(&supervisor.socket_dir, &supervisor.socket_name);
    supervisor
}

fn token_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("overblick-{name}.token"))
}

fn socket_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("overblick-{name}.sock"))
}

fn wait_for_token(dir: &Path, name: &str) -> String {
    let deadline = Instant::now() + Duration::from_secs(10);
    let path = token_path(dir, name);
    while Instant::now() < deadline {
        if let Ok(token) = std::fs::read_to_string(&path) {
            if !token.is_empty() {
                // The socket file can lag the token file by a few
                // milliseconds; give `bind` a moment to finish too.
                if socket_path(dir, name).exists() {
                    return token;
                }
            }
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    panic!("overblickd never wrote a token file at {}", path.display());
}

/// Sends one newline-delimited JSON envelope and reads one line back,
/// mirroring `spec.md` §6's wire format directly (no `ob-wire` dependency
/// needed here: this is testing the real wire bytes, not the client crate).
fn send(socket: &Path, request: Value, timeout: Duration) -> Option<Value> {
    let mut stream = UnixStream::connect(socket).ok()?;
    stream.set_read_timeout(Some(timeout)).ok()?;
    stream.set_write_timeout(Some(timeout)).ok()?;

    let mut line = serde_json::to_string(&request).ok()?;
    line.push('\n');
    stream.write_all(line.as_bytes()).ok()?;

    let mut reader = BufReader::new(stream);
    let mut response = String::new();
    reader.read_line(&mut response).ok()?;
    if response.is_empty() {
        return None;
    }
    serde_json::from_str(&response).ok()
}

fn envelope(msg_type: &str, token: &str, payload: Value) -> Value {
    json!({
        "type": msg_type,
        "payload": payload,
        "sender": "spec-suite",
        "timestamp": "2026-01-01T00:00:00Z",
        "request_id": Value::Null,
        "auth_token": token,
    })
}

const EMPTY_ROSTER: &str = r#"
[[agent]]
identity = "scout"
command = "sh"
args = ["-c", "sleep 30"]
"#;

/// S1 — status round trip with the right token; no response and a rejected
/// connection with the wrong one.
#[test]
#[serial]
fn s1_status_round_trip_and_auth_rejection() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let supervisor = start_supervisor(tmp.path(), "s1", EMPTY_ROSTER);
    let token = std::fs::read_to_string(token_path(&supervisor.socket_dir, "s1")).expect("token");
    let socket = socket_path(&supervisor.socket_dir, "s1");

    let reply = send(&socket, envelope("status_request", &token, json!({})), Duration::from_secs(2))
        .expect("status_response");
    assert_eq!(reply["type"], "status_response");
    assert_eq!(reply["payload"]["supervisor_state"], "running");
    assert_eq!(reply["payload"]["total_agents"], 1);

    let rejected = send(&socket, envelope("status_request", "wrong-token", json!({})), Duration::from_secs(2));
    assert!(rejected.is_none(), "a mismatched auth token must get no response at all");
}

/// S1 continued — `shutdown` brings the process down in an orderly way with
/// exit code 0, per `spec.md` §6.
#[test]
#[serial]
fn s1_shutdown_exits_cleanly() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let mut supervisor = start_supervisor(tmp.path(), "s1-shutdown", EMPTY_ROSTER);
    let token =
        std::fs::read_to_string(token_path(&supervisor.socket_dir, "s1-shutdown")).expect("token");
    let socket = socket_path(&supervisor.socket_dir, "s1-shutdown");

    let reply = send(&socket, envelope("shutdown", &token, json!({})), Duration::from_secs(2))
        .expect("ack");
    assert_eq!(reply["type"], "ack");

    let status = supervisor.child.wait().expect("wait for exit");
    assert!(status.success(), "orderly shutdown must exit 0, got {status:?}");

    // Token file is removed on orderly shutdown per spec.md §3 "Lifecycles".
    assert!(!token_path(&supervisor.socket_dir, "s1-shutdown").exists());
}

/// S2 — route a message between two agents, then collect it exactly once.
#[test]
#[serial]
fn s2_route_then_collect_round_trip() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let roster = r#"
        [[agent]]
        identity = "a"
        command = "sh"
        args = ["-c", "sleep 30"]

        [[agent]]
        identity = "b"
        command = "sh"
        args = ["-c", "sleep 30"]
        "#;
    let supervisor = start_supervisor(tmp.path(), "s2", roster);
    let token = std::fs::read_to_string(token_path(&supervisor.socket_dir, "s2")).expect("token");
    let socket = socket_path(&supervisor.socket_dir, "s2");

    let mut route_request = envelope(
        "route_message",
        &token,
        json!({"target": "b", "message_type": "hello", "data": {"x": 1}}),
    );
    route_request["sender"] = json!("a");
    let routed = send(&socket, route_request, Duration::from_secs(2)).expect("route_response");
    assert_eq!(routed["payload"]["success"], true);
    assert_eq!(routed["payload"]["status"], "pending");
    assert_eq!(routed["payload"]["message_id"], "route-000001");

    let mut collect_request = envelope("collect_messages", &token, json!({}));
    collect_request["sender"] = json!("b");
    let collected = send(&socket, collect_request, Duration::from_secs(2)).expect("collect_response");
    let messages = collected["payload"]["messages"].as_array().expect("messages array");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["source_agent"], "a");
    assert_eq!(messages[0]["payload"]["x"], 1);
    assert_eq!(messages[0]["status"], "delivered");

    let mut second_collect = envelope("collect_messages", &token, json!({}));
    second_collect["sender"] = json!("b");
    let empty = send(&socket, second_collect, Duration::from_secs(2)).expect("collect_response");
    assert_eq!(empty["payload"]["messages"].as_array().unwrap().len(), 0);
}

/// S3 — routing to an unregistered target is reported back as a failure, not
/// silently dropped.
#[test]
#[serial]
fn s3_dead_letter_on_unknown_target() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let supervisor = start_supervisor(tmp.path(), "s3", EMPTY_ROSTER);
    let token = std::fs::read_to_string(token_path(&supervisor.socket_dir, "s3")).expect("token");
    let socket = socket_path(&supervisor.socket_dir, "s3");

    let mut request = envelope(
        "route_message",
        &token,
        json!({"target": "ghost", "message_type": "x", "data": {}}),
    );
    request["sender"] = json!("scout");
    let reply = send(&socket, request, Duration::from_secs(2)).expect("route_response");
    assert_eq!(reply["payload"]["success"], false);
    assert_eq!(reply["payload"]["status"], "dead_letter");
    let error = reply["payload"]["error"].as_str().expect("error string");
    assert!(error.contains("Unknown target"), "unexpected error text: {error}");
}

/// S4 — a target's pending queue rejects once it's full.
#[test]
#[serial]
fn s4_queue_overflow_is_rejected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let roster = r#"
        [[agent]]
        identity = "s"
        command = "sh"
        args = ["-c", "sleep 30"]
        max_queue_size = 3
        "#;
    let supervisor = start_supervisor(tmp.path(), "s4", roster);
    let token = std::fs::read_to_string(token_path(&supervisor.socket_dir, "s4")).expect("token");
    let socket = socket_path(&supervisor.socket_dir, "s4");

    let mut statuses = Vec::new();
    for n in 0..4 {
        let mut request =
            envelope("route_message", &token, json!({"target": "s", "message_type": "m", "data": {"n": n}}));
        request["sender"] = json!("scout");
        let reply = send(&socket, request, Duration::from_secs(2)).expect("route_response");
        statuses.push(reply["payload"]["status"].as_str().unwrap().to_string());
    }

    assert_eq!(statuses.iter().filter(|s| *s == "pending").count(), 3);
    assert_eq!(statuses.iter().filter(|s| *s == "rejected").count(), 1);
}

/// The permission handler auto-approves every request (Stage 1, `spec.md` §4.4).
#[test]
#[serial]
fn permission_requests_are_auto_approved() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let supervisor = start_supervisor(tmp.path(), "perm", EMPTY_ROSTER);
    let token = std::fs::read_to_string(token_path(&supervisor.socket_dir, "perm")).expect("token");
    let socket = socket_path(&supervisor.socket_dir, "perm");

    let reply = send(
        &socket,
        envelope("permission_request", &token, json!({"resource": "disk", "action": "write"})),
        Duration::from_secs(2),
    )
    .expect("permission_response");
    assert_eq!(reply["payload"]["granted"], true);
    assert_eq!(reply["payload"]["reason"], "auto-approved");
}

/// A message exceeding the 1 MiB cap is dropped unprocessed, per `spec.md` §3.
#[test]
#[serial]
fn oversized_message_gets_no_response() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let supervisor = start_supervisor(tmp.path(), "big", EMPTY_ROSTER);
    let token = std::fs::read_to_string(token_path(&supervisor.socket_dir, "big")).expect("token");
    let socket = socket_path(&supervisor.socket_dir, "big");

    let huge = "x".repeat(2 * 1024 * 1024);
    let reply = send(&socket, envelope("status_request", &token, json!({"padding": huge})), Duration::from_secs(2));
    assert!(reply.is_none(), "oversize messages must be dropped without a response");
}
