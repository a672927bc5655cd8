// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ob_core::AuthToken;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

struct EchoHandler;

#[async_trait::async_trait]
impl MessageHandler for EchoHandler {
    async fn handle(&self, message: IpcMessage) -> Option<IpcMessage> {
        Some(IpcMessage::new(format!("{}-ack", message.msg_type)))
    }
}

fn temp_socket_path() -> std::path::PathBuf {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("ob-test.sock");
    std::mem::forget(dir);
    path
}

#[tokio::test]
async fn accepts_connection_and_dispatches_to_handler() {
    let path = temp_socket_path();
    let server = Server::bind(&path, None).expect("bind");
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    let handle = tokio::spawn(server.run(Arc::new(EchoHandler), shutdown_clone));

    let reply = crate::client::send(
        &path,
        &IpcMessage::new("ping"),
        std::time::Duration::from_secs(1),
    )
    .await
    .expect("send");
    assert_eq!(reply.msg_type, "ping-ack");

    shutdown.cancel();
    let _ = handle.await;
}

#[tokio::test]
async fn mismatched_auth_token_gets_no_reply_and_increments_counter() {
    let path = temp_socket_path();
    let expected = AuthToken::generate();
    let server = Server::bind(&path, Some(expected.clone())).expect("bind");
    let rejected = server.rejected_count_handle();
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    let handle = tokio::spawn(server.run(Arc::new(EchoHandler), shutdown_clone));

    let mut msg = IpcMessage::new("ping");
    msg.auth_token = "wrong-token".to_string();
    let result = crate::client::send(&path, &msg, std::time::Duration::from_secs(1)).await;
    assert!(result.is_err(), "no reply at all on auth mismatch");
    assert_eq!(rejected.load(Ordering::Relaxed), 1);

    shutdown.cancel();
    let _ = handle.await;
}

#[tokio::test]
async fn unregistered_message_type_gets_no_reply() {
    let path = temp_socket_path();
    let server = Server::bind(&path, None).expect("bind");
    let registry: HandlerRegistry = HandlerRegistry::new();
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    let handle = tokio::spawn(server.run(Arc::new(registry), shutdown_clone));

    let result =
        crate::client::send(&path, &IpcMessage::new("mystery"), std::time::Duration::from_secs(1))
            .await;
    assert!(result.is_err());

    shutdown.cancel();
    let _ = handle.await;
}

#[tokio::test]
async fn registry_dispatches_by_msg_type() {
    let path = temp_socket_path();
    let server = Server::bind(&path, None).expect("bind");
    let mut registry = HandlerRegistry::new();
    registry.register("ping", Arc::new(EchoHandler));
    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    let handle = tokio::spawn(server.run(Arc::new(registry), shutdown_clone));

    let reply =
        crate::client::send(&path, &IpcMessage::new("ping"), std::time::Duration::from_secs(1))
            .await
            .expect("send");
    assert_eq!(reply.msg_type, "ping-ack");

    shutdown.cancel();
    let _ = handle.await;
}

#[test]
fn bind_sets_owner_only_permissions() {
    use std::os::unix::fs::PermissionsExt;
    let path = temp_socket_path();
    let server = Server::bind(&path, None).expect("bind");
    let mode = std::fs::metadata(server.socket_path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
