// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn connect_to_missing_socket_errors_quickly() {
    let path = std::path::Path::new("/tmp/ob-wire-test-no-such-socket.sock");
    let _ = std::fs::remove_file(path);
    let result = send(path, &IpcMessage::new("ping"), Duration::from_millis(500)).await;
    assert!(result.is_err());
}
