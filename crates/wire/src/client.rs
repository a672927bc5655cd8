// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client half of the Unix-socket transport: connect, send one message,
//! await the reply, disconnect.

use std::path::Path;
use std::time::Duration;

use ob_core::IpcMessage;
use tokio::net::UnixStream;

use crate::error::WireError;
use crate::framing::{read_message, write_message};

/// Default round-trip timeout when the caller doesn't override it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect to `socket_path`, send `message`, and return the reply.
///
/// The connection is closed after the single exchange; this transport
/// does not support pipelining multiple requests over one connection.
pub async fn send(
    socket_path: impl AsRef<Path>,
    message: &IpcMessage,
    timeout: Duration,
) -> Result<IpcMessage, WireError> {
    let mut stream = tokio::time::timeout(timeout, UnixStream::connect(socket_path.as_ref()))
        .await
        .map_err(|_| WireError::Timeout)??;

    tokio::time::timeout(timeout, write_message(&mut stream, message))
        .await
        .map_err(|_| WireError::Timeout)??;

    tokio::time::timeout(timeout, read_message(&mut stream))
        .await
        .map_err(|_| WireError::Timeout)?
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
