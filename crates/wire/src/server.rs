// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unix-domain-socket server: accept loop, per-connection dispatch, auth.

use std::collections::HashMap;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ob_core::{AuthToken, IpcMessage};
use tokio::net::{UnixListener, UnixStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::error::WireError;
use crate::framing::{read_message, write_message};

/// Invoked once per inbound [`IpcMessage`] whose `msg_type` this handler was
/// registered for. `None` means "close the connection without responding" —
/// used by [`HandlerRegistry`] for unregistered types, matching
/// `spec.md` §4.1's "if no handler exists, close without responding".
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, message: IpcMessage) -> Option<IpcMessage>;
}

/// A [`MessageHandler`] that dispatches by `msg_type` to one sub-handler per
/// type. At most one handler may be registered per type; a later
/// `register` call for the same type replaces the earlier one.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, msg_type: impl Into<String>, handler: Arc<dyn MessageHandler>) {
        self.handlers.insert(msg_type.into(), handler);
    }
}

#[async_trait]
impl MessageHandler for HandlerRegistry {
    async fn handle(&self, message: IpcMessage) -> Option<IpcMessage> {
        match self.handlers.get(&message.msg_type) {
            Some(handler) => handler.handle(message).await,
            None => None,
        }
    }
}

/// Binds a Unix socket at `socket_path`, creating owner-only (0600)
/// permissions, and accepts connections until `shutdown` fires.
pub struct Server {
    listener: UnixListener,
    socket_path: PathBuf,
    auth_token: Option<AuthToken>,
    rejected_count: Arc<AtomicU64>,
}

impl Server {
    /// Bind a fresh listener. Removes a stale socket file left behind by a
    /// prior crashed process before binding.
    pub fn bind(socket_path: impl AsRef<Path>, auth_token: Option<AuthToken>) -> Result<Self, WireError> {
        let socket_path = socket_path.as_ref().to_path_buf();
        if socket_path.exists() {
            std::fs::remove_file(&socket_path)?;
        }
        let listener = UnixListener::bind(&socket_path)?;
        std::fs::set_permissions(&socket_path, std::fs::Permissions::from_mode(0o600))?;
        Ok(Self { listener, socket_path, auth_token, rejected_count: Arc::new(AtomicU64::new(0)) })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Shared counter of connections closed so far for presenting a
    /// mismatched or missing auth token. Exposed for the Supervisor's status
    /// response.
    pub fn rejected_count_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.rejected_count)
    }

    /// Run the accept loop until `shutdown` is cancelled. Each connection is
    /// handled on its own task and limited to one request/response exchange
    /// followed by connection close, matching the CLI's one-shot request
    /// pattern.
    pub async fn run(self, handler: Arc<dyn MessageHandler>, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("server shutting down, no longer accepting connections");
                    break;
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, _addr)) => {
                            let handler = Arc::clone(&handler);
                            let auth_token = self.auth_token.clone();
                            let rejected_count = Arc::clone(&self.rejected_count);
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, handler, auth_token, rejected_count).await {
                                    log_connection_error(e);
                                }
                            });
                        }
                        Err(e) => error!("accept error: {}", e),
                    }
                }
            }
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

async fn handle_connection(
    stream: UnixStream,
    handler: Arc<dyn MessageHandler>,
    auth_token: Option<AuthToken>,
    rejected_count: Arc<AtomicU64>,
) -> Result<(), WireError> {
    let (mut reader, mut writer) = stream.into_split();
    let message = match read_message(&mut reader).await {
        Ok(message) => message,
        // An oversize or unterminated line, or malformed JSON, is a silent
        // close per spec.md §4.1 — never penalize the listener for one bad
        // peer.
        Err(WireError::TooLarge { .. }) | Err(WireError::Malformed(_)) => return Ok(()),
        Err(e) => return Err(e),
    };

    if let Some(ref expected) = auth_token {
        if !expected.matches(&message.auth_token) {
            rejected_count.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }
    }

    if let Some(reply) = handler.handle(message).await {
        write_message(&mut writer, &reply).await?;
    }
    Ok(())
}

fn log_connection_error(e: WireError) {
    match e {
        WireError::ConnectionClosed => debug!("client disconnected"),
        WireError::Unauthorized => warn!("rejected unauthenticated connection"),
        other => error!("connection error: {}", other),
    }
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
