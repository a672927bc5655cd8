// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by the IPC transport layer.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("line was not valid utf-8")]
    InvalidUtf8,

    #[error("message exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("connection closed before a complete message arrived")]
    ConnectionClosed,

    #[error("authentication failed")]
    Unauthorized,

    #[error("timed out waiting for message")]
    Timeout,
}
