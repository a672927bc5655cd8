// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-level error kinds. Per `spec.md` §7 only startup-time configuration
//! and bind failures, plus migration failure, are fatal; everything else is
//! swallowed into a structured outcome by the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("socket bind failed: {0}")]
    Bind(#[from] ob_wire::WireError),

    #[error("storage error: {0}")]
    Storage(#[from] ob_storage::StorageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
