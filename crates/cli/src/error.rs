// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read token file {path}: {source}")]
    TokenFile { path: String, #[source] source: std::io::Error },

    #[error("invalid payload JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("payload must be a JSON object")]
    PayloadNotObject,

    #[error("supervisor unreachable: {0}")]
    Unreachable(#[from] ob_wire::WireError),
}
