// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Configuration errors are fatal at startup per `spec.md` §7.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read roster file {path}: {source}")]
    Read { path: String, #[source] source: std::io::Error },

    #[error("failed to parse roster file {path}: {source}")]
    Parse { path: String, #[source] source: toml::de::Error },

    #[error("duplicate agent identity in roster: {0}")]
    DuplicateIdentity(String),

    #[error("roster has no agents configured")]
    Empty,
}
