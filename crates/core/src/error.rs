// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error kinds for the data model layer.

use thiserror::Error;

/// Errors that can arise while constructing or validating core data-model types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("duplicate name: {0}")]
    DuplicateName(String),
}
