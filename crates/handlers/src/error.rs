// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("llm error: {0}")]
    Llm(#[from] ob_core::LlmError),
    #[error("search request failed: {0}")]
    Search(String),
    #[error("storage error: {0}")]
    Storage(#[from] ob_storage::StorageError),
}
