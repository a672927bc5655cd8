// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Error surfaced by an [`crate::observer::Observer`]. OBSERVE failures are
/// local to one tick: the loop logs the error and returns `None` for that
/// call, without writing a `TickLog` or advancing the persisted tick count.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ObserveError(pub String);

impl ObserveError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
