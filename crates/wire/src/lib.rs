// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unix-domain-socket IPC transport.
//!
//! Wire format: newline-delimited UTF-8 JSON, one [`ob_core::IpcMessage`]
//! per line, capped at [`ob_core::MAX_MESSAGE_BYTES`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod error;
mod framing;
mod server;

pub use client::{send, DEFAULT_TIMEOUT};
pub use error::WireError;
pub use framing::{read_message, write_message};
pub use server::{HandlerRegistry, MessageHandler, Server};
