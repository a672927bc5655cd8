// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ob-daemon: the Supervisor process — lifecycle owner of the IPC server,
//! the managed agent fleet, the Message Router, and the three privileged
//! handlers. `SPEC_FULL.md` §4.2–§4.4.

mod error;
pub mod process;
pub mod router;
pub mod supervisor;

pub use error::DaemonError;
pub use process::{AgentProcess, AgentSpec, STOP_GRACE_PERIOD};
pub use router::{Router, RoutingStats};
pub use supervisor::{Supervisor, SupervisorConfig, SupervisorState};
