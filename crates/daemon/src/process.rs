// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent Process: spawn, monitor, stop-with-grace, restart-with-backoff for
//! one managed agent child process. `ob_core::AgentProcessRecord` is the
//! serializable status view this wraps; the live `tokio::process::Child`
//! handle lives only here since it is neither `Clone` nor `Serialize`.

use std::collections::HashSet;
use std::time::Duration;

use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use ob_core::{AgentProcessRecord, AgentState};
use tokio::process::{Child, Command};
use tracing::{info, warn};

/// Grace period `stop()` waits for an orderly exit before forcing a kill.
pub const STOP_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// One agent identity's launch configuration, supplied by the roster config.
#[derive(Debug, Clone)]
pub struct AgentSpec {
    pub identity: String,
    pub plugins: Vec<String>,
    pub command: String,
    pub args: Vec<String>,
    pub max_restarts: u32,
    /// Message types this identity accepts over the router; empty = accept-all.
    pub accepted_types: HashSet<String>,
    pub max_queue_size: usize,
}

/// Owns the live child handle for one managed agent and the status record
/// the Supervisor reports to callers.
pub struct AgentProcess {
    spec: AgentSpec,
    record: AgentProcessRecord,
    child: Option<Child>,
}

impl AgentProcess {
    pub fn new(spec: AgentSpec) -> Self {
        let record = AgentProcessRecord::new(spec.identity.clone(), spec.plugins.clone())
            .with_max_restarts(spec.max_restarts);
        Self { spec, record, child: None }
    }

    pub fn record(&self) -> &AgentProcessRecord {
        &self.record
    }

    /// Spawn the child, passing its identity, plugin list, and the socket
    /// directory as arguments. Returns as soon as the OS reports the child
    /// alive; does not wait for any readiness signal from the child itself.
    pub fn start(&mut self, socket_dir: &str) -> std::io::Result<()> {
        let mut command = Command::new(&self.spec.command);
        command
            .args(&self.spec.args)
            .arg("--identity")
            .arg(&self.spec.identity)
            .arg("--plugins")
            .arg(self.spec.plugins.join(","))
            .arg("--socket-dir")
            .arg(socket_dir)
            .kill_on_drop(true);

        let child = command.spawn()?;
        self.child = Some(child);
        self.record.state = AgentState::Running;
        info!(identity = %self.spec.identity, "agent process started");
        Ok(())
    }

    /// Block until the child exits, updating the status record with its
    /// terminal state and exit code.
    pub async fn monitor(&mut self) -> std::io::Result<AgentState> {
        let Some(child) = self.child.as_mut() else {
            return Ok(self.record.state);
        };
        let status = child.wait().await?;
        self.child = None;

        self.record.exit_code = status.code();
        self.record.state = if status.success() {
            AgentState::Stopped
        } else {
            AgentState::Crashed
        };
        Ok(self.record.state)
    }

    /// Orderly stop per `spec.md` §4.2: send `SIGTERM`, wait up to the grace
    /// period for the child to exit on its own, then force-kill on timeout.
    pub async fn stop(&mut self) {
        self.record.state = AgentState::Stopping;
        let Some(mut child) = self.child.take() else {
            self.record.state = AgentState::Stopped;
            return;
        };

        match child.id() {
            Some(pid) => {
                if let Err(e) = signal::kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                    warn!(identity = %self.spec.identity, "failed to send SIGTERM: {e}");
                }
            }
            None => {
                // Already reaped; `wait()` below returns immediately.
            }
        }

        match tokio::time::timeout(STOP_GRACE_PERIOD, child.wait()).await {
            Ok(Ok(status)) => {
                self.record.exit_code = status.code();
            }
            Ok(Err(e)) => {
                warn!(identity = %self.spec.identity, "error waiting for agent to exit: {e}");
            }
            Err(_) => {
                warn!(identity = %self.spec.identity, "grace period elapsed, killing agent");
                let _ = child.kill().await;
            }
        }
        self.record.state = AgentState::Stopped;
    }

    /// Whether the restart policy still permits an automatic respawn after
    /// a crash. Manual stops never increment `restart_count`.
    pub fn note_crash_and_can_restart(&mut self) -> bool {
        let can_restart = self.record.can_restart();
        if can_restart {
            self.record.restart_count += 1;
        }
        can_restart
    }

    pub fn backoff(&self) -> Duration {
        self.record.backoff()
    }

    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
