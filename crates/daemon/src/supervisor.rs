// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The Supervisor: lifecycle owner of the IPC server, the managed agent
//! fleet, the Message Router, and the three privileged handlers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ob_core::{AgentCapabilities, AuditEntry, AuthToken, IpcMessage, LlmPipeline};
use ob_handlers::{EmailConsultationHandler, HealthInquiryHandler, ResearchHandler};
use ob_storage::AgenticStore;
use ob_wire::{HandlerRegistry, MessageHandler, Server};
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::DaemonError;
use crate::process::{AgentProcess, AgentSpec};
use crate::router::Router;

/// Lifecycle state of the Supervisor itself. One-way except via fresh
/// construction, per `spec.md` §4.4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Init,
    Starting,
    Running,
    Stopping,
    Stopped,
}

impl SupervisorState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        }
    }
}

pub struct SupervisorConfig {
    pub socket_dir: PathBuf,
    pub socket_name: String,
    pub agents: Vec<AgentSpec>,
    pub llm: Arc<dyn LlmPipeline>,
    pub audit: AgenticStore,
}

struct AgentHandle {
    identity: String,
    stop_signal: Arc<Notify>,
    task: JoinHandle<()>,
}

/// Shared state reachable from every IPC handler task.
struct Shared {
    state: Mutex<SupervisorState>,
    running: Arc<AtomicBool>,
    router: Mutex<Router>,
    audit: AgenticStore,
    agent_records: Vec<(String, Arc<Mutex<ob_core::AgentProcessRecord>>)>,
    rejected_count: Mutex<Option<Arc<AtomicU64>>>,
    shutdown: CancellationToken,
}

impl Shared {
    fn status_json(&self) -> serde_json::Value {
        let state = *self.state.lock();
        let mut agents = serde_json::Map::new();
        let mut running_agents = 0;
        for (identity, record) in &self.agent_records {
            let record = record.lock();
            if record.state == ob_core::AgentState::Running {
                running_agents += 1;
            }
            agents.insert(
                identity.clone(),
                json!({
                    "state": record.state.to_string(),
                    "restart_count": record.restart_count,
                    "exit_code": record.exit_code,
                }),
            );
        }
        let stats = self.router.lock().stats();
        let rejected_connections =
            self.rejected_count.lock().as_ref().map_or(0, |c| c.load(Ordering::Relaxed));
        json!({
            "supervisor_state": state.as_str(),
            "agents": agents,
            "total_agents": self.agent_records.len(),
            "running_agents": running_agents,
            "routing": {
                "pending": stats.total_pending,
                "delivered": stats.total_delivered,
                "dead_lettered": stats.total_dead_lettered,
                "rejected_count": stats.rejected_count,
                "connections_rejected": rejected_connections,
            },
        })
    }

    fn audit(&self, identity: &str, action: &str, success: bool) {
        let entry = AuditEntry::new(identity, action, unix_now()).with_success(success);
        let _ = self.audit.write_audit(&entry);
    }
}

fn unix_now() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs_f64()).unwrap_or(0.0)
}

struct StatusHandler(Arc<Shared>);

#[async_trait]
impl MessageHandler for StatusHandler {
    async fn handle(&self, message: IpcMessage) -> Option<IpcMessage> {
        self.0.audit(&message.sender, "status_request", true);
        Some(IpcMessage::new("status_response").with_payload(
            self.0.status_json().as_object().cloned().unwrap_or_default().into_iter().collect(),
        ))
    }
}

struct PermissionHandler(Arc<Shared>);

#[async_trait]
impl MessageHandler for PermissionHandler {
    async fn handle(&self, message: IpcMessage) -> Option<IpcMessage> {
        let resource = message.get_str("resource").unwrap_or("").to_string();
        let action = message.get_str("action").unwrap_or("").to_string();
        let entry = AuditEntry::new(&message.sender, "permission_request", unix_now())
            .with_category("permission")
            .with_details(json!({"resource": resource, "action": action, "granted": true}));
        let _ = self.0.audit.write_audit(&entry);

        Some(IpcMessage::new("permission_response").with_payload(HashMap::from([
            ("granted".to_string(), json!(true)),
            ("reason".to_string(), json!("auto-approved")),
        ])))
    }
}

struct RouteHandler(Arc<Shared>);

#[async_trait]
impl MessageHandler for RouteHandler {
    async fn handle(&self, message: IpcMessage) -> Option<IpcMessage> {
        let target = message.get_str("target").unwrap_or("").to_string();
        let message_type = message.get_str("message_type").unwrap_or("").to_string();
        let ttl_seconds = message.get_f64("ttl_seconds");
        let data = message
            .payload
            .get("data")
            .and_then(|v| v.as_object())
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .collect();

        let routed =
            self.0.router.lock().route(&message.sender, &target, &message_type, data, ttl_seconds);

        Some(IpcMessage::new("route_response").with_payload(HashMap::from([
            ("success".to_string(), json!(matches!(routed.status, ob_core::RouteStatus::Pending))),
            ("message_id".to_string(), json!(routed.message_id)),
            ("status".to_string(), json!(routed.status.to_string())),
            ("error".to_string(), json!(routed.error)),
        ])))
    }
}

struct CollectHandler(Arc<Shared>);

#[async_trait]
impl MessageHandler for CollectHandler {
    async fn handle(&self, message: IpcMessage) -> Option<IpcMessage> {
        let messages = self.0.router.lock().collect(&message.sender);
        let count = messages.len();
        let messages: Vec<serde_json::Value> = messages.iter().map(|m| m.to_public_json()).collect();

        Some(IpcMessage::new("collect_response").with_payload(HashMap::from([
            ("messages".to_string(), json!(messages)),
            ("count".to_string(), json!(count)),
        ])))
    }
}

struct ShutdownHandler(Arc<Shared>);

#[async_trait]
impl MessageHandler for ShutdownHandler {
    async fn handle(&self, _message: IpcMessage) -> Option<IpcMessage> {
        self.0.shutdown.cancel();
        Some(IpcMessage::new("ack"))
    }
}

pub struct Supervisor {
    shared: Arc<Shared>,
    agent_handles: Vec<AgentHandle>,
    socket_dir: PathBuf,
    socket_name: String,
}

impl Supervisor {
    pub fn new(config: SupervisorConfig) -> (Self, Vec<AgentSpec>, Arc<dyn LlmPipeline>) {
        let agent_records: Vec<(String, Arc<Mutex<ob_core::AgentProcessRecord>>)> = config
            .agents
            .iter()
            .map(|spec| {
                let record = ob_core::AgentProcessRecord::new(spec.identity.clone(), spec.plugins.clone())
                    .with_max_restarts(spec.max_restarts);
                (spec.identity.clone(), Arc::new(Mutex::new(record)))
            })
            .collect();

        let shared = Arc::new(Shared {
            state: Mutex::new(SupervisorState::Init),
            running: Arc::new(AtomicBool::new(false)),
            router: Mutex::new(Router::new().with_audit(config.audit.clone())),
            audit: config.audit.clone(),
            agent_records,
            rejected_count: Mutex::new(None),
            shutdown: CancellationToken::new(),
        });

        let supervisor = Self {
            shared,
            agent_handles: Vec::new(),
            socket_dir: config.socket_dir,
            socket_name: config.socket_name,
        };
        (supervisor, config.agents, config.llm)
    }

    pub fn state(&self) -> SupervisorState {
        *self.shared.state.lock()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shared.shutdown.clone()
    }

    /// Startup per `spec.md` §4.4: generate the token, install IPC handlers,
    /// bind the server, spawn each configured agent, transition to Running.
    pub async fn start(&mut self, agents: Vec<AgentSpec>, llm: Arc<dyn LlmPipeline>) -> Result<(), DaemonError> {
        *self.shared.state.lock() = SupervisorState::Starting;

        std::fs::create_dir_all(&self.socket_dir)?;
        let token = AuthToken::generate();
        let token_path = token_path(&self.socket_dir, &self.socket_name);
        std::fs::write(&token_path, token.as_str())?;
        set_owner_only(&token_path)?;

        let audit = Arc::new(self.shared.audit.clone());
        let mut registry = HandlerRegistry::new();
        registry.register("status_request", Arc::new(StatusHandler(self.shared.clone())));
        registry.register("permission_request", Arc::new(PermissionHandler(self.shared.clone())));
        registry.register("health_inquiry", Arc::new(HealthInquiryHandler::new(llm.clone(), audit.clone())));
        registry.register("research_request", Arc::new(ResearchHandler::new(llm.clone(), audit.clone())));
        registry.register(
            "email_consultation",
            Arc::new(EmailConsultationHandler::new(llm.clone(), audit.clone())),
        );
        registry.register("route_message", Arc::new(RouteHandler(self.shared.clone())));
        registry.register("collect_messages", Arc::new(CollectHandler(self.shared.clone())));
        registry.register("shutdown", Arc::new(ShutdownHandler(self.shared.clone())));

        let socket_path = socket_path(&self.socket_dir, &self.socket_name);
        let server = Server::bind(&socket_path, Some(token))?;
        *self.shared.rejected_count.lock() = Some(server.rejected_count_handle());

        let shutdown = self.shared.shutdown.clone();
        let handler: Arc<dyn MessageHandler> = Arc::new(registry);
        // `Server::run` consumes the listener and unlinks the socket file on
        // its own `Drop` once the accept loop exits on `shutdown`.
        tokio::spawn(server.run(handler, shutdown));

        for (spec, (identity, record)) in
            agents.into_iter().zip(self.shared.agent_records.clone().into_iter())
        {
            debug_assert_eq!(spec.identity, identity);
            self.spawn_agent(spec, record);
        }

        self.shared.running.store(true, Ordering::SeqCst);
        *self.shared.state.lock() = SupervisorState::Running;
        info!("supervisor running");
        Ok(())
    }

    fn spawn_agent(&mut self, spec: AgentSpec, record: Arc<Mutex<ob_core::AgentProcessRecord>>) {
        let identity = spec.identity.clone();
        let mut capabilities = AgentCapabilities::new(identity.clone());
        capabilities.accepted_types = spec.accepted_types.clone();
        capabilities.max_queue_size = spec.max_queue_size;
        self.shared.router.lock().register(capabilities);

        let stop_signal = Arc::new(Notify::new());
        let socket_dir = self.socket_dir.to_string_lossy().to_string();
        let running = self.shared.running.clone();
        let task_stop_signal = stop_signal.clone();

        let task = tokio::spawn(async move {
            supervise_agent(spec, socket_dir, record, task_stop_signal, running).await;
        });

        self.agent_handles.push(AgentHandle { identity, stop_signal, task });
    }

    /// Shutdown per `spec.md` §4.4: stop agents in reverse insertion order,
    /// stop the IPC server, cancel monitor tasks, final audit entry.
    pub async fn stop(&mut self) {
        *self.shared.state.lock() = SupervisorState::Stopping;
        self.shared.running.store(false, Ordering::SeqCst);

        while let Some(handle) = self.agent_handles.pop() {
            handle.stop_signal.notify_one();
            if let Err(e) = handle.task.await {
                warn!(identity = %handle.identity, "agent supervision task panicked: {e}");
            }
        }

        self.shared.shutdown.cancel();
        let token_path = token_path(&self.socket_dir, &self.socket_name);
        let _ = std::fs::remove_file(token_path);

        self.shared.audit("supervisor", "shutdown", true);
        *self.shared.state.lock() = SupervisorState::Stopped;
        info!("supervisor stopped");
    }

    /// Block until the shutdown event fires (host signal, `shutdown` IPC
    /// message, or explicit cancellation), then run the shutdown sequence.
    ///
    /// Installs both `SIGINT` and `SIGTERM` handlers, since a supervised
    /// daemon process is as likely to be stopped by an orchestrator's
    /// `SIGTERM` as by an interactive Ctrl-C.
    pub async fn run(&mut self) {
        let shutdown = self.shared.shutdown.clone();
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!("failed to install SIGTERM handler: {e}");
                    shutdown.cancelled().await;
                    self.stop().await;
                    return;
                }
            };
            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(s) => s,
                Err(e) => {
                    warn!("failed to install SIGINT handler: {e}");
                    shutdown.cancelled().await;
                    self.stop().await;
                    return;
                }
            };
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = sigterm.recv() => { info!("received SIGTERM, shutting down"); }
                _ = sigint.recv() => { info!("received SIGINT, shutting down"); }
            }
        }
        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = shutdown.cancelled() => {}
                _ = tokio::signal::ctrl_c() => { info!("received interrupt, shutting down"); }
            }
        }
        self.stop().await;
    }
}

async fn supervise_agent(
    spec: AgentSpec,
    socket_dir: String,
    record: Arc<Mutex<ob_core::AgentProcessRecord>>,
    stop_signal: Arc<Notify>,
    running: Arc<AtomicBool>,
) {
    let mut process = AgentProcess::new(spec);

    loop {
        if let Err(e) = process.start(&socket_dir) {
            error!(identity = %process.spec().identity, "failed to start agent: {e}");
            *record.lock() = process.record().clone();
            return;
        }
        *record.lock() = process.record().clone();

        tokio::select! {
            _ = stop_signal.notified() => {
                process.stop().await;
                *record.lock() = process.record().clone();
                return;
            }
            result = process.monitor() => {
                *record.lock() = process.record().clone();
                let orderly = matches!(result, Ok(ob_core::AgentState::Stopped));
                if orderly || !running.load(Ordering::SeqCst) || !process.note_crash_and_can_restart() {
                    return;
                }
                let backoff = process.backoff();
                tokio::select! {
                    _ = tokio::time::sleep(backoff) => {}
                    _ = stop_signal.notified() => { return; }
                }
            }
        }
    }
}

fn socket_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("overblick-{name}.sock"))
}

fn token_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("overblick-{name}.token"))
}

#[cfg(unix)]
fn set_owner_only(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn set_owner_only(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
