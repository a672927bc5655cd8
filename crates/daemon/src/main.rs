// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `overblickd`: the Supervisor binary. Loads the agent roster, wires the
//! IPC transport, the router, the three privileged handlers, and the
//! managed agent fleet, then blocks until a shutdown signal arrives.
//!
//! Exit codes per `spec.md` §6: 0 on orderly shutdown, non-zero only on an
//! unrecoverable startup error (bad roster, socket bind failure).

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use ob_config::Roster;
use ob_core::LlmPipeline;
use ob_daemon::{AgentSpec, Supervisor, SupervisorConfig};
use ob_handlers::HttpLlmPipeline;
use ob_storage::AgenticStore;

#[derive(Parser, Debug)]
#[command(name = "overblickd", about = "Överblick multi-agent supervisor")]
struct Args {
    /// Path to the agent roster TOML file.
    #[arg(long, default_value = "overblick.toml")]
    roster: PathBuf,

    /// Directory holding the IPC socket and token file.
    #[arg(long)]
    socket_dir: Option<PathBuf>,

    /// Name segment of the socket/token file (`overblick-<name>.sock`).
    #[arg(long, default_value = "supervisor")]
    socket_name: String,

    /// Path to the supervisor's own agentic/audit SQLite database.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Base URL of the chat-completions-compatible LLM gateway.
    #[arg(long, default_value = "http://127.0.0.1:11434")]
    llm_base_url: String,

    /// Model name passed to the LLM gateway.
    #[arg(long, default_value = "llama3")]
    llm_model: String,
}

fn default_socket_dir() -> PathBuf {
    std::env::temp_dir().join("overblick")
}

fn install_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_env("OVERBLICK_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn to_agent_spec(entry: ob_config::AgentEntry) -> AgentSpec {
    AgentSpec {
        identity: entry.identity,
        plugins: entry.plugins,
        command: entry.command,
        args: entry.args,
        max_restarts: entry.max_restarts,
        accepted_types: entry.accepted_types,
        max_queue_size: entry.max_queue_size,
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    install_tracing();
    let args = Args::parse();

    let roster = match Roster::load(&args.roster) {
        Ok(roster) => roster,
        Err(e) => {
            tracing::error!("failed to load roster {}: {e}", args.roster.display());
            return std::process::ExitCode::FAILURE;
        }
    };

    let socket_dir = args.socket_dir.unwrap_or_else(default_socket_dir);
    let data_dir = args.data_dir.unwrap_or_else(|| socket_dir.clone());
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!("failed to create data directory {}: {e}", data_dir.display());
        return std::process::ExitCode::FAILURE;
    }

    let audit = match AgenticStore::open(data_dir.join("supervisor.db")) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("failed to open supervisor store: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    let llm: Arc<dyn LlmPipeline> = Arc::new(HttpLlmPipeline::new(args.llm_base_url, args.llm_model));
    let agents: Vec<AgentSpec> = roster.agents.into_iter().map(to_agent_spec).collect();

    let config = SupervisorConfig {
        socket_dir,
        socket_name: args.socket_name,
        agents,
        llm,
        audit,
    };
    let (mut supervisor, agents, llm) = Supervisor::new(config);

    if let Err(e) = supervisor.start(agents, llm).await {
        tracing::error!("supervisor failed to start: {e}");
        return std::process::ExitCode::FAILURE;
    }

    supervisor.run().await;
    std::process::ExitCode::SUCCESS
}
