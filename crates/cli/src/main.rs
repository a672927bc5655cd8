// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `ob`: a thin operator CLI over the Supervisor's IPC transport.
//!
//! Ambient tooling, not a scoped core feature (`spec.md` §1 lists
//! command-line front-ends as out of scope) — subcommands map onto the
//! message-type catalog of `spec.md` §6 so an operator can poke at a running
//! fleet without writing a client by hand.

mod error;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use error::CliError;
use ob_core::IpcMessage;

#[derive(Parser, Debug)]
#[command(name = "ob", about = "Överblick supervisor CLI")]
struct Args {
    /// Directory holding the supervisor's IPC socket and token file.
    #[arg(long)]
    socket_dir: Option<PathBuf>,

    /// Name segment of the socket/token file (`overblick-<name>.sock`).
    #[arg(long, default_value = "supervisor")]
    socket_name: String,

    /// Round-trip timeout in seconds.
    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the supervisor for its current fleet/routing status.
    Status,
    /// Route one inter-agent message through the supervisor.
    Route {
        target: String,
        message_type: String,
        /// JSON object payload, e.g. '{"x":1}'. Defaults to `{}`.
        #[arg(default_value = "{}")]
        payload: String,
        /// Override the message's time-to-live, in seconds.
        #[arg(long)]
        ttl_seconds: Option<f64>,
    },
    /// Collect this client's pending messages from the supervisor.
    Collect,
    /// Ask the supervisor to shut down.
    Shutdown,
}

fn default_socket_dir() -> PathBuf {
    std::env::temp_dir().join("overblick")
}

fn read_token(socket_dir: &std::path::Path, socket_name: &str) -> Result<String, CliError> {
    let path = socket_dir.join(format!("overblick-{socket_name}.token"));
    std::fs::read_to_string(&path)
        .map_err(|source| CliError::TokenFile { path: path.display().to_string(), source })
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let socket_dir = args.socket_dir.unwrap_or_else(default_socket_dir);
    let socket_path = socket_dir.join(format!("overblick-{}.sock", args.socket_name));
    let token = read_token(&socket_dir, &args.socket_name)?;
    let timeout = Duration::from_secs(args.timeout_secs);

    let request = build_request(args.command, &token)?;
    let reply = ob_wire::send(&socket_path, &request, timeout).await?;
    println!("{}", serde_json::to_string_pretty(&reply).unwrap_or_default());
    Ok(())
}

fn build_request(command: Command, token: &str) -> Result<IpcMessage, CliError> {
    let (msg_type, payload) = match command {
        Command::Status => ("status_request".to_string(), serde_json::Map::new()),
        Command::Collect => ("collect_messages".to_string(), serde_json::Map::new()),
        Command::Shutdown => ("shutdown".to_string(), serde_json::Map::new()),
        Command::Route { target, message_type, payload, ttl_seconds } => {
            let data: serde_json::Value = serde_json::from_str(&payload)?;
            let data = data.as_object().cloned().ok_or(CliError::PayloadNotObject)?;
            let mut fields = serde_json::Map::new();
            fields.insert("target".to_string(), serde_json::json!(target));
            fields.insert("message_type".to_string(), serde_json::json!(message_type));
            fields.insert("data".to_string(), serde_json::json!(data));
            if let Some(ttl) = ttl_seconds {
                fields.insert("ttl_seconds".to_string(), serde_json::json!(ttl));
            }
            ("route_message".to_string(), fields)
        }
    };

    let mut message = IpcMessage::new(msg_type).with_sender("ob-cli");
    message.auth_token = token.to_string();
    Ok(message.with_payload(payload.into_iter().collect()))
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
