// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host Health Snapshot: a handful of independent, fallible OS collectors
//! plus the severity-point grading formula of `spec.md` §6. Only
//! allow-listed executables are ever invoked, with no shell interpretation
//! and a 5 s timeout per command.

use std::time::Duration;

use serde::Serialize;
use tokio::process::Command;
use tokio::time::timeout;

const COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthGrade {
    Good,
    Fair,
    Poor,
}

impl HealthGrade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HostHealthSnapshot {
    pub memory_used_pct: f64,
    pub load_1m: f64,
    pub logical_cpus: usize,
    pub disk_used_pct: f64,
    pub uptime: String,
    pub battery: Option<String>,
    pub errors: Vec<String>,
}

impl HostHealthSnapshot {
    /// Severity-point grading from `spec.md` §6: memory >90% = 2pt, >75% =
    /// 1pt; 1-minute load > 2x cores = 2pt, >1x = 1pt; disk >95% = 2pt, >85%
    /// = 1pt; >=3 pts poor, >=1 fair, else good.
    pub fn grade(&self) -> HealthGrade {
        let mut points = 0u32;

        if self.memory_used_pct > 90.0 {
            points += 2;
        } else if self.memory_used_pct > 75.0 {
            points += 1;
        }

        let cores = self.logical_cpus.max(1) as f64;
        if self.load_1m > 2.0 * cores {
            points += 2;
        } else if self.load_1m > cores {
            points += 1;
        }

        if self.disk_used_pct > 95.0 {
            points += 2;
        } else if self.disk_used_pct > 85.0 {
            points += 1;
        }

        if points >= 3 {
            HealthGrade::Poor
        } else if points >= 1 {
            HealthGrade::Fair
        } else {
            HealthGrade::Good
        }
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("memory {:.0}% used", self.memory_used_pct),
            format!("load {:.2} ({} cores)", self.load_1m, self.logical_cpus),
            format!("disk {:.0}% used", self.disk_used_pct),
            format!("up {}", self.uptime),
        ];
        if let Some(battery) = &self.battery {
            parts.push(format!("battery {battery}"));
        }
        if !self.errors.is_empty() {
            parts.push(format!("collector errors: {}", self.errors.join("; ")));
        }
        parts.join(", ")
    }
}

/// Poll every allow-listed collector independently; one collector's failure
/// only contributes an entry to `errors`, never aborts the snapshot.
pub async fn collect_host_health() -> HostHealthSnapshot {
    let mut snapshot = HostHealthSnapshot::default();

    match collect_memory().await {
        Ok(pct) => snapshot.memory_used_pct = pct,
        Err(e) => snapshot.errors.push(format!("memory: {e}")),
    }

    match collect_load().await {
        Ok((load, cores)) => {
            snapshot.load_1m = load;
            snapshot.logical_cpus = cores;
        }
        Err(e) => snapshot.errors.push(format!("load: {e}")),
    }

    match collect_disk().await {
        Ok(pct) => snapshot.disk_used_pct = pct,
        Err(e) => snapshot.errors.push(format!("disk: {e}")),
    }

    match collect_uptime().await {
        Ok(text) => snapshot.uptime = text,
        Err(e) => snapshot.errors.push(format!("uptime: {e}")),
    }

    if cfg!(target_os = "macos") {
        match collect_battery().await {
            Ok(text) => snapshot.battery = Some(text),
            Err(e) => snapshot.errors.push(format!("battery: {e}")),
        }
    }

    snapshot
}

async fn run_allowlisted(program: &str, args: &[&str]) -> Result<String, String> {
    let fut = Command::new(program).args(args).output();
    let output = timeout(COMMAND_TIMEOUT, fut)
        .await
        .map_err(|_| format!("{program} timed out"))?
        .map_err(|e| format!("{program} failed: {e}"))?;
    if !output.status.success() {
        return Err(format!("{program} exited with {}", output.status));
    }
    String::from_utf8(output.stdout).map_err(|_| format!("{program} produced non-utf8 output"))
}

async fn collect_memory() -> Result<f64, String> {
    if cfg!(target_os = "macos") {
        let vm_stat = run_allowlisted("vm_stat", &[]).await?;
        parse_vm_stat(&vm_stat)
    } else {
        let meminfo = run_allowlisted("cat", &["/proc/meminfo"]).await?;
        parse_meminfo(&meminfo)
    }
}

fn parse_meminfo(text: &str) -> Result<f64, String> {
    let mut total = None;
    let mut available = None;
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("MemTotal:") {
            total = parse_kb_value(rest);
        } else if let Some(rest) = line.strip_prefix("MemAvailable:") {
            available = parse_kb_value(rest);
        }
    }
    match (total, available) {
        (Some(total), Some(available)) if total > 0.0 => {
            Ok(((total - available) / total * 100.0).clamp(0.0, 100.0))
        }
        _ => Err("could not parse MemTotal/MemAvailable".to_string()),
    }
}

fn parse_kb_value(rest: &str) -> Option<f64> {
    rest.split_whitespace().next()?.parse::<f64>().ok()
}

fn parse_vm_stat(text: &str) -> Result<f64, String> {
    let mut free = 0u64;
    let mut total = 0u64;
    for line in text.lines() {
        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim().trim_end_matches('.');
            let Ok(pages) = value.parse::<u64>() else { continue };
            total += pages;
            if key.trim() == "Pages free" {
                free = pages;
            }
        }
    }
    if total == 0 {
        return Err("could not parse vm_stat output".to_string());
    }
    Ok(((total - free) as f64 / total as f64 * 100.0).clamp(0.0, 100.0))
}

async fn collect_load() -> Result<(f64, usize), String> {
    let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let loadavg = run_allowlisted("cat", &["/proc/loadavg"]).await;
    let load = match loadavg {
        Ok(text) => text
            .split_whitespace()
            .next()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| "could not parse /proc/loadavg".to_string())?,
        Err(e) if cfg!(target_os = "macos") => {
            let sysctl = run_allowlisted("sysctl", &["-n", "vm.loadavg"]).await.map_err(|_| e)?;
            sysctl
                .trim_matches(|c: char| c == '{' || c == '}' || c.is_whitespace())
                .split_whitespace()
                .next()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or_else(|| "could not parse vm.loadavg".to_string())?
        }
        Err(e) => return Err(e),
    };
    Ok((load, cores))
}

async fn collect_disk() -> Result<f64, String> {
    let text = run_allowlisted("df", &["-k", "/"]).await?;
    let data_line = text.lines().nth(1).ok_or_else(|| "df produced no data line".to_string())?;
    let fields: Vec<&str> = data_line.split_whitespace().collect();
    // `df -k /` columns: Filesystem 1K-blocks Used Available Use% Mounted
    let pct_field = fields.get(4).ok_or_else(|| "df output missing Use% column".to_string())?;
    pct_field
        .trim_end_matches('%')
        .parse::<f64>()
        .map_err(|_| "could not parse df Use%".to_string())
}

async fn collect_uptime() -> Result<String, String> {
    let raw = run_allowlisted("uptime", &[]).await?;
    Ok(strip_user_count(raw.trim()))
}

fn strip_user_count(raw: &str) -> String {
    if let Some(idx) = raw.find(", ") {
        if let Some(users_idx) = raw[idx..].find(" user") {
            return raw[..idx + users_idx].trim().to_string();
        }
    }
    raw.to_string()
}

async fn collect_battery() -> Result<String, String> {
    let text = run_allowlisted("pmset", &["-g", "batt"]).await?;
    text.lines()
        .nth(1)
        .map(|line| line.trim().to_string())
        .ok_or_else(|| "pmset produced no battery line".to_string())
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
