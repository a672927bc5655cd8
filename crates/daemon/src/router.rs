// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message Router: star-topology queue-per-target with capability filters,
//! TTL, and dead-letter handling. Owns the routing *algorithm*; the shapes
//! it operates on (`RoutedMessage`, `AgentCapabilities`, `RouteStatus`) live
//! in `ob_core::routing`.

use std::collections::{HashMap, VecDeque};
use std::time::{SystemTime, UNIX_EPOCH};

use ob_core::{AgentCapabilities, AuditEntry, RouteStatus, RoutedMessage};
use ob_storage::AgenticStore;
use serde_json::Value;

/// Delivered and dead-letter history lists are capped FIFO at this depth.
const HISTORY_CAP: usize = 1000;

/// Cleanup of expired pending messages runs every Nth successful `route` call.
const CLEANUP_EVERY: u64 = 100;

pub struct RoutingStats {
    pub total_pending: usize,
    pub total_delivered: usize,
    pub total_dead_lettered: usize,
    pub rejected_count: u64,
}

pub struct Router {
    capabilities: HashMap<String, AgentCapabilities>,
    pending: HashMap<String, VecDeque<RoutedMessage>>,
    delivered: VecDeque<RoutedMessage>,
    dead_letters: VecDeque<RoutedMessage>,
    next_id: u64,
    route_calls: u64,
    rejected_count: u64,
    audit: Option<AgenticStore>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            capabilities: HashMap::new(),
            pending: HashMap::new(),
            delivered: VecDeque::new(),
            dead_letters: VecDeque::new(),
            next_id: 1,
            route_calls: 0,
            rejected_count: 0,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: AgenticStore) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn register(&mut self, capabilities: AgentCapabilities) {
        self.pending.entry(capabilities.identity.clone()).or_default();
        self.capabilities.insert(capabilities.identity.clone(), capabilities);
    }

    /// Already-queued messages for `identity` remain queued and will expire
    /// or dead-letter on the next cleanup pass.
    pub fn unregister(&mut self, identity: &str) {
        self.capabilities.remove(identity);
    }

    pub fn route(
        &mut self,
        source: &str,
        target: &str,
        message_type: &str,
        payload: HashMap<String, Value>,
        ttl_seconds: Option<f64>,
    ) -> RoutedMessage {
        let message_id = format!("route-{:06}", self.next_id);
        self.next_id += 1;
        let now = unix_now();

        let mut message = RoutedMessage {
            message_id,
            source_agent: source.to_string(),
            target_agent: target.to_string(),
            message_type: message_type.to_string(),
            payload,
            status: RouteStatus::Pending,
            created_at: now,
            delivered_at: None,
            response: None,
            error: None,
            ttl_seconds: ttl_seconds.unwrap_or(ob_core::routing::DEFAULT_TTL_SECONDS),
        };

        let Some(capabilities) = self.capabilities.get(target) else {
            message.status = RouteStatus::DeadLetter;
            message.error = Some("Unknown target".to_string());
            self.push_dead_letter(message.clone());
            self.audit_route(&message);
            return message;
        };

        if !capabilities.accepts(message_type) {
            message.status = RouteStatus::Rejected;
            message.error = Some(format!("target does not accept message type '{message_type}'"));
            self.push_dead_letter(message.clone());
            self.audit_route(&message);
            return message;
        }

        let queue = self.pending.entry(target.to_string()).or_default();
        if queue.len() >= capabilities.max_queue_size {
            message.status = RouteStatus::Rejected;
            message.error = Some("queue full".to_string());
            self.push_dead_letter(message.clone());
            self.audit_route(&message);
            return message;
        }

        queue.push_back(message.clone());
        self.audit_route(&message);

        self.route_calls += 1;
        if self.route_calls % CLEANUP_EVERY == 0 {
            self.cleanup_expired();
        }

        message
    }

    /// Route to every registered target except `source` and `exclude`,
    /// whose capabilities accept `message_type`.
    pub fn broadcast(
        &mut self,
        source: &str,
        message_type: &str,
        payload: HashMap<String, Value>,
        exclude: &[String],
    ) -> Vec<RoutedMessage> {
        let targets: Vec<String> = self
            .capabilities
            .values()
            .filter(|c| c.identity != source && !exclude.contains(&c.identity))
            .filter(|c| c.accepts(message_type))
            .map(|c| c.identity.clone())
            .collect();

        targets
            .into_iter()
            .map(|target| self.route(source, &target, message_type, payload.clone(), None))
            .collect()
    }

    /// Deliver (or expire) every pending message addressed to `target`.
    pub fn collect(&mut self, target: &str) -> Vec<RoutedMessage> {
        let Some(queue) = self.pending.get_mut(target) else {
            return Vec::new();
        };
        let now = unix_now();
        let mut delivered = Vec::new();

        for mut message in queue.drain(..) {
            if message.is_expired(now) {
                message.status = RouteStatus::Expired;
                push_capped(&mut self.dead_letters, message, HISTORY_CAP);
            } else {
                message.status = RouteStatus::Delivered;
                message.delivered_at = Some(now);
                push_capped(&mut self.delivered, message.clone(), HISTORY_CAP);
                delivered.push(message);
            }
        }
        delivered
    }

    /// Move every expired pending message (across all targets) to dead-letters.
    pub fn cleanup_expired(&mut self) {
        let now = unix_now();
        for queue in self.pending.values_mut() {
            let mut remaining = VecDeque::new();
            for mut message in queue.drain(..) {
                if message.is_expired(now) {
                    message.status = RouteStatus::Expired;
                    self.dead_letters.push_back(message);
                } else {
                    remaining.push_back(message);
                }
            }
            *queue = remaining;
        }
        while self.dead_letters.len() > HISTORY_CAP {
            self.dead_letters.pop_front();
        }
    }

    pub fn dead_letters(&self) -> Vec<RoutedMessage> {
        self.dead_letters.iter().cloned().collect()
    }

    pub fn stats(&self) -> RoutingStats {
        RoutingStats {
            total_pending: self.pending.values().map(VecDeque::len).sum(),
            total_delivered: self.delivered.len(),
            total_dead_lettered: self.dead_letters.len(),
            rejected_count: self.rejected_count,
        }
    }

    pub fn pending_count(&self, target: &str) -> usize {
        self.pending.get(target).map_or(0, VecDeque::len)
    }

    fn push_dead_letter(&mut self, message: RoutedMessage) {
        if matches!(message.status, RouteStatus::Rejected) {
            self.rejected_count += 1;
        }
        push_capped(&mut self.dead_letters, message, HISTORY_CAP);
    }

    fn audit_route(&self, message: &RoutedMessage) {
        let Some(store) = &self.audit else { return };
        let success = matches!(message.status, RouteStatus::Pending);
        let entry = AuditEntry::new(message.source_agent.clone(), "route_message", unix_now())
            .with_category("routing")
            .with_success(success)
            .with_details(message.to_public_json());
        let entry = match &message.error {
            Some(error) => entry.with_error(error.clone()),
            None => entry,
        };
        let _ = store.write_audit(&entry);
    }
}

fn push_capped<T>(deque: &mut VecDeque<T>, value: T, cap: usize) {
    deque.push_back(value);
    while deque.len() > cap {
        deque.pop_front();
    }
}

fn unix_now() -> f64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs_f64()).unwrap_or(0.0)
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
