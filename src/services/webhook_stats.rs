//! Running counters for received webhooks.
//!
//! The counters live for the lifetime of the process and are never persisted.
//! Callers serialise access (see [`crate::app_state::ReceiverState`]); after
//! every completed update `total_requests == successful + failed`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct WebhookStats {
    total_requests: u64,
    successful: u64,
    failed: u64,
    by_entity_type: BTreeMap<String, u64>,
    by_action_type: BTreeMap<String, u64>,
    start_time: DateTime<Utc>,
}

/// Point-in-time copy of the counters, as served by `/stats` and `/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub uptime_seconds: f64,
    pub total_requests: u64,
    pub successful: u64,
    pub failed: u64,
    pub by_entity_type: BTreeMap<String, u64>,
    pub by_action_type: BTreeMap<String, u64>,
}

impl Default for WebhookStats {
    fn default() -> Self {
        Self::new()
    }
}

impl WebhookStats {
    pub fn new() -> Self {
        Self {
            total_requests: 0,
            successful: 0,
            failed: 0,
            by_entity_type: BTreeMap::new(),
            by_action_type: BTreeMap::new(),
            start_time: Utc::now(),
        }
    }

    pub fn record_success(&mut self, entity_type: &str, action_type: &str) {
        self.total_requests += 1;
        self.successful += 1;
        *self
            .by_entity_type
            .entry(entity_type.to_string())
            .or_insert(0) += 1;
        *self
            .by_action_type
            .entry(action_type.to_string())
            .or_insert(0) += 1;
    }

    /// The reason is only traced; the summary does not break failures down.
    pub fn record_failure(&mut self, reason: &str) {
        self.total_requests += 1;
        self.failed += 1;
        debug!(reason, failed = self.failed, "Webhook failure recorded");
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub fn summary(&self) -> StatsSummary {
        let uptime = Utc::now() - self.start_time;
        StatsSummary {
            uptime_seconds: uptime.num_milliseconds().max(0) as f64 / 1000.0,
            total_requests: self.total_requests,
            successful: self.successful,
            failed: self.failed,
            by_entity_type: self.by_entity_type.clone(),
            by_action_type: self.by_action_type.clone(),
        }
    }
}

impl StatsSummary {
    pub fn uptime_minutes(&self) -> u64 {
        (self.uptime_seconds / 60.0) as u64
    }
}
