use axum::body::Bytes;
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::app_state::SharedReceiver;
use crate::error::{ApiError, Result};
use crate::models::{BatchAck, EventResult, SingleAck, WebhookAck, WebhookPayload};
use crate::services::console_reporter::{body_preview, ConsoleReporter};
use crate::services::file_logger::LogLevel;

/// Raw webhook delivery as taken off the wire.
#[derive(Debug, Clone, Default)]
pub struct WebhookRequest {
    pub body: Bytes,
    pub secret_header: Option<String>,
    pub content_type: Option<String>,
}

/// Validates, classifies and reports incoming webhooks.
#[derive(Clone)]
pub struct WebhookProcessor {
    secret: Option<String>,
    receiver: SharedReceiver,
    console: ConsoleReporter,
}

impl WebhookProcessor {
    pub fn new(secret: Option<String>, receiver: SharedReceiver, console: ConsoleReporter) -> Self {
        Self {
            secret,
            receiver,
            console,
        }
    }

    /// Process one delivery. The receiver lock is held throughout so the
    /// counters, console output and log record of this request stay together.
    /// Console and file writes are synchronous and happen under that lock.
    pub async fn process(&self, request: WebhookRequest) -> Result<WebhookAck> {
        let mut state = self.receiver.lock().await;

        debug!(
            content_type = request.content_type.as_deref().unwrap_or(""),
            bytes = request.body.len(),
            "Processing webhook"
        );

        if let Some(expected) = self.secret.as_deref() {
            let received = request.secret_header.as_deref().unwrap_or("");
            if received != expected {
                let err = ApiError::InvalidSecret;
                state.log_to_file(
                    LogLevel::Error,
                    "Invalid webhook secret",
                    &json!({ "expected": expected, "received": received }),
                );
                self.console
                    .emit(&self.console.format_rejection(expected, received));
                state.stats.record_failure(err.failure_reason());
                return Err(err);
            }
        }

        let payload: Value = match serde_json::from_slice(&request.body) {
            Ok(payload) => payload,
            Err(e) => {
                let err = ApiError::InvalidPayload(e.to_string());
                state.log_to_file(
                    LogLevel::Error,
                    "Invalid JSON",
                    &json!({ "error": e.to_string(), "body": body_preview(&request.body) }),
                );
                self.console
                    .emit(&self.console.format_invalid_json(&e.to_string(), &request.body));
                state.stats.record_failure(err.failure_reason());
                return Err(err);
            }
        };

        let sequence = state.stats.total_requests() + 1;
        let received_at = Utc::now().to_rfc3339();

        let ack = match WebhookPayload::classify(&payload) {
            WebhookPayload::Batch(batch) => {
                for event in &batch.events {
                    state
                        .stats
                        .record_success(&event.entity_type_label(), &event.action_type_label());
                }
                self.console.emit(&self.console.format_batch(sequence, &batch));
                state.log_to_file(LogLevel::Info, "Batch webhook received", &payload);

                let count = batch.events.len();
                if count == 0 {
                    warn!(batch_id = %batch.batch_id_label(), "Batch webhook contained no events");
                }
                info!(
                    batch_id = %batch.batch_id_label(),
                    events = count,
                    "Batch webhook received"
                );

                WebhookAck::Batch(BatchAck {
                    status: "success".to_string(),
                    message: format!("Batch received with {} events", count),
                    batch_id: batch.batch_id.clone().unwrap_or(Value::Null),
                    events_processed: count,
                    received_at,
                    results: batch
                        .events
                        .iter()
                        .map(|_| EventResult { success: true })
                        .collect(),
                })
            }
            WebhookPayload::Single(event) => {
                self.console
                    .emit(&self.console.format_single_event(sequence, &event));
                state.log_to_file(LogLevel::Info, "Webhook received", &payload);

                let entity_type = event.entity_type_label();
                let action_type = event.action_type_label();
                state.stats.record_success(&entity_type, &action_type);
                info!(
                    event_id = %event.event_id_label(),
                    entity_type = %entity_type,
                    action_type = %action_type,
                    "Webhook received"
                );

                WebhookAck::Single(SingleAck {
                    status: "success".to_string(),
                    message: "Webhook received".to_string(),
                    event_id: event.event_id.clone().unwrap_or(Value::Null),
                    received_at,
                })
            }
        };

        Ok(ack)
    }
}
