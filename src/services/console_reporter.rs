//! Human-readable webhook report printed to stdout.
//!
//! Formatting is kept separate from printing so the layout can be tested;
//! printing is best effort and never affects request handling.

use chrono::Local;
use console::Style;
use serde_json::Value;
use std::io::{self, Write};

use crate::config::Config;
use crate::models::{BatchPayload, WebhookEvent};
use crate::services::webhook_stats::StatsSummary;

/// Styles of the report. Bright variants match the classic terminal palette.
mod palette {
    use console::Style;

    pub fn header() -> Style {
        Style::new().magenta().bright()
    }

    pub fn blue() -> Style {
        Style::new().blue().bright()
    }

    pub fn cyan() -> Style {
        Style::new().cyan().bright()
    }

    pub fn green() -> Style {
        Style::new().green().bright()
    }

    pub fn warning() -> Style {
        Style::new().yellow().bright()
    }

    pub fn fail() -> Style {
        Style::new().red().bright()
    }

    pub fn bold() -> Style {
        Style::new().bold()
    }
}

const RULE_WIDTH: usize = 80;
const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    enabled: bool,
    color: bool,
}

impl ConsoleReporter {
    pub fn new(enabled: bool, color: bool) -> Self {
        Self { enabled, color }
    }

    /// Colours follow the configuration and the terminal `console` detects.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.console_enabled,
            config.color && console::colors_enabled(),
        )
    }

    /// Print a formatted block. Write errors (closed stdout) are ignored.
    pub fn emit(&self, text: &str) {
        if !self.enabled {
            return;
        }
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }

    fn paint(&self, style: Style, text: &str) -> String {
        style.force_styling(self.color).apply_to(text).to_string()
    }

    fn rule(&self, style: Style) -> String {
        self.paint(style, &"=".repeat(RULE_WIDTH))
    }

    /// Full report for a single (non-batch) webhook.
    pub fn format_single_event(&self, sequence: u64, event: &WebhookEvent) -> String {
        let rule = self.rule(palette::green().bold());
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        let mut lines = vec![
            String::new(),
            rule.clone(),
            self.paint(palette::header().bold(), &format!("🔔 WEBHOOK #{}", sequence)),
            rule.clone(),
            format!("{} {}", self.paint(palette::cyan(), "Timestamp:"), timestamp),
            String::new(),
            self.paint(palette::bold(), "📋 Event Summary:"),
        ];
        lines.extend(self.summary_lines(event));

        if let Some(data) = event.payload_data() {
            lines.push(String::new());
            lines.push(self.paint(palette::bold(), "📦 Data Payload:"));
            lines.push(indent_json(data, 3));
        }

        if let Some(context) = event.context_data() {
            lines.push(String::new());
            lines.push(self.paint(palette::bold(), "🔍 Context:"));
            lines.push(indent_json(context, 3));
        }

        if let Some(summary) = event.change_summary_label() {
            lines.push(String::new());
            lines.push(format!("{} {}", self.paint(palette::bold(), "📝 Summary:"), summary));
        }

        lines.push(String::new());
        lines.push(rule);
        lines.push(String::new());
        lines.join("\n")
    }

    /// Report for a batch delivery, one numbered summary per event.
    pub fn format_batch(&self, sequence: u64, batch: &BatchPayload) -> String {
        let rule = self.rule(palette::green().bold());
        let total = batch.events.len();

        let mut lines = vec![
            String::new(),
            rule.clone(),
            self.paint(palette::header().bold(), &format!("🔔 BATCH WEBHOOK #{}", sequence)),
            rule.clone(),
            format!("{} {}", self.paint(palette::cyan(), "Batch ID:"), batch.batch_id_label()),
            format!("{} {}", self.paint(palette::cyan(), "Event Count:"), total),
            format!("{} {}", self.paint(palette::cyan(), "Timestamp:"), batch.timestamp_label()),
        ];

        for (index, event) in batch.events.iter().enumerate() {
            lines.push(String::new());
            lines.push(self.paint(palette::bold(), &format!("📋 Event {}/{}:", index + 1, total)));
            lines.push(self.format_event_summary(event));
        }

        lines.push(String::new());
        lines.push(rule);
        lines.push(String::new());
        lines.join("\n")
    }

    /// Compact summary used for events inside a batch.
    pub fn format_event_summary(&self, event: &WebhookEvent) -> String {
        let mut lines = self.summary_lines(event);

        if let Some(order) = event.order_snapshot() {
            lines.push(format!(
                "   {} {} products, {} history, {} payments, {} messages",
                self.paint(palette::cyan(), "Order Details:"),
                order.details,
                order.history,
                order.payments,
                order.messages
            ));
            if let Some(product) = order.sample {
                lines.push(format!(
                    "   {} {} (Qty: {}, Price: {})",
                    self.paint(palette::cyan(), "Sample Product:"),
                    product.name,
                    product.quantity,
                    product.price
                ));
            }
        }

        if let Some(summary) = event.change_summary_label() {
            lines.push(format!("   {} {}", self.paint(palette::bold(), "Summary:"), summary));
        }

        lines.join("\n")
    }

    fn summary_lines(&self, event: &WebhookEvent) -> Vec<String> {
        vec![
            format!(
                "   Event ID:     {}",
                self.paint(palette::warning(), &event.event_id_label())
            ),
            format!(
                "   Entity Type:  {}",
                self.paint(palette::blue(), &event.entity_type_label())
            ),
            format!("   Entity ID:    {}", event.entity_id_label()),
            format!("   Entity Name:  {}", event.entity_name_label()),
            format!(
                "   Action:       {}",
                self.paint(palette::green(), &event.action_type_label())
            ),
            format!("   Hook:         {}", event.hook_name_label()),
        ]
    }

    pub fn format_rejection(&self, expected: &str, received: &str) -> String {
        [
            String::new(),
            self.paint(palette::fail(), "❌ WEBHOOK REJECTED - Invalid Secret"),
            format!("   Expected: {}", expected),
            format!("   Received: {}", received),
            String::new(),
        ]
        .join("\n")
    }

    pub fn format_invalid_json(&self, error: &str, body: &[u8]) -> String {
        [
            String::new(),
            self.paint(palette::fail(), "❌ INVALID JSON"),
            format!("   Error: {}", error),
            format!("   Body: {}", body_preview(body)),
            String::new(),
        ]
        .join("\n")
    }

    /// Startup banner with reachable URLs and configuration.
    pub fn format_banner(&self, config: &Config, local_ip: &str) -> String {
        let rule = self.rule(palette::header().bold());
        let port = config.port;
        let ok = self.paint(palette::green(), "✓");

        let mut lines = vec![String::new(), rule.clone()];
        lines.push(self.paint(palette::header().bold(), "   Sales Sync - Debug Webhook Server"));
        lines.push(rule.clone());
        lines.push(String::new());

        if let Some(path) = &config.log_file {
            lines.push(format!(
                "{} Logging to file: {}",
                ok,
                self.paint(palette::bold(), &path.display().to_string())
            ));
        }
        lines.push(format!(
            "{} Server running on port {}",
            ok,
            self.paint(palette::bold(), &port.to_string())
        ));

        lines.push(String::new());
        lines.push(self.paint(palette::bold(), "Access from:"));
        lines.push(format!("  • Localhost: http://localhost:{}", port));
        lines.push(format!("  • Local network: http://{}:{}", local_ip, port));

        lines.push(String::new());
        lines.push(self.paint(palette::bold(), "Endpoints:"));
        lines.push(format!("  • Webhook: {}", config.webhook_url()));
        lines.push(format!("  • Health check: http://localhost:{}/health", port));
        lines.push(format!("  • Statistics: http://localhost:{}/stats", port));
        lines.push(format!("  • Info page: http://localhost:{}/", port));

        lines.push(String::new());
        match config.secret() {
            Some(secret) => {
                lines.push(format!(
                    "{}  Secret validation: {}",
                    self.paint(palette::warning(), "⚠"),
                    self.paint(palette::bold(), "ENABLED")
                ));
                lines.push(format!("   Secret: {}", self.paint(palette::bold(), secret)));
            }
            None => lines.push(format!(
                "{}  Secret validation: {}",
                self.paint(palette::cyan(), "ℹ"),
                self.paint(palette::bold(), "DISABLED")
            )),
        }

        lines.push(String::new());
        lines.push(self.paint(palette::bold(), "Configure the shop module with:"));
        lines.push(format!("   Webhook URL: {}", config.webhook_url()));
        if let Some(secret) = config.secret() {
            lines.push(format!("   Webhook Secret: {}", secret));
        }

        lines.push(String::new());
        lines.push(self.paint(palette::bold(), "Press Ctrl+C to stop"));
        lines.push(String::new());
        lines.push(rule);
        lines.join("\n")
    }

    pub fn format_shutdown(&self, summary: &StatsSummary) -> String {
        [
            String::new(),
            self.paint(palette::warning(), "Shutting down server..."),
            self.paint(palette::green(), "✓ Server stopped"),
            self.paint(
                palette::green(),
                &format!("✓ Total webhooks received: {}", summary.total_requests),
            ),
            self.paint(palette::green(), &format!("✓ Successful: {}", summary.successful)),
            self.paint(palette::fail(), &format!("✗ Failed: {}", summary.failed)),
            String::new(),
        ]
        .join("\n")
    }
}

/// Pretty-print JSON with two-space nesting, every line shifted right.
pub fn indent_json(value: &Value, spaces: usize) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    let indent = " ".repeat(spaces);
    pretty
        .lines()
        .map(|line| format!("{}{}", indent, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// First characters of a raw body, decoded lossily.
pub fn body_preview(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(BODY_PREVIEW_CHARS)
        .collect()
}
