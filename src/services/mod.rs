// Webhook receiver services
// Stats aggregation, console reporting, rotating file log, webhook processing

pub mod console_reporter;
pub mod file_logger;
pub mod webhook_processor;
pub mod webhook_stats;

pub use console_reporter::ConsoleReporter;
pub use file_logger::{FileLogger, LogLevel};
pub use webhook_processor::{WebhookProcessor, WebhookRequest};
pub use webhook_stats::{StatsSummary, WebhookStats};
