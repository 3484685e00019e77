//! Application state shared across all handlers.
//!
//! Created once at startup and cloned into every handler. The mutable part,
//! counters plus the optional file log, sits behind one mutex so that a
//! request's stats update, console report and log record are never
//! interleaved with another request's.

use serde_json::Value;
use std::io;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::services::{
    ConsoleReporter, FileLogger, LogLevel, StatsSummary, WebhookProcessor, WebhookStats,
};

/// State mutated while a webhook is being processed.
#[derive(Debug)]
pub struct ReceiverState {
    pub stats: WebhookStats,
    pub file_logger: Option<FileLogger>,
}

pub type SharedReceiver = Arc<Mutex<ReceiverState>>;

impl ReceiverState {
    pub fn new(file_logger: Option<FileLogger>) -> Self {
        Self {
            stats: WebhookStats::new(),
            file_logger,
        }
    }

    /// Append to the file log if one is configured. Failures are reported
    /// but never change the outcome of the request.
    ///
    /// The write is a blocking `std::fs` call made on the runtime thread
    /// while the receiver lock is held, so records keep request order.
    pub fn log_to_file(&mut self, level: LogLevel, message: &str, data: &Value) {
        if let Some(logger) = self.file_logger.as_mut() {
            if let Err(e) = logger.log(level, message, data) {
                warn!(
                    path = %logger.path().display(),
                    error = %e,
                    "Failed to write webhook log record"
                );
            }
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    /// Startup configuration
    pub config: Arc<Config>,
    /// Counters and file log, guarded together
    pub receiver: SharedReceiver,
    /// Webhook validation and dispatch
    pub processor: WebhookProcessor,
}

impl AppState {
    pub fn new(config: Config, file_logger: Option<FileLogger>) -> Self {
        let receiver = Arc::new(Mutex::new(ReceiverState::new(file_logger)));
        let processor = WebhookProcessor::new(
            config.secret().map(str::to_string),
            receiver.clone(),
            ConsoleReporter::from_config(&config),
        );

        Self {
            config: Arc::new(config),
            receiver,
            processor,
        }
    }

    /// Build state from configuration, opening the file log when a path is set.
    pub fn from_config(config: Config) -> io::Result<Self> {
        let file_logger = match &config.log_file {
            Some(path) => {
                let logger = FileLogger::open(path, config.log_max_bytes, config.log_backups)?;
                info!(
                    path = %path.display(),
                    max_bytes = config.log_max_bytes,
                    backups = config.log_backups,
                    "Webhook file logging enabled"
                );
                Some(logger)
            }
            None => None,
        };
        Ok(Self::new(config, file_logger))
    }

    pub async fn stats_summary(&self) -> StatsSummary {
        self.receiver.lock().await.stats.summary()
    }
}
