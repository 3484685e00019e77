use clap::{builder::FalseyValueParser, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rotate the webhook log once it grows past 10 MiB.
pub const DEFAULT_LOG_MAX_BYTES: u64 = 10 * 1024 * 1024;
/// Number of rotated webhook logs kept on disk.
pub const DEFAULT_LOG_BACKUPS: usize = 5;
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOG_FILTER: &str = "webhook_debug_receiver=info,tower_http=info";

/// Command-line interface. Every flag can also be supplied through the
/// environment (or a `.env` file loaded before parsing).
#[derive(Debug, Clone, Parser)]
#[command(
    name = "webhook-debug-receiver",
    version,
    about = "Debug webhook receiver for the sales sync module",
    after_help = "Examples:\n  webhook-debug-receiver\n  webhook-debug-receiver --port 8000\n  webhook-debug-receiver --port 5000 --secret my_secret_key\n  webhook-debug-receiver --port 5000 --log-file webhooks.log"
)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "WEBHOOK_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind (all interfaces by default)
    #[arg(long, env = "WEBHOOK_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Webhook secret for validation (optional)
    #[arg(long, env = "WEBHOOK_SECRET")]
    pub secret: Option<String>,

    /// Log file path for webhook data (optional, with rotation)
    #[arg(long, env = "WEBHOOK_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Rotate the log file once it exceeds this many bytes
    #[arg(long, env = "WEBHOOK_LOG_MAX_BYTES", default_value_t = DEFAULT_LOG_MAX_BYTES)]
    pub log_max_bytes: u64,

    /// Number of rotated log files to keep
    #[arg(long, env = "WEBHOOK_LOG_BACKUPS", default_value_t = DEFAULT_LOG_BACKUPS)]
    pub log_backups: usize,

    /// Tracing filter directive
    #[arg(long, env = "RUST_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_level: String,

    /// Emit diagnostics as JSON lines
    #[arg(long, env = "WEBHOOK_LOG_JSON", value_parser = FalseyValueParser::new())]
    pub log_json: bool,

    /// Disable ANSI colours in the console report
    #[arg(long, env = "NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Do not print the human-readable webhook report
    #[arg(long, env = "WEBHOOK_QUIET", value_parser = FalseyValueParser::new())]
    pub quiet: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub webhook_secret: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_max_bytes: u64,
    pub log_backups: usize,
    pub log_level: String,
    pub log_json: bool,
    pub color: bool,
    pub console_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            webhook_secret: None,
            log_file: None,
            log_max_bytes: DEFAULT_LOG_MAX_BYTES,
            log_backups: DEFAULT_LOG_BACKUPS,
            log_level: DEFAULT_LOG_FILTER.to_string(),
            log_json: false,
            color: true,
            console_enabled: true,
        }
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            webhook_secret: cli.secret,
            log_file: cli.log_file,
            log_max_bytes: cli.log_max_bytes,
            log_backups: cli.log_backups,
            log_level: cli.log_level,
            log_json: cli.log_json,
            color: !cli.no_color,
            console_enabled: !cli.quiet,
        }
    }
}

impl Config {
    /// Load `.env` (if present) and parse the command line.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Cli::parse().into()
    }

    /// Configured secret. An empty string disables validation.
    pub fn secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref().filter(|s| !s.is_empty())
    }

    pub fn webhook_url(&self) -> String {
        format!("http://localhost:{}/webhook", self.port)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
