use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use webhook_debug_receiver::config::{Config, DEFAULT_LOG_FILTER};
use webhook_debug_receiver::services::ConsoleReporter;
use webhook_debug_receiver::utils::local_ip_address;
use webhook_debug_receiver::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Loads .env, then parses flags (each backed by an env var)
    let config = Config::load();

    init_tracing(&config);
    if !config.color {
        console::set_colors_enabled(false);
    }

    let app_state =
        AppState::from_config(config.clone()).context("Failed to open webhook log file")?;
    let console = ConsoleReporter::from_config(&config);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Starting webhook receiver on {}", addr);

    console.emit(&console.format_banner(&config, &local_ip_address()));

    axum::serve(listener, build_router(app_state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let summary = app_state.stats_summary().await;
    console.emit(&console.format_shutdown(&summary));
    info!(
        total = summary.total_requests,
        successful = summary.successful,
        failed = summary.failed,
        "Server stopped"
    );

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(config.color)
            .init();
    }
}

/// Wait for SIGTERM or SIGINT signal for graceful shutdown
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, shutting down gracefully");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, shutting down gracefully");
        },
    }
}
