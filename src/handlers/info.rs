//! HTML landing page. Served for `GET /` and every GET path without a route.

use axum::{
    extract::{Request, State},
    http::Method,
    response::{Html, IntoResponse, Response},
};
use std::collections::BTreeMap;

use crate::app_state::AppState;
use crate::config::Config;
use crate::error::ApiError;
use crate::services::StatsSummary;

/// GET /
pub async fn info_page(State(state): State<AppState>) -> Html<String> {
    let stats = state.stats_summary().await;
    Html(render_info_page(&state.config, &stats))
}

/// Unrouted paths: GET falls back to the info page, anything else is a 404.
pub async fn fallback(State(state): State<AppState>, request: Request) -> Response {
    if request.method() == Method::GET {
        info_page(State(state)).await.into_response()
    } else {
        ApiError::NotFound(request.uri().path().to_string()).into_response()
    }
}

pub fn render_info_page(config: &Config, stats: &StatsSummary) -> String {
    let secret = config
        .secret()
        .map(|s| {
            format!(
                "<p><strong>Webhook Secret:</strong> <code>{}</code></p>",
                escape_html(s)
            )
        })
        .unwrap_or_default();
    let log_file = config
        .log_file
        .as_ref()
        .map(|p| {
            format!(
                "<p><strong>Log File:</strong> <code>{}</code></p>",
                escape_html(&p.display().to_string())
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Sales Sync - Debug Webhook Server</title>
    <meta charset="utf-8">
    <meta http-equiv="refresh" content="5">
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; background: #f5f5f5; }}
        .container {{ max-width: 800px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        h1 {{ color: #333; border-bottom: 3px solid #4CAF50; padding-bottom: 10px; }}
        .status {{ background: #4CAF50; color: white; padding: 10px; border-radius: 4px; display: inline-block; }}
        .stats {{ background: #f9f9f9; padding: 15px; border-left: 4px solid #2196F3; margin: 20px 0; }}
        .endpoint {{ background: #e8f5e9; padding: 10px; margin: 10px 0; border-radius: 4px; font-family: monospace; }}
        code {{ background: #eee; padding: 2px 6px; border-radius: 3px; }}
        table {{ width: 100%; border-collapse: collapse; margin: 15px 0; }}
        th, td {{ padding: 10px; text-align: left; border-bottom: 1px solid #ddd; }}
        th {{ background: #f5f5f5; font-weight: bold; }}
        .metric {{ font-size: 24px; font-weight: bold; color: #2196F3; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>🔔 Sales Sync - Debug Webhook Server</h1>

        <p class="status">✓ Server Running</p>
        <p>Uptime: {uptime} minutes</p>

        <div class="stats">
            <h3>📊 Statistics</h3>
            <table>
                <tr><th>Metric</th><th>Value</th></tr>
                <tr><td>Total Requests</td><td class="metric">{total}</td></tr>
                <tr><td>Successful</td><td style="color: green;">{successful}</td></tr>
                <tr><td>Failed</td><td style="color: red;">{failed}</td></tr>
            </table>

            <h4>By Entity Type:</h4>
            <ul>
                {by_entity}
            </ul>

            <h4>By Action Type:</h4>
            <ul>
                {by_action}
            </ul>
        </div>

        <h3>📡 Endpoints</h3>
        <div class="endpoint"><strong>POST</strong> /webhook - Receive webhooks from the shop</div>
        <div class="endpoint"><strong>GET</strong> /health - Health check</div>
        <div class="endpoint"><strong>GET</strong> /stats - Statistics (JSON)</div>

        <h3>🔧 Configuration</h3>
        <p><strong>Webhook URL:</strong></p>
        <code>{webhook_url}</code>

        {secret}

        {log_file}

        <p style="margin-top: 30px; color: #666; font-size: 12px;">
            Auto-refreshes every 5 seconds • Check console for real-time webhook output
        </p>
    </div>
</body>
</html>
"#,
        uptime = stats.uptime_minutes(),
        total = stats.total_requests,
        successful = stats.successful,
        failed = stats.failed,
        by_entity = format_counts_as_list(&stats.by_entity_type),
        by_action = format_counts_as_list(&stats.by_action_type),
        webhook_url = escape_html(&config.webhook_url()),
        secret = secret,
        log_file = log_file,
    )
}

fn format_counts_as_list(counts: &BTreeMap<String, u64>) -> String {
    if counts.is_empty() {
        return "<li><em>No data yet</em></li>".to_string();
    }
    counts
        .iter()
        .map(|(label, count)| format!("<li>{}: {}</li>", escape_html(label), count))
        .collect()
}

/// Labels come straight from webhook payloads, so escape before embedding.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
