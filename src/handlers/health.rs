use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::services::StatsSummary;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub stats: StatsSummary,
}

/// Liveness check with the current counters
/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Webhook receiver is running".to_string(),
        stats: state.stats_summary().await,
    })
}

/// Counters alone
/// GET /stats
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsSummary> {
    Json(state.stats_summary().await)
}
