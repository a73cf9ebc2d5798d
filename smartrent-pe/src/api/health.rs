//! Health check endpoint
//!
//! Reports uptime plus the most recent scoring service failure, which is
//! otherwise invisible to callers because the fallback hides it.

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status, always "ok" while the process answers
    pub status: String,
    /// Module name ("smartrent-pe")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Scoring service the estimator tries first
    pub scoring_url: String,
    /// Estimates served by the local fallback since startup
    pub fallback_count: u64,
    /// Last scoring failure reason, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let last_error = state.last_error.read().await.clone();

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "smartrent-pe".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        scoring_url: state.estimator.scoring_url().to_string(),
        fallback_count: state.fallbacks(),
        last_error,
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
