//! smartrent-pe library - Price Estimator module
//!
//! Exposes the estimation engine, the scoring service integration and the
//! HTTP router for the binaries and integration tests.

pub mod api;
pub mod engine;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use services::Estimator;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
///
/// Only diagnostics are mutable; no estimate depends on them.
#[derive(Clone)]
pub struct AppState {
    /// Remote-first estimator
    pub estimator: Arc<Estimator>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Most recent scoring service failure
    pub last_error: Arc<RwLock<Option<String>>>,
    /// Estimates answered by the local fallback since startup
    pub fallback_count: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(estimator: Estimator) -> Self {
        Self {
            estimator: Arc::new(estimator),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
            fallback_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Remember a scoring failure for the health endpoint
    pub async fn record_fallback(&self, reason: &str) {
        self.fallback_count.fetch_add(1, Ordering::Relaxed);
        *self.last_error.write().await = Some(reason.to_string());
    }

    pub fn fallbacks(&self) -> u64 {
        self.fallback_count.load(Ordering::Relaxed)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::predict_routes())
        .merge(api::health_routes())
        .route("/api/buildinfo", get(api::get_build_info))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
