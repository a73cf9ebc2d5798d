//! Estimate endpoint
//!
//! POST /api/predict
//!
//! **Request:** property attributes as posted by the form, e.g.
//! `{"area": "80", "bedrooms": "2", ..., "hasElevator": "no"}`
//!
//! **Response:** `{prediction, market_analysis, optimization_suggestions}`
//! plus `"fallback_used": true` when the scoring service failed.
//!
//! **Errors:**
//! - 400 Bad Request: a mandatory field is missing
//! - 500 Internal Server Error: unreadable body or numeric value

use crate::{ApiError, ApiResult, AppState};
use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use smartrent_common::api::{EstimateResponse, PropertyAttributes, PropertyRequest};
use tracing::{debug, info};

use crate::services::Estimate;

/// POST /api/predict handler
///
/// The body is decoded by hand so a form that posts without a JSON content
/// type is still accepted.
pub async fn predict(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<EstimateResponse>> {
    let request: PropertyRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Internal(format!("Unreadable request body: {}", e)))?;

    let attrs = PropertyAttributes::try_from(request)?;

    debug!(
        area = attrs.area,
        bedrooms = attrs.bedrooms,
        property_type = %attrs.property_type,
        floor = ?attrs.floor,
        "Estimating rent"
    );

    let estimate = state.estimator.obtain_prediction(&attrs).await;

    if let Estimate::LocalFallback { reason, .. } = &estimate {
        state.record_fallback(reason).await;
    }

    info!(
        city = %attrs.city,
        predicted_price = estimate.report().prediction.predicted_price,
        fallback = estimate.is_fallback(),
        "Estimate served"
    );

    Ok(Json(estimate.into_response()))
}

/// Build estimate routes
pub fn predict_routes() -> Router<AppState> {
    Router::new().route("/api/predict", post(predict))
}
