//! Remote-first estimation with local fallback
//!
//! [`Estimator::obtain_prediction`] asks the external scoring service
//! first. Any failure (timeout, non-2xx, transport error, malformed body)
//! is treated the same way: the local formula computes the whole estimate
//! and the outcome is marked as a fallback. No retries, no partial
//! results. The failure reason is logged and kept on the outcome for
//! diagnostics; it is never returned to the caller as an error.

use crate::engine::{self, round2};
use crate::services::scoring_client::{ScoringClient, ScoringError, ScoringRequest, ScoringResponse};
use smartrent_common::api::{
    EstimateReport, EstimateResponse, FeatureImportance, Impact, PredictionResult,
    PropertyAttributes, Suggestion,
};
use smartrent_common::config::ExternalApiConfig;
use tracing::{info, warn};

pub const EXTERNAL_MODEL_VERSION: &str = "external";

/// Share of the remote price reported as each feature's importance
const IMPORTANCE_AREA: f64 = 0.40;
const IMPORTANCE_BEDROOMS: f64 = 0.15;
const IMPORTANCE_BATHROOMS: f64 = 0.10;
const IMPORTANCE_PARKING: f64 = 0.10;

/// Where an estimate came from
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    /// Scoring service answered; market analysis is still local
    Remote(EstimateReport),
    /// Scoring service failed, everything computed locally
    LocalFallback {
        report: EstimateReport,
        reason: String,
    },
}

impl Estimate {
    pub fn report(&self) -> &EstimateReport {
        match self {
            Estimate::Remote(report) => report,
            Estimate::LocalFallback { report, .. } => report,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Estimate::LocalFallback { .. })
    }

    /// Wire shape; `fallback_used` only appears on the fallback path
    pub fn into_response(self) -> EstimateResponse {
        match self {
            Estimate::Remote(report) => EstimateResponse {
                report,
                fallback_used: None,
            },
            Estimate::LocalFallback { report, .. } => EstimateResponse {
                report,
                fallback_used: Some(true),
            },
        }
    }
}

/// Remote-first estimator
pub struct Estimator {
    client: ScoringClient,
}

impl Estimator {
    pub fn new(config: &ExternalApiConfig) -> Result<Self, ScoringError> {
        Ok(Self {
            client: ScoringClient::new(config)?,
        })
    }

    pub fn scoring_url(&self) -> &str {
        self.client.url()
    }

    pub async fn obtain_prediction(&self, attrs: &PropertyAttributes) -> Estimate {
        let request = ScoringRequest::from(attrs);

        match self.client.score(&request).await {
            Ok(response) => {
                info!(
                    city = %attrs.city,
                    neighborhood = %attrs.neighborhood,
                    "Using external scoring service estimate"
                );
                Estimate::Remote(adapt_remote_response(response, attrs))
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(
                    url = %self.client.url(),
                    reason = %reason,
                    "Scoring service unavailable, falling back to local formula"
                );
                Estimate::LocalFallback {
                    report: engine::estimate_locally(attrs),
                    reason,
                }
            }
        }
    }
}

/// Reshape a scoring service answer into the canonical report
///
/// Impact tiers and payback periods are recomputed here rather than
/// trusted from upstream. When the service sends no suggestions the local
/// ones are derived from the remote price.
pub fn adapt_remote_response(response: ScoringResponse, attrs: &PropertyAttributes) -> EstimateReport {
    let price = response.price_prediction;
    let predicted_price = round2(price);

    let prediction = PredictionResult {
        predicted_price,
        confidence_interval: engine::pricing::confidence_interval(price),
        feature_importance: FeatureImportance {
            area: (price * IMPORTANCE_AREA).round(),
            bedrooms: (price * IMPORTANCE_BEDROOMS).round(),
            bathrooms: (price * IMPORTANCE_BATHROOMS).round(),
            parking: (price * IMPORTANCE_PARKING).round(),
            elevator: None,
            pool: None,
            security: None,
        },
        model_version: EXTERNAL_MODEL_VERSION.to_string(),
    };

    let remote_suggestions: Vec<Suggestion> = response
        .suggestions
        .unwrap_or_default()
        .into_iter()
        .map(|s| Suggestion {
            impact: Impact::from_price_increase(s.value_increase),
            roi_months: roi_months(s.value_increase),
            price_increase: s.value_increase,
            feature: s.tip,
            description: s.reason,
        })
        .collect();

    let optimization_suggestions = if remote_suggestions.is_empty() {
        engine::suggest(attrs, predicted_price)
    } else {
        engine::suggestions::rank(remote_suggestions)
    };

    EstimateReport {
        prediction,
        market_analysis: engine::analyze_market(attrs, predicted_price),
        optimization_suggestions,
    }
}

/// round(increase × 12 / 100); negative increases saturate to 0
fn roi_months(value_increase: f64) -> u32 {
    (value_increase * 12.0 / 100.0).round() as u32
}
