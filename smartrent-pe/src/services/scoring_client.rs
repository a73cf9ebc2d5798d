//! External scoring service client
//!
//! The scoring service speaks its own schema, built around a trained
//! regression over ground-floor area, second floor, bathrooms and kitchen
//! quality. [`ScoringRequest::from`] maps the form attributes onto it
//! heuristically; it is an adapter, not a faithful translation.
//!
//! Every call is bounded by the configured timeout. The client never
//! retries: the caller decides what a failure means.

use serde::{Deserialize, Serialize};
use smartrent_common::api::{Furnished, PropertyAttributes};
use smartrent_common::config::ExternalApiConfig;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("smartrent-pe/", env!("CARGO_PKG_VERSION"));

/// Scoring client errors
#[derive(Debug, Error)]
pub enum ScoringError {
    /// No complete response within the configured timeout
    #[error("Timed out after {0:?} waiting for scoring service")]
    Timeout(Duration),

    /// Connection or transport failure
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Scoring service answered with a non-2xx status
    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    /// Response body is not the expected JSON
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Payload POSTed to the scoring service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRequest {
    pub city: String,
    pub neighborhood: String,
    pub area_first_floor_sqm: f64,
    /// Inferred: more than two bedrooms
    pub has_second_floor: bool,
    pub bathrooms: u32,
    /// Inferred: fully furnished
    pub kitchen_quality_excellent: bool,
}

impl From<&PropertyAttributes> for ScoringRequest {
    fn from(attrs: &PropertyAttributes) -> Self {
        Self {
            city: attrs.city.clone(),
            neighborhood: attrs.neighborhood.clone(),
            area_first_floor_sqm: attrs.area,
            has_second_floor: attrs.bedrooms > 2,
            bathrooms: attrs.bathrooms,
            kitchen_quality_excellent: attrs.furnished == Some(Furnished::Yes),
        }
    }
}

/// Scoring service answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringResponse {
    pub price_prediction: f64,
    #[serde(default)]
    pub suggestions: Option<Vec<ScoringSuggestion>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringSuggestion {
    pub tip: String,
    pub value_increase: f64,
    #[serde(default)]
    pub reason: String,
}

/// HTTP client for the scoring service
pub struct ScoringClient {
    http_client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl ScoringClient {
    pub fn new(config: &ExternalApiConfig) -> Result<Self, ScoringError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| ScoringError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            url: config.url.clone(),
            timeout: config.timeout(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn transport_error(&self, err: reqwest::Error) -> ScoringError {
        if err.is_timeout() {
            ScoringError::Timeout(self.timeout)
        } else {
            ScoringError::NetworkError(err.to_string())
        }
    }

    /// POST the payload and decode the answer
    ///
    /// A negative or non-finite `price_prediction` is rejected as a parse
    /// error.
    pub async fn score(&self, request: &ScoringRequest) -> Result<ScoringResponse, ScoringError> {
        tracing::debug!(url = %self.url, payload = ?request, "Querying scoring service");

        let response = self
            .http_client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScoringError::ApiError(status.as_u16(), error_text));
        }

        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        let scored: ScoringResponse =
            serde_json::from_slice(&body).map_err(|e| ScoringError::ParseError(e.to_string()))?;

        if !scored.price_prediction.is_finite() || scored.price_prediction < 0.0 {
            return Err(ScoringError::ParseError(format!(
                "price_prediction out of range: {}",
                scored.price_prediction
            )));
        }

        tracing::info!(
            url = %self.url,
            price = scored.price_prediction,
            suggestions = scored.suggestions.as_ref().map_or(0, Vec::len),
            "Scoring service lookup successful"
        );

        Ok(scored)
    }
}
