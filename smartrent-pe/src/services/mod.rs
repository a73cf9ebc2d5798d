//! Outbound integrations
//!
//! - `scoring_client`: HTTP client for the external scoring service
//! - `delegation`: remote-first estimation with local fallback

pub mod delegation;
pub mod scoring_client;

pub use delegation::{adapt_remote_response, Estimate, Estimator, EXTERNAL_MODEL_VERSION};
pub use scoring_client::{
    ScoringClient, ScoringError, ScoringRequest, ScoringResponse, ScoringSuggestion,
};
