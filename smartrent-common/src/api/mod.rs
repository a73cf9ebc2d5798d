//! Shared HTTP API types
//!
//! Request and response shapes for the price estimator. Kept free of any
//! HTTP framework dependency so both the server and the one-shot CLI can
//! use them.

pub mod types;

pub use types::{
    AttributeError, ConfidenceInterval, ErrorResponse, EstimateReport, EstimateResponse,
    FeatureImportance, Furnished, Impact, MarketAnalysis, PredictionResult, PropertyAttributes,
    PropertyRequest, PropertyType, SimilarProperty, Suggestion, MAX_AREA, REQUIRED_FIELDS,
};
