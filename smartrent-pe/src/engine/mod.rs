//! Local estimation engine
//!
//! Deterministic rent formula plus the market comparison and improvement
//! suggestions derived from a predicted price. Everything here is pure:
//! identical attributes always give identical output.
//!
//! The market analysis and suggestions are also applied to prices returned
//! by the external scoring service, see [`crate::services::delegation`].

pub mod market;
pub mod pricing;
pub mod suggestions;

pub use market::analyze_market;
pub use pricing::{predict, LOCAL_MODEL_VERSION};
pub use suggestions::{suggest, MAX_SUGGESTIONS};

use smartrent_common::api::{EstimateReport, PropertyAttributes};

/// Round to 2 decimals, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Prediction, market analysis and suggestions from the local formula
pub fn estimate_locally(attrs: &PropertyAttributes) -> EstimateReport {
    let prediction = predict(attrs);
    let market_analysis = analyze_market(attrs, prediction.predicted_price);
    let optimization_suggestions = suggest(attrs, prediction.predicted_price);

    EstimateReport {
        prediction,
        market_analysis,
        optimization_suggestions,
    }
}
