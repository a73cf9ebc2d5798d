//! Rent price formula
//!
//! ```text
//! subtotal = 1000
//!          + area * 18 + bedrooms * 400 + bathrooms * 250 + parking * 300
//!          + 200 (elevator) + 150 (pool) + 180 (security)
//! price    = round2(subtotal * type_multiplier * furnished_multiplier)
//! ```
//!
//! Feature importance reports the additive terms before the multipliers are
//! applied. Consumers already depend on these values, so they stay unscaled
//! even though they no longer sum to the price.

use super::round2;
use smartrent_common::api::{
    ConfidenceInterval, FeatureImportance, Furnished, PredictionResult, PropertyAttributes,
    PropertyType,
};

pub const LOCAL_MODEL_VERSION: &str = "v1.0-local";

const BASE_PRICE: f64 = 1000.0;
const PER_SQUARE_METER: f64 = 18.0;
const PER_BEDROOM: f64 = 400.0;
const PER_BATHROOM: f64 = 250.0;
const PER_PARKING_SPACE: f64 = 300.0;
const ELEVATOR: f64 = 200.0;
const POOL: f64 = 150.0;
const SECURITY: f64 = 180.0;

const INTERVAL_LOW: f64 = 0.9;
const INTERVAL_HIGH: f64 = 1.1;

/// Multiplier for the furnishing state; not stated counts as unfurnished
pub fn furnished_multiplier(furnished: Option<Furnished>) -> f64 {
    match furnished {
        Some(Furnished::Yes) => 1.15,
        Some(Furnished::Partial) => 1.08,
        Some(Furnished::No) | None => 1.0,
    }
}

pub fn type_multiplier(property_type: &PropertyType) -> f64 {
    match property_type {
        PropertyType::Apartment => 1.0,
        PropertyType::House => 1.10,
        PropertyType::Condo => 1.20,
        PropertyType::Studio => 0.85,
        PropertyType::Unknown(_) => 1.0,
    }
}

fn amenity(flag: Option<bool>, value: f64) -> f64 {
    if flag == Some(true) {
        value
    } else {
        0.0
    }
}

/// ±10% band around `price`, each bound rounded to 2 decimals
pub fn confidence_interval(price: f64) -> ConfidenceInterval {
    ConfidenceInterval {
        min: round2(price * INTERVAL_LOW),
        max: round2(price * INTERVAL_HIGH),
    }
}

/// Predict the monthly rent with the local formula
pub fn predict(attrs: &PropertyAttributes) -> PredictionResult {
    let importance = FeatureImportance {
        area: attrs.area * PER_SQUARE_METER,
        bedrooms: f64::from(attrs.bedrooms) * PER_BEDROOM,
        bathrooms: f64::from(attrs.bathrooms) * PER_BATHROOM,
        parking: f64::from(attrs.parking_spaces) * PER_PARKING_SPACE,
        elevator: Some(amenity(attrs.has_elevator, ELEVATOR)),
        pool: Some(amenity(attrs.has_pool, POOL)),
        security: Some(amenity(attrs.has_security, SECURITY)),
    };

    let subtotal = BASE_PRICE
        + importance.area
        + importance.bedrooms
        + importance.bathrooms
        + importance.parking
        + importance.elevator.unwrap_or_default()
        + importance.pool.unwrap_or_default()
        + importance.security.unwrap_or_default();

    let price = subtotal
        * type_multiplier(&attrs.property_type)
        * furnished_multiplier(attrs.furnished);

    PredictionResult {
        predicted_price: round2(price),
        confidence_interval: confidence_interval(price),
        feature_importance: importance,
        model_version: LOCAL_MODEL_VERSION.to_string(),
    }
}
