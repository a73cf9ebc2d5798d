//! Improvement suggestions
//!
//! One suggestion per amenity the landlord explicitly marked as missing,
//! ranked by the monthly rent increase it would bring.

use super::round2;
use smartrent_common::api::{Furnished, Impact, PropertyAttributes, Suggestion};

/// Longest list returned to the caller
pub const MAX_SUGGESTIONS: usize = 5;

const FURNISHING_RATIO: f64 = 0.15;

fn suggestion(
    feature: &str,
    impact: Impact,
    price_increase: f64,
    description: &str,
    roi_months: u32,
) -> Suggestion {
    Suggestion {
        feature: feature.to_string(),
        impact,
        price_increase,
        description: description.to_string(),
        roi_months,
    }
}

pub fn suggest(attrs: &PropertyAttributes, predicted_price: f64) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if attrs.has_elevator == Some(false) {
        suggestions.push(suggestion(
            "Elevator",
            Impact::High,
            200.0,
            "Adding an elevator can raise the rent by up to $200/month",
            120,
        ));
    }

    if attrs.has_pool == Some(false) {
        suggestions.push(suggestion(
            "Pool",
            Impact::Medium,
            150.0,
            "A pool in the building can raise the rent by up to $150/month",
            80,
        ));
    }

    if attrs.has_security == Some(false) {
        suggestions.push(suggestion(
            "24h Security",
            Impact::High,
            180.0,
            "Round-the-clock security raises both the rent and the appeal of the property",
            36,
        ));
    }

    if attrs.furnished == Some(Furnished::No) {
        suggestions.push(suggestion(
            "Furnishing",
            Impact::High,
            round2(predicted_price * FURNISHING_RATIO),
            "Furnishing the property can raise the rent by up to 15%",
            24,
        ));
    }

    if attrs.parking_spaces == 0 {
        suggestions.push(suggestion(
            "Parking Spot",
            Impact::High,
            300.0,
            "Adding a parking spot can raise the rent significantly",
            60,
        ));
    }

    rank(suggestions)
}

/// Sort descending by price increase (stable) and keep the top entries
pub fn rank(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by(|a, b| b.price_increase.total_cmp(&a.price_increase));
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
