//! Market comparison figures
//!
//! There is no listing data behind these numbers. Averages are fixed
//! fractions of the predicted price and the comparables are synthesized by
//! fixed price/area offsets.

use super::round2;
use smartrent_common::api::{MarketAnalysis, PropertyAttributes, SimilarProperty};

const NEIGHBORHOOD_RATIO: f64 = 0.95;
const CITY_RATIO: f64 = 0.88;
const PLACEHOLDER_PERCENTILE: u32 = 65;

/// (price ratio, area offset in m²) for each synthetic comparable
const COMPARABLES: [(f64, f64); 3] = [(0.92, -5.0), (1.05, 8.0), (0.98, 2.0)];

pub fn analyze_market(attrs: &PropertyAttributes, predicted_price: f64) -> MarketAnalysis {
    let similar_properties = COMPARABLES
        .iter()
        .map(|&(price_ratio, area_offset)| SimilarProperty {
            price: round2(predicted_price * price_ratio),
            area: attrs.area + area_offset,
            bedrooms: attrs.bedrooms,
        })
        .collect();

    MarketAnalysis {
        predicted: predicted_price,
        neighborhood_average: round2(predicted_price * NEIGHBORHOOD_RATIO),
        city_average: round2(predicted_price * CITY_RATIO),
        percentile: PLACEHOLDER_PERCENTILE,
        similar_properties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartrent_common::api::PropertyType;

    fn attrs(area: f64, bedrooms: u32) -> PropertyAttributes {
        PropertyAttributes {
            area,
            bedrooms,
            bathrooms: 1,
            parking_spaces: 1,
            property_type: PropertyType::Apartment,
            neighborhood: "Batel".to_string(),
            city: "Curitiba".to_string(),
            has_elevator: None,
            has_pool: None,
            has_security: None,
            furnished: None,
            floor: None,
        }
    }

    #[test]
    fn test_averages() {
        let market = analyze_market(&attrs(80.0, 2), 4040.0);

        assert_eq!(market.predicted, 4040.0);
        assert_eq!(market.neighborhood_average, 3838.0);
        assert_eq!(market.city_average, 3555.2);
        assert_eq!(market.percentile, 65);
    }

    #[test]
    fn test_three_comparables() {
        let market = analyze_market(&attrs(80.0, 2), 4040.0);

        assert_eq!(
            market.similar_properties,
            vec![
                SimilarProperty { price: 3716.8, area: 75.0, bedrooms: 2 },
                SimilarProperty { price: 4242.0, area: 88.0, bedrooms: 2 },
                SimilarProperty { price: 3959.2, area: 82.0, bedrooms: 2 },
            ]
        );
    }

    #[test]
    fn test_percentile_ignores_input() {
        let cheap = analyze_market(&attrs(20.0, 0), 900.0);
        let pricey = analyze_market(&attrs(400.0, 6), 25000.0);
        assert_eq!(cheap.percentile, pricey.percentile);
    }
}
