//! Property attribute and estimate types
//!
//! # Request side
//!
//! A web form posts every value as a string, while scripted clients tend to
//! send JSON numbers. [`PropertyRequest`] accepts both and
//! [`PropertyAttributes::try_from`] validates it into typed attributes:
//!
//! - a mandatory field that is absent, `null` or blank is reported as
//!   [`AttributeError::MissingField`]
//! - a present value that cannot be read as the expected type is reported
//!   as [`AttributeError::InvalidValue`]; so is an area above [`MAX_AREA`],
//!   which would overflow the price arithmetic
//!
//! # Response side
//!
//! [`EstimateResponse`] is the wire shape returned to callers:
//! `{prediction, market_analysis, optimization_suggestions, fallback_used?}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Mandatory request fields, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 7] = [
    "area",
    "bedrooms",
    "bathrooms",
    "parkingSpaces",
    "propertyType",
    "neighborhood",
    "city",
];

/// Largest accepted area in square metres
///
/// Every price term stays finite below this bound, whatever the counts.
pub const MAX_AREA: f64 = 1.0e9;

// ========================================
// Request Types
// ========================================

/// Attribute validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributeError {
    /// Mandatory field absent, null or blank
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Field present but not readable as the expected type
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Raw estimate request as posted by the form
///
/// Every field is kept as a loose JSON value until validation.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRequest {
    #[serde(default)]
    pub area: Option<Value>,
    #[serde(default)]
    pub bedrooms: Option<Value>,
    #[serde(default)]
    pub bathrooms: Option<Value>,
    #[serde(default)]
    pub parking_spaces: Option<Value>,
    #[serde(default)]
    pub property_type: Option<Value>,
    #[serde(default)]
    pub neighborhood: Option<Value>,
    #[serde(default)]
    pub city: Option<Value>,
    #[serde(default)]
    pub has_elevator: Option<Value>,
    #[serde(default)]
    pub has_pool: Option<Value>,
    #[serde(default)]
    pub has_security: Option<Value>,
    #[serde(default)]
    pub furnished: Option<Value>,
    #[serde(default)]
    pub floor: Option<Value>,
}

/// Property type as selected on the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Studio,
    /// Anything else; priced like an apartment
    Unknown(String),
}

impl PropertyType {
    pub fn parse(s: &str) -> Self {
        match s {
            "apartment" => PropertyType::Apartment,
            "house" => PropertyType::House,
            "condo" => PropertyType::Condo,
            "studio" => PropertyType::Studio,
            other => PropertyType::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Apartment => write!(f, "apartment"),
            PropertyType::House => write!(f, "house"),
            PropertyType::Condo => write!(f, "condo"),
            PropertyType::Studio => write!(f, "studio"),
            PropertyType::Unknown(s) => write!(f, "{}", s),
        }
    }
}

/// Furnishing state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Furnished {
    Yes,
    No,
    Partial,
}

impl Furnished {
    /// `None` for anything other than "yes", "no" or "partial"
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(Furnished::Yes),
            "no" => Some(Furnished::No),
            "partial" => Some(Furnished::Partial),
            _ => None,
        }
    }
}

/// Validated property attributes
///
/// Amenity flags are tri-state: `Some(true)` for "yes", `Some(false)` for
/// "no" and `None` when the form did not state it. Only an explicit "no"
/// produces an improvement suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyAttributes {
    /// Living area in m²
    pub area: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub parking_spaces: u32,
    pub property_type: PropertyType,
    pub neighborhood: String,
    pub city: String,
    pub has_elevator: Option<bool>,
    pub has_pool: Option<bool>,
    pub has_security: Option<bool>,
    pub furnished: Option<Furnished>,
    /// Collected by the form, not used for pricing
    pub floor: Option<i32>,
}

impl TryFrom<PropertyRequest> for PropertyAttributes {
    type Error = AttributeError;

    fn try_from(req: PropertyRequest) -> Result<Self, Self::Error> {
        // Presence first, so the caller always learns about the first
        // missing field before any parse problem.
        let mandatory = [
            &req.area,
            &req.bedrooms,
            &req.bathrooms,
            &req.parking_spaces,
            &req.property_type,
            &req.neighborhood,
            &req.city,
        ];
        for (field, value) in REQUIRED_FIELDS.into_iter().zip(mandatory) {
            if is_missing(value) {
                return Err(AttributeError::MissingField(field));
            }
        }

        Ok(Self {
            area: parse_area(req.area.as_ref())?,
            bedrooms: parse_count("bedrooms", req.bedrooms.as_ref())?,
            bathrooms: parse_count("bathrooms", req.bathrooms.as_ref())?,
            parking_spaces: parse_count("parkingSpaces", req.parking_spaces.as_ref())?,
            property_type: PropertyType::parse(&parse_text(
                "propertyType",
                req.property_type.as_ref(),
            )?),
            neighborhood: parse_text("neighborhood", req.neighborhood.as_ref())?,
            city: parse_text("city", req.city.as_ref())?,
            has_elevator: parse_flag(req.has_elevator.as_ref()),
            has_pool: parse_flag(req.has_pool.as_ref()),
            has_security: parse_flag(req.has_security.as_ref()),
            furnished: req
                .furnished
                .as_ref()
                .and_then(Value::as_str)
                .and_then(Furnished::parse),
            floor: parse_floor(req.floor.as_ref()),
        })
    }
}

fn is_missing(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn invalid(field: &'static str, value: Option<&Value>) -> AttributeError {
    AttributeError::InvalidValue {
        field,
        value: value.map(|v| v.to_string()).unwrap_or_default(),
    }
}

fn parse_area(value: Option<&Value>) -> Result<f64, AttributeError> {
    let area = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match area {
        Some(a) if (0.0..=MAX_AREA).contains(&a) => Ok(a),
        _ => Err(invalid("area", value)),
    }
}

fn parse_count(field: &'static str, value: Option<&Value>) -> Result<u32, AttributeError> {
    let count = match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|c| u32::try_from(c).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };

    count.ok_or_else(|| invalid(field, value))
}

fn parse_text(field: &'static str, value: Option<&Value>) -> Result<String, AttributeError> {
    match value {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(invalid(field, value)),
    }
}

fn parse_flag(value: Option<&Value>) -> Option<bool> {
    match value {
        Some(Value::String(s)) if s == "yes" => Some(true),
        Some(Value::String(s)) if s == "no" => Some(false),
        Some(Value::Bool(b)) => Some(*b),
        _ => None,
    }
}

fn parse_floor(value: Option<&Value>) -> Option<i32> {
    match value {
        Some(Value::Number(n)) => n.as_i64().and_then(|f| i32::try_from(f).ok()),
        Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

// ========================================
// Response Types
// ========================================

/// Fixed ±10% band around the predicted price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub min: f64,
    pub max: f64,
}

/// Contribution of each attribute to the price
///
/// For the local formula these are the additive contributions before the
/// furnishing and property type multipliers, so they do not sum to the
/// predicted price. The external model only reports the first four.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub area: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub parking: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevator: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Monthly rent, rounded to 2 decimals
    pub predicted_price: f64,
    pub confidence_interval: ConfidenceInterval,
    pub feature_importance: FeatureImportance,
    /// "v1.0-local" for the local formula, "external" for the scoring service
    pub model_version: String,
}

/// Synthetic comparable listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarProperty {
    pub price: f64,
    pub area: f64,
    pub bedrooms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub predicted: f64,
    pub neighborhood_average: f64,
    pub city_average: f64,
    /// Constant placeholder, not a computed rank
    pub percentile: u32,
    pub similar_properties: Vec<SimilarProperty>,
}

/// Suggestion impact tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    /// Tier for a monthly price increase: above 300 is high, above 150 medium
    pub fn from_price_increase(increase: f64) -> Self {
        if increase > 300.0 {
            Impact::High
        } else if increase > 150.0 {
            Impact::Medium
        } else {
            Impact::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub feature: String,
    pub impact: Impact,
    /// Expected rent increase per month
    pub price_increase: f64,
    pub description: String,
    /// Payback period in months
    pub roi_months: u32,
}

/// Everything computed for one estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateReport {
    pub prediction: PredictionResult,
    pub market_analysis: MarketAnalysis,
    pub optimization_suggestions: Vec<Suggestion>,
}

/// Success body of `POST /api/predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResponse {
    #[serde(flatten)]
    pub report: EstimateReport,
    /// Present and true only when the local formula replaced the scoring service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_used: Option<bool>,
}

/// Error body: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> PropertyRequest {
        serde_json::from_value(value).unwrap()
    }

    fn complete_form() -> Value {
        json!({
            "area": "80",
            "bedrooms": "2",
            "bathrooms": "1",
            "parkingSpaces": "0",
            "propertyType": "apartment",
            "neighborhood": "Centro",
            "city": "Curitiba",
            "hasElevator": "yes",
            "hasPool": "no",
            "furnished": "partial",
            "floor": "3"
        })
    }

    #[test]
    fn test_form_strings_are_parsed() {
        let attrs = PropertyAttributes::try_from(request(complete_form())).unwrap();

        assert_eq!(attrs.area, 80.0);
        assert_eq!(attrs.bedrooms, 2);
        assert_eq!(attrs.bathrooms, 1);
        assert_eq!(attrs.parking_spaces, 0);
        assert_eq!(attrs.property_type, PropertyType::Apartment);
        assert_eq!(attrs.city, "Curitiba");
        assert_eq!(attrs.has_elevator, Some(true));
        assert_eq!(attrs.has_pool, Some(false));
        assert_eq!(attrs.has_security, None);
        assert_eq!(attrs.furnished, Some(Furnished::Partial));
        assert_eq!(attrs.floor, Some(3));
    }

    #[test]
    fn test_json_numbers_are_accepted() {
        let attrs = PropertyAttributes::try_from(request(json!({
            "area": 62.5,
            "bedrooms": 1,
            "bathrooms": 1,
            "parkingSpaces": 0,
            "propertyType": "loft",
            "neighborhood": "X",
            "city": "Y"
        })))
        .unwrap();

        assert_eq!(attrs.area, 62.5);
        assert_eq!(attrs.parking_spaces, 0);
        assert_eq!(attrs.property_type, PropertyType::Unknown("loft".to_string()));
        assert_eq!(attrs.furnished, None);
        assert_eq!(attrs.floor, None);
    }

    #[test]
    fn test_each_required_field_is_reported() {
        for field in REQUIRED_FIELDS {
            let mut form = complete_form();
            form.as_object_mut().unwrap().remove(field);

            let err = PropertyAttributes::try_from(request(form)).unwrap_err();
            assert_eq!(err, AttributeError::MissingField(field));
            assert_eq!(err.to_string(), format!("Missing required field: {}", field));
        }
    }

    #[test]
    fn test_blank_and_null_count_as_missing() {
        let mut form = complete_form();
        form["city"] = json!("   ");
        let err = PropertyAttributes::try_from(request(form)).unwrap_err();
        assert_eq!(err, AttributeError::MissingField("city"));

        let mut form = complete_form();
        form["bedrooms"] = Value::Null;
        let err = PropertyAttributes::try_from(request(form)).unwrap_err();
        assert_eq!(err, AttributeError::MissingField("bedrooms"));
    }

    #[test]
    fn test_first_missing_field_wins_over_bad_numbers() {
        let mut form = complete_form();
        form["area"] = json!("lots");
        form.as_object_mut().unwrap().remove("city");

        let err = PropertyAttributes::try_from(request(form)).unwrap_err();
        assert_eq!(err, AttributeError::MissingField("city"));
    }

    #[test]
    fn test_unparseable_numbers_are_invalid() {
        let mut form = complete_form();
        form["area"] = json!("lots");
        assert!(matches!(
            PropertyAttributes::try_from(request(form)),
            Err(AttributeError::InvalidValue { field: "area", .. })
        ));

        let mut form = complete_form();
        form["bathrooms"] = json!(-1);
        assert!(matches!(
            PropertyAttributes::try_from(request(form)),
            Err(AttributeError::InvalidValue { field: "bathrooms", .. })
        ));
    }

    #[test]
    fn test_overflowing_area_is_invalid() {
        for area in [json!("1e308"), json!(1e308), json!("inf"), json!("NaN")] {
            let mut form = complete_form();
            form["area"] = area;
            assert!(matches!(
                PropertyAttributes::try_from(request(form)),
                Err(AttributeError::InvalidValue { field: "area", .. })
            ));
        }

        let mut form = complete_form();
        form["area"] = json!(MAX_AREA);
        assert_eq!(
            PropertyAttributes::try_from(request(form)).unwrap().area,
            MAX_AREA
        );
    }

    #[test]
    fn test_impact_thresholds() {
        assert_eq!(Impact::from_price_increase(301.0), Impact::High);
        assert_eq!(Impact::from_price_increase(300.0), Impact::Medium);
        assert_eq!(Impact::from_price_increase(150.01), Impact::Medium);
        assert_eq!(Impact::from_price_increase(150.0), Impact::Low);
        assert_eq!(Impact::from_price_increase(0.0), Impact::Low);
    }

    #[test]
    fn test_fallback_flag_omitted_when_absent() {
        let response = EstimateResponse {
            report: EstimateReport {
                prediction: PredictionResult {
                    predicted_price: 100.0,
                    confidence_interval: ConfidenceInterval { min: 90.0, max: 110.0 },
                    feature_importance: FeatureImportance {
                        area: 40.0,
                        bedrooms: 15.0,
                        bathrooms: 10.0,
                        parking: 10.0,
                        elevator: None,
                        pool: None,
                        security: None,
                    },
                    model_version: "external".to_string(),
                },
                market_analysis: MarketAnalysis {
                    predicted: 100.0,
                    neighborhood_average: 95.0,
                    city_average: 88.0,
                    percentile: 65,
                    similar_properties: vec![],
                },
                optimization_suggestions: vec![],
            },
            fallback_used: None,
        };

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("fallback_used").is_none());
        assert!(json["prediction"]["feature_importance"].get("elevator").is_none());
        assert_eq!(json["prediction"]["model_version"], "external");
        assert_eq!(json["market_analysis"]["percentile"], 65);
    }
}
