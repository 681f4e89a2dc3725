//! Request and response bodies for the HTTP API

use fare_core::vocab::{CabinClass, Category, City, Stops};
use fare_core::{Assumption, Contribution, TripInput};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SAME_CITY_MESSAGE: &str = "Source and destination can't be the same.";

/// Body of `POST /api/predict`.
///
/// Fields stay raw so that vocabulary errors surface as validation messages
/// rather than opaque deserialization failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub source_city: String,
    pub destination_city: String,
    #[serde(rename = "class")]
    pub cabin_class: String,
    pub stops: String,
    pub days_left: i64,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub airline: Option<String>,
    #[serde(default)]
    pub departure_time: Option<String>,
    #[serde(default)]
    pub arrival_time: Option<String>,
    /// Accepted for completeness, never used by the model
    #[serde(default)]
    pub flight: Option<String>,
}

fn required_city(field: &str, raw: &str) -> Result<City, String> {
    City::from_label(raw)
        .ok_or_else(|| format!("{field}: '{raw}' is not one of {}", listing(City::ALL)))
}

fn listing<C: Category>(values: &[C]) -> String {
    values
        .iter()
        .map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl PredictRequest {
    /// Check the boundary rules and convert into an engine input
    pub fn validate(&self) -> Result<TripInput, String> {
        let source_city = required_city("source_city", &self.source_city)?;
        let destination_city = required_city("destination_city", &self.destination_city)?;
        if source_city == destination_city {
            return Err(SAME_CITY_MESSAGE.to_string());
        }

        let cabin_class = CabinClass::from_label(&self.cabin_class).ok_or_else(|| {
            format!("class: '{}' is not one of Economy, Business", self.cabin_class)
        })?;
        let stops = Stops::from_label(&self.stops).ok_or_else(|| {
            format!("stops: '{}' is not one of zero, one, two_or_more", self.stops)
        })?;

        if self.days_left < 0 {
            return Err(format!(
                "days_left: must be greater than or equal to 0, got {}",
                self.days_left
            ));
        }
        let days_left = u32::try_from(self.days_left)
            .map_err(|_| format!("days_left: {} is out of range", self.days_left))?;

        if let Some(duration) = self.duration {
            if !(duration.is_finite() && duration > 0.0) {
                return Err(format!("duration: must be greater than 0, got {duration}"));
            }
        }

        Ok(TripInput {
            source_city,
            destination_city,
            cabin_class,
            stops,
            days_left,
            duration: self.duration,
            airline: self.airline.clone(),
            departure_time: self.departure_time.clone(),
            arrival_time: self.arrival_time.clone(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_price: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub top_contributors: Vec<Contribution>,
    pub assumptions_used: BTreeMap<String, Assumption>,
    pub echo: PredictRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_version: String,
    pub has_pipeline: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataDefaults {
    pub global_duration_median: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataResponse {
    pub allowed: BTreeMap<String, Vec<String>>,
    pub defaults: MetadataDefaults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteMedianQuery {
    pub source_city: String,
    pub destination_city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteMedianResponse {
    pub source_city: String,
    pub destination_city: String,
    pub route_median: Option<f64>,
    pub global_median: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub endpoints: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PredictRequest {
        serde_json::from_value(serde_json::json!({
            "source_city": "Delhi",
            "destination_city": "Mumbai",
            "class": "Economy",
            "stops": "zero",
            "days_left": 10,
            "flight": "UK-995"
        }))
        .unwrap()
    }

    #[test]
    fn test_minimal_request_validates() {
        let input = request().validate().unwrap();
        assert_eq!(input.source_city, City::Delhi);
        assert_eq!(input.cabin_class, CabinClass::Economy);
        assert_eq!(input.stops, Stops::Zero);
        assert_eq!(input.duration, None);
        assert_eq!(input.airline, None);
    }

    #[test]
    fn test_vocabulary_violations() {
        let mut bad_city = request();
        bad_city.source_city = "Pune".to_string();
        assert!(bad_city.validate().unwrap_err().starts_with("source_city"));

        let mut unknown_city = request();
        unknown_city.destination_city = "Unknown".to_string();
        assert!(unknown_city.validate().is_err());

        let mut bad_class = request();
        bad_class.cabin_class = "First".to_string();
        assert!(bad_class.validate().unwrap_err().starts_with("class"));

        let mut bad_stops = request();
        bad_stops.stops = "1".to_string();
        assert!(bad_stops.validate().unwrap_err().starts_with("stops"));
    }

    #[test]
    fn test_numeric_rules() {
        let mut negative = request();
        negative.days_left = -1;
        assert!(negative.validate().is_err());

        let mut zero_duration = request();
        zero_duration.duration = Some(0.0);
        assert!(zero_duration.validate().is_err());
    }

    #[test]
    fn test_same_city() {
        let mut same = request();
        same.destination_city = "Delhi".to_string();
        assert_eq!(same.validate().unwrap_err(), SAME_CITY_MESSAGE);
    }

    #[test]
    fn test_optional_labels_are_never_rejected() {
        let mut req = request();
        req.airline = Some("Emirates".to_string());
        req.arrival_time = Some("Noon".to_string());
        let input = req.validate().unwrap();
        assert_eq!(input.airline.as_deref(), Some("Emirates"));
    }

    #[test]
    fn test_echo_uses_class_key() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["class"], "Economy");
        assert_eq!(json["flight"], "UK-995");
        assert!(json.get("cabin_class").is_none());
    }
}
