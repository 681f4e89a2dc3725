//! End-to-end prediction for a boundary trip

use crate::artifact::TrainedModel;
use crate::contributions::Contribution;
use crate::errors::Result;
use crate::trip::{TripInput, TripRecord};
use crate::vocab::UNKNOWN_LABEL;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

pub const METHOD_ROUTE_MEDIAN: &str = "route_median";
pub const METHOD_DEFAULT_UNKNOWN: &str = "default_unknown";

const DURATION_HINT: &str = "No duration provided; using typical median for this route.";

/// Value substituted for an input the caller did not supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssumedValue {
    Hours(f64),
    Label(String),
}

/// How one missing input was filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assumption {
    pub value: AssumedValue,
    pub imputed: bool,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Assumption {
    fn route_median(hours: f64) -> Self {
        Self {
            value: AssumedValue::Hours(hours),
            imputed: true,
            method: METHOD_ROUTE_MEDIAN.to_string(),
            hint: Some(DURATION_HINT.to_string()),
        }
    }

    fn default_unknown() -> Self {
        Self {
            value: AssumedValue::Label(UNKNOWN_LABEL.to_string()),
            imputed: true,
            method: METHOD_DEFAULT_UNKNOWN.to_string(),
            hint: None,
        }
    }
}

/// Price estimate with its interval, explanations and assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_price: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub top_contributors: Vec<Contribution>,
    pub assumptions_used: BTreeMap<String, Assumption>,
    /// The trip as actually fed to the model
    #[serde(skip)]
    pub trip: Option<TripRecord>,
}

impl TrainedModel {
    /// Normalize, impute, estimate and explain a single trip
    pub fn predict(&self, input: &TripInput) -> Result<PredictionResult> {
        let normalized = input.normalize()?;
        let mut trip = normalized.record;
        let mut assumptions = BTreeMap::new();

        let imputation = self.route_stats.impute_duration(
            trip.source_city,
            trip.destination_city,
            trip.duration,
        );
        trip.duration = Some(imputation.value);
        if let Some(hours) = imputation.imputed_value {
            assumptions.insert("duration".to_string(), Assumption::route_median(hours));
        }

        for field in &normalized.defaulted {
            assumptions.insert(field.as_str().to_string(), Assumption::default_unknown());
        }

        let interval = self.predict_with_uncertainty(&trip)?;
        let top_contributors = self.local_contributions(&trip)?;

        debug!(
            "Predicted {:.2} [{:.2}, {:.2}] for {} -> {}",
            interval.point, interval.lower, interval.upper, trip.source_city, trip.destination_city
        );

        Ok(PredictionResult {
            predicted_price: interval.point,
            lower_bound: interval.lower,
            upper_bound: interval.upper,
            top_contributors,
            assumptions_used: assumptions,
            trip: Some(trip),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::FeatureEncoder;
    use crate::forest::{Forest, Node, Tree};
    use crate::route_stats::RouteStatistics;
    use crate::vocab::{Airline, CabinClass, City, Stops, TimeBand};

    fn history() -> Vec<TripRecord> {
        [2.0, 4.0, 6.0]
            .into_iter()
            .map(|hours| TripRecord {
                source_city: City::Delhi,
                destination_city: City::Mumbai,
                cabin_class: CabinClass::Economy,
                stops: Stops::Zero,
                days_left: 10,
                duration: Some(hours),
                airline: Airline::Vistara,
                departure_time: TimeBand::Morning,
                arrival_time: TimeBand::Evening,
            })
            .collect()
    }

    fn model() -> TrainedModel {
        let history = history();
        let encoder = FeatureEncoder::fit(&history);
        let width = encoder.width();
        let forest = Forest::new(
            vec![
                Tree::new(vec![
                    Node::internal(0, 0, 3.0, 1, 2),
                    Node::leaf(1, 3000.0),
                    Node::leaf(2, 5000.0),
                ]),
                Tree::new(vec![Node::leaf(0, 4000.0)]),
            ],
            width,
        );
        TrainedModel::new(forest, encoder, RouteStatistics::build(&history), "rf-1")
    }

    fn input() -> TripInput {
        TripInput {
            source_city: City::Delhi,
            destination_city: City::Mumbai,
            cabin_class: CabinClass::Economy,
            stops: Stops::Zero,
            days_left: 10,
            duration: None,
            airline: None,
            departure_time: Some("Morning".to_string()),
            arrival_time: None,
        }
    }

    #[test]
    fn test_missing_duration_uses_route_median() {
        let result = model().predict(&input()).unwrap();

        let duration = &result.assumptions_used["duration"];
        assert_eq!(duration.method, METHOD_ROUTE_MEDIAN);
        assert_eq!(duration.value, AssumedValue::Hours(4.0));
        assert!(duration.hint.is_some());
        assert_eq!(result.trip.as_ref().and_then(|t| t.duration), Some(4.0));

        // 4.0 > 3.0 goes right: mean of 5000 and 4000
        assert_eq!(result.predicted_price, 4500.0);
        assert!(result.lower_bound <= result.predicted_price);
        assert!(result.predicted_price <= result.upper_bound);
    }

    #[test]
    fn test_omitted_optionals_are_reported() {
        let result = model().predict(&input()).unwrap();
        let keys: Vec<&str> = result.assumptions_used.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["airline", "arrival_time", "duration"]);
        assert_eq!(
            result.assumptions_used["airline"].value,
            AssumedValue::Label("Unknown".to_string())
        );
        assert_eq!(result.assumptions_used["airline"].method, METHOD_DEFAULT_UNKNOWN);
    }

    #[test]
    fn test_supplied_inputs_have_no_assumptions() {
        let mut input = input();
        input.duration = Some(2.5);
        input.airline = Some("Indigo".to_string());
        input.arrival_time = Some("Night".to_string());

        let result = model().predict(&input).unwrap();
        assert!(result.assumptions_used.is_empty());
        assert_eq!(result.predicted_price, 3500.0);
        assert!(result.top_contributors.len() <= 5);
    }

    #[test]
    fn test_assumption_json_shape() {
        let json = serde_json::to_value(Assumption::default_unknown()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"value": "Unknown", "imputed": true, "method": "default_unknown"})
        );
        let json = serde_json::to_value(Assumption::route_median(2.5)).unwrap();
        assert_eq!(json["value"], 2.5);
    }
}
