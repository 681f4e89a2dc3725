//! Trip records as seen by the engine

use crate::errors::{FareCoreError, Result};
use crate::vocab::{Airline, CabinClass, Category, City, Stops, TimeBand};
use serde::{Deserialize, Serialize};

/// A normalized trip, the unit every engine stage operates on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub source_city: City,
    pub destination_city: City,
    pub cabin_class: CabinClass,
    pub stops: Stops,
    pub days_left: u32,
    /// Trip duration in hours; `None` when unknown
    pub duration: Option<f64>,
    pub airline: Airline,
    pub departure_time: TimeBand,
    pub arrival_time: TimeBand,
}

/// Optional categorical fields that fall back to `Unknown` when omitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionalField {
    Airline,
    DepartureTime,
    ArrivalTime,
}

impl OptionalField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Airline => "airline",
            Self::DepartureTime => "departure_time",
            Self::ArrivalTime => "arrival_time",
        }
    }
}

/// Trip as received at the boundary, before normalization.
///
/// Required fields are already typed; optional categoricals stay raw so the
/// engine can tell "omitted" apart from "outside the vocabulary".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripInput {
    pub source_city: City,
    pub destination_city: City,
    pub cabin_class: CabinClass,
    pub stops: Stops,
    pub days_left: u32,
    pub duration: Option<f64>,
    pub airline: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

/// Result of normalizing a [`TripInput`]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTrip {
    pub record: TripRecord,
    /// Optional fields the caller left out, in field order
    pub defaulted: Vec<OptionalField>,
}

fn is_omitted(raw: &Option<String>) -> bool {
    raw.as_deref().map_or(true, str::is_empty)
}

fn normalize_optional<C: Category>(raw: &Option<String>) -> C {
    raw.as_deref().map_or(C::UNKNOWN, C::normalize)
}

impl TripInput {
    /// Validate the boundary invariants and map optional labels onto their
    /// vocabularies.
    pub fn normalize(&self) -> Result<NormalizedTrip> {
        if self.source_city == City::Unknown || self.destination_city == City::Unknown {
            return Err(FareCoreError::InvalidTrip(
                "source and destination must be named cities".to_string(),
            ));
        }
        if self.source_city == self.destination_city {
            return Err(FareCoreError::InvalidTrip(
                "Source and destination can't be the same.".to_string(),
            ));
        }
        if let Some(duration) = self.duration {
            if !(duration.is_finite() && duration > 0.0) {
                return Err(FareCoreError::InvalidTrip(format!(
                    "duration must be greater than 0, got {duration}"
                )));
            }
        }

        let mut defaulted = Vec::new();
        for (field, raw) in [
            (OptionalField::Airline, &self.airline),
            (OptionalField::DepartureTime, &self.departure_time),
            (OptionalField::ArrivalTime, &self.arrival_time),
        ] {
            if is_omitted(raw) {
                defaulted.push(field);
            }
        }

        let record = TripRecord {
            source_city: self.source_city,
            destination_city: self.destination_city,
            cabin_class: self.cabin_class,
            stops: self.stops,
            days_left: self.days_left,
            duration: self.duration,
            airline: normalize_optional(&self.airline),
            departure_time: normalize_optional(&self.departure_time),
            arrival_time: normalize_optional(&self.arrival_time),
        };

        Ok(NormalizedTrip { record, defaulted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delhi_mumbai() -> TripInput {
        TripInput {
            source_city: City::Delhi,
            destination_city: City::Mumbai,
            cabin_class: CabinClass::Economy,
            stops: Stops::Zero,
            days_left: 10,
            duration: None,
            airline: None,
            departure_time: Some(String::new()),
            arrival_time: Some("Night".to_string()),
        }
    }

    #[test]
    fn test_normalize_records_omitted_fields() {
        let normalized = delhi_mumbai().normalize().unwrap();
        assert_eq!(
            normalized.defaulted,
            vec![OptionalField::Airline, OptionalField::DepartureTime]
        );
        assert_eq!(normalized.record.airline, Airline::Unknown);
        assert_eq!(normalized.record.departure_time, TimeBand::Unknown);
        assert_eq!(normalized.record.arrival_time, TimeBand::Night);
    }

    #[test]
    fn test_out_of_vocabulary_value_is_not_an_omission() {
        let mut input = delhi_mumbai();
        input.airline = Some("Emirates".to_string());
        let normalized = input.normalize().unwrap();
        assert_eq!(normalized.record.airline, Airline::Unknown);
        assert!(!normalized.defaulted.contains(&OptionalField::Airline));
    }

    #[test]
    fn test_same_city_rejected() {
        let mut input = delhi_mumbai();
        input.destination_city = City::Delhi;
        assert!(matches!(input.normalize(), Err(FareCoreError::InvalidTrip(_))));
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        let mut input = delhi_mumbai();
        input.duration = Some(0.0);
        assert!(input.normalize().is_err());
        input.duration = Some(2.25);
        assert_eq!(input.normalize().unwrap().record.duration, Some(2.25));
    }
}
