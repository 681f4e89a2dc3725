//! Approximate per-feature attribution by counterfactual substitution
//!
//! A baseline trip is built from the input with the optional categoricals
//! forced to `Unknown` and the duration forced to the global median. Each
//! feature group is then restored on its own and the change in prediction
//! relative to the baseline is recorded. Interactions between groups are
//! ignored; this is a one-at-a-time marginal approximation.

use crate::errors::Result;
use crate::trip::TripRecord;
use crate::vocab::{Airline, TimeBand};
use serde::{Deserialize, Serialize};

/// Number of contributors reported per prediction
pub const TOP_CONTRIBUTORS: usize = 5;

/// Anything that can price a trip
pub trait PricePredictor {
    fn predict_price(&self, trip: &TripRecord) -> Result<f64>;
}

/// Direction of a contribution relative to the baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "+")]
    Increase,
    #[serde(rename = "-")]
    Decrease,
}

impl Direction {
    pub fn of(delta: f64) -> Self {
        if delta >= 0.0 {
            Self::Increase
        } else {
            Self::Decrease
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "+",
            Self::Decrease => "-",
        }
    }
}

/// One ranked explanation entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub feature: String,
    /// Absolute change in price
    pub contribution: f64,
    pub direction: Direction,
}

/// Input groups toggled one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureGroup {
    Class,
    Stops,
    DaysLeft,
    Duration,
    Airline,
    SourceCity,
    DepartureTime,
    ArrivalTime,
    DestinationCity,
}

impl FeatureGroup {
    pub const ALL: [FeatureGroup; 9] = [
        FeatureGroup::Class,
        FeatureGroup::Stops,
        FeatureGroup::DaysLeft,
        FeatureGroup::Duration,
        FeatureGroup::Airline,
        FeatureGroup::SourceCity,
        FeatureGroup::DepartureTime,
        FeatureGroup::ArrivalTime,
        FeatureGroup::DestinationCity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Stops => "stops",
            Self::DaysLeft => "days_left",
            Self::Duration => "duration",
            Self::Airline => "airline",
            Self::SourceCity => "source_city",
            Self::DepartureTime => "departure_time",
            Self::ArrivalTime => "arrival_time",
            Self::DestinationCity => "destination_city",
        }
    }

    /// Copy this group's value(s) from `actual` onto `target`
    fn restore(&self, target: &mut TripRecord, actual: &TripRecord) {
        match self {
            Self::Class => target.cabin_class = actual.cabin_class,
            Self::Stops => target.stops = actual.stops,
            Self::DaysLeft => target.days_left = actual.days_left,
            Self::Duration => target.duration = actual.duration,
            Self::Airline => target.airline = actual.airline,
            Self::SourceCity => target.source_city = actual.source_city,
            Self::DepartureTime => target.departure_time = actual.departure_time,
            Self::ArrivalTime => target.arrival_time = actual.arrival_time,
            Self::DestinationCity => target.destination_city = actual.destination_city,
        }
    }
}

/// Neutral reference trip for attribution.
///
/// Required fields keep their real values, so toggling them yields a zero
/// delta; only the optional categoricals and the duration move.
pub fn baseline(trip: &TripRecord, global_duration: f64) -> TripRecord {
    TripRecord {
        airline: Airline::Unknown,
        departure_time: TimeBand::Unknown,
        arrival_time: TimeBand::Unknown,
        duration: Some(global_duration),
        ..trip.clone()
    }
}

/// Rank the feature groups by how far restoring each one moves the price
pub fn local_contributions<P: PricePredictor + ?Sized>(
    predictor: &P,
    trip: &TripRecord,
    global_duration: f64,
) -> Result<Vec<Contribution>> {
    let base = baseline(trip, global_duration);
    let base_prediction = predictor.predict_price(&base)?;

    let mut contributions = Vec::with_capacity(FeatureGroup::ALL.len());
    for group in FeatureGroup::ALL {
        let mut variant = base.clone();
        group.restore(&mut variant, trip);
        let delta = predictor.predict_price(&variant)? - base_prediction;
        contributions.push(Contribution {
            feature: group.name().to_string(),
            contribution: delta.abs(),
            direction: Direction::of(delta),
        });
    }

    // Stable sort keeps group order among equal magnitudes
    contributions.sort_by(|a, b| b.contribution.total_cmp(&a.contribution));
    contributions.truncate(TOP_CONTRIBUTORS);
    Ok(contributions)
}
