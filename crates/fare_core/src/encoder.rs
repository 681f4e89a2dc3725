//! Feature encoding: numeric block followed by one-hot categorical blocks
//!
//! Layout of an encoded row:
//!
//! | block | columns |
//! |-------|---------|
//! | numeric | `duration`, `days_left`, `stops`, `class` |
//! | one-hot | `airline_*`, `source_city_*`, `departure_time_*`, `arrival_time_*`, `destination_city_*` |
//!
//! One-hot categories are the sorted distinct labels seen at fit time. A label
//! never seen at fit time encodes as all zeros within its block. Missing
//! numeric values are filled with the column's fit-time median.

use crate::route_stats::median;
use crate::trip::TripRecord;
use crate::vocab::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Numeric columns, in encoding order
pub const NUMERIC_FEATURES: [&str; 4] = ["duration", "days_left", "stops", "class"];

/// Categorical columns, in encoding order
pub const CATEGORICAL_FEATURES: [CategoricalField; 5] = [
    CategoricalField::Airline,
    CategoricalField::SourceCity,
    CategoricalField::DepartureTime,
    CategoricalField::ArrivalTime,
    CategoricalField::DestinationCity,
];

/// A one-hot encoded trip field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoricalField {
    Airline,
    SourceCity,
    DepartureTime,
    ArrivalTime,
    DestinationCity,
}

impl CategoricalField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Airline => "airline",
            Self::SourceCity => "source_city",
            Self::DepartureTime => "departure_time",
            Self::ArrivalTime => "arrival_time",
            Self::DestinationCity => "destination_city",
        }
    }

    pub fn label(&self, trip: &TripRecord) -> &'static str {
        match self {
            Self::Airline => trip.airline.as_str(),
            Self::SourceCity => trip.source_city.as_str(),
            Self::DepartureTime => trip.departure_time.as_str(),
            Self::ArrivalTime => trip.arrival_time.as_str(),
            Self::DestinationCity => trip.destination_city.as_str(),
        }
    }
}

fn numeric_values(trip: &TripRecord) -> [Option<f64>; 4] {
    [
        trip.duration.filter(|d| d.is_finite()),
        Some(f64::from(trip.days_left)),
        Some(f64::from(trip.stops.code())),
        Some(f64::from(trip.cabin_class.code())),
    ]
}

/// One fitted one-hot block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct OneHotBlock {
    field: CategoricalField,
    categories: Vec<String>,
}

/// Encoder fitted on historical trips
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEncoder {
    numeric_medians: [f64; 4],
    blocks: Vec<OneHotBlock>,
}

impl FeatureEncoder {
    /// Learn numeric medians and one-hot categories from `trips`
    pub fn fit(trips: &[TripRecord]) -> Self {
        let mut columns: [Vec<f64>; 4] = Default::default();
        for trip in trips {
            for (column, value) in columns.iter_mut().zip(numeric_values(trip)) {
                if let Some(v) = value {
                    column.push(v);
                }
            }
        }
        let numeric_medians = columns.map(|column| median(&column).unwrap_or(0.0));

        let blocks = CATEGORICAL_FEATURES
            .iter()
            .map(|&field| {
                let categories: BTreeSet<&str> =
                    trips.iter().map(|trip| field.label(trip)).collect();
                OneHotBlock {
                    field,
                    categories: categories.into_iter().map(str::to_string).collect(),
                }
            })
            .collect();

        Self {
            numeric_medians,
            blocks,
        }
    }

    /// Total number of encoded columns
    pub fn width(&self) -> usize {
        NUMERIC_FEATURES.len()
            + self
                .blocks
                .iter()
                .map(|block| block.categories.len())
                .sum::<usize>()
    }

    /// Output column names, aligned with [`FeatureEncoder::encode`]
    pub fn feature_names(&self) -> Vec<String> {
        let mut names: Vec<String> = NUMERIC_FEATURES.iter().map(|n| n.to_string()).collect();
        for block in &self.blocks {
            for category in &block.categories {
                names.push(format!("{}_{}", block.field.name(), category));
            }
        }
        names
    }

    /// Fit-time median for a numeric column
    pub fn numeric_median(&self, name: &str) -> Option<f64> {
        NUMERIC_FEATURES
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.numeric_medians[idx])
    }

    /// Encode a trip into a row of `width()` values
    pub fn encode(&self, trip: &TripRecord) -> Vec<f64> {
        let mut row = Vec::with_capacity(self.width());

        for (value, fallback) in numeric_values(trip).iter().zip(self.numeric_medians) {
            row.push(value.unwrap_or(fallback));
        }

        for block in &self.blocks {
            let label = block.field.label(trip);
            row.extend(
                block
                    .categories
                    .iter()
                    .map(|category| if category == label { 1.0 } else { 0.0 }),
            );
        }

        row
    }
}
