//! Per-route duration medians used to impute missing trip durations

use crate::trip::TripRecord;
use crate::vocab::City;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Global fallback when the history has no known durations at all
pub const DEFAULT_DURATION_HOURS: f64 = 2.0;

/// Median of the finite values in `values`.
///
/// Even-sized inputs average the two middle values. Returns `None` when no
/// finite value is present.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(f64::total_cmp);
    let mid = finite.len() / 2;
    if finite.len() % 2 == 0 {
        Some((finite[mid - 1] + finite[mid]) / 2.0)
    } else {
        Some(finite[mid])
    }
}

/// Outcome of duration imputation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationImputation {
    /// Duration to feed the model
    pub value: f64,
    pub was_imputed: bool,
    /// Value substituted from the table, recorded for explanations
    pub imputed_value: Option<f64>,
}

/// Read-only table of median historical durations per (origin, destination)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStatistics {
    routes: BTreeMap<(City, City), f64>,
    global_median: f64,
}

impl RouteStatistics {
    /// Build the table from historical trips, ignoring trips without a duration
    pub fn build<'a, I>(trips: I) -> Self
    where
        I: IntoIterator<Item = &'a TripRecord>,
    {
        let mut grouped: BTreeMap<(City, City), Vec<f64>> = BTreeMap::new();
        let mut all = Vec::new();

        for trip in trips {
            let Some(duration) = trip.duration.filter(|d| d.is_finite()) else {
                continue;
            };
            grouped
                .entry((trip.source_city, trip.destination_city))
                .or_default()
                .push(duration);
            all.push(duration);
        }

        let routes = grouped
            .into_iter()
            .filter_map(|(route, durations)| median(&durations).map(|m| (route, m)))
            .collect();

        Self {
            routes,
            global_median: median(&all).unwrap_or(DEFAULT_DURATION_HOURS),
        }
    }

    /// Median for an exact observed route
    pub fn route_median(&self, origin: City, destination: City) -> Option<f64> {
        self.routes.get(&(origin, destination)).copied()
    }

    /// Route median if the pair was observed, otherwise the global median
    pub fn duration_for(&self, origin: City, destination: City) -> f64 {
        self.route_median(origin, destination)
            .unwrap_or(self.global_median)
    }

    pub fn global_median(&self) -> f64 {
        self.global_median
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Use the caller's duration when it is positive, otherwise the table value
    pub fn impute_duration(
        &self,
        origin: City,
        destination: City,
        duration: Option<f64>,
    ) -> DurationImputation {
        match duration {
            Some(value) if value > 0.0 => DurationImputation {
                value,
                was_imputed: false,
                imputed_value: None,
            },
            _ => {
                let value = self.duration_for(origin, destination);
                DurationImputation {
                    value,
                    was_imputed: true,
                    imputed_value: Some(value),
                }
            }
        }
    }
}
