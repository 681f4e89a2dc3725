//! Historical flight CSV loading and preparation
//!
//! Columns are addressed by header name. The row-index column and the
//! `flight` column are ignored. Categorical labels are normalized onto their
//! vocabularies, `stops` and `class` must be valid labels, and the numeric
//! columns are coerced:
//!
//! - `days_left`: unparseable → 0, negative → 0, fractional part dropped
//! - `duration`: unparseable or non-finite → missing
//! - `price`: unparseable or non-finite → row skipped

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use fare_core::vocab::{Airline, CabinClass, Category, City, Stops, TimeBand};
use fare_core::TripRecord;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

/// One CSV row as read, before any coercion
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFlight {
    airline: Option<String>,
    source_city: Option<String>,
    departure_time: Option<String>,
    stops: Option<String>,
    arrival_time: Option<String>,
    destination_city: Option<String>,
    class: Option<String>,
    duration: Option<String>,
    days_left: Option<String>,
    price: Option<String>,
}

/// Counters reported after loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub rows_kept: usize,
    /// Rows whose stops or class label was outside the vocabulary
    pub skipped_labels: usize,
    /// Rows without a usable (finite, positive) price
    pub skipped_price: usize,
}

/// Prepared training data: normalized trips with their observed prices
#[derive(Debug, Clone, Default)]
pub struct TrainingFrame {
    pub trips: Vec<TripRecord>,
    pub prices: Vec<f64>,
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// `days_left` coercion: invalid → 0, clipped at 0, truncated
pub fn coerce_days_left(raw: Option<&str>) -> u32 {
    match parse_number(raw) {
        Some(days) if days > 0.0 => days.trunc().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// `duration` coercion: invalid → missing
pub fn coerce_duration(raw: Option<&str>) -> Option<f64> {
    parse_number(raw)
}

fn category<C: Category>(raw: &Option<String>) -> C {
    C::normalize(raw.as_deref().unwrap_or_default())
}

impl RawFlight {
    /// `None` when the row must be dropped, with the reason counted in `summary`
    fn prepare(self, summary: &mut LoadSummary) -> Option<(TripRecord, f64)> {
        let stops = self.stops.as_deref().and_then(Stops::from_label);
        let class = self.class.as_deref().and_then(CabinClass::from_label);
        let (Some(stops), Some(cabin_class)) = (stops, class) else {
            summary.skipped_labels += 1;
            return None;
        };

        let Some(price) = parse_number(self.price.as_deref()).filter(|p| *p > 0.0) else {
            summary.skipped_price += 1;
            return None;
        };

        let trip = TripRecord {
            source_city: category::<City>(&self.source_city),
            destination_city: category::<City>(&self.destination_city),
            cabin_class,
            stops,
            days_left: coerce_days_left(self.days_left.as_deref()),
            duration: coerce_duration(self.duration.as_deref()),
            airline: category::<Airline>(&self.airline),
            departure_time: category::<TimeBand>(&self.departure_time),
            arrival_time: category::<TimeBand>(&self.arrival_time),
        };
        Some((trip, price))
    }
}

impl TrainingFrame {
    /// Load and prepare the historical dataset
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<(Self, LoadSummary)> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset: {}", path.display()))?;

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let headers = reader.headers().context("Failed to read CSV header")?.clone();
        if !headers.iter().any(|h| h == "price") {
            bail!("Dataset {} has no price column", path.display());
        }

        let mut frame = Self::default();
        let mut summary = LoadSummary::default();

        for (line_idx, result) in reader.deserialize::<RawFlight>().enumerate() {
            let raw = result.with_context(|| format!("Row {}: malformed record", line_idx + 1))?;
            summary.rows_read += 1;
            if let Some((trip, price)) = raw.prepare(&mut summary) {
                frame.push(trip, price);
            }
        }
        summary.rows_kept = frame.len();

        if summary.skipped_labels + summary.skipped_price > 0 {
            warn!(
                "Skipped {} rows with invalid stops/class and {} rows without a positive price",
                summary.skipped_labels, summary.skipped_price
            );
        }
        if frame.is_empty() {
            bail!("Dataset {} has no usable rows", path.display());
        }

        info!(
            "Loaded {} of {} rows from {}",
            summary.rows_kept,
            summary.rows_read,
            path.display()
        );
        Ok((frame, summary))
    }

    pub fn push(&mut self, trip: TripRecord, price: f64) {
        self.trips.push(trip);
        self.prices.push(price);
    }

    /// Get number of samples
    pub fn len(&self) -> usize {
        self.trips.len()
    }

    /// Check if the frame is empty
    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }
}
