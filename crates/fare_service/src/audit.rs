//! Anonymized prediction audit log
//!
//! Sinks never fail the caller: write errors are logged and dropped.

use crate::schemas::PredictRequest;
use fare_core::PredictionResult;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::warn;

/// One logged prediction; the flight number is never recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub ts: String,
    pub predicted: f64,
    pub lower: f64,
    pub upper: f64,
    pub source_city: String,
    pub destination_city: String,
    pub class: String,
    pub stops: String,
    pub days_left: i64,
    pub duration: Option<f64>,
    pub airline: Option<String>,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
}

impl AuditEntry {
    pub fn new(request: &PredictRequest, result: &PredictionResult) -> Self {
        Self {
            ts: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            predicted: result.predicted_price,
            lower: result.lower_bound,
            upper: result.upper_bound,
            source_city: request.source_city.clone(),
            destination_city: request.destination_city.clone(),
            class: request.cabin_class.clone(),
            stops: request.stops.clone(),
            days_left: request.days_left,
            duration: request.duration,
            airline: request.airline.clone(),
            departure_time: request.departure_time.clone(),
            arrival_time: request.arrival_time.clone(),
        }
    }
}

/// Destination for audit entries
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: &AuditEntry);
}

/// Discards every entry
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditLog;

impl AuditSink for NoopAuditLog {
    fn record(&self, _entry: &AuditEntry) {}
}

/// Appends entries to a CSV file, writing the header when the file is new
#[derive(Debug)]
pub struct CsvAuditLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvAuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, entry: &AuditEntry) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let header_needed = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(header_needed)
            .from_writer(file);
        writer.serialize(entry)?;
        writer.flush()?;
        Ok(())
    }
}

impl AuditSink for CsvAuditLog {
    fn record(&self, entry: &AuditEntry) {
        if let Err(err) = self.append(entry) {
            warn!("Failed to append audit entry to {}: {:#}", self.path.display(), err);
        }
    }
}
