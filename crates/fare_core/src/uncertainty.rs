//! Prediction interval from ensemble disagreement
//!
//! The interval is `mean ± 1.96·σ` over member outputs, σ being the population
//! standard deviation. This is a normal-approximation heuristic over tree
//! disagreement, not a calibrated interval.

use serde::Serialize;

/// z-score for a two-sided 95% normal interval
pub const Z_95: f64 = 1.96;

/// Point estimate with a non-negative interval around it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionInterval {
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
    pub std_dev: f64,
}

/// Population standard deviation (ddof = 0)
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

impl PredictionInterval {
    /// Build the interval from the individual member predictions
    pub fn from_members(members: &[f64]) -> Self {
        if members.is_empty() {
            return Self {
                point: 0.0,
                lower: 0.0,
                upper: 0.0,
                std_dev: 0.0,
            };
        }

        let mean = members.iter().sum::<f64>() / members.len() as f64;
        let std_dev = std_dev(members);

        // Prices cannot be negative; clamping all three keeps lower <= point <= upper
        Self {
            point: mean.max(0.0),
            lower: (mean - Z_95 * std_dev).max(0.0),
            upper: (mean + Z_95 * std_dev).max(0.0),
            std_dev,
        }
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}
