//! Trained model bundle and its on-disk artifact
//!
//! The artifact is a single bincode file holding the forest, the fitted
//! encoder, the route statistics, the output feature names and the version
//! tag, plus a blake3 hash of the forest that is verified on load.

use crate::contributions::{self, Contribution, PricePredictor};
use crate::encoder::FeatureEncoder;
use crate::errors::{FareCoreError, Result};
use crate::forest::Forest;
use crate::route_stats::RouteStatistics;
use crate::trip::TripRecord;
use crate::uncertainty::PredictionInterval;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Current artifact format version
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Everything needed to serve predictions
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub forest: Forest,
    pub encoder: FeatureEncoder,
    pub route_stats: RouteStatistics,
    pub feature_names: Vec<String>,
    pub version: String,
}

/// Serialized form of [`TrainedModel`]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    version: String,
    model_hash: String,
    feature_names: Vec<String>,
    encoder: FeatureEncoder,
    route_stats: RouteStatistics,
    forest: Forest,
}

impl TrainedModel {
    /// Assemble a model, taking the feature names from the encoder
    pub fn new(
        forest: Forest,
        encoder: FeatureEncoder,
        route_stats: RouteStatistics,
        version: impl Into<String>,
    ) -> Self {
        let feature_names = encoder.feature_names();
        Self {
            forest,
            encoder,
            route_stats,
            feature_names,
            version: version.into(),
        }
    }

    /// Check that the pieces of the bundle agree with each other
    pub fn validate(&self) -> Result<()> {
        self.forest.validate()?;
        if self.encoder.width() != self.forest.feature_count {
            return Err(FareCoreError::ValidationFailed(format!(
                "encoder width {} does not match forest width {}",
                self.encoder.width(),
                self.forest.feature_count
            )));
        }
        if self.feature_names != self.encoder.feature_names() {
            return Err(FareCoreError::ValidationFailed(
                "feature names do not match the fitted encoder".to_string(),
            ));
        }
        Ok(())
    }

    /// Encode a trip into the forest's input row
    pub fn encode(&self, trip: &TripRecord) -> Vec<f64> {
        self.encoder.encode(trip)
    }

    /// Point estimate with the ensemble-disagreement interval
    pub fn predict_with_uncertainty(&self, trip: &TripRecord) -> Result<PredictionInterval> {
        let members = self.forest.member_predictions(&self.encode(trip))?;
        Ok(PredictionInterval::from_members(&members))
    }

    /// Top contributors relative to the neutral baseline
    pub fn local_contributions(&self, trip: &TripRecord) -> Result<Vec<Contribution>> {
        contributions::local_contributions(self, trip, self.route_stats.global_median())
    }

    /// Persist the bundle, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let artifact = ModelArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            version: self.version.clone(),
            model_hash: self.forest.hash_hex()?,
            feature_names: self.feature_names.clone(),
            encoder: self.encoder.clone(),
            route_stats: self.route_stats.clone(),
            forest: self.forest.clone(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = bincode::serialize(&artifact)?;
        fs::write(path, &bytes)?;

        info!(
            "Model {} saved to {} ({} bytes, hash {})",
            self.version,
            path.display(),
            bytes.len(),
            artifact.model_hash
        );
        Ok(())
    }

    /// Load and verify a persisted bundle
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let artifact: ModelArtifact = bincode::deserialize(&bytes)?;

        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(FareCoreError::UnsupportedFormat(artifact.format_version));
        }

        let actual = artifact.forest.hash_hex()?;
        if actual != artifact.model_hash {
            return Err(FareCoreError::IntegrityMismatch {
                expected: artifact.model_hash,
                actual,
            });
        }

        let model = Self {
            forest: artifact.forest,
            encoder: artifact.encoder,
            route_stats: artifact.route_stats,
            feature_names: artifact.feature_names,
            version: artifact.version,
        };
        model.validate()?;

        debug!(
            "Model {} loaded from {} ({} trees)",
            model.version,
            path.display(),
            model.forest.num_trees()
        );
        Ok(model)
    }
}

impl PricePredictor for TrainedModel {
    fn predict_price(&self, trip: &TripRecord) -> Result<f64> {
        self.forest.predict(&self.encode(trip))
    }
}
