//! Train-or-load model store
//!
//! The persisted artifact is reused while it is at least as new as the
//! dataset; otherwise the forest is retrained and the artifact rewritten.
//! Initialization runs at most once per store, even under concurrent first
//! calls.

use fare_core::TrainedModel;
use once_cell::sync::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, instrument, warn};

use crate::errors::TrainerError;
use crate::train_model_from_csv;
use crate::trainer::ForestConfig;

/// Artifact location relative to the dataset's directory
pub const DEFAULT_ARTIFACT_RELATIVE: &str = "model/fare_model.bin";

/// Dataset and artifact locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPaths {
    pub dataset: PathBuf,
    pub artifact: PathBuf,
}

impl ModelPaths {
    pub fn new(dataset: impl Into<PathBuf>, artifact: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
            artifact: artifact.into(),
        }
    }

    /// Artifact at `model/fare_model.bin` next to the dataset
    pub fn beside_dataset(dataset: impl Into<PathBuf>) -> Self {
        let dataset = dataset.into();
        let artifact = dataset
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(DEFAULT_ARTIFACT_RELATIVE);
        Self { dataset, artifact }
    }

    /// True when the artifact exists and is not older than the dataset
    pub fn artifact_is_fresh(&self) -> bool {
        self.artifact.exists() && modified_secs(&self.artifact) >= modified_secs(&self.dataset)
    }
}

/// Modification time in seconds since the epoch; 0 when unavailable
pub fn modified_secs(path: &Path) -> f64 {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map_or(0.0, |elapsed| elapsed.as_secs_f64())
}

/// Holds the single trained model for a dataset/artifact pair
pub struct ModelStore {
    paths: ModelPaths,
    config: ForestConfig,
    model: OnceCell<Arc<TrainedModel>>,
}

impl ModelStore {
    pub fn new(paths: ModelPaths, config: ForestConfig) -> Self {
        Self {
            paths,
            config,
            model: OnceCell::new(),
        }
    }

    pub fn paths(&self) -> &ModelPaths {
        &self.paths
    }

    /// Return the model, loading or training it on first use
    pub fn load_or_train(&self) -> Result<Arc<TrainedModel>, TrainerError> {
        self.model
            .get_or_try_init(|| self.initialize().map(Arc::new))
            .map(Arc::clone)
    }

    /// The model if it has already been initialized
    pub fn get(&self) -> Option<Arc<TrainedModel>> {
        self.model.get().cloned()
    }

    #[instrument(skip_all, fields(dataset = %self.paths.dataset.display()))]
    fn initialize(&self) -> Result<TrainedModel, TrainerError> {
        if self.paths.artifact_is_fresh() {
            return self.load_artifact();
        }

        if self.paths.artifact.exists() {
            info!("Dataset is newer than {}; retraining", self.paths.artifact.display());
        } else {
            info!("No artifact at {}; training", self.paths.artifact.display());
        }
        self.train_and_persist()
    }

    fn load_artifact(&self) -> Result<TrainedModel, TrainerError> {
        let mut model = TrainedModel::load(&self.paths.artifact)?;
        if model.version.is_empty() {
            let fallback = format!("loaded-{}", modified_secs(&self.paths.artifact) as u64);
            warn!("Artifact has no version tag, using {}", fallback);
            model.version = fallback;
        }
        info!(
            "Loaded model {} from {}",
            model.version,
            self.paths.artifact.display()
        );
        Ok(model)
    }

    fn train_and_persist(&self) -> Result<TrainedModel, TrainerError> {
        let started = SystemTime::now();
        let model = train_model_from_csv(&self.paths.dataset, self.config.clone())?;
        model.save(&self.paths.artifact)?;

        let elapsed = started.elapsed().map(|d| d.as_secs_f64()).unwrap_or_default();
        info!("Trained model {} in {:.1}s", model.version, elapsed);
        Ok(model)
    }
}
