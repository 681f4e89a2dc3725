//! Flight fare trainer - random forest training and model lifecycle
//!
//! Loads the historical flight CSV, grows a reproducible random forest and
//! keeps the persisted artifact in step with the dataset.

pub mod cart;
pub mod dataset;
pub mod deterministic;
pub mod errors;
pub mod store;
pub mod trainer;

use fare_core::TrainedModel;
use std::path::Path;

pub use dataset::{LoadSummary, TrainingFrame};
pub use deterministic::LcgRng;
pub use errors::TrainerError;
pub use store::{ModelPaths, ModelStore, DEFAULT_ARTIFACT_RELATIVE};
pub use trainer::{ForestConfig, ForestTrainer};

/// Train a model directly from a CSV file using the provided configuration.
pub fn train_model_from_csv(
    path: &Path,
    config: ForestConfig,
) -> Result<TrainedModel, TrainerError> {
    let (frame, _) =
        TrainingFrame::from_csv(path).map_err(|err| TrainerError::Dataset(format!("{err:#}")))?;
    ForestTrainer::new(config).train(&frame)
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
