//! Random forest trainer
//!
//! Fits the encoder and route statistics on the training frame, then grows
//! `n_trees` CART trees in parallel, each on its own bootstrap sample.

use fare_core::{FeatureEncoder, Forest, RouteStatistics, TrainedModel};
use rayon::prelude::*;
use tracing::{info, instrument};

use crate::cart::{CartBuilder, TreeConfig};
use crate::dataset::TrainingFrame;
use crate::deterministic::LcgRng;
use crate::errors::TrainerError;

/// Random forest training configuration
#[derive(Clone, Debug)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split; `None` means all of them
    pub max_features: Option<usize>,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 32,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl ForestConfig {
    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.n_trees == 0 {
            return Err(TrainerError::Training("n_trees must be at least 1".into()));
        }
        if self.min_samples_leaf == 0 {
            return Err(TrainerError::Training(
                "min_samples_leaf must be at least 1".into(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(TrainerError::Training(
                "min_samples_split must be at least 2".into(),
            ));
        }
        if self.max_features == Some(0) {
            return Err(TrainerError::Training(
                "max_features must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
        }
    }
}

/// Version tag for a model trained now
pub fn training_version() -> String {
    format!("rf-{}", chrono::Utc::now().timestamp())
}

/// Random forest trainer
pub struct ForestTrainer {
    config: ForestConfig,
}

impl ForestTrainer {
    pub fn new(config: ForestConfig) -> Self {
        Self { config }
    }

    /// Train a model tagged `rf-<unix seconds>`
    pub fn train(&self, frame: &TrainingFrame) -> Result<TrainedModel, TrainerError> {
        self.train_with_version(frame, training_version())
    }

    /// Train a model with an explicit version tag
    #[instrument(skip_all, fields(samples = frame.len(), trees = self.config.n_trees))]
    pub fn train_with_version(
        &self,
        frame: &TrainingFrame,
        version: String,
    ) -> Result<TrainedModel, TrainerError> {
        self.config.validate()?;
        if frame.is_empty() {
            return Err(TrainerError::Dataset("training frame is empty".into()));
        }
        if frame.trips.len() != frame.prices.len() {
            return Err(TrainerError::Dataset(format!(
                "{} trips but {} prices",
                frame.trips.len(),
                frame.prices.len()
            )));
        }

        let encoder = FeatureEncoder::fit(&frame.trips);
        let route_stats = RouteStatistics::build(&frame.trips);
        let rows: Vec<Vec<f64>> = frame.trips.iter().map(|trip| encoder.encode(trip)).collect();

        info!(
            "Encoded {} samples into {} features ({} routes, global duration median {:.2}h)",
            rows.len(),
            encoder.width(),
            route_stats.route_count(),
            route_stats.global_median()
        );

        let tree_config = self.config.tree_config();
        let n_samples = rows.len();

        let trees = (0..self.config.n_trees)
            .into_par_iter()
            .map(|member| {
                let mut rng = LcgRng::for_member(self.config.seed, member);
                let sample = if self.config.bootstrap {
                    rng.bootstrap(n_samples)
                } else {
                    (0..n_samples).collect()
                };
                CartBuilder::new(&rows, &frame.prices, &tree_config).build(&sample, &mut rng)
            })
            .collect();

        let forest = Forest::new(trees, encoder.width());
        forest.validate()?;

        let model = TrainedModel::new(forest, encoder, route_stats, version);
        info!(
            "Trained {} trees (max depth {}) as {}",
            model.forest.num_trees(),
            model
                .forest
                .trees
                .iter()
                .map(|tree| tree.depth())
                .max()
                .unwrap_or(0),
            model.version
        );
        Ok(model)
    }
}
