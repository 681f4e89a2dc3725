//! Flight fare prediction engine
//!
//! This crate turns a trip description into a price estimate with a
//! heuristic uncertainty band and a ranked list of the inputs that moved the
//! estimate the most.
//!
//! ## Pipeline
//!
//! 1. [`trip::TripInput::normalize`] maps raw labels onto closed vocabularies
//! 2. [`route_stats::RouteStatistics`] fills in a missing duration
//! 3. [`encoder::FeatureEncoder`] produces the model input row
//! 4. [`forest::Forest`] evaluates every tree in the ensemble
//! 5. [`uncertainty::PredictionInterval`] summarizes member disagreement
//! 6. [`contributions`] ranks inputs against a neutral baseline
//!
//! [`TrainedModel`] bundles the fitted pieces and persists them as a single
//! verified artifact.

pub mod artifact;
pub mod contributions;
pub mod encoder;
pub mod errors;
pub mod forest;
pub mod prediction;
pub mod route_stats;
pub mod trip;
pub mod uncertainty;
pub mod vocab;

pub use artifact::{TrainedModel, ARTIFACT_FORMAT_VERSION};
pub use contributions::{Contribution, Direction, FeatureGroup, PricePredictor, TOP_CONTRIBUTORS};
pub use encoder::FeatureEncoder;
pub use errors::{FareCoreError, Result};
pub use forest::{Forest, Node, Tree};
pub use prediction::{AssumedValue, Assumption, PredictionResult};
pub use route_stats::{DurationImputation, RouteStatistics, DEFAULT_DURATION_HOURS};
pub use trip::{NormalizedTrip, OptionalField, TripInput, TripRecord};
pub use uncertainty::PredictionInterval;
pub use vocab::{Airline, CabinClass, Category, City, Stops, TimeBand};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
