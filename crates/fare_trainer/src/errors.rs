use fare_core::FareCoreError;
use thiserror::Error;

/// Errors returned by the forest trainer and the model store.
#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("training error: {0}")]
    Training(String),

    #[error("model error: {0}")]
    Model(#[from] FareCoreError),
}
