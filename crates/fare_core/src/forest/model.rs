//! Random forest regressor with per-member outputs
//!
//! The aggregate prediction is the unweighted mean of the member trees. Member
//! outputs are exposed individually because the uncertainty estimate is built
//! from their spread.

use super::tree::Tree;
use crate::errors::{FareCoreError, Result};
use serde::{Deserialize, Serialize};

/// Current forest format version
pub const FOREST_FORMAT_VERSION: i32 = 1;

/// An ensemble of regression trees trained on bootstrap samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    /// Format version (always 1 for now)
    pub version: i32,

    /// Width of the encoded rows the trees were trained on
    pub feature_count: usize,

    /// Ensemble members
    pub trees: Vec<Tree>,
}

impl Forest {
    pub fn new(trees: Vec<Tree>, feature_count: usize) -> Self {
        Self {
            version: FOREST_FORMAT_VERSION,
            feature_count,
            trees,
        }
    }

    /// Validate forest structure
    pub fn validate(&self) -> Result<()> {
        if self.version != FOREST_FORMAT_VERSION {
            return Err(FareCoreError::ValidationFailed(format!(
                "Unsupported forest version: {}",
                self.version
            )));
        }

        if self.trees.is_empty() {
            return Err(FareCoreError::ValidationFailed(
                "Forest must have at least one tree".to_string(),
            ));
        }

        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.feature_count).map_err(|e| {
                FareCoreError::ValidationFailed(format!("Tree {} validation failed: {}", i, e))
            })?;
        }

        Ok(())
    }

    fn check_width(&self, features: &[f64]) -> Result<()> {
        if features.len() != self.feature_count {
            return Err(FareCoreError::FeatureMismatch {
                expected: self.feature_count,
                actual: features.len(),
            });
        }
        Ok(())
    }

    /// Output of every ensemble member for one encoded row
    pub fn member_predictions(&self, features: &[f64]) -> Result<Vec<f64>> {
        self.check_width(features)?;
        Ok(self.trees.iter().map(|tree| tree.evaluate(features)).collect())
    }

    /// Mean of the member outputs
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let members = self.member_predictions(features)?;
        if members.is_empty() {
            return Ok(0.0);
        }
        Ok(members.iter().sum::<f64>() / members.len() as f64)
    }

    /// Blake3 hash of the bincode encoding, as hex
    pub fn hash_hex(&self) -> Result<String> {
        let bytes = bincode::serialize(self)?;
        Ok(hex::encode(blake3::hash(&bytes).as_bytes()))
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}
