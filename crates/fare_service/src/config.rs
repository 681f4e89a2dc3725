//! Service configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `FARE_*` environment variables, then command-line flags.

use fare_trainer::ModelPaths;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime configuration for the HTTP service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Historical flights CSV
    pub dataset_path: PathBuf,
    /// Model artifact; `model/fare_model.bin` beside the dataset when unset
    pub artifact_path: Option<PathBuf>,
    /// Anonymized prediction log; disabled when unset
    pub audit_log_path: Option<PathBuf>,
    /// Static web UI served under `/ui`
    pub web_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            dataset_path: PathBuf::from("Clean_Dataset.csv"),
            artifact_path: None,
            audit_log_path: Some(PathBuf::from("logs/predictions.csv")),
            web_dir: PathBuf::from("web"),
        }
    }
}

impl ServiceConfig {
    /// Load from a TOML file; missing keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply `FARE_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Unparseable values are ignored;
    /// an empty `FARE_AUDIT_LOG` disables the audit log.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = non_empty("FARE_HOST") {
            self.host = value;
        }

        if let Some(value) = non_empty("FARE_PORT") {
            if let Ok(parsed) = value.parse::<u16>() {
                self.port = parsed;
            }
        }

        if let Some(value) = non_empty("FARE_DATASET") {
            self.dataset_path = PathBuf::from(value);
        }

        if let Some(value) = non_empty("FARE_ARTIFACT") {
            self.artifact_path = Some(PathBuf::from(value));
        }

        if let Some(value) = lookup("FARE_AUDIT_LOG") {
            let trimmed = value.trim();
            self.audit_log_path = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
        }

        if let Some(value) = non_empty("FARE_WEB_DIR") {
            self.web_dir = PathBuf::from(value);
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn model_paths(&self) -> ModelPaths {
        match &self.artifact_path {
            Some(artifact) => ModelPaths::new(&self.dataset_path, artifact),
            None => ModelPaths::beside_dataset(&self.dataset_path),
        }
    }
}
