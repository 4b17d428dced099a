//! Simulator errors.

use pulsegen_engine::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a scenario could not be run.
#[derive(Debug, Error)]
pub enum SimError {
    /// The scenario file could not be read.
    #[error("cannot read scenario {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The scenario is not valid YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The scenario or report is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The engine configuration is rejected.
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),

    /// A scenario field is out of range.
    #[error("invalid scenario: {0}")]
    InvalidScenario(String),
}
