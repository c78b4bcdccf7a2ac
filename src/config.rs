//! Configuration management for the no-show predictor

use crate::types::prediction::DEFAULT_THRESHOLD;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration file, optional
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub decision: DecisionConfig,
    pub logging: LoggingConfig,
}

/// Classifier configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Persisted ONNX model artifact
    pub path: PathBuf,
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
    /// Demo model used when the artifact cannot be loaded
    pub fallback: FallbackConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/random_forest_noshow_model.onnx"),
            onnx_threads: 1,
            fallback: FallbackConfig::default(),
        }
    }
}

/// Synthetic fallback model configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Number of synthetic training rows
    pub samples: usize,
    /// Number of trees in the demo forest
    pub trees: usize,
    /// RNG seed; random when unset
    pub seed: Option<u64>,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            samples: 100,
            trees: 100,
            seed: None,
        }
    }
}

/// Overbooking decision configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DecisionConfig {
    /// Show-up probability below which a patient is high no-show risk
    pub threshold: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default location, if present
    pub fn load() -> Result<Self> {
        Self::build(Path::new(DEFAULT_CONFIG_PATH), false)
    }

    /// Load configuration from a specific path, which must exist
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::build(path.as_ref(), true)
    }

    fn build(path: &Path, required: bool) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(
                Environment::with_prefix("NOSHOW")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.decision.threshold) {
            anyhow::bail!(
                "decision.threshold must be within [0, 1], got {}",
                self.decision.threshold
            );
        }
        if self.model.fallback.samples < 2 {
            anyhow::bail!(
                "model.fallback.samples must be at least 2, got {}",
                self.model.fallback.samples
            );
        }
        if self.model.fallback.trees == 0 {
            anyhow::bail!("model.fallback.trees must be positive");
        }
        Ok(())
    }
}
