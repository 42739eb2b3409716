//! Serializable run configuration.

use factorlab_core::WindowConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Complete configuration for a single feature-generation run.
///
/// Captures everything needed to reproduce the run: where the corpus and
/// relation snapshot live, the window specification, and where artifacts go.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    pub data: DataConfig,
    pub window: WindowSpec,
    #[serde(default)]
    pub output: OutputConfig,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Deterministic content hash of this configuration.
    ///
    /// Two runs with identical configs share a RunId; combined with the
    /// dataset hash this makes artifact directories content-addressable.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

/// Input locations for the two external snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// CSV of end-of-day records from the ingestion collaborator.
    pub records: PathBuf,
    /// CSV of `parent,related` pairs from the relationship collaborator.
    pub relations: PathBuf,
}

/// Window specification: a named preset or explicit horizons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowSpec {
    /// 1/5/10-day price changes, no volume channels.
    PriceOnly,

    /// 1/2/4-day price changes plus raw volume channels.
    ShortWithVolume,

    /// Explicit horizon list.
    Custom {
        lookback_horizons: Vec<usize>,
        #[serde(default)]
        include_volume_features: bool,
    },
}

impl WindowSpec {
    pub fn to_window_config(&self) -> WindowConfig {
        match self {
            WindowSpec::PriceOnly => WindowConfig::price_only(),
            WindowSpec::ShortWithVolume => WindowConfig::short_with_volume(),
            WindowSpec::Custom {
                lookback_horizons,
                include_volume_features,
            } => WindowConfig {
                lookback_horizons: lookback_horizons.clone(),
                include_volume_features: *include_volume_features,
            },
        }
    }
}

/// Artifact output location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
        }
    }
}

/// Errors reading or parsing a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
