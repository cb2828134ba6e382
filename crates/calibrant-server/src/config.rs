//! Server configuration
//!
//! Loaded from a YAML file when one exists; every field can be overridden
//! from the command line. With no file and no model flags the server runs
//! the lexicon fallback classifier.

use anyhow::Context;
use calibrant_core::Temperature;
use calibrant_model::{DeviceKind, ModelSource};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Default calibration temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Model checkpoint settings; absent means lexicon fallback
    #[serde(default)]
    pub model: Option<ModelSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSection {
    /// Local model directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// HuggingFace Hub repository (used when no local path is set)
    #[serde(default)]
    pub hf_repo: Option<String>,

    /// Hub revision
    #[serde(default)]
    pub revision: Option<String>,

    /// Inference device: cpu, cuda[:N], or metal[:N]
    #[serde(default = "default_device")]
    pub device: String,

    /// Maximum tokenized sequence length
    #[serde(default)]
    pub max_length: Option<usize>,
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_temperature() -> f32 {
    Temperature::DEFAULT.get()
}

fn default_device() -> String {
    "cpu".to_string()
}

// serde field defaults only apply during deserialization; the CLI path
// constructs sections directly, so Default must match them
impl Default for ModelSection {
    fn default() -> Self {
        Self {
            path: None,
            hf_repo: None,
            revision: None,
            device: default_device(),
            max_length: None,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            temperature: default_temperature(),
            model: None,
        }
    }
}

impl ServerConfig {
    /// Load from a YAML file, or fall back to defaults when the file does not
    /// exist
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Validated default temperature
    pub fn default_temperature(&self) -> anyhow::Result<Temperature> {
        Temperature::new(self.temperature)
            .with_context(|| "invalid default temperature in configuration")
    }
}

impl ModelSection {
    /// Resolve the configured source, preferring a local path over the Hub
    pub fn source(&self) -> Option<ModelSource> {
        if let Some(path) = &self.path {
            return Some(ModelSource::Local(path.clone()));
        }
        self.hf_repo.as_ref().map(|repo| ModelSource::HuggingFace {
            repo_id: repo.clone(),
            revision: self.revision.clone(),
        })
    }

    pub fn device_kind(&self) -> anyhow::Result<DeviceKind> {
        Ok(self.device.parse::<DeviceKind>()?)
    }
}
