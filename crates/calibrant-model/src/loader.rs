//! Model source resolution and device selection

use crate::config::REQUIRED_FILES;
use calibrant_core::{Error, Result};
use candle_core::Device;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Where model files come from
#[derive(Debug, Clone)]
pub enum ModelSource {
    /// A local directory holding config, weights, and tokenizer
    Local(PathBuf),

    /// A HuggingFace Hub repository, downloaded into the hub cache
    HuggingFace {
        repo_id: String,
        revision: Option<String>,
    },
}

impl ModelSource {
    /// Resolve to a local directory, downloading from the Hub if needed
    pub fn resolve(&self) -> Result<PathBuf> {
        match self {
            Self::Local(path) => {
                if !path.is_dir() {
                    return Err(Error::config(format!(
                        "model directory does not exist: {}",
                        path.display()
                    )));
                }
                Ok(path.clone())
            }
            Self::HuggingFace { repo_id, revision } => {
                tracing::info!(
                    "downloading model from HuggingFace: {repo_id} @ {}",
                    revision.as_deref().unwrap_or("main")
                );

                let api = hf_hub::api::sync::Api::new()
                    .map_err(|e| Error::model(format!("failed to initialize hub api: {e}")))?;
                let repo = match revision {
                    Some(rev) => api.repo(hf_hub::Repo::with_revision(
                        repo_id.clone(),
                        hf_hub::RepoType::Model,
                        rev.clone(),
                    )),
                    None => api.model(repo_id.clone()),
                };

                let mut config_path = None;
                for file in REQUIRED_FILES {
                    let path = repo
                        .get(file)
                        .map_err(|e| Error::model(format!("failed to download {file}: {e}")))?;
                    if file == "config.json" {
                        config_path = Some(path);
                    }
                }

                // all files land in the same snapshot directory
                config_path
                    .and_then(|p| p.parent().map(PathBuf::from))
                    .ok_or_else(|| Error::model("hub cache returned an invalid snapshot path"))
            }
        }
    }
}

/// Compute device for inference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Cpu,
    Cuda(usize),
    Metal(usize),
}

impl DeviceKind {
    /// Create the Candle device. An unavailable accelerator is an explicit
    /// error, never a silent CPU fallback.
    pub fn create(self) -> Result<Device> {
        match self {
            Self::Cpu => Ok(Device::Cpu),
            Self::Cuda(idx) => Device::new_cuda(idx)
                .map_err(|e| Error::model(format!("failed to initialize cuda:{idx}: {e}"))),
            Self::Metal(idx) => Device::new_metal(idx)
                .map_err(|e| Error::model(format!("failed to initialize metal:{idx}: {e}"))),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (kind, index) = match s.split_once(':') {
            Some((kind, idx)) => {
                let idx = idx.parse::<usize>().map_err(|_| {
                    Error::config(format!("invalid device index in '{s}'"))
                })?;
                (kind, idx)
            }
            None => (s, 0),
        };

        match kind {
            "cpu" => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda(index)),
            "metal" | "mps" => Ok(Self::Metal(index)),
            _ => Err(Error::config(format!(
                "unknown device '{s}' (expected cpu, cuda[:N], or metal[:N])"
            ))),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Cuda(idx) => write!(f, "cuda:{idx}"),
            Self::Metal(idx) => write!(f, "metal:{idx}"),
        }
    }
}
