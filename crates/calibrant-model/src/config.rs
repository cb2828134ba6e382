//! Model directory configuration
//!
//! Parses the HuggingFace-style `config.json` that ships alongside
//! sequence-classification checkpoints and resolves its label mapping once,
//! at load time.

use calibrant_core::{ClassLabels, Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Files a model directory must contain before we attempt a load
pub const REQUIRED_FILES: [&str; 3] = ["config.json", "model.safetensors", "tokenizer.json"];

/// Check that every required model file is present, naming the first missing
/// one in the error
pub fn validate_model_dir(dir: &Path) -> Result<()> {
    for file in REQUIRED_FILES {
        if !dir.join(file).exists() {
            return Err(Error::config(format!(
                "required model file not found: {}",
                dir.join(file).display()
            )));
        }
    }
    Ok(())
}

/// The subset of a HuggingFace `config.json` that the classifier needs.
///
/// Candle's `BertConfig` parses the same file for the architecture fields;
/// this type only covers the classification-head metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct HfConfig {
    #[serde(default)]
    pub num_labels: Option<usize>,

    /// Index-keyed display labels ("0" -> "NEGATIVE", ...)
    #[serde(default)]
    pub id2label: Option<HashMap<String, String>>,

    #[serde(default)]
    pub model_type: Option<String>,

    pub hidden_size: usize,

    #[serde(default = "default_max_position_embeddings")]
    pub max_position_embeddings: usize,
}

fn default_max_position_embeddings() -> usize {
    512
}

impl HfConfig {
    /// Parse `config.json` from a model directory
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Number of output classes.
    ///
    /// `num_labels` wins when present; otherwise the size of `id2label`;
    /// otherwise binary, matching the sentiment checkpoints this started from.
    pub fn num_classes(&self) -> usize {
        self.num_labels
            .or_else(|| self.id2label.as_ref().map(HashMap::len))
            .unwrap_or(2)
    }

    /// Resolve the label source: named when `id2label` covers every index,
    /// anonymous otherwise
    pub fn class_labels(&self) -> ClassLabels {
        let n = self.num_classes();
        if let Some(map) = &self.id2label {
            let ordered: Option<Vec<String>> =
                (0..n).map(|i| map.get(&i.to_string()).cloned()).collect();
            if let Some(labels) = ordered {
                return ClassLabels::Named(labels);
            }
            tracing::warn!(
                "id2label does not cover all {n} class indices, falling back to positional labels"
            );
        }
        ClassLabels::Anonymous(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labeled_config() {
        let raw = r#"{
            "model_type": "bert",
            "hidden_size": 768,
            "num_labels": 2,
            "id2label": {"0": "NEGATIVE", "1": "POSITIVE"},
            "max_position_embeddings": 512,
            "vocab_size": 30522
        }"#;
        let config: HfConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.num_classes(), 2);

        let labels = config.class_labels().resolve().unwrap();
        assert_eq!(labels.get(1), Some("POSITIVE"));
    }

    #[test]
    fn incomplete_id2label_falls_back_to_positional() {
        let raw = r#"{
            "hidden_size": 768,
            "num_labels": 3,
            "id2label": {"0": "a", "2": "c"}
        }"#;
        let config: HfConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.class_labels(), ClassLabels::Anonymous(3));
    }

    #[test]
    fn missing_label_info_defaults_to_binary() {
        let raw = r#"{"hidden_size": 768}"#;
        let config: HfConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.num_classes(), 2);
        let labels = config.class_labels().resolve().unwrap();
        assert_eq!(labels.get(0), Some("NEGATIVE"));
    }

    #[test]
    fn missing_files_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();

        let err = validate_model_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("model.safetensors"));
    }
}
