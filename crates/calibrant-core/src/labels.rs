//! Class label resolution
//!
//! Classifier checkpoints either carry an explicit label mapping (`id2label`
//! in the model config) or just a class count. Both cases are resolved once
//! at load time into a concrete [`LabelMap`]; nothing probes the model config
//! again after that.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Label information as found at model-load time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabels {
    /// Explicit display labels, index-ordered
    Named(Vec<String>),
    /// Only the class count is known
    Anonymous(usize),
}

impl ClassLabels {
    /// Resolve into a concrete label map.
    ///
    /// Anonymous binary classifiers get the conventional sentiment labels;
    /// anonymous N-ary classifiers get positional `Class_i` labels.
    pub fn resolve(self) -> Result<LabelMap> {
        let labels = match self {
            Self::Named(labels) => {
                if labels.is_empty() {
                    return Err(Error::invalid_input("label list must not be empty"));
                }
                labels
            }
            Self::Anonymous(0) => {
                return Err(Error::invalid_input("class count must be at least 1"));
            }
            Self::Anonymous(2) => vec!["NEGATIVE".to_string(), "POSITIVE".to_string()],
            Self::Anonymous(n) => (0..n).map(|i| format!("Class_{i}")).collect(),
        };
        Ok(LabelMap { labels })
    }
}

/// Mapping from class index to display label, fixed for the process lifetime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMap {
    labels: Vec<String>,
}

impl LabelMap {
    /// Get the label for a class index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over `(index, label)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().enumerate().map(|(i, l)| (i, l.as_str()))
    }

    /// All labels in index order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_labels_pass_through() {
        let map = ClassLabels::Named(vec!["toxic".into(), "clean".into()])
            .resolve()
            .unwrap();
        assert_eq!(map.get(0), Some("toxic"));
        assert_eq!(map.get(1), Some("clean"));
        assert_eq!(map.get(2), None);
    }

    #[test]
    fn anonymous_binary_uses_sentiment_labels() {
        let map = ClassLabels::Anonymous(2).resolve().unwrap();
        assert_eq!(map.labels(), &["NEGATIVE".to_string(), "POSITIVE".to_string()]);
    }

    #[test]
    fn anonymous_nary_uses_positional_labels() {
        let map = ClassLabels::Anonymous(3).resolve().unwrap();
        assert_eq!(map.get(2), Some("Class_2"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn empty_inputs_rejected() {
        assert!(ClassLabels::Named(vec![]).resolve().is_err());
        assert!(ClassLabels::Anonymous(0).resolve().is_err());
    }
}
