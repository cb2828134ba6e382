//! Classifier trait and prediction types

use async_trait::async_trait;
use calibrant_core::{score, ConfidenceTier, Error, LabelMap, Result, Temperature};
use serde::Serialize;
use std::time::Instant;

/// Trait for all text classifiers.
///
/// Temperature is passed per call: the caller snapshots whatever process-wide
/// value it holds, so a concurrent temperature update never affects an
/// in-flight prediction.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Classify the given text and return a calibrated prediction
    async fn classify(&self, text: &str, temperature: Temperature) -> Result<Prediction>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Get the class label map
    fn labels(&self) -> &LabelMap;
}

/// A calibrated prediction for one input text
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Predicted class label
    pub label: String,

    /// Probability of the predicted class (0.0-1.0)
    pub confidence: f32,

    /// Calibrated probability per label, index-ordered
    pub probabilities: Vec<(String, f32)>,

    /// Normalized entropy of the distribution (0.0-1.0)
    pub uncertainty: f32,

    /// Qualitative confidence bucket
    pub tier: ConfidenceTier,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl Prediction {
    /// Build a prediction from raw model logits via the calibration scorer
    pub fn from_logits(
        logits: &[f32],
        temperature: Temperature,
        labels: &LabelMap,
        start: Instant,
    ) -> Result<Self> {
        let scored = score(logits, temperature, labels)?;
        Ok(Self {
            label: scored.label,
            confidence: scored.confidence,
            probabilities: scored.probabilities,
            uncertainty: scored.uncertainty,
            tier: scored.tier,
            latency_us: start.elapsed().as_micros() as u64,
        })
    }
}

/// Reject empty or whitespace-only input before tokenization
pub fn validate_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::invalid_input("text must not be empty"));
    }
    Ok(())
}
