//! Lexicon-based fallback classifier
//!
//! Used when no model checkpoint is configured. Keyword hit counts feed the
//! same calibration scorer as real logits, so the response shape (calibrated
//! probabilities, uncertainty, tier) is identical to the BERT path. Text with
//! no sentiment keywords scores as a uniform distribution, which the tiering
//! correctly reports as LOW confidence.

use crate::classifier::{validate_text, Prediction, TextClassifier};
use aho_corasick::AhoCorasick;
use async_trait::async_trait;
use calibrant_core::{ClassLabels, Error, LabelMap, Result, Temperature};
use std::time::Instant;

pub struct LexiconClassifier {
    name: String,
    positive: AhoCorasick,
    negative: AhoCorasick,
    labels: LabelMap,
}

impl LexiconClassifier {
    pub fn new() -> Result<Self> {
        Self::with_name("lexicon")
    }

    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let positive = [
            "good",
            "great",
            "excellent",
            "love",
            "amazing",
            "wonderful",
            "happy",
            "fantastic",
            "awesome",
            "best",
            "delightful",
            "enjoyable",
        ];
        let negative = [
            "bad",
            "terrible",
            "awful",
            "hate",
            "horrible",
            "worst",
            "sad",
            "angry",
            "disappointed",
            "poor",
            "dreadful",
            "unpleasant",
        ];

        let positive = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(positive)
            .map_err(|e| Error::model(format!("failed to build positive matcher: {e}")))?;
        let negative = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(negative)
            .map_err(|e| Error::model(format!("failed to build negative matcher: {e}")))?;

        Ok(Self {
            name: name.into(),
            positive,
            negative,
            labels: ClassLabels::Anonymous(2).resolve()?,
        })
    }

    /// Pseudo-logits from keyword hit counts, index-aligned with the binary
    /// label map (negative first)
    fn hit_logits(&self, text: &str) -> [f32; 2] {
        let positive_hits = self.positive.find_iter(text).count() as f32;
        let negative_hits = self.negative.find_iter(text).count() as f32;
        [negative_hits, positive_hits]
    }
}

#[async_trait]
impl TextClassifier for LexiconClassifier {
    async fn classify(&self, text: &str, temperature: Temperature) -> Result<Prediction> {
        validate_text(text)?;
        let start = Instant::now();
        let logits = self.hit_logits(text);
        Prediction::from_logits(&logits, temperature, &self.labels, start)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn labels(&self) -> &LabelMap {
        &self.labels
    }
}
