//! Calibration and uncertainty scoring
//!
//! Transforms a raw logit vector into a temperature-adjusted probability
//! distribution with a normalized-entropy uncertainty estimate and a
//! qualitative confidence tier.
//!
//! All functions here are pure: temperature is an explicit parameter, not
//! process state, so concurrent scoring calls never race on configuration.

use crate::error::{Error, Result};
use crate::labels::LabelMap;
use serde::{Deserialize, Serialize};

/// Guard against `ln(0)` in the entropy computation
const ENTROPY_EPSILON: f32 = 1e-8;

/// Softmax temperature, validated at construction to be positive and finite.
///
/// Temperatures above 1 flatten the distribution (reducing overconfidence),
/// temperatures below 1 sharpen it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Temperature(f32);

impl Temperature {
    /// Default calibration temperature
    pub const DEFAULT: Temperature = Temperature(1.5);

    /// Create a temperature, rejecting non-positive or non-finite values
    pub fn new(value: f32) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::invalid_input(format!(
                "temperature must be a positive finite number, got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f32> for Temperature {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Temperature> for f32 {
    fn from(t: Temperature) -> f32 {
        t.0
    }
}

/// Qualitative confidence bucket derived from normalized entropy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    /// Map an uncertainty score to a tier.
    ///
    /// Thresholds: score > 0.8 is LOW, score > 0.5 is MEDIUM, otherwise HIGH.
    /// Total over all finite scores.
    pub fn from_uncertainty(score: f32) -> Self {
        if score > 0.8 {
            Self::Low
        } else if score > 0.5 {
            Self::Medium
        } else {
            Self::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

/// Divide logits by the temperature and apply a numerically stable softmax.
///
/// The maximum scaled logit is subtracted before exponentiation so that large
/// logits cannot overflow to infinity. Output values are finite, non-negative,
/// and sum to 1.0 within floating-point tolerance.
pub fn scale_and_normalize(logits: &[f32], temperature: Temperature) -> Result<Vec<f32>> {
    if logits.is_empty() {
        return Err(Error::invalid_input("logit vector must not be empty"));
    }
    if let Some(bad) = logits.iter().find(|v| !v.is_finite()) {
        return Err(Error::invalid_input(format!(
            "logit vector contains non-finite value {bad}"
        )));
    }

    let t = temperature.get();
    let scaled: Vec<f32> = logits.iter().map(|&l| l / t).collect();

    // max exists: the vector is non-empty and all values are finite
    let max = scaled.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scaled.iter().map(|&s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();

    Ok(exps.into_iter().map(|e| e / sum).collect())
}

/// Select the predicted class from a calibrated distribution.
///
/// Ties break toward the lowest index, matching the usual argmax convention.
/// Returns the mapped display label and its probability.
pub fn predicted_label<'a>(probs: &[f32], labels: &'a LabelMap) -> Result<(&'a str, f32)> {
    if probs.is_empty() {
        return Err(Error::invalid_input("probability vector must not be empty"));
    }

    let mut best = 0;
    for (i, &p) in probs.iter().enumerate().skip(1) {
        if p > probs[best] {
            best = i;
        }
    }

    let label = labels.get(best).ok_or_else(|| {
        Error::lookup(format!(
            "label map covers {} classes but prediction index is {best}",
            labels.len()
        ))
    })?;
    Ok((label, probs[best]))
}

/// Normalized Shannon entropy of a probability distribution, in [0, 1].
///
/// Entropy is computed with an epsilon guard against `ln(0)` and normalized
/// by `ln(N)`, the entropy of the uniform distribution over N classes. The
/// epsilon can push the raw value negligibly outside [0, 1], so the result
/// is clamped.
pub fn uncertainty(probs: &[f32]) -> Result<f32> {
    if probs.len() < 2 {
        return Err(Error::invalid_input(
            "uncertainty is undefined for fewer than 2 classes",
        ));
    }

    let entropy: f32 = -probs
        .iter()
        .map(|&p| p * (p + ENTROPY_EPSILON).ln())
        .sum::<f32>();
    let max_entropy = (probs.len() as f32).ln();

    Ok((entropy / max_entropy).clamp(0.0, 1.0))
}

/// A fully scored prediction: calibrated distribution, predicted label, and
/// uncertainty estimate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored {
    /// Predicted class label
    pub label: String,

    /// Probability of the predicted class
    pub confidence: f32,

    /// Calibrated probability per label, index-ordered
    pub probabilities: Vec<(String, f32)>,

    /// Normalized entropy in [0, 1]
    pub uncertainty: f32,

    /// Qualitative confidence bucket
    pub tier: ConfidenceTier,
}

/// Run the full scoring path: calibrate, pick the label, estimate uncertainty.
///
/// The label map must cover every logit index.
pub fn score(logits: &[f32], temperature: Temperature, labels: &LabelMap) -> Result<Scored> {
    let probs = scale_and_normalize(logits, temperature)?;
    let (label, confidence) = predicted_label(&probs, labels)?;
    let label = label.to_string();
    let uncertainty = uncertainty(&probs)?;

    if labels.len() < probs.len() {
        return Err(Error::lookup(format!(
            "label map covers {} classes but distribution has {}",
            labels.len(),
            probs.len()
        )));
    }

    let probabilities = labels
        .labels()
        .iter()
        .zip(probs.iter())
        .map(|(label, &p)| (label.clone(), p))
        .collect();

    Ok(Scored {
        label,
        confidence,
        probabilities,
        uncertainty,
        tier: ConfidenceTier::from_uncertainty(uncertainty),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::ClassLabels;

    fn binary_labels() -> LabelMap {
        ClassLabels::Anonymous(2).resolve().unwrap()
    }

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!((a - b).abs() <= tol, "expected {b} ± {tol}, got {a}");
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = scale_and_normalize(&[2.0, -1.0, 0.5], Temperature::DEFAULT).unwrap();
        let sum: f32 = probs.iter().sum();
        assert_close(sum, 1.0, 1e-6);
        assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn known_binary_distribution() {
        let t = Temperature::new(1.0).unwrap();
        let probs = scale_and_normalize(&[2.0, -1.0], t).unwrap();
        assert_close(probs[0], 0.9526, 1e-3);
        assert_close(probs[1], 0.0474, 1e-3);

        let labels = binary_labels();
        let (label, confidence) = predicted_label(&probs, &labels).unwrap();
        assert_eq!(label, "NEGATIVE");
        assert_close(confidence, 0.9526, 1e-3);

        let u = uncertainty(&probs).unwrap();
        assert_close(u, 0.2754, 1e-3);
        assert_eq!(ConfidenceTier::from_uncertainty(u), ConfidenceTier::High);
    }

    #[test]
    fn equal_logits_are_maximally_uncertain() {
        let probs = scale_and_normalize(&[0.1, 0.1], Temperature::DEFAULT).unwrap();
        assert_close(probs[0], 0.5, 1e-6);
        assert_close(probs[1], 0.5, 1e-6);

        let u = uncertainty(&probs).unwrap();
        assert_close(u, 1.0, 1e-5);
        assert_eq!(ConfidenceTier::from_uncertainty(u), ConfidenceTier::Low);
    }

    #[test]
    fn high_temperature_flattens() {
        let t = Temperature::new(1000.0).unwrap();
        let probs = scale_and_normalize(&[2.0, -1.0], t).unwrap();
        assert_close(probs[0], 0.5, 1e-3);
        assert_close(probs[1], 0.5, 1e-3);
    }

    #[test]
    fn low_temperature_sharpens_toward_argmax() {
        let t = Temperature::new(0.05).unwrap();
        let probs = scale_and_normalize(&[2.0, -1.0], t).unwrap();
        assert!(probs[0] > 0.999_999);
    }

    #[test]
    fn large_logits_do_not_overflow() {
        let probs = scale_and_normalize(&[1000.0, 0.0], Temperature::new(1.0).unwrap()).unwrap();
        assert!(probs.iter().all(|p| p.is_finite()));
        assert_close(probs[0], 1.0, 1e-6);
    }

    #[test]
    fn one_hot_has_zero_uncertainty() {
        let u = uncertainty(&[1.0, 0.0, 0.0]).unwrap();
        assert_close(u, 0.0, 1e-5);
    }

    #[test]
    fn uniform_has_full_uncertainty() {
        let u = uncertainty(&[0.25; 4]).unwrap();
        assert_close(u, 1.0, 1e-5);
    }

    #[test]
    fn argmax_ties_break_to_lowest_index() {
        let labels = ClassLabels::Anonymous(3).resolve().unwrap();
        let (label, _) = predicted_label(&[0.4, 0.4, 0.2], &labels).unwrap();
        assert_eq!(label, "Class_0");
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(ConfidenceTier::from_uncertainty(0.0), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_uncertainty(0.5), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_uncertainty(0.51), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_uncertainty(0.8), ConfidenceTier::Medium);
        assert_eq!(ConfidenceTier::from_uncertainty(0.81), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::from_uncertainty(1.0), ConfidenceTier::Low);
    }

    #[test]
    fn invalid_temperatures_rejected() {
        assert!(Temperature::new(0.0).is_err());
        assert!(Temperature::new(-1.0).is_err());
        assert!(Temperature::new(f32::NAN).is_err());
        assert!(Temperature::new(f32::INFINITY).is_err());
    }

    #[test]
    fn empty_logits_rejected() {
        assert!(matches!(
            scale_and_normalize(&[], Temperature::DEFAULT),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn non_finite_logits_rejected() {
        assert!(scale_and_normalize(&[1.0, f32::NAN], Temperature::DEFAULT).is_err());
    }

    #[test]
    fn single_class_uncertainty_rejected() {
        assert!(matches!(uncertainty(&[1.0]), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn label_map_must_cover_indices() {
        let labels = binary_labels();
        assert!(matches!(
            predicted_label(&[0.1, 0.2, 0.7], &labels),
            Err(Error::Lookup(_))
        ));
    }

    #[test]
    fn score_bundles_everything() {
        let labels = binary_labels();
        let scored = score(&[2.0, -1.0], Temperature::new(1.0).unwrap(), &labels).unwrap();
        assert_eq!(scored.label, "NEGATIVE");
        assert_eq!(scored.tier, ConfidenceTier::High);
        assert_eq!(scored.probabilities.len(), 2);
        assert_eq!(scored.probabilities[1].0, "POSITIVE");
    }

    #[test]
    fn score_pairs_every_probability_with_its_label() {
        let labels = binary_labels();
        assert!(matches!(
            score(&[0.2, 0.1, 0.3], Temperature::DEFAULT, &labels),
            Err(Error::Lookup(_))
        ));

        // a wider map is fine; entries stay aligned with the distribution
        let wide = ClassLabels::Anonymous(3).resolve().unwrap();
        let scored = score(&[2.0, -1.0], Temperature::DEFAULT, &wide).unwrap();
        assert_eq!(scored.probabilities.len(), 2);
        assert_eq!(scored.probabilities[0].0, "Class_0");
        assert_eq!(scored.probabilities[1].0, "Class_1");
    }

    #[test]
    fn scoring_is_pure() {
        let a = scale_and_normalize(&[1.5, -0.3, 0.2], Temperature::DEFAULT).unwrap();
        let b = scale_and_normalize(&[1.5, -0.3, 0.2], Temperature::DEFAULT).unwrap();
        assert_eq!(a, b);
    }
}
