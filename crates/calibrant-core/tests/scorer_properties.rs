//! Property tests for the scoring path
//!
//! These check the distribution-level guarantees over randomized inputs:
//! softmax output is always a probability distribution, uncertainty stays in
//! [0, 1], and scoring is deterministic.

use calibrant_core::{scale_and_normalize, uncertainty, Temperature};
use proptest::prelude::*;

fn logit_vectors() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-50.0f32..50.0, 1..8)
}

fn temperatures() -> impl Strategy<Value = Temperature> {
    (0.1f32..10.0).prop_map(|t| Temperature::new(t).unwrap())
}

proptest! {
    #[test]
    fn softmax_is_a_distribution(logits in logit_vectors(), t in temperatures()) {
        let probs = scale_and_normalize(&logits, t).unwrap();
        prop_assert_eq!(probs.len(), logits.len());

        let sum: f32 = probs.iter().sum();
        prop_assert!((sum - 1.0).abs() < 1e-5, "sum was {}", sum);
        prop_assert!(probs.iter().all(|&p| p.is_finite() && (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn uncertainty_stays_in_unit_interval(logits in logit_vectors(), t in temperatures()) {
        prop_assume!(logits.len() >= 2);
        let probs = scale_and_normalize(&logits, t).unwrap();
        let u = uncertainty(&probs).unwrap();
        prop_assert!((0.0..=1.0).contains(&u), "uncertainty was {}", u);
    }

    #[test]
    fn scoring_is_deterministic(logits in logit_vectors(), t in temperatures()) {
        let a = scale_and_normalize(&logits, t).unwrap();
        let b = scale_and_normalize(&logits, t).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn raising_temperature_never_sharpens(logits in logit_vectors()) {
        prop_assume!(logits.len() >= 2);
        let cool = scale_and_normalize(&logits, Temperature::new(1.0).unwrap()).unwrap();
        let warm = scale_and_normalize(&logits, Temperature::new(5.0).unwrap()).unwrap();

        let max_cool = cool.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let max_warm = warm.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        prop_assert!(max_warm <= max_cool + 1e-5);
    }
}
