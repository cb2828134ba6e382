//! Calibrant Core
//!
//! Pure calibration and uncertainty scoring for classifier logits.
//!
//! This crate provides:
//! - Temperature-scaled, numerically stable softmax
//! - Normalized Shannon-entropy uncertainty with HIGH/MEDIUM/LOW tiers
//! - Class label resolution (named or positional)
//! - Error types and result handling
//!
//! No I/O, no async, no ML dependencies: every scoring call is a pure
//! function over an in-memory vector.

pub mod error;
pub mod labels;
pub mod scorer;

pub use error::{Error, Result};
pub use labels::{ClassLabels, LabelMap};
pub use scorer::{
    predicted_label, scale_and_normalize, score, uncertainty, ConfidenceTier, Scored, Temperature,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::labels::{ClassLabels, LabelMap};
    pub use crate::scorer::{score, ConfidenceTier, Scored, Temperature};
}
