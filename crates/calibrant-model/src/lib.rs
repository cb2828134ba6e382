//! Calibrant Model
//!
//! Model inference for the calibrated text-classification service:
//! - HuggingFace-style checkpoint loading (config, safetensors, tokenizer)
//!   with Candle
//! - BERT sequence-classification forward passes
//! - A lexicon fallback classifier for model-less deployments
//!
//! All classifiers produce [`Prediction`]s through the calibration scorer in
//! `calibrant-core`, so the response shape is uniform across backends.

pub mod bert;
pub mod classifier;
pub mod config;
pub mod lexicon;
pub mod loader;

pub use bert::BertClassifier;
pub use classifier::{Prediction, TextClassifier};
pub use config::{validate_model_dir, HfConfig, REQUIRED_FILES};
pub use lexicon::LexiconClassifier;
pub use loader::{DeviceKind, ModelSource};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bert::BertClassifier;
    pub use crate::classifier::{Prediction, TextClassifier};
    pub use crate::lexicon::LexiconClassifier;
    pub use crate::loader::{DeviceKind, ModelSource};
}
