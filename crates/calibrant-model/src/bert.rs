//! BERT sequence-classification inference
//!
//! Loads a HuggingFace-style checkpoint (config.json + model.safetensors +
//! tokenizer.json) with Candle and runs single-input forward passes. The
//! classification head follows the BertForSequenceClassification layout:
//! pooler (dense + tanh over the [CLS] position) followed by a linear
//! projection to the label logits.

use crate::classifier::{validate_text, Prediction, TextClassifier};
use crate::config::{validate_model_dir, HfConfig};
use crate::loader::{DeviceKind, ModelSource};
use async_trait::async_trait;
use calibrant_core::{Error, LabelMap, Result, Temperature};
use candle_core::{DType, Device, IndexOp, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use std::path::Path;
use std::time::Instant;
use tokenizers::Tokenizer;

/// Candle-backed BERT classifier
pub struct BertClassifier {
    name: String,
    tokenizer: Tokenizer,
    model: BertModel,
    pooler: Linear,
    head: Linear,
    device: Device,
    labels: LabelMap,
    max_length: usize,
}

impl BertClassifier {
    /// Load a classifier from a model source.
    ///
    /// `max_length` caps the tokenized sequence length; when `None`, the
    /// checkpoint's position-embedding limit applies (capped at 512).
    pub fn load(source: &ModelSource, device: DeviceKind, max_length: Option<usize>) -> Result<Self> {
        let dir = source.resolve()?;
        validate_model_dir(&dir)?;

        let hf_config = HfConfig::from_file(&dir.join("config.json"))?;
        let num_labels = hf_config.num_classes();
        let labels = hf_config.class_labels().resolve()?;
        let max_length = max_length.unwrap_or_else(|| hf_config.max_position_embeddings.min(512));

        let bert_config: BertConfig =
            serde_json::from_str(&std::fs::read_to_string(dir.join("config.json"))?)
                .map_err(|e| Error::config(format!("failed to parse bert config: {e}")))?;

        let tokenizer = Self::load_tokenizer(&dir, max_length)?;

        let device = device.create()?;
        let weights_path = dir.join("model.safetensors");
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| Error::model(format!("failed to load weights: {e}")))?
        };

        let model = BertModel::load(vb.pp("bert"), &bert_config)
            .map_err(|e| Error::model(format!("failed to load bert encoder: {e}")))?;
        let pooler = candle_nn::linear(
            hf_config.hidden_size,
            hf_config.hidden_size,
            vb.pp("bert.pooler.dense"),
        )
        .map_err(|e| Error::model(format!("failed to load pooler: {e}")))?;
        let head = candle_nn::linear(hf_config.hidden_size, num_labels, vb.pp("classifier"))
            .map_err(|e| Error::model(format!("failed to load classification head: {e}")))?;

        let name = hf_config
            .model_type
            .clone()
            .unwrap_or_else(|| "bert".to_string());

        tracing::info!(
            "loaded {name} classifier with {num_labels} labels from {}",
            dir.display()
        );

        Ok(Self {
            name,
            tokenizer,
            model,
            pooler,
            head,
            device,
            labels,
            max_length,
        })
    }

    fn load_tokenizer(dir: &Path, max_length: usize) -> Result<Tokenizer> {
        let mut tokenizer = Tokenizer::from_file(dir.join("tokenizer.json"))
            .map_err(|e| Error::tokenizer(format!("failed to load tokenizer: {e}")))?;
        tokenizer
            .with_truncation(Some(tokenizers::TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| Error::tokenizer(format!("failed to configure truncation: {e}")))?;
        Ok(tokenizer)
    }

    /// One forward pass: returns the raw logits row for the input text
    fn forward_logits(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::tokenizer(format!("tokenization failed: {e}")))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::model(format!("failed to build input tensor: {e}")))?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::model(format!("failed to build token type tensor: {e}")))?;

        let sequence_output = self
            .model
            .forward(&input_ids, &token_type_ids, None)
            .map_err(|e| Error::model(format!("forward pass failed: {e}")))?;

        // [CLS] position of the [1, seq, hidden] output, kept as [1, hidden]
        let cls = sequence_output
            .i((.., 0))
            .map_err(|e| Error::model(format!("failed to slice cls output: {e}")))?;

        let pooled = self
            .pooler
            .forward(&cls)
            .and_then(|t| t.tanh())
            .map_err(|e| Error::model(format!("pooler failed: {e}")))?;
        let logits = self
            .head
            .forward(&pooled)
            .and_then(|t| t.squeeze(0))
            .map_err(|e| Error::model(format!("classification head failed: {e}")))?;

        logits
            .to_vec1::<f32>()
            .map_err(|e| Error::model(format!("failed to read logits: {e}")))
    }

    /// Maximum tokenized sequence length
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Device the model runs on
    pub fn device(&self) -> &Device {
        &self.device
    }
}

#[async_trait]
impl TextClassifier for BertClassifier {
    async fn classify(&self, text: &str, temperature: Temperature) -> Result<Prediction> {
        validate_text(text)?;
        let start = Instant::now();
        let logits = self.forward_logits(text)?;
        Prediction::from_logits(&logits, temperature, &self.labels, start)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn labels(&self) -> &LabelMap {
        &self.labels
    }
}
