//! Error types for Calibrant

/// Result type alias using Calibrant's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for Calibrant operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed numeric input (empty logit vector, non-positive temperature,
    /// degenerate class count)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Label map does not cover the prediction index set
    #[error("label lookup error: {0}")]
    Lookup(String),

    /// Model loading or inference errors
    #[error("model error: {0}")]
    Model(String),

    /// Tokenization errors
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new label lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create a new model error
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Create a new tokenizer error
    pub fn tokenizer(msg: impl Into<String>) -> Self {
        Self::Tokenizer(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
