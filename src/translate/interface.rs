use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::loader::{ModelHandle, ModelSource};

/// Decoding parameters for one generate call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Inputs are truncated and outputs capped at this many tokens
    pub max_length: usize,
    pub num_beams: usize,
    pub early_stopping: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_length: 128,
            num_beams: 4,
            early_stopping: true,
        }
    }
}

/// A source/target language pair, e.g. `de-en`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub source: String,
    pub target: String,
}

impl Direction {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

/// Single string or ordered batch. Translation preserves the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextBatch {
    Single(String),
    Batch(Vec<String>),
}

impl TextBatch {
    pub fn into_texts(self) -> Vec<String> {
        match self {
            TextBatch::Single(text) => vec![text],
            TextBatch::Batch(texts) => texts,
        }
    }
}

impl From<String> for TextBatch {
    fn from(text: String) -> Self {
        TextBatch::Single(text)
    }
}

impl From<&str> for TextBatch {
    fn from(text: &str) -> Self {
        TextBatch::Single(text.to_string())
    }
}

impl From<Vec<String>> for TextBatch {
    fn from(texts: Vec<String>) -> Self {
        TextBatch::Batch(texts)
    }
}

/// Runtime that holds translation weights and runs beam search.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    /// Load the tokenizer and model pair; returns the backend's model id
    async fn load(&self, direction: &Direction, source: &ModelSource) -> anyhow::Result<String>;

    /// Translate `texts` in order. One output per input.
    async fn generate(
        &self,
        model: &ModelHandle,
        texts: &[String],
        options: &DecodeOptions,
    ) -> anyhow::Result<Vec<String>>;
}
