use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use super::interface::{DecodeOptions, TextBatch, TranslationBackend};
use super::loader::ModelHandle;

/// One translation hop: a loaded model plus its decoding settings.
pub struct TranslationStage {
    model: ModelHandle,
    backend: Arc<dyn TranslationBackend>,
    options: DecodeOptions,
}

impl TranslationStage {
    pub fn new(model: ModelHandle, backend: Arc<dyn TranslationBackend>, options: DecodeOptions) -> Self {
        Self {
            model,
            backend,
            options,
        }
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Translate a single string or a batch; the result has the same shape
    pub async fn translate(&self, input: impl Into<TextBatch>) -> Result<TextBatch> {
        self.translate_with(input.into(), &self.options).await
    }

    pub async fn translate_with(&self, input: TextBatch, options: &DecodeOptions) -> Result<TextBatch> {
        let single = matches!(input, TextBatch::Single(_));
        let texts = input.into_texts();
        if texts.is_empty() {
            return Ok(TextBatch::Batch(Vec::new()));
        }

        debug!("Translating {} text(s) with {}", texts.len(), self.model.direction);
        let mut outputs = self.backend.generate(&self.model, &texts, options).await?;
        if outputs.len() != texts.len() {
            anyhow::bail!(
                "{} model returned {} translations for {} inputs",
                self.model.direction,
                outputs.len(),
                texts.len()
            );
        }

        if single {
            Ok(TextBatch::Single(outputs.remove(0)))
        } else {
            Ok(TextBatch::Batch(outputs))
        }
    }

    pub async fn translate_one(&self, text: &str) -> Result<String> {
        match self.translate(text).await? {
            TextBatch::Single(out) => Ok(out),
            TextBatch::Batch(outputs) => anyhow::bail!(
                "{} stage returned a batch of {} for a single input",
                self.model.direction,
                outputs.len()
            ),
        }
    }

    pub async fn translate_many(&self, texts: Vec<String>) -> Result<Vec<String>> {
        Ok(self.translate(texts).await?.into_texts())
    }
}
