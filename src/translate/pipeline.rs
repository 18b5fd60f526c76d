use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::TranslationConfig;
use super::interface::{DecodeOptions, Direction, TranslationBackend};
use super::loader::ModelLoader;
use super::stage::TranslationStage;

/// Outcome of one cascaded translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    #[serde(rename = "german")]
    pub source: String,
    #[serde(rename = "english")]
    pub intermediate: String,
    #[serde(rename = "marathi")]
    pub target: String,
}

/// Source → intermediate → target, one stage per hop
pub struct TranslationPipeline {
    first_hop: TranslationStage,
    second_hop: TranslationStage,
}

impl TranslationPipeline {
    pub fn new(first_hop: TranslationStage, second_hop: TranslationStage) -> Self {
        Self {
            first_hop,
            second_hop,
        }
    }

    /// Load both hops. Either failing is fatal.
    pub async fn load(config: &TranslationConfig, backend: Arc<dyn TranslationBackend>) -> Result<Self> {
        let loader = ModelLoader::new(backend.clone());
        let options = DecodeOptions {
            max_length: config.max_length,
            num_beams: config.num_beams,
            early_stopping: config.early_stopping,
        };

        let first = loader
            .load(
                Direction::new(&config.source_language, &config.intermediate_language),
                &config.first_hop,
            )
            .await?;
        let second = loader
            .load(
                Direction::new(&config.intermediate_language, &config.target_language),
                &config.second_hop,
            )
            .await?;

        match (first.is_fine_tuned(), second.is_fine_tuned()) {
            (true, true) => info!("Translation pipeline ready with fine-tuned models"),
            (false, false) => warn!("Translation pipeline ready with base models only"),
            _ => warn!("Translation pipeline ready with one fine-tuned and one base model"),
        }

        Ok(Self::new(
            TranslationStage::new(first, backend.clone(), options),
            TranslationStage::new(second, backend, options),
        ))
    }

    pub fn first_hop(&self) -> &TranslationStage {
        &self.first_hop
    }

    pub fn second_hop(&self) -> &TranslationStage {
        &self.second_hop
    }

    pub async fn translate(&self, source: &str) -> Result<TranslationResult> {
        let intermediate = self
            .first_hop
            .translate_one(source)
            .await
            .context("first translation hop failed")?;
        let target = self
            .second_hop
            .translate_one(&intermediate)
            .await
            .context("second translation hop failed")?;

        Ok(TranslationResult {
            source: source.to_string(),
            intermediate,
            target,
        })
    }

    /// Each hop runs once over the whole batch
    pub async fn translate_batch(&self, sources: Vec<String>) -> Result<Vec<TranslationResult>> {
        let intermediates = self
            .first_hop
            .translate_many(sources.clone())
            .await
            .context("first translation hop failed")?;
        let targets = self
            .second_hop
            .translate_many(intermediates.clone())
            .await
            .context("second translation hop failed")?;

        Ok(sources
            .into_iter()
            .zip(intermediates)
            .zip(targets)
            .map(|((source, intermediate), target)| TranslationResult {
                source,
                intermediate,
                target,
            })
            .collect())
    }
}
