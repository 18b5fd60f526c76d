use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::ModelConfig;
use super::interface::{Direction, TranslationBackend};

/// Weight files whose presence marks a usable fine-tuned artifact
const WEIGHT_FILES: [&str; 2] = ["model.safetensors", "pytorch_model.bin"];

/// Where a translation model is loaded from, decided once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    FineTuned(PathBuf),
    Fallback(String),
}

impl ModelSource {
    /// Prefer the fine-tuned artifact when its weights exist on disk
    pub fn resolve(finetuned_path: impl AsRef<Path>, fallback_model: &str) -> Self {
        let path = finetuned_path.as_ref();
        let has_weights = path.is_dir() && WEIGHT_FILES.iter().any(|f| path.join(f).is_file());

        if has_weights {
            ModelSource::FineTuned(path.to_path_buf())
        } else {
            ModelSource::Fallback(fallback_model.to_string())
        }
    }

    pub fn is_fine_tuned(&self) -> bool {
        matches!(self, ModelSource::FineTuned(_))
    }

    /// Path or registry identifier, for logs and health output
    pub fn location(&self) -> String {
        match self {
            ModelSource::FineTuned(path) => path.display().to_string(),
            ModelSource::Fallback(id) => id.clone(),
        }
    }
}

/// A loaded tokenizer/model pair. Never mutated after load.
#[derive(Debug, Clone)]
pub struct ModelHandle {
    pub direction: Direction,
    pub source: ModelSource,
    /// Backend-side identifier of the loaded weights
    pub model_id: String,
    pub loaded_at: DateTime<Utc>,
}

impl ModelHandle {
    pub fn is_fine_tuned(&self) -> bool {
        self.source.is_fine_tuned()
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            direction: self.direction.to_string(),
            source: if self.is_fine_tuned() { "fine-tuned" } else { "fallback" },
            location: self.source.location(),
            loaded_at: self.loaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub direction: String,
    pub source: &'static str,
    pub location: String,
    pub loaded_at: DateTime<Utc>,
}

pub struct ModelLoader {
    backend: Arc<dyn TranslationBackend>,
}

impl ModelLoader {
    pub fn new(backend: Arc<dyn TranslationBackend>) -> Self {
        Self { backend }
    }

    /// Resolve the source for `direction` and load it. Errors are meant to
    /// abort startup.
    pub async fn load(&self, direction: Direction, config: &ModelConfig) -> Result<ModelHandle> {
        let source = ModelSource::resolve(&config.finetuned_path, &config.fallback_model);
        match &source {
            ModelSource::FineTuned(path) => {
                info!("Loading fine-tuned {} model from {}", direction, path.display());
            }
            ModelSource::Fallback(id) => {
                warn!(
                    "Fine-tuned {} model not found at {}, loading base model {}",
                    direction, config.finetuned_path, id
                );
            }
        }

        let model_id = self
            .backend
            .load(&direction, &source)
            .await
            .with_context(|| format!("Failed to load {} model from {}", direction, source.location()))?;

        info!("Loaded {} model as {}", direction, model_id);
        Ok(ModelHandle {
            direction,
            source,
            model_id,
            loaded_at: Utc::now(),
        })
    }
}
