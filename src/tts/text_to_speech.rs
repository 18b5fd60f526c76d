use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::storage::AudioStore;
use super::interface::{GeneratedAudio, SpeechSynthesizer};

/// Renders text through a synthesizer into the output-audio directory
pub struct TextToSpeech {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: AudioStore,
    slow: bool,
}

impl TextToSpeech {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, store: AudioStore, slow: bool) -> Self {
        Self {
            synthesizer,
            store,
            slow,
        }
    }

    /// Synthesize `text` and write it as MP3. Without `file_name` the store
    /// picks the name. An existing file with the same name is replaced.
    pub async fn synthesize(
        &self,
        text: &str,
        language: &str,
        file_name: Option<&str>,
    ) -> anyhow::Result<GeneratedAudio> {
        let file_name = match file_name {
            Some(name) => AudioStore::normalize_name(name),
            None => self.store.generated_name(text, language),
        };

        let audio = self.synthesizer.render(text, language, self.slow).await?;
        let path = self
            .store
            .write(&file_name, &audio)
            .await
            .with_context(|| format!("Failed to write {}", file_name))?;

        info!("Audio saved with {}: {}", self.synthesizer.name(), path.display());
        Ok(GeneratedAudio { path, file_name })
    }
}
