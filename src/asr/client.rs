use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::inference_service::{InferenceServiceClient, LoadModelRequest};
use super::interface::{Segment, SpeechToText, Transcription};

/// Whisper-style recognizer hosted by the inference service
pub struct ServiceRecognizer {
    service: Arc<InferenceServiceClient>,
    model_id: String,
}

impl ServiceRecognizer {
    /// Load `model_name` on the service. Failure is fatal at startup.
    pub async fn connect(service: Arc<InferenceServiceClient>, model_name: &str) -> anyhow::Result<Self> {
        info!("Loading speech recognition model: {}", model_name);
        let response = service
            .load_model(LoadModelRequest {
                task: "asr".to_string(),
                source: "hub".to_string(),
                location: model_name.to_string(),
            })
            .await
            .with_context(|| format!("Failed to load speech recognition model {}", model_name))?;

        if !response.success {
            let error_msg = response.error.unwrap_or_else(|| "Unknown error".to_string());
            anyhow::bail!("Speech recognition model {} failed to load: {}", model_name, error_msg);
        }

        info!("Speech recognition model ready: {}", response.model_id);
        Ok(Self {
            service,
            model_id: response.model_id,
        })
    }
}

#[async_trait]
impl SpeechToText for ServiceRecognizer {
    async fn transcribe(&self, audio_path: &Path, language: &str) -> anyhow::Result<Transcription> {
        let audio = tokio::fs::read(audio_path)
            .await
            .with_context(|| format!("Failed to read audio file {}", audio_path.display()))?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio");

        debug!("Transcribing {} ({} bytes, language={})", file_name, audio.len(), language);
        let response = self
            .service
            .transcribe(&self.model_id, file_name, audio, language)
            .await?;

        if !response.success {
            let error_msg = response.error.unwrap_or_else(|| "Unknown error".to_string());
            anyhow::bail!("Transcription failed: {}", error_msg);
        }

        Ok(Transcription {
            text: response.text.trim().to_string(),
            language: response.language.unwrap_or_else(|| language.to_string()),
            segments: response
                .segments
                .into_iter()
                .map(|s| Segment {
                    start: s.start,
                    end: s.end,
                    text: s.text,
                })
                .collect(),
        })
    }
}
