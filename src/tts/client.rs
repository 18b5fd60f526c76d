use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use crate::inference_service::{InferenceServiceClient, SynthesizeRequest};
use super::interface::SpeechSynthesizer;

/// Synthesizer that delegates to the inference service
pub struct ServiceSynthesizer {
    service: Arc<InferenceServiceClient>,
}

impl ServiceSynthesizer {
    pub fn new(service: Arc<InferenceServiceClient>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SpeechSynthesizer for ServiceSynthesizer {
    async fn render(&self, text: &str, language: &str, slow: bool) -> anyhow::Result<Vec<u8>> {
        let request = SynthesizeRequest {
            text: text.to_string(),
            language: language.to_string(),
            slow,
        };

        debug!("Sending TTS request: language={}, chars={}", language, text.chars().count());
        let audio = self.service.synthesize(&request).await?;
        if audio.is_empty() {
            error!("TTS service returned no audio for language {}", language);
            anyhow::bail!("TTS service returned an empty body");
        }
        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "inference_service"
    }
}
