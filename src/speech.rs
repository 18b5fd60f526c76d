use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use tracing::info;

use crate::asr::{ServiceRecognizer, SpeechToText, Transcription};
use crate::config::SpeechConfig;
use crate::inference_service::InferenceServiceClient;
use crate::storage::AudioStore;
use crate::tts::{GeneratedAudio, TTSFactory, TextToSpeech};

/// Speech recognition plus speech synthesis
pub struct SpeechPipeline {
    stt: Arc<dyn SpeechToText>,
    tts: TextToSpeech,
}

impl SpeechPipeline {
    pub fn new(stt: Arc<dyn SpeechToText>, tts: TextToSpeech) -> Self {
        Self { stt, tts }
    }

    /// Load the recognizer and build the configured synthesizer
    pub async fn load(
        config: &SpeechConfig,
        service: Arc<InferenceServiceClient>,
        store: AudioStore,
        timeout: Duration,
    ) -> Result<Self> {
        let stt = ServiceRecognizer::connect(service.clone(), &config.whisper_model).await?;
        let synthesizer = TTSFactory::create_tts(config, service, timeout)?;
        info!("Speech pipeline ready, output: {}", store.dir().display());

        Ok(Self::new(
            Arc::new(stt),
            TextToSpeech::new(synthesizer, store, config.slow),
        ))
    }

    pub async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<Transcription> {
        self.stt.transcribe(audio_path, language).await
    }

    pub async fn text_to_audio(
        &self,
        text: &str,
        language: &str,
        file_name: Option<&str>,
    ) -> Result<GeneratedAudio> {
        self.tts.synthesize(text, language, file_name).await
    }
}
