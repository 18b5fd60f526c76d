use std::sync::Arc;
use std::time::Duration;
use anyhow::Result;
use tracing::info;

use crate::config::{SpeechConfig, TtsProvider};
use crate::inference_service::InferenceServiceClient;
use super::client::ServiceSynthesizer;
use super::google::GoogleTts;
use super::interface::SpeechSynthesizer;

/// Factory for creating TTS engines
pub struct TTSFactory;

impl TTSFactory {
    /// Create the synthesizer named by `speech_config.tts_provider`
    ///
    /// # Arguments
    /// * `speech_config` - speech section of the configuration
    /// * `service` - inference service client, used by the service provider
    /// * `timeout` - per-request timeout for direct providers
    pub fn create_tts(
        speech_config: &SpeechConfig,
        service: Arc<InferenceServiceClient>,
        timeout: Duration,
    ) -> Result<Arc<dyn SpeechSynthesizer>> {
        info!("Initializing TTS engine: {:?}", speech_config.tts_provider);

        match speech_config.tts_provider {
            TtsProvider::Google => Ok(Arc::new(GoogleTts::new(&speech_config.google_tts_url, timeout)?)),
            TtsProvider::InferenceService => Ok(Arc::new(ServiceSynthesizer::new(service))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_configured_provider() {
        let service = Arc::new(
            InferenceServiceClient::new("http://localhost:8000", Duration::from_secs(1)).unwrap(),
        );
        let mut config = SpeechConfig::default();
        let tts = TTSFactory::create_tts(&config, service.clone(), Duration::from_secs(1)).unwrap();
        assert_eq!(tts.name(), "google");

        config.tts_provider = TtsProvider::InferenceService;
        let tts = TTSFactory::create_tts(&config, service, Duration::from_secs(1)).unwrap();
        assert_eq!(tts.name(), "inference_service");
    }
}
