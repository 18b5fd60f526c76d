use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{info, warn};

use crate::config::Config;
use crate::inference_service::InferenceServiceClient;
use crate::speech::SpeechPipeline;
use crate::storage::{AudioStore, UploadStore};
use crate::translate::{ServiceTranslator, TranslationPipeline};

/// Everything a handler needs, built once at startup.
/// Pipelines are `None` only when disabled in the configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub translation: Option<Arc<TranslationPipeline>>,
    pub speech: Option<Arc<SpeechPipeline>>,
    pub uploads: UploadStore,
    pub audio: AudioStore,
    speech_permits: Arc<Semaphore>,
}

impl AppState {
    /// Load all enabled models. Any load failure is returned to the caller.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let system = &config.system_config;
        let timeout = Duration::from_secs(system.request_timeout_secs);
        let service = Arc::new(InferenceServiceClient::new(&system.inference_service_url, timeout)?);

        match service.health_check().await {
            Ok(true) => info!("Inference service reachable at {}", service.base_url()),
            Ok(false) => warn!("Inference service at {} reports unhealthy", service.base_url()),
            Err(e) => warn!("Inference service at {} unreachable: {}", service.base_url(), e),
        }

        let translation = if config.translation_config.enabled {
            let backend = Arc::new(ServiceTranslator::new(service.clone()));
            Some(Arc::new(TranslationPipeline::load(&config.translation_config, backend).await?))
        } else {
            warn!("Translation pipeline disabled by configuration");
            None
        };

        let audio = AudioStore::new(
            system.audio_output_path(),
            config.speech_config.audio_naming,
            &config.speech_config.audio_prefix,
        );
        let speech = if config.speech_config.enabled {
            Some(Arc::new(
                SpeechPipeline::load(&config.speech_config, service, audio.clone(), timeout).await?,
            ))
        } else {
            warn!("Speech pipeline disabled by configuration");
            None
        };

        Ok(Self::from_parts(config, translation, speech, audio))
    }

    /// `audio` must be the store the speech pipeline writes into
    pub fn from_parts(
        config: Config,
        translation: Option<Arc<TranslationPipeline>>,
        speech: Option<Arc<SpeechPipeline>>,
        audio: AudioStore,
    ) -> Self {
        let system = &config.system_config;
        let uploads = UploadStore::new(system.upload_path());
        let speech_permits = Arc::new(Semaphore::new(system.max_concurrent_speech_requests.max(1)));

        Self {
            config: Arc::new(config),
            translation,
            speech,
            uploads,
            audio,
            speech_permits,
        }
    }

    /// Wait for a speech-translation slot. Fails only if the semaphore closed.
    pub async fn acquire_speech_permit(&self) -> Result<OwnedSemaphorePermit, tokio::sync::AcquireError> {
        self.speech_permits.clone().acquire_owned().await
    }
}
