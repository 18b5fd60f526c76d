use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use crate::inference_service::{InferenceServiceClient, LoadModelRequest, TranslateRequest};
use super::interface::{DecodeOptions, Direction, TranslationBackend};
use super::loader::{ModelHandle, ModelSource};

/// Translation backend served by the inference service
pub struct ServiceTranslator {
    service: Arc<InferenceServiceClient>,
}

impl ServiceTranslator {
    pub fn new(service: Arc<InferenceServiceClient>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TranslationBackend for ServiceTranslator {
    async fn load(&self, direction: &Direction, source: &ModelSource) -> anyhow::Result<String> {
        let request = LoadModelRequest {
            task: "translation".to_string(),
            source: match source {
                ModelSource::FineTuned(_) => "local".to_string(),
                ModelSource::Fallback(_) => "hub".to_string(),
            },
            location: source.location(),
        };

        debug!("Requesting {} model load: {:?}", direction, request);
        let response = self.service.load_model(request).await?;
        if response.success {
            Ok(response.model_id)
        } else {
            let error_msg = response.error.unwrap_or_else(|| "Unknown error".to_string());
            error!("Model load failed for {}: {}", direction, error_msg);
            Err(anyhow::anyhow!("Model load failed: {}", error_msg))
        }
    }

    async fn generate(
        &self,
        model: &ModelHandle,
        texts: &[String],
        options: &DecodeOptions,
    ) -> anyhow::Result<Vec<String>> {
        let request = TranslateRequest {
            model_id: model.model_id.clone(),
            texts: texts.to_vec(),
            max_length: options.max_length,
            num_beams: options.num_beams,
            early_stopping: options.early_stopping,
        };

        let response = self.service.translate(&request).await?;
        if response.success {
            Ok(response.translations)
        } else {
            let error_msg = response.error.unwrap_or_else(|| "Unknown error".to_string());
            Err(anyhow::anyhow!("Translation failed: {}", error_msg))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fake_handle, spawn_stub_service};
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::time::Duration;

    fn stub_router() -> Router {
        Router::new()
            .route(
                "/models/load",
                post(|Json(body): Json<Value>| async move {
                    if body["location"] == "broken/model" {
                        Json(json!({"success": false, "error": "no such model"}))
                    } else {
                        Json(json!({"success": true, "model_id": format!("{}:{}", body["source"].as_str().unwrap(), body["location"].as_str().unwrap())}))
                    }
                }),
            )
            .route(
                "/translate",
                post(|Json(body): Json<Value>| async move {
                    let beams = body["num_beams"].as_u64().unwrap();
                    let translations: Vec<String> = body["texts"]
                        .as_array()
                        .unwrap()
                        .iter()
                        .map(|t| format!("{}/{}", t.as_str().unwrap().to_uppercase(), beams))
                        .collect();
                    Json(json!({"success": true, "translations": translations}))
                }),
            )
    }

    async fn translator() -> ServiceTranslator {
        let url = spawn_stub_service(stub_router()).await;
        let service = InferenceServiceClient::new(url, Duration::from_secs(5)).unwrap();
        ServiceTranslator::new(Arc::new(service))
    }

    #[tokio::test]
    async fn loads_hub_fallback() {
        let translator = translator().await;
        let id = translator
            .load(
                &Direction::new("de", "en"),
                &ModelSource::Fallback("Helsinki-NLP/opus-mt-de-en".into()),
            )
            .await
            .unwrap();
        assert_eq!(id, "hub:Helsinki-NLP/opus-mt-de-en");
    }

    #[tokio::test]
    async fn reports_load_failure() {
        let translator = translator().await;
        let err = translator
            .load(&Direction::new("de", "en"), &ModelSource::Fallback("broken/model".into()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no such model"));
    }

    #[tokio::test]
    async fn generate_sends_texts_and_options() {
        let translator = translator().await;
        let options = DecodeOptions {
            num_beams: 2,
            ..DecodeOptions::default()
        };
        let out = translator
            .generate(&fake_handle("de", "en"), &["hallo".to_string(), "welt".to_string()], &options)
            .await
            .unwrap();
        assert_eq!(out, vec!["HALLO/2", "WELT/2"]);
    }
}
