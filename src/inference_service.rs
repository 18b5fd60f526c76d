use serde::{Deserialize, Serialize};
use anyhow::{Context, Result};
use reqwest::{multipart, Client};
use std::time::Duration;

/// HTTP client for the model-serving backend that owns the weights.
#[derive(Debug, Clone)]
pub struct InferenceServiceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadModelRequest {
    pub task: String,
    /// "local" for an on-disk artifact, "hub" for a registry identifier
    pub source: String,
    pub location: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadModelResponse {
    #[serde(default)]
    pub model_id: String,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub model_id: String,
    pub texts: Vec<String>,
    pub max_length: usize,
    pub num_beams: usize,
    pub early_stopping: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    #[serde(default)]
    pub translations: Vec<String>,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentPayload {
    pub start: f32,
    pub end: f32,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscribeResponse {
    #[serde(default)]
    pub text: String,
    pub language: Option<String>,
    #[serde(default)]
    pub segments: Vec<SegmentPayload>,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    pub language: String,
    pub slow: bool,
}

impl InferenceServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn load_model(&self, request: LoadModelRequest) -> Result<LoadModelResponse> {
        let url = format!("{}/models/load", self.base_url);
        let response = self.client.post(&url).json(&request).send().await?.error_for_status()?;
        let result: LoadModelResponse = response.json().await?;
        Ok(result)
    }

    pub async fn translate(&self, request: &TranslateRequest) -> Result<TranslateResponse> {
        let url = format!("{}/translate", self.base_url);
        let response = self.client.post(&url).json(request).send().await?.error_for_status()?;
        let result: TranslateResponse = response.json().await?;
        Ok(result)
    }

    pub async fn transcribe(
        &self,
        model_id: &str,
        file_name: &str,
        audio: Vec<u8>,
        language: &str,
    ) -> Result<TranscribeResponse> {
        let url = format!("{}/asr/transcribe", self.base_url);
        let part = multipart::Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new()
            .text("model_id", model_id.to_string())
            .text("language", language.to_string())
            .part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?.error_for_status()?;
        let result: TranscribeResponse = response.json().await?;
        Ok(result)
    }

    /// Returns the rendered MP3 bytes
    pub async fn synthesize(&self, request: &SynthesizeRequest) -> Result<Vec<u8>> {
        let url = format!("{}/tts/synthesize", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await?
            .error_for_status()
            .context("TTS request rejected by inference service")?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }
}
