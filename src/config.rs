use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use regex::Regex;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub translation_config: TranslationConfig,
    #[serde(default)]
    pub speech_config: SpeechConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the model-serving backend
    pub inference_service_url: String,
    pub request_timeout_secs: u64,
    pub upload_dir: String,
    pub audio_output_dir: String,
    pub max_upload_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub max_concurrent_speech_requests: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            inference_service_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 300,
            upload_dir: "uploads".to_string(),
            audio_output_dir: "audio_outputs".to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
            allowed_extensions: ["wav", "mp3", "m4a", "ogg", "flac"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
            max_concurrent_speech_requests: 4,
        }
    }
}

impl SystemConfig {
    pub fn upload_path(&self) -> PathBuf {
        PathBuf::from(&self.upload_dir)
    }

    pub fn audio_output_path(&self) -> PathBuf {
        PathBuf::from(&self.audio_output_dir)
    }
}

/// Where one translation hop gets its weights from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub finetuned_path: String,
    pub fallback_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub enabled: bool,
    pub source_language: String,
    pub intermediate_language: String,
    pub target_language: String,
    pub max_length: usize,
    pub num_beams: usize,
    pub early_stopping: bool,
    pub first_hop: ModelConfig,
    pub second_hop: ModelConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source_language: "de".to_string(),
            intermediate_language: "en".to_string(),
            target_language: "mr".to_string(),
            max_length: 128,
            num_beams: 4,
            early_stopping: true,
            first_hop: ModelConfig {
                finetuned_path: "./models/de_en_finetuned_10k".to_string(),
                fallback_model: "Helsinki-NLP/opus-mt-de-en".to_string(),
            },
            second_hop: ModelConfig {
                finetuned_path: "./models/en_mr_finetuned_10k".to_string(),
                fallback_model: "Helsinki-NLP/opus-mt-en-mr".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtsProvider {
    /// Direct calls to the Google Translate TTS endpoint
    Google,
    InferenceService,
}

/// How generated audio files are named in the output directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioNaming {
    /// Random v4 UUID per synthesis
    Uuid,
    /// Name-based v5 UUID over language and text
    Content,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub whisper_model: String,
    pub transcription_language: String,
    pub synthesis_language: String,
    pub slow: bool,
    pub tts_provider: TtsProvider,
    pub google_tts_url: String,
    pub audio_naming: AudioNaming,
    pub audio_prefix: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            whisper_model: "base".to_string(),
            transcription_language: "de".to_string(),
            synthesis_language: "mr".to_string(),
            slow: false,
            tts_provider: TtsProvider::Google,
            google_tts_url: "https://translate.google.com".to_string(),
            audio_naming: AudioNaming::Uuid,
            audio_prefix: "marathi".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let content = substitute_env_vars(&content);

        // Determine file type by extension
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let config = if ext == "json" || ext == "jsonld" {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        Ok(config)
    }
}

/// Replace `${VAR}` and `${VAR:-default}` with environment values.
/// A bare `${VAR}` whose variable is unset is left as written.
pub fn substitute_env_vars(content: &str) -> String {
    let pattern = Regex::new(r"\$\{(\w+)(?::-([^}]*))?\}").expect("valid env pattern");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match (std::env::var(var_name), caps.get(2)) {
                (Ok(value), _) => value,
                (Err(_), Some(default)) => default.as_str().to_string(),
                (Err(_), None) => caps[0].to_string(),
            }
        })
        .into_owned()
}
