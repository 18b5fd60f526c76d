use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: f32,
    pub end: f32,
    pub text: String,
}

/// Recognizer output. Blank `text` is a valid result.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    /// Language reported by the model, or the requested one
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcription {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Speech recognition model. One blocking call per file, no partial results.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn transcribe(&self, audio_path: &Path, language: &str) -> anyhow::Result<Transcription>;
}
