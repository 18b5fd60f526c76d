use async_trait::async_trait;
use std::path::PathBuf;

/// A synthesized file in the output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAudio {
    pub path: PathBuf,
    pub file_name: String,
}

/// Speech synthesis engine. Renders text to MP3 bytes.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn render(&self, text: &str, language: &str, slow: bool) -> anyhow::Result<Vec<u8>>;

    /// Engine name for logs
    fn name(&self) -> &'static str;
}
