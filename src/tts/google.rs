//! Direct client for the Google Translate TTS endpoint.
//!
//! The endpoint accepts at most 100 characters per request, so text is
//! split at sentence punctuation, then at whitespace, and the returned MP3
//! fragments are concatenated in order.

use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

use super::interface::SpeechSynthesizer;

pub const MAX_CHUNK_CHARS: usize = 100;

pub struct GoogleTts {
    client: Client,
    base_url: String,
}

impl GoogleTts {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0")
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn render(&self, text: &str, language: &str, slow: bool) -> anyhow::Result<Vec<u8>> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            anyhow::bail!("No speakable text to synthesize");
        }

        let url = format!("{}/translate_tts", self.base_url);
        let speed = if slow { "0.3" } else { "1" };
        let total = chunks.len().to_string();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            debug!("Google TTS chunk {}/{}: {} chars", idx + 1, chunks.len(), chunk.chars().count());
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language),
                    ("ttsspeed", speed),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx.to_string().as_str()),
                    ("textlen", chunk.chars().count().to_string().as_str()),
                ])
                .send()
                .await?
                .error_for_status()
                .with_context(|| format!("Google TTS rejected chunk {} of {}", idx + 1, chunks.len()))?;
            audio.extend_from_slice(&response.bytes().await?);
        }

        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

fn sentence_boundary() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[.!?।॥,;:\n]+").expect("valid boundary pattern"))
}

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Sentence pieces are merged greedily while they fit. Pieces with no
/// letters or digits are dropped.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for m in sentence_boundary().find_iter(text) {
        pieces.push(&text[last..m.end()]);
        last = m.end();
    }
    pieces.push(&text[last..]);

    let mut chunks: Vec<String> = Vec::new();
    for piece in pieces {
        let piece = piece.trim();
        if !piece.chars().any(|c| c.is_alphanumeric()) {
            continue;
        }
        for part in split_long(piece, max_chars) {
            match chunks.last_mut() {
                Some(prev) if prev.chars().count() + 1 + part.chars().count() <= max_chars => {
                    prev.push(' ');
                    prev.push_str(&part);
                }
                _ => chunks.push(part),
            }
        }
    }
    chunks
}

/// Whitespace split for pieces over the limit; overlong words are cut
fn split_long(piece: &str, max_chars: usize) -> Vec<String> {
    if piece.chars().count() <= max_chars {
        return vec![piece.to_string()];
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    for word in piece.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max_chars {
            if !current.is_empty() {
                parts.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for slice in chars.chunks(max_chars) {
                parts.push(slice.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { current.chars().count() + 1 + word_len };
        if needed > max_chars {
            parts.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}
