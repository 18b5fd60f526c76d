//! In-process stand-ins for the model stages, shared by unit tests.

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::asr::{SpeechToText, Transcription};
use crate::translate::{
    DecodeOptions, Direction, ModelHandle, ModelSource, TranslationBackend, TranslationPipeline,
    TranslationStage,
};
use crate::tts::SpeechSynthesizer;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Ok,
    FailLoad,
    FailGenerate,
    DropOutputs,
}

/// Deterministic translator: prefixes each text with `[<target>] `
pub struct FakeTranslator {
    mode: Mode,
    loaded: Mutex<Vec<String>>,
    generate_calls: AtomicUsize,
    last_options: Mutex<Option<DecodeOptions>>,
}

impl FakeTranslator {
    fn with_mode(mode: Mode) -> Self {
        Self {
            mode,
            loaded: Mutex::new(Vec::new()),
            generate_calls: AtomicUsize::new(0),
            last_options: Mutex::new(None),
        }
    }

    pub fn new() -> Self {
        Self::with_mode(Mode::Ok)
    }

    pub fn failing_load() -> Self {
        Self::with_mode(Mode::FailLoad)
    }

    pub fn failing_generate() -> Self {
        Self::with_mode(Mode::FailGenerate)
    }

    /// Returns only the first translation of every batch
    pub fn dropping_outputs() -> Self {
        Self::with_mode(Mode::DropOutputs)
    }

    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }

    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    pub fn last_options(&self) -> Option<DecodeOptions> {
        *self.last_options.lock().unwrap()
    }
}

#[async_trait]
impl TranslationBackend for FakeTranslator {
    async fn load(&self, direction: &Direction, source: &ModelSource) -> anyhow::Result<String> {
        if self.mode == Mode::FailLoad {
            anyhow::bail!("cannot load {}", direction);
        }
        self.loaded.lock().unwrap().push(source.location());
        Ok(format!("fake:{}", direction))
    }

    async fn generate(
        &self,
        model: &ModelHandle,
        texts: &[String],
        options: &DecodeOptions,
    ) -> anyhow::Result<Vec<String>> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_options.lock().unwrap() = Some(*options);

        if self.mode == Mode::FailGenerate {
            anyhow::bail!("model {} crashed", model.model_id);
        }
        let mut outputs: Vec<String> = texts
            .iter()
            .map(|t| format!("[{}] {}", model.direction.target, t))
            .collect();
        if self.mode == Mode::DropOutputs {
            outputs.truncate(1);
        }
        Ok(outputs)
    }
}

pub fn fake_handle(source: &str, target: &str) -> ModelHandle {
    ModelHandle {
        direction: Direction::new(source, target),
        source: ModelSource::Fallback(format!("fake/{}-{}", source, target)),
        model_id: format!("fake:{}-{}", source, target),
        loaded_at: Utc::now(),
    }
}

/// de → en → mr pipeline over one fake backend
pub fn fake_pipeline(backend: Arc<FakeTranslator>) -> TranslationPipeline {
    TranslationPipeline::new(
        TranslationStage::new(fake_handle("de", "en"), backend.clone(), DecodeOptions::default()),
        TranslationStage::new(fake_handle("en", "mr"), backend, DecodeOptions::default()),
    )
}

pub struct FakeRecognizer {
    text: Option<String>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
    saw_file: AtomicBool,
}

impl FakeRecognizer {
    fn build(text: Option<String>, gate: Option<Arc<Notify>>) -> Self {
        Self {
            text,
            gate,
            calls: AtomicUsize::new(0),
            saw_file: AtomicBool::new(false),
        }
    }

    pub fn returning(text: &str) -> Self {
        Self::build(Some(text.to_string()), None)
    }

    pub fn failing() -> Self {
        Self::build(None, None)
    }

    /// Each transcription waits for one `notify_one` on `gate`
    pub fn gated(text: &str, gate: Arc<Notify>) -> Self {
        Self::build(Some(text.to_string()), Some(gate))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Whether the audio file existed when transcription ran
    pub fn saw_file(&self) -> bool {
        self.saw_file.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechToText for FakeRecognizer {
    async fn transcribe(&self, audio_path: &Path, language: &str) -> anyhow::Result<Transcription> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.saw_file.store(audio_path.is_file(), Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let text = self
            .text
            .clone()
            .ok_or_else(|| anyhow::anyhow!("decoder failed on {}", audio_path.display()))?;
        Ok(Transcription {
            text,
            language: language.to_string(),
            segments: Vec::new(),
        })
    }
}

/// Renders `ID3:<language>:<text>` as the audio bytes
pub struct FakeSynthesizer {
    fail: bool,
}

impl FakeSynthesizer {
    pub fn new() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn render(&self, text: &str, language: &str, _slow: bool) -> anyhow::Result<Vec<u8>> {
        if self.fail {
            anyhow::bail!("synthesis backend unavailable");
        }
        Ok(format!("ID3:{}:{}", language, text).into_bytes())
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_stub_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
