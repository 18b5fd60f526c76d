pub mod interface;
pub mod loader;
pub mod stage;
pub mod pipeline;
pub mod client;

pub use interface::{DecodeOptions, Direction, TextBatch, TranslationBackend};
pub use loader::{ModelHandle, ModelLoader, ModelSource};
pub use stage::TranslationStage;
pub use pipeline::{TranslationPipeline, TranslationResult};
pub use client::ServiceTranslator;
