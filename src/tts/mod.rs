pub mod interface;
pub mod client;
pub mod google;
pub mod factory;
pub mod text_to_speech;

pub use interface::{GeneratedAudio, SpeechSynthesizer};
pub use factory::TTSFactory;
pub use text_to_speech::TextToSpeech;
