pub mod interface;
pub mod client;

pub use interface::{Segment, SpeechToText, Transcription};
pub use client::ServiceRecognizer;
