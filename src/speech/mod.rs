//! Remote speech-recognition client.
//!
//! This module provides:
//! * [`SpeechRecognizer`] — async trait implemented by recognition backends.
//! * [`RemoteRecognizer`] — OpenAI-compatible `/v1/audio/transcriptions`
//!   client (the production backend).
//! * [`TranscribeError`] — typed failures surfaced to the UI.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use unstructure::audio::WavClip;
//! use unstructure::config::AppConfig;
//! use unstructure::speech::{RemoteRecognizer, SpeechRecognizer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let recognizer = RemoteRecognizer::from_config(&config.speech);
//!
//!     let clip = WavClip::load("speech.wav").unwrap();
//!     match recognizer.transcribe(&clip).await {
//!         Ok(text) => println!("{text}"),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

pub mod recognizer;

pub use recognizer::{RemoteRecognizer, SpeechRecognizer, TranscribeError};

// test-only re-export so the pipeline test module can import MockRecognizer
// without `use unstructure::speech::recognizer::MockRecognizer`.
#[cfg(test)]
pub use recognizer::MockRecognizer;
