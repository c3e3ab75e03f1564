//! Unstructured Data Analysis — transcribe audio, analyse text.
//!
//! # Module map
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`config`]   | `settings.toml` persistence + platform paths |
//! | [`audio`]    | WAV upload parsing and validation |
//! | [`speech`]   | remote speech-recognition client |
//! | [`nlp`]      | ONNX token-classification engine, POS tagger, NER |
//! | [`analysis`] | word buckets, entity highlights, report assembly |
//! | [`cloud`]    | word-cloud layout and color schemes |
//! | [`stories`]  | fixed sample-story table |
//! | [`pipeline`] | orchestrator + shared state read by the UI |
//! | [`app`]      | egui tabbed application |

pub mod analysis;
pub mod app;
pub mod audio;
pub mod cloud;
pub mod config;
pub mod nlp;
pub mod pipeline;
pub mod speech;
pub mod stories;
