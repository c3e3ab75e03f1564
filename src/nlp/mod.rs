//! NLP subsystem — pretrained token-classification models run via ONNX.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  model::resolve ── local dir → HF hub cache            │
//! │        │                                               │
//! │        ▼                                               │
//! │  TokenClassifier (ort session + tokenizer + LabelMap)  │
//! │        │                                               │
//! │        ├──▶ OnnxPosTagger      (PosTagger trait)       │
//! │        └──▶ OnnxEntityRecognizer (EntityRecognizer)    │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Two independent models share the same engine: a part-of-speech model
//! producing Penn Treebank tags and a named-entity model producing CoNLL
//! BIO labels.  All the linguistics lives in the pretrained weights; this
//! module only feeds text in and aligns the predictions back onto words.

pub mod engine;
pub mod entities;
pub mod labels;
pub mod model;
pub mod tagger;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{ClassifiedWord, NlpError, TokenClassifier};
pub use entities::{Entity, EntityLabel, EntityRecognizer, OnnxEntityRecognizer};
pub use labels::{LabelMap, LabelMapError};
pub use model::{resolve, ModelArtifacts, ModelResolveError};
pub use tagger::{OnnxPosTagger, PosTagger, TaggedWord};

// test-only re-exports so downstream test modules can import the mocks
// without spelling out the full paths.
#[cfg(test)]
pub use entities::MockEntityRecognizer;
#[cfg(test)]
pub use tagger::MockTagger;
