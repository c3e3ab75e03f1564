//! Part-of-speech tagging seam.
//!
//! [`PosTagger`] is the interface the analysis pipeline depends on.
//! [`OnnxPosTagger`] is the production implementation: a pretrained Penn
//! Treebank token-classification model behind a [`TokenClassifier`].
//! [`MockTagger`] (test-only) returns canned pairs so the pipeline can be
//! tested without model files.

use std::path::Path;

use crate::config::NlpConfig;
use crate::nlp::engine::{NlpError, TokenClassifier};
use crate::nlp::model;

// ---------------------------------------------------------------------------
// TaggedWord
// ---------------------------------------------------------------------------

/// One `(surface form, POS tag)` pair in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedWord {
    pub text: String,
    /// Penn Treebank tag (`NN`, `NNS`, `VBD`, `JJ`, `RB`, …).
    pub tag: String,
}

impl TaggedWord {
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// PosTagger trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for part-of-speech taggers.
///
/// # Contract
///
/// - Words come back in document order, punctuation included (punctuation
///   carries its own PTB tag and is filtered later by the categorizer).
/// - An empty or whitespace-only document yields `Ok(vec![])`, never an
///   error.
pub trait PosTagger: Send + Sync {
    /// Tag every word of `text`.
    fn tag(&self, text: &str) -> Result<Vec<TaggedWord>, NlpError>;
}

// ---------------------------------------------------------------------------
// OnnxPosTagger
// ---------------------------------------------------------------------------

/// Production tagger backed by a pretrained ONNX model.
pub struct OnnxPosTagger {
    classifier: TokenClassifier,
}

impl OnnxPosTagger {
    /// Resolve artifacts for the configured POS repo and load the model.
    pub fn load(config: &NlpConfig) -> Result<Self, NlpError> {
        let artifacts = model::resolve(&config.pos_repo, config.model_dir.as_deref())?;
        Ok(Self {
            classifier: TokenClassifier::load(&artifacts)?,
        })
    }

    /// Load from an explicit artifact directory (useful for tests and local
    /// model overrides).
    pub fn load_from_dir(dir: &Path) -> Result<Self, NlpError> {
        let artifacts = model::ModelArtifacts {
            model: dir.join(model::MODEL_FILE),
            tokenizer: dir.join(model::TOKENIZER_FILE),
            config: dir.join(model::CONFIG_FILE),
        };
        Ok(Self {
            classifier: TokenClassifier::load(&artifacts)?,
        })
    }
}

impl PosTagger for OnnxPosTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedWord>, NlpError> {
        let words = self.classifier.classify(text)?;
        Ok(words
            .into_iter()
            .map(|w| TaggedWord {
                text: w.text,
                tag: w.label,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// MockTagger  (test-only)
// ---------------------------------------------------------------------------

/// A test double returning canned `(word, tag)` pairs.
#[cfg(test)]
pub struct MockTagger {
    response: Vec<TaggedWord>,
    fail: bool,
}

#[cfg(test)]
impl MockTagger {
    /// Create a mock that returns the given pairs for any input.
    pub fn with_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            response: pairs
                .iter()
                .map(|(w, t)| TaggedWord::new(*w, *t))
                .collect(),
            fail: false,
        }
    }

    /// Create a mock whose `tag` always fails.
    pub fn failing() -> Self {
        Self {
            response: Vec::new(),
            fail: true,
        }
    }
}

#[cfg(test)]
impl PosTagger for MockTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedWord>, NlpError> {
        if self.fail {
            return Err(NlpError::Inference("mock tagger failure".into()));
        }
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.response.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_returns_configured_pairs() {
        let tagger = MockTagger::with_pairs(&[("Detective", "NNP"), ("ran", "VBD")]);
        let tagged = tagger.tag("whatever").unwrap();

        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[0], TaggedWord::new("Detective", "NNP"));
        assert_eq!(tagged[1], TaggedWord::new("ran", "VBD"));
    }

    #[test]
    fn mock_empty_input_yields_no_words() {
        let tagger = MockTagger::with_pairs(&[("word", "NN")]);
        assert!(tagger.tag("   ").unwrap().is_empty());
    }

    #[test]
    fn mock_failing_propagates_error() {
        let tagger = MockTagger::failing();
        assert!(matches!(
            tagger.tag("text").unwrap_err(),
            NlpError::Inference(_)
        ));
    }

    #[test]
    fn box_dyn_pos_tagger_compiles() {
        // If this test compiles, the trait is object-safe.
        let tagger: Box<dyn PosTagger> = Box::new(MockTagger::with_pairs(&[]));
        let _ = tagger.tag("");
    }

    #[test]
    fn load_missing_artifacts_fails() {
        let result = OnnxPosTagger::load_from_dir(Path::new("/nonexistent/model-dir"));
        assert!(result.is_err());
    }
}
