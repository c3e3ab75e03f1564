//! Named-entity recognition seam and BIO decoding.
//!
//! The NER model labels words with CoNLL BIO tags (`B-PER`, `I-PER`, `O`,
//! …).  [`merge_bio`] collapses those runs into [`Entity`] spans carrying
//! byte offsets into the document, which the highlight renderer reuses.

use std::path::Path;

use crate::config::NlpConfig;
use crate::nlp::engine::{ClassifiedWord, NlpError, TokenClassifier};
use crate::nlp::model;

// ---------------------------------------------------------------------------
// EntityLabel
// ---------------------------------------------------------------------------

/// Entity class, normalized from the model's label family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityLabel {
    Person,
    Organization,
    Location,
    Misc,
    /// A family the CoNLL taxonomy does not cover — kept verbatim.
    Other(String),
}

impl EntityLabel {
    /// Normalize a label family (the part after `B-`/`I-`).
    pub fn from_family(family: &str) -> Self {
        match family {
            "PER" | "PERSON" => EntityLabel::Person,
            "ORG" | "ORGANIZATION" => EntityLabel::Organization,
            "LOC" | "LOCATION" | "GPE" => EntityLabel::Location,
            "MISC" => EntityLabel::Misc,
            other => EntityLabel::Other(other.to_string()),
        }
    }

    /// Short code shown in the entity table and highlight badges.
    pub fn code(&self) -> &str {
        match self {
            EntityLabel::Person => "PER",
            EntityLabel::Organization => "ORG",
            EntityLabel::Location => "LOC",
            EntityLabel::Misc => "MISC",
            EntityLabel::Other(s) => s,
        }
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One recognized entity span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Surface text, sliced from the document.
    pub text: String,
    pub label: EntityLabel,
    /// Byte offset of the span's first byte in the document.
    pub start: usize,
    /// Byte offset one past the span's last byte.
    pub end: usize,
}

// ---------------------------------------------------------------------------
// EntityRecognizer trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for named-entity recognizers.
///
/// # Contract
///
/// - Entities come back ordered by document position, non-overlapping.
/// - A document with no entities yields `Ok(vec![])`, never an error.
pub trait EntityRecognizer: Send + Sync {
    /// Recognize all entities in `text`.
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NlpError>;
}

// ---------------------------------------------------------------------------
// OnnxEntityRecognizer
// ---------------------------------------------------------------------------

/// Production recognizer backed by a pretrained ONNX model.
pub struct OnnxEntityRecognizer {
    classifier: TokenClassifier,
}

impl OnnxEntityRecognizer {
    /// Resolve artifacts for the configured NER repo and load the model.
    pub fn load(config: &NlpConfig) -> Result<Self, NlpError> {
        let artifacts = model::resolve(&config.ner_repo, config.model_dir.as_deref())?;
        Ok(Self {
            classifier: TokenClassifier::load(&artifacts)?,
        })
    }

    /// Load from an explicit artifact directory.
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

impl EntityRecognizer for OnnxEntityRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NlpError> {
        let words = self.classifier.classify(text)?;
        Ok(merge_bio(text, &words))
    }
}

// ---------------------------------------------------------------------------
// BIO decoding
// ---------------------------------------------------------------------------

/// Collapse BIO-labelled words into entity spans.
///
/// Rules, matching standard CoNLL decoding:
/// - `O` closes any open span.
/// - `B-X` closes any open span and opens a new `X` span.
/// - `I-X` extends an open `X` span; an `I-X` with no matching open span
///   (model hiccup) opens one, so the entity is not silently dropped.
/// - A bare family label (no prefix) behaves like `I-X` next to the same
///   family and `B-X` otherwise.
pub(crate) fn merge_bio(text: &str, words: &[ClassifiedWord]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut open: Option<Entity> = None;

    for word in words {
        let (prefix, family) = split_bio(&word.label);

        if prefix == Bio::Outside {
            flush(text, &mut open, &mut entities);
            continue;
        }

        let label = EntityLabel::from_family(family);
        let extends = prefix != Bio::Begin
            && open.as_ref().is_some_and(|e| e.label == label);

        if extends {
            if let Some(entity) = open.as_mut() {
                entity.end = word.end;
            }
        } else {
            flush(text, &mut open, &mut entities);
            open = Some(Entity {
                text: String::new(),
                label,
                start: word.start,
                end: word.end,
            });
        }
    }

    flush(text, &mut open, &mut entities);
    entities
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Bio {
    Begin,
    Inside,
    Outside,
}

/// Split a model label into its BIO prefix and family.
fn split_bio(label: &str) -> (Bio, &str) {
    if label == "O" {
        return (Bio::Outside, "");
    }
    if let Some(family) = label.strip_prefix("B-") {
        return (Bio::Begin, family);
    }
    if let Some(family) = label.strip_prefix("I-") {
        return (Bio::Inside, family);
    }
    (Bio::Inside, label)
}

/// Close the open span, slicing its surface text from the document.
fn flush(text: &str, open: &mut Option<Entity>, entities: &mut Vec<Entity>) {
    if let Some(mut entity) = open.take() {
        if let Some(surface) = text.get(entity.start..entity.end) {
            entity.text = surface.to_string();
            entities.push(entity);
        }
    }
}

// ---------------------------------------------------------------------------
// MockEntityRecognizer  (test-only)
// ---------------------------------------------------------------------------

/// A test double returning canned entities.
#[cfg(test)]
pub struct MockEntityRecognizer {
    response: Vec<Entity>,
    fail: bool,
}

#[cfg(test)]
impl MockEntityRecognizer {
    pub fn with_entities(entities: Vec<Entity>) -> Self {
        Self {
            response: entities,
            fail: false,
        }
    }

    /// A recognizer that finds nothing, for the "no entities" paths.
    pub fn empty() -> Self {
        Self::with_entities(Vec::new())
    }

    pub fn failing() -> Self {
        Self {
            response: Vec::new(),
            fail: true,
        }
    }
}

#[cfg(test)]
impl EntityRecognizer for MockEntityRecognizer {
    fn recognize(&self, text: &str) -> Result<Vec<Entity>, NlpError> {
        if self.fail {
            return Err(NlpError::Inference("mock recognizer failure".into()));
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

    fn word(text: &str, label: &str, start: usize) -> ClassifiedWord {
        ClassifiedWord {
            text: text.into(),
            label: label.into(),
            start,
            end: start + text.len(),
        }
    }

    #[test]
    fn begin_inside_merges_into_one_span() {
        let text = "Samuel Hart investigates";
        let words = [
            word("Samuel", "B-PER", 0),
            word("Hart", "I-PER", 7),
            word("investigates", "O", 12),
        ];

        let entities = merge_bio(text, &words);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Samuel Hart");
        assert_eq!(entities[0].label, EntityLabel::Person);
        assert_eq!((entities[0].start, entities[0].end), (0, 11));
    }

    #[test]
    fn outside_closes_span() {
        let text = "Hart of New York";
        let words = [
            word("Hart", "B-PER", 0),
            word("of", "O", 5),
            word("New", "B-LOC", 8),
            word("York", "I-LOC", 12),
        ];

        let entities = merge_bio(text, &words);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].text, "Hart");
        assert_eq!(entities[1].text, "New York");
        assert_eq!(entities[1].label, EntityLabel::Location);
    }

    #[test]
    fn adjacent_begins_stay_separate() {
        let text = "Vance Moretti";
        let words = [word("Vance", "B-PER", 0), word("Moretti", "B-PER", 6)];

        let entities = merge_bio(text, &words);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].text, "Vance");
        assert_eq!(entities[1].text, "Moretti");
    }

    /// An `I-` with no open span must still produce an entity.
    #[test]
    fn dangling_inside_opens_span() {
        let text = "in Amazonia today";
        let words = [
            word("in", "O", 0),
            word("Amazonia", "I-LOC", 3),
            word("today", "O", 12),
        ];

        let entities = merge_bio(text, &words);
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].text, "Amazonia");
    }

    /// `I-` of a different family closes the previous span.
    #[test]
    fn family_change_closes_span() {
        let text = "Hart Interpol";
        let words = [word("Hart", "B-PER", 0), word("Interpol", "I-ORG", 5)];

        let entities = merge_bio(text, &words);
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].label, EntityLabel::Person);
        assert_eq!(entities[1].label, EntityLabel::Organization);
    }

    #[test]
    fn all_outside_yields_nothing() {
        let text = "nothing to see";
        let words = [
            word("nothing", "O", 0),
            word("to", "O", 8),
            word("see", "O", 11),
        ];
        assert!(merge_bio(text, &words).is_empty());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(merge_bio("", &[]).is_empty());
    }

    #[test]
    fn unknown_family_passes_through() {
        let text = "Tuesday";
        let words = [word("Tuesday", "B-DATE", 0)];

        let entities = merge_bio(text, &words);
        assert_eq!(entities[0].label, EntityLabel::Other("DATE".into()));
        assert_eq!(entities[0].label.code(), "DATE");
    }

    #[test]
    fn label_codes() {
        assert_eq!(EntityLabel::Person.code(), "PER");
        assert_eq!(EntityLabel::Organization.code(), "ORG");
        assert_eq!(EntityLabel::Location.code(), "LOC");
        assert_eq!(EntityLabel::Misc.code(), "MISC");
        assert_eq!(EntityLabel::from_family("GPE"), EntityLabel::Location);
    }
}
