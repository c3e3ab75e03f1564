//! Grammatical word classes and tag-prefix bucketing.
//!
//! The Penn Treebank tagset spells every category as a 2-letter family plus
//! optional refinements (`NN`, `NNS`, `NNP`, `VBD`, `JJR`, …), so a word's
//! bucket is decided by tag prefix alone:
//!
//! | Prefix | Class      | Covers                      |
//! |--------|------------|------------------------------|
//! | `NN`   | Noun       | NN, NNS, NNP, NNPS          |
//! | `VB`   | Verb       | VB, VBD, VBG, VBN, VBP, VBZ |
//! | `JJ`   | Adjective  | JJ, JJR, JJS                |
//! | `RB`   | Adverb     | RB, RBR, RBS                |
//!
//! Anything else (determiners, prepositions, punctuation, …) is dropped
//! from all buckets.

use crate::nlp::TaggedWord;

// ---------------------------------------------------------------------------
// WordClass
// ---------------------------------------------------------------------------

/// The four grammatical categories the app visualizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordClass {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl WordClass {
    /// Display order in the UI: nouns, verbs, adjectives, adverbs.
    pub const ALL: [WordClass; 4] = [
        WordClass::Noun,
        WordClass::Verb,
        WordClass::Adjective,
        WordClass::Adverb,
    ];

    /// Tag prefix selecting this class.
    pub fn tag_prefix(&self) -> &'static str {
        match self {
            WordClass::Noun => "NN",
            WordClass::Verb => "VB",
            WordClass::Adjective => "JJ",
            WordClass::Adverb => "RB",
        }
    }

    /// Plural heading used by the panels and the counts table.
    pub fn heading(&self) -> &'static str {
        match self {
            WordClass::Noun => "Nouns",
            WordClass::Verb => "Verbs",
            WordClass::Adjective => "Adjectives",
            WordClass::Adverb => "Adverbs",
        }
    }

    /// Classify a Penn Treebank tag, `None` when no bucket matches.
    pub fn from_tag(tag: &str) -> Option<WordClass> {
        WordClass::ALL
            .into_iter()
            .find(|class| tag.starts_with(class.tag_prefix()))
    }
}

// ---------------------------------------------------------------------------
// WordBuckets
// ---------------------------------------------------------------------------

/// The four ordered word sequences extracted from one document.
///
/// Duplicates are preserved (frequency matters to the clouds) and order
/// follows the document.  Recomputed fresh on every analysis run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordBuckets {
    nouns: Vec<String>,
    verbs: Vec<String>,
    adjectives: Vec<String>,
    adverbs: Vec<String>,
}

impl WordBuckets {
    /// Partition tagged words into buckets by tag prefix.
    pub fn partition(words: &[TaggedWord]) -> Self {
        let mut buckets = Self::default();
        for word in words {
            if let Some(class) = WordClass::from_tag(&word.tag) {
                buckets.bucket_mut(class).push(word.text.clone());
            }
        }
        buckets
    }

    /// The words of one class, in document order.
    pub fn words(&self, class: WordClass) -> &[String] {
        match class {
            WordClass::Noun => &self.nouns,
            WordClass::Verb => &self.verbs,
            WordClass::Adjective => &self.adjectives,
            WordClass::Adverb => &self.adverbs,
        }
    }

    pub fn count(&self, class: WordClass) -> usize {
        self.words(class).len()
    }

    /// `true` when no class matched anything.
    pub fn is_empty(&self) -> bool {
        WordClass::ALL.iter().all(|&class| self.count(class) == 0)
    }

    fn bucket_mut(&mut self, class: WordClass) -> &mut Vec<String> {
        match class {
            WordClass::Noun => &mut self.nouns,
            WordClass::Verb => &mut self.verbs,
            WordClass::Adjective => &mut self.adjectives,
            WordClass::Adverb => &mut self.adverbs,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
