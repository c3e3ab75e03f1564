//! Analysis report assembly — one call runs the whole text pipeline.

use crate::analysis::categories::{WordBuckets, WordClass};
use crate::analysis::highlight::{self, HighlightSegment};
use crate::cloud::{scheme_for, WordCloud};
use crate::nlp::{Entity, EntityRecognizer, NlpError, PosTagger};

// ---------------------------------------------------------------------------
// AnalysisReport
// ---------------------------------------------------------------------------

/// Everything the Text Analysis tab renders for one document.
///
/// Recomputed from scratch on every Analyze press; nothing is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// The four word buckets, duplicates and order preserved.
    pub buckets: WordBuckets,
    /// One entry per category in display order; `None` means the bucket was
    /// empty and the panel shows a warning instead of a cloud.
    pub clouds: Vec<(WordClass, Option<WordCloud>)>,
    /// Recognized entities in document order.
    pub entities: Vec<Entity>,
    /// The document split into plain/entity runs for inline rendering.
    pub highlights: Vec<HighlightSegment>,
}

impl AnalysisReport {
    /// The cloud (if any) for one category.
    pub fn cloud(&self, class: WordClass) -> Option<&WordCloud> {
        self.clouds
            .iter()
            .find(|(c, _)| *c == class)
            .and_then(|(_, cloud)| cloud.as_ref())
    }
}

/// Run the full text pipeline: tag → partition → clouds → entities →
/// highlights.
///
/// The caller is responsible for rejecting blank documents up front (the
/// `EmptyInput` warning); passed a blank document anyway, this returns an
/// all-empty report rather than an error.
pub fn analyze(
    text: &str,
    tagger: &dyn PosTagger,
    recognizer: &dyn EntityRecognizer,
) -> Result<AnalysisReport, NlpError> {
    let tagged = tagger.tag(text)?;
    let buckets = WordBuckets::partition(&tagged);

    let clouds = WordClass::ALL
        .into_iter()
        .map(|class| {
            let cloud = WordCloud::layout(buckets.words(class), scheme_for(class));
            (class, cloud)
        })
        .collect();

    let entities = recognizer.recognize(text)?;
    let highlights = highlight::segments(text, &entities);

    Ok(AnalysisReport {
        buckets,
        clouds,
        entities,
        highlights,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::{Entity, EntityLabel, MockEntityRecognizer, MockTagger};

    fn story_tagger() -> MockTagger {
        MockTagger::with_pairs(&[
            ("Detective", "NNP"),
            ("Hart", "NNP"),
            ("navigated", "VBD"),
            ("the", "DT"),
            ("labyrinthine", "JJ"),
            ("streets", "NNS"),
            ("quietly", "RB"),
        ])
    }

    fn hart_entity() -> Entity {
        Entity {
            text: "Hart".into(),
            label: EntityLabel::Person,
            start: 10,
            end: 14,
        }
    }

    #[test]
    fn report_fills_buckets_and_clouds() {
        let tagger = story_tagger();
        let recognizer = MockEntityRecognizer::with_entities(vec![hart_entity()]);

        let text = "Detective Hart navigated the labyrinthine streets quietly";
        let report = analyze(text, &tagger, &recognizer).expect("report");

        assert_eq!(
            report.buckets.words(WordClass::Noun),
            ["Detective", "Hart", "streets"]
        );
        assert_eq!(report.buckets.count(WordClass::Verb), 1);
        assert_eq!(report.buckets.count(WordClass::Adjective), 1);
        assert_eq!(report.buckets.count(WordClass::Adverb), 1);

        // Every non-empty bucket has a cloud, in display order.
        assert_eq!(report.clouds.len(), 4);
        for class in WordClass::ALL {
            assert!(report.cloud(class).is_some(), "{class:?} missing cloud");
        }

        assert_eq!(report.entities.len(), 1);
        assert_eq!(report.entities[0].text, "Hart");
        // Highlight runs: "Detective " + "Hart" + tail.
        assert_eq!(report.highlights.len(), 3);
    }

    /// A document with no words in some category must not produce a cloud
    /// for it.
    #[test]
    fn empty_bucket_has_no_cloud() {
        let tagger = MockTagger::with_pairs(&[("city", "NN"), ("runs", "VBZ")]);
        let recognizer = MockEntityRecognizer::empty();

        let report = analyze("city runs", &tagger, &recognizer).expect("report");

        assert!(report.cloud(WordClass::Noun).is_some());
        assert!(report.cloud(WordClass::Verb).is_some());
        assert!(report.cloud(WordClass::Adjective).is_none());
        assert!(report.cloud(WordClass::Adverb).is_none());
    }

    #[test]
    fn no_entities_leaves_plain_highlight() {
        let tagger = MockTagger::with_pairs(&[("city", "NN")]);
        let recognizer = MockEntityRecognizer::empty();

        let report = analyze("city", &tagger, &recognizer).expect("report");

        assert!(report.entities.is_empty());
        assert_eq!(report.highlights.len(), 1);
        assert!(report.highlights[0].entity.is_none());
    }

    #[test]
    fn same_document_twice_is_identical() {
        let tagger = story_tagger();
        let recognizer = MockEntityRecognizer::with_entities(vec![hart_entity()]);

        let text = "Detective Hart navigated the labyrinthine streets quietly";
        let first = analyze(text, &tagger, &recognizer).expect("report");
        let second = analyze(text, &tagger, &recognizer).expect("report");

        assert_eq!(first, second);
    }

    #[test]
    fn tagger_failure_propagates() {
        let tagger = MockTagger::failing();
        let recognizer = MockEntityRecognizer::empty();

        assert!(analyze("text", &tagger, &recognizer).is_err());
    }

    #[test]
    fn recognizer_failure_propagates() {
        let tagger = MockTagger::with_pairs(&[]);
        let recognizer = MockEntityRecognizer::failing();

        assert!(analyze("text", &tagger, &recognizer).is_err());
    }
}
