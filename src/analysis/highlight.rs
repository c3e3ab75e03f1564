//! Inline entity highlighting.
//!
//! Splits a document into alternating plain and entity segments so the UI
//! can render the text with entity spans visually badged in place.  The
//! segments concatenate back to the exact original document.

use crate::nlp::{Entity, EntityLabel};

/// One run of document text, either plain or covered by an entity span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSegment {
    pub text: String,
    /// `Some(label)` when this run is an entity span.
    pub entity: Option<EntityLabel>,
}

/// Split `text` into highlight segments for the given entities.
///
/// Entities are taken in document order; a span that overlaps an earlier
/// one is skipped (the recognizer promises non-overlapping spans, but a
/// skipped span is better than a double-rendered byte range).  Spans with
/// offsets that do not slice cleanly are likewise skipped.
pub fn segments(text: &str, entities: &[Entity]) -> Vec<HighlightSegment> {
    let mut ordered: Vec<&Entity> = entities.iter().collect();
    ordered.sort_by_key(|e| e.start);

    let mut out = Vec::new();
    let mut cursor = 0;

    for entity in ordered {
        if entity.start < cursor || entity.end > text.len() || entity.start >= entity.end {
            continue;
        }

        let Some(span) = text.get(entity.start..entity.end) else {
            continue;
        };

        if entity.start > cursor {
            if let Some(plain) = text.get(cursor..entity.start) {
                out.push(HighlightSegment {
                    text: plain.to_string(),
                    entity: None,
                });
            }
        }

        out.push(HighlightSegment {
            text: span.to_string(),
            entity: Some(entity.label.clone()),
        });
        cursor = entity.end;
    }

    if cursor < text.len() {
        out.push(HighlightSegment {
            text: text[cursor..].to_string(),
            entity: None,
        });
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(text: &str, label: EntityLabel, start: usize) -> Entity {
        Entity {
            text: text.into(),
            label,
            start,
            end: start + text.len(),
        }
    }

    fn rebuilt(segments: &[HighlightSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn no_entities_is_one_plain_segment() {
        let segs = segments("just plain text", &[]);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].text, "just plain text");
        assert!(segs[0].entity.is_none());
    }

    #[test]
    fn entity_in_the_middle_splits_three_ways() {
        let text = "Detective Samuel Hart investigates";
        let segs = segments(
            text,
            &[entity("Samuel Hart", EntityLabel::Person, 10)],
        );

        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].text, "Detective ");
        assert_eq!(segs[1].text, "Samuel Hart");
        assert_eq!(segs[1].entity, Some(EntityLabel::Person));
        assert_eq!(segs[2].text, " investigates");
        assert_eq!(rebuilt(&segs), text);
    }

    #[test]
    fn entity_at_start_and_end() {
        let text = "Hart went to Brooklyn";
        let segs = segments(
            text,
            &[
                entity("Hart", EntityLabel::Person, 0),
                entity("Brooklyn", EntityLabel::Location, 13),
            ],
        );

        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].entity, Some(EntityLabel::Person));
        assert_eq!(segs[2].entity, Some(EntityLabel::Location));
        assert_eq!(rebuilt(&segs), text);
    }

    #[test]
    fn adjacent_entities_have_no_gap_segment() {
        let text = "NewYork";
        let segs = segments(
            text,
            &[
                entity("New", EntityLabel::Location, 0),
                entity("York", EntityLabel::Location, 3),
            ],
        );

        assert_eq!(segs.len(), 2);
        assert!(segs.iter().all(|s| s.entity.is_some()));
        assert_eq!(rebuilt(&segs), text);
    }

    #[test]
    fn overlapping_span_is_skipped() {
        let text = "Samuel Hart";
        let segs = segments(
            text,
            &[
                entity("Samuel Hart", EntityLabel::Person, 0),
                entity("Hart", EntityLabel::Person, 7),
            ],
        );

        assert_eq!(segs.len(), 1);
        assert_eq!(rebuilt(&segs), text);
    }

    #[test]
    fn out_of_range_span_is_skipped() {
        let text = "short";
        let segs = segments(text, &[entity("beyond", EntityLabel::Misc, 100)]);
        assert_eq!(segs.len(), 1);
        assert_eq!(rebuilt(&segs), text);
    }

    /// Unsorted input still renders in document order.
    #[test]
    fn entities_are_sorted_by_position() {
        let text = "Hart in Brooklyn";
        let segs = segments(
            text,
            &[
                entity("Brooklyn", EntityLabel::Location, 8),
                entity("Hart", EntityLabel::Person, 0),
            ],
        );

        assert_eq!(segs[0].entity, Some(EntityLabel::Person));
        assert_eq!(rebuilt(&segs), text);
    }
}
