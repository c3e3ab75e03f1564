//! Text analysis — grammatical buckets, entity highlights, report assembly.
//!
//! The pipeline is a straight line: tag → partition → lay out clouds →
//! recognize entities → split highlight segments.  [`analyze`] runs the
//! whole thing and returns an [`AnalysisReport`] the UI renders directly.

pub mod categories;
pub mod highlight;
pub mod report;

pub use categories::{WordBuckets, WordClass};
pub use highlight::HighlightSegment;
pub use report::{analyze, AnalysisReport};
