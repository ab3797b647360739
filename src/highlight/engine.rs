//! Annotation engine
//!
//! Recomputes highlight spans for a piece of segment text. Each call is a
//! full pass over the text; segments are small enough that no caching or
//! diffing is needed.

use super::rules::PatternSet;
use super::style::AnnotationSpan;

/// Annotate `text` against every rule in `patterns`
///
/// Rules are applied in order. Each rule contributes its own
/// non-overlapping leftmost matches; spans from different rules may
/// overlap and are all returned. Zero-length matches produce no span.
pub fn annotate(text: &str, patterns: &PatternSet) -> Vec<AnnotationSpan> {
    let mut spans = Vec::new();

    for (idx, rule) in patterns.rules().iter().enumerate() {
        for m in rule.pattern.find_iter(text) {
            // find_iter always advances past empty matches, so skipping
            // them here is enough to keep spans non-degenerate
            if m.start() == m.end() {
                continue;
            }
            spans.push(AnnotationSpan::new(m.start(), m.end(), idx, rule.style));
        }
    }

    spans
}
