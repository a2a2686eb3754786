//! Candidate and accepted PHI spans

use crate::domain::PhiCategory;

/// One candidate or accepted PHI occurrence.
///
/// Offsets are half-open byte offsets into the scanned text, always aligned
/// to character boundaries (they come from the regex engine or from token
/// walks over `char_indices`). Spans live only inside a single `process()`
/// call; they are never persisted or exposed to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive); invariant `start < end <= text.len()`
    pub end: usize,
    /// Detected PHI category
    pub category: PhiCategory,
    /// Detector certainty in `[0, 1]`
    pub confidence: f64,
    /// Producing filter, for diagnostics only
    pub source_filter: &'static str,
}

impl Span {
    pub fn new(
        start: usize,
        end: usize,
        category: PhiCategory,
        confidence: f64,
        source_filter: &'static str,
    ) -> Self {
        Self {
            start,
            end,
            category,
            confidence: confidence.clamp(0.0, 1.0),
            source_filter,
        }
    }

    /// Span length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True when the two spans share at least one position.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The matched slice of the input.
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_clamped() {
        let span = Span::new(0, 4, PhiCategory::Name, 1.7, "test");
        assert_eq!(span.confidence, 1.0);
    }

    #[test]
    fn test_overlap_detection() {
        let a = Span::new(0, 10, PhiCategory::Name, 0.9, "a");
        let b = Span::new(9, 12, PhiCategory::Ssn, 0.9, "b");
        let c = Span::new(10, 12, PhiCategory::Ssn, 0.9, "c");
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_slice() {
        let text = "Patient John";
        let span = Span::new(8, 12, PhiCategory::Name, 0.9, "t");
        assert_eq!(span.slice(text), "John");
    }
}
