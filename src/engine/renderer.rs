//! Redacted-text rendering
//!
//! Single left-to-right pass over the accepted spans: untouched gaps are
//! copied through, each span is replaced according to the policy style, and
//! the per-category breakdown is tallied as a side product. Scratch copies
//! of matched text are wiped before they are dropped.

use crate::domain::{PhiCategory, Span};
use crate::policy::{Policy, ReplacementStyle};
use std::collections::BTreeMap;
use zeroize::Zeroize;

/// Replace accepted spans in `text`. Spans must be non-overlapping and
/// sorted by start, which is what the resolver produces.
pub fn render(text: &str, spans: &[Span], policy: &Policy) -> (String, BTreeMap<PhiCategory, usize>) {
    let mut output = String::with_capacity(text.len());
    let mut breakdown: BTreeMap<PhiCategory, usize> = BTreeMap::new();
    let mut counters: BTreeMap<PhiCategory, usize> = BTreeMap::new();
    let mut cursor = 0usize;

    for span in spans {
        output.push_str(&text[cursor..span.start]);

        let mut scratch = span.slice(text).to_string();
        let replacement = replacement_for(&scratch, span.category, policy, &mut counters);
        output.push_str(&replacement);
        scratch.zeroize();

        *breakdown.entry(span.category).or_insert(0) += 1;
        cursor = span.end;
    }
    output.push_str(&text[cursor..]);

    (output, breakdown)
}

fn replacement_for(
    matched: &str,
    category: PhiCategory,
    policy: &Policy,
    counters: &mut BTreeMap<PhiCategory, usize>,
) -> String {
    // Partial ZIP preservation is length-preserving and overrides the
    // style: the three-digit prefix is the population-rule remainder.
    if category == PhiCategory::Zip && policy.zip_keep_prefix {
        let total = matched.chars().count();
        let prefix: String = matched.chars().take(3).collect();
        let mut masked = prefix;
        for _ in masked.chars().count()..total {
            masked.push('*');
        }
        return masked;
    }

    match policy.style {
        ReplacementStyle::Brackets => format!("[{}]", category.label()),
        ReplacementStyle::Numbered => {
            let n = counters.entry(category).or_insert(0);
            *n += 1;
            format!("[{}-{}]", category.label(), n)
        }
        ReplacementStyle::Asterisks => "*".repeat(matched.chars().count()),
        ReplacementStyle::Empty => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, needle: &str, category: PhiCategory) -> Span {
        let start = text.find(needle).unwrap();
        Span::new(start, start + needle.len(), category, 0.95, "test")
    }

    #[test]
    fn test_bracket_rendering() {
        let text = "Patient John Smith SSN 123-45-6789";
        let spans = vec![
            span(text, "John Smith", PhiCategory::Name),
            span(text, "123-45-6789", PhiCategory::Ssn),
        ];
        let (out, breakdown) = render(text, &spans, &Policy::default());
        assert_eq!(out, "Patient [NAME] SSN [SSN]");
        assert_eq!(breakdown[&PhiCategory::Name], 1);
        assert_eq!(breakdown[&PhiCategory::Ssn], 1);
    }

    #[test]
    fn test_numbered_rendering_counts_per_category() {
        let text = "John called Mary at 555-123-4567";
        let spans = vec![
            span(text, "John", PhiCategory::Name),
            span(text, "Mary", PhiCategory::Name),
            span(text, "555-123-4567", PhiCategory::Phone),
        ];
        let policy = Policy {
            style: ReplacementStyle::Numbered,
            ..Policy::default()
        };
        let (out, _) = render(text, &spans, &policy);
        assert_eq!(out, "[NAME-1] called [NAME-2] at [PHONE-1]");
    }

    #[test]
    fn test_asterisk_rendering_preserves_length() {
        let text = "call 555-123-4567 now";
        let spans = vec![span(text, "555-123-4567", PhiCategory::Phone)];
        let policy = Policy {
            style: ReplacementStyle::Asterisks,
            ..Policy::default()
        };
        let (out, _) = render(text, &spans, &policy);
        assert_eq!(out.chars().count(), text.chars().count());
        assert_eq!(out, "call ************ now");
    }

    #[test]
    fn test_empty_rendering() {
        let text = "name: John end";
        let spans = vec![span(text, "John", PhiCategory::Name)];
        let policy = Policy {
            style: ReplacementStyle::Empty,
            ..Policy::default()
        };
        let (out, _) = render(text, &spans, &policy);
        assert_eq!(out, "name:  end");
    }

    #[test]
    fn test_zip_prefix_preserved() {
        let text = "Boston, MA 02115";
        let spans = vec![span(text, "02115", PhiCategory::Zip)];
        let policy = Policy {
            zip_keep_prefix: true,
            ..Policy::default()
        };
        let (out, _) = render(text, &spans, &policy);
        assert_eq!(out, "Boston, MA 021**");
    }

    #[test]
    fn test_no_spans_returns_input_unchanged() {
        let text = "no phi here";
        let (out, breakdown) = render(text, &[], &Policy::default());
        assert_eq!(out, text);
        assert!(breakdown.is_empty());
    }
}
