//! Span conflict resolution
//!
//! Filters report overlapping, duplicated, and disagreeing candidates. The
//! resolver turns that pile into a non-overlapping, deterministically
//! ordered accepted set:
//!
//! 1. drop candidates below their category threshold,
//! 2. collapse exact duplicates (same region, same category) keeping the
//!    highest confidence,
//! 3. order by start, then span length (longer first), then confidence,
//!    then category specificity,
//! 4. sweep left to right, accepting every span that starts at or after the
//!    end of the previously accepted one.
//!
//! The output never overlaps and is sorted by start offset; identical input
//! always yields identical output.

use crate::domain::Span;
use crate::policy::Policy;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Confidence differences below this are treated as ties so float noise
/// cannot reorder the accepted set.
const CONFIDENCE_EPSILON: f64 = 0.001;

pub fn resolve(candidates: Vec<Span>, policy: &Policy) -> Vec<Span> {
    let mut spans: Vec<Span> = candidates
        .into_iter()
        .filter(|s| !s.is_empty())
        .filter(|s| policy.is_enabled(s.category))
        .filter(|s| s.confidence >= policy.threshold_for(s.category))
        .collect();

    dedupe(&mut spans);
    spans.sort_by(precedence);

    let mut accepted: Vec<Span> = Vec::with_capacity(spans.len());
    let mut cursor = 0usize;
    for span in spans {
        if span.start >= cursor {
            cursor = span.end;
            accepted.push(span);
        }
    }

    accepted
}

fn dedupe(spans: &mut Vec<Span>) {
    let mut best: HashMap<(usize, usize, crate::domain::PhiCategory), f64> = HashMap::new();
    for span in spans.iter() {
        let key = (span.start, span.end, span.category);
        let entry = best.entry(key).or_insert(f64::NEG_INFINITY);
        if span.confidence > *entry {
            *entry = span.confidence;
        }
    }

    let mut seen: HashMap<(usize, usize, crate::domain::PhiCategory), bool> = HashMap::new();
    spans.retain(|span| {
        let key = (span.start, span.end, span.category);
        if (span.confidence - best[&key]).abs() > f64::EPSILON {
            return false;
        }
        // Keep only the first of several max-confidence duplicates.
        !std::mem::replace(seen.entry(key).or_insert(false), true)
    });
}

fn precedence(a: &Span, b: &Span) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| {
            if (a.confidence - b.confidence).abs() < CONFIDENCE_EPSILON {
                Ordering::Equal
            } else {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(Ordering::Equal)
            }
        })
        .then_with(|| b.category.specificity().cmp(&a.category.specificity()))
}
