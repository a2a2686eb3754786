//! Name filters
//!
//! Five cooperating detectors share the name dictionaries: capitalized
//! first/last pairs, "Last, First" forms, titled and labeled mentions,
//! family-member references, and a phonetic pass that catches misspelled or
//! OCR-mangled names the exact dictionaries miss. They deliberately
//! over-report; the resolver dedups and the whitelist strips clinical
//! vocabulary that happens to look like a name.

use crate::domain::{PhiCategory, Span};
use crate::engine::filters::phonetic_name_pair;
use crate::lexicon::Lexicon;
use crate::policy::Policy;
use once_cell::sync::Lazy;
use regex::Regex;

static FIRST_LAST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+)\s+(?:[A-Z]\.?\s+)?([A-Z][a-z]+)\b")
        .expect("invalid first-last pattern")
});

static HYPHENATED_LAST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+)\s+([A-Z][a-z]+-[A-Z][a-z]+)\b")
        .expect("invalid hyphenated name pattern")
});

static APOSTROPHE_LAST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+)\s+([A-Z]'[A-Z][a-z]+)\b").expect("invalid apostrophe name pattern")
});

static PARTICLE_LAST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+)\s+((?:van|von|de|del|der|la|le)\s+[A-Z][a-z]+)\b")
        .expect("invalid particle name pattern")
});

static SUFFIXED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+\s+[A-Z][a-z]+,?\s+(?:Jr|Sr|II|III|IV)\.?\b")
        .expect("invalid suffixed name pattern")
});

static ALLCAPS_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z]{2,})\s+([A-Z]{2,})\b").expect("invalid allcaps pair pattern")
});

static LAST_COMMA_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+),\s*([A-Z][a-z]+)\b").expect("invalid last-first pattern")
});

static LOWER_LAST_COMMA_FIRST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([a-z]+),\s*([a-z]+)\b").expect("invalid lowercase last-first pattern")
});

static MIXED_CASE_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z]*[a-z][A-Z][A-Za-z]*)\s+([A-Za-z]+)\b")
        .expect("invalid mixed-case pattern")
});

static TITLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:Dr|Mr|Mrs|Ms|Miss|Prof|Rev)\.?\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\b")
        .expect("invalid titled name pattern")
});

static PATIENT_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?i:patient|pt|subject|individual|client|resident)\s*:?\s+([A-Z][a-z]+(?:\s+(?:[A-Z]\.?|[A-Z][a-z]+))+)\b",
    )
    .expect("invalid patient-labeled pattern")
});

static ALLCAPS_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:patient|name|pt)\s*:\s*([A-Z]{2,}(?:\s+[A-Z]{2,})+)\b")
        .expect("invalid allcaps labeled pattern")
});

static AGE_GENDER_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b([A-Z][a-z]+\s+[A-Z][a-z]+),?\s+(?:is\s+)?a?\s*\d{1,3}[- ](?:year|yr)s?[- ]old\b",
    )
    .expect("invalid age-gender name pattern")
});

static FAMILY_MEMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?i:his|her|their)\s+(?i:wife|husband|spouse|mother|father|son|daughter|brother|sister|aunt|uncle|cousin|grandmother|grandfather|grandson|granddaughter)\s+([A-Z][a-z]+)\b",
    )
    .expect("invalid family member pattern")
});

static POSSESSIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+)'s\b").expect("invalid possessive pattern")
});

fn is_first(lexicon: &Lexicon, policy: &Policy, word: &str) -> bool {
    if policy.ocr_normalization {
        lexicon.first_name_with_ocr(word)
    } else {
        lexicon.is_first_name(word)
    }
}

fn is_last(lexicon: &Lexicon, policy: &Policy, word: &str) -> bool {
    if policy.ocr_normalization {
        lexicon.surname_with_ocr(word)
    } else {
        lexicon.is_surname(word)
    }
}

/// Confidence for a capitalized pair, graded by dictionary anchoring. An
/// unanchored pair lands below the default threshold so it only survives
/// under deliberately relaxed policies.
fn pair_confidence(lexicon: &Lexicon, policy: &Policy, first: &str, last: &str) -> f64 {
    let first_hit = is_first(lexicon, policy, first);
    let last_hit = is_last(lexicon, policy, last);
    match (first_hit, last_hit) {
        (true, true) => 0.92,
        (true, false) => 0.84,
        (false, true) => 0.78,
        (false, false) => 0.68,
    }
}

pub fn scan_exact_name(text: &str, policy: &Policy, lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();

    for caps in FIRST_LAST.captures_iter(text) {
        let (whole, first, last) = match (caps.get(0), caps.get(1), caps.get(2)) {
            (Some(w), Some(f), Some(l)) => (w, f, l),
            _ => continue,
        };
        let confidence = pair_confidence(lexicon, policy, first.as_str(), last.as_str());
        spans.push(Span::new(
            whole.start(),
            whole.end(),
            PhiCategory::Name,
            confidence,
            "exact-name",
        ));
    }

    for caps in HYPHENATED_LAST.captures_iter(text) {
        let (whole, first) = match (caps.get(0), caps.get(1)) {
            (Some(w), Some(f)) => (w, f),
            _ => continue,
        };
        let confidence = if is_first(lexicon, policy, first.as_str()) { 0.9 } else { 0.8 };
        spans.push(Span::new(
            whole.start(),
            whole.end(),
            PhiCategory::Name,
            confidence,
            "exact-name",
        ));
    }

    for caps in APOSTROPHE_LAST.captures_iter(text) {
        if let Some(whole) = caps.get(0) {
            spans.push(Span::new(whole.start(), whole.end(), PhiCategory::Name, 0.85, "exact-name"));
        }
    }

    for caps in PARTICLE_LAST.captures_iter(text) {
        if let Some(whole) = caps.get(0) {
            spans.push(Span::new(whole.start(), whole.end(), PhiCategory::Name, 0.85, "exact-name"));
        }
    }

    for m in SUFFIXED_NAME.find_iter(text) {
        spans.push(Span::new(m.start(), m.end(), PhiCategory::Name, 0.9, "exact-name"));
    }

    for caps in ALLCAPS_PAIR.captures_iter(text) {
        let (whole, a, b) = match (caps.get(0), caps.get(1), caps.get(2)) {
            (Some(w), Some(a), Some(b)) => (w, a, b),
            _ => continue,
        };
        // Shouted pairs are mostly headings and acronyms; require a full
        // dictionary match in either name order.
        let forward = is_first(lexicon, policy, a.as_str()) && is_last(lexicon, policy, b.as_str());
        let reversed = is_last(lexicon, policy, a.as_str()) && is_first(lexicon, policy, b.as_str());
        if forward || reversed {
            spans.push(Span::new(whole.start(), whole.end(), PhiCategory::Name, 0.85, "exact-name"));
        }
    }

    spans
}

pub fn scan_formatted_name(text: &str, policy: &Policy, lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();

    for caps in LAST_COMMA_FIRST.captures_iter(text) {
        let (whole, last, first) = match (caps.get(0), caps.get(1), caps.get(2)) {
            (Some(w), Some(l), Some(f)) => (w, l, f),
            _ => continue,
        };
        let mut confidence: f64 = 0.88;
        if is_last(lexicon, policy, last.as_str()) {
            confidence += 0.04;
        }
        if is_first(lexicon, policy, first.as_str()) {
            confidence += 0.03;
        }
        spans.push(Span::new(
            whole.start(),
            whole.end(),
            PhiCategory::Name,
            confidence.min(0.95),
            "formatted-name",
        ));
    }

    for caps in LOWER_LAST_COMMA_FIRST.captures_iter(text) {
        let (whole, last, first) = match (caps.get(0), caps.get(1), caps.get(2)) {
            (Some(w), Some(l), Some(f)) => (w, l, f),
            _ => continue,
        };
        // Without capitalization the dictionary is the only signal, so
        // both halves must hit.
        if is_last(lexicon, policy, last.as_str()) && is_first(lexicon, policy, first.as_str()) {
            spans.push(Span::new(whole.start(), whole.end(), PhiCategory::Name, 0.82, "formatted-name"));
        }
    }

    for caps in MIXED_CASE_PAIR.captures_iter(text) {
        let (whole, a, b) = match (caps.get(0), caps.get(1), caps.get(2)) {
            (Some(w), Some(a), Some(b)) => (w, a, b),
            _ => continue,
        };
        let a_lower = a.as_str().to_ascii_lowercase();
        let b_lower = b.as_str().to_ascii_lowercase();
        if (is_first(lexicon, policy, &a_lower) && is_last(lexicon, policy, &b_lower))
            || (is_last(lexicon, policy, &a_lower) && is_first(lexicon, policy, &b_lower))
        {
            spans.push(Span::new(whole.start(), whole.end(), PhiCategory::Name, 0.83, "formatted-name"));
        }
    }

    spans
}

pub fn scan_titled_name(text: &str, policy: &Policy, lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();

    for caps in TITLED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            let anchored = m
                .as_str()
                .split_whitespace()
                .any(|w| is_first(lexicon, policy, w) || is_last(lexicon, policy, w));
            let confidence = if anchored { 0.95 } else { 0.9 };
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Name, confidence, "titled-name"));
        }
    }

    for caps in PATIENT_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            let anchored = m
                .as_str()
                .split_whitespace()
                .any(|w| is_first(lexicon, policy, w) || is_last(lexicon, policy, w));
            let confidence = if anchored { 0.92 } else { 0.87 };
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Name, confidence, "titled-name"));
        }
    }

    for caps in ALLCAPS_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Name, 0.88, "titled-name"));
        }
    }

    for caps in AGE_GENDER_NAME.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Name, 0.9, "titled-name"));
        }
    }

    spans
}

pub fn scan_family_name(text: &str, policy: &Policy, lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();

    for caps in FAMILY_MEMBER.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Name, 0.9, "family-name"));
        }
    }

    for caps in POSSESSIVE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            let word = m.as_str();
            if is_first(lexicon, policy, word) || is_last(lexicon, policy, word) {
                spans.push(Span::new(m.start(), m.end(), PhiCategory::Name, 0.82, "family-name"));
            }
        }
    }

    spans
}

/// Fuzzy pass over capitalized pairs: fires only when the pair is not fully
/// dictionary-anchored but both halves resolve through the phonetic index.
pub fn scan_phonetic_name(text: &str, policy: &Policy, lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();

    for caps in FIRST_LAST.captures_iter(text) {
        let (whole, first, last) = match (caps.get(0), caps.get(1), caps.get(2)) {
            (Some(w), Some(f), Some(l)) => (w, f, l),
            _ => continue,
        };
        if is_first(lexicon, policy, first.as_str()) && is_last(lexicon, policy, last.as_str()) {
            // Fully anchored pairs belong to the exact-name filter.
            continue;
        }
        if let Some(confidence) = phonetic_name_pair(lexicon, first.as_str(), last.as_str()) {
            spans.push(Span::new(
                whole.start(),
                whole.end(),
                PhiCategory::Name,
                confidence,
                "phonetic-name",
            ));
        }
    }

    spans
}
