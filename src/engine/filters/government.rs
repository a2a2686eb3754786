//! Government identifier filters: SSN, passport, license/DEA

use crate::domain::{PhiCategory, Span};
use crate::engine::filters::has_context;
use crate::engine::filters::validators::{is_valid_dea, is_valid_ssn, ocr_digits};
use crate::lexicon::Lexicon;
use crate::policy::Policy;
use once_cell::sync::Lazy;
use regex::Regex;

static SSN_DASHED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("invalid ssn dashed pattern"));

static SSN_SPACED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3} \d{2} \d{4}\b").expect("invalid ssn spaced pattern"));

static SSN_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:ssn|social\s+security\s*(?:number|no|#)?)\s*[:#]?\s*(\d{3}[- ]?\d{2}[- ]?\d{4})\b")
        .expect("invalid labeled ssn pattern")
});

static SSN_MASKED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[Xx*]{3}-[Xx*]{2}-\d{4}\b").expect("invalid masked ssn pattern")
});

static PASSPORT_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bpassport\s*(?:no|number|#)?\s*[:#]?\s*([A-Z]?\d{6,9})\b")
        .expect("invalid passport pattern")
});

static DEA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][A-Z9]\d{7}\b").expect("invalid dea pattern"));

static LICENSE_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:medical\s+license|license|lic|certificate|cert)\s*(?:no|number|#)?\s*[:#]\s*([A-Z0-9][A-Z0-9-]{3,14})\b",
    )
    .expect("invalid labeled license pattern")
});

static DRIVERS_LICENSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:driver'?s?\s+license|DL)\s*(?:no|number|#)?\s*[:#]?\s*([A-Z0-9][A-Z0-9-]{3,14})\b")
        .expect("invalid drivers license pattern")
});

static CLIA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bCLIA\s*(?:no|number|#)?\s*[:#]?\s*(\d{2}[A-Z]\d{7})\b")
        .expect("invalid clia pattern")
});

const LICENSE_KEYWORDS: [&str; 6] = [
    "dea",
    "license",
    "prescrib",
    "registration",
    "certificate",
    "provider",
];

pub fn scan_ssn(text: &str, policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    ssn_pass(text, 0.0, &mut spans);
    if policy.ocr_normalization {
        let normalized = ocr_digits(text);
        if normalized != text {
            ssn_pass(&normalized, 0.05, &mut spans);
        }
    }
    spans
}

fn ssn_pass(text: &str, penalty: f64, spans: &mut Vec<Span>) {
    for m in SSN_DASHED.find_iter(text) {
        if is_valid_ssn(m.as_str()) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Ssn, 0.95 - penalty, "ssn"));
        }
    }
    for m in SSN_SPACED.find_iter(text) {
        if is_valid_ssn(m.as_str()) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Ssn, 0.85 - penalty, "ssn"));
        }
    }
    for caps in SSN_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            if is_valid_ssn(m.as_str()) {
                spans.push(Span::new(m.start(), m.end(), PhiCategory::Ssn, 0.97 - penalty, "ssn"));
            }
        }
    }
    for m in SSN_MASKED.find_iter(text) {
        spans.push(Span::new(m.start(), m.end(), PhiCategory::Ssn, 0.9 - penalty, "ssn"));
    }
}

pub fn scan_passport(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    // The label is the context gate; bare 6-9 digit runs are far too common.
    PASSPORT_LABELED
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| Span::new(m.start(), m.end(), PhiCategory::Passport, 0.9, "passport"))
        .collect()
}

pub fn scan_license(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();

    for m in DEA_RE.find_iter(text) {
        if is_valid_dea(m.as_str()) && has_context(text, m.start(), m.end(), &LICENSE_KEYWORDS) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::License, 0.9, "license"));
        }
    }
    for caps in LICENSE_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::License, 0.85, "license"));
        }
    }
    for caps in DRIVERS_LICENSE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::License, 0.9, "license"));
        }
    }
    for caps in CLIA_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::License, 0.9, "license"));
        }
    }

    spans
}
