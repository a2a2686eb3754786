//! Contact filters: phone, fax, email, address, ZIP, city

use crate::domain::{PhiCategory, Span};
use crate::engine::filters::validators::ocr_digits;
use crate::lexicon::Lexicon;
use crate::policy::Policy;
use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_PATTERNS: Lazy<Vec<(Regex, f64)>> = Lazy::new(|| {
    vec![
        // (555) 123-4567, optional extension
        (
            Regex::new(r"\(\d{3}\)\s*\d{3}[-.]\d{4}(?:\s*(?:x|ext\.?)\s*\d{1,5})?")
                .expect("invalid phone paren pattern"),
            0.95,
        ),
        // +1-555-123-4567
        (
            Regex::new(r"\+1[-. ]?\(?\d{3}\)?[-. ]?\d{3}[-. ]?\d{4}\b")
                .expect("invalid phone intl pattern"),
            0.95,
        ),
        // 555-123-4567 / 555.123.4567
        (
            Regex::new(r"\b\d{3}[-.]\d{3}[-.]\d{4}(?:\s*(?:x|ext\.?)\s*\d{1,5})?\b")
                .expect("invalid phone dashed pattern"),
            0.9,
        ),
        // 555 123 4567
        (
            Regex::new(r"\b\d{3} \d{3} \d{4}\b").expect("invalid phone spaced pattern"),
            0.8,
        ),
    ]
});

static PHONE_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:phone|telephone|tel|cell|mobile)\s*(?:no|number|#)?\s*[:#]\s*(\+?[\d() .-]{7,20}\d)")
        .expect("invalid labeled phone pattern")
});

static FAX_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:fax|facsimile)\s*(?:no|number|#)?\s*[:.]?\s*((?:\+?1[-. ]?)?(?:\(\d{3}\)\s*|\d{3}[-. ])\d{3}[-. ]\d{4})",
    )
    .expect("invalid fax pattern")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("invalid email pattern")
});

static STREET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b\d{1,6}\s+(?:[A-Z][A-Za-z'-]+\s+){1,3}(?:Street|St|Avenue|Ave|Boulevard|Blvd|Road|Rd|Lane|Ln|Drive|Dr|Court|Ct|Circle|Cir|Place|Pl|Way|Terrace|Ter|Parkway|Pkwy|Highway|Hwy)\b\.?(?:\s*,?\s*(?:Apt|Apartment|Suite|Ste|Unit|#)\.?\s*[A-Za-z0-9-]+)?",
    )
    .expect("invalid street pattern")
});

static PO_BOX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bP\.?\s*O\.?\s*Box\s+\d+\b").expect("invalid po box pattern")
});

static CITY_STATE_ZIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s[A-Z][a-z]+)?,\s*[A-Z]{2}\s+\d{5}(?:-\d{4})?\b")
        .expect("invalid city-state-zip pattern")
});

static ZIP_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bzip(?:\s*code)?\s*[:#]?\s*(\d{5}(?:-\d{4})?)\b")
        .expect("invalid labeled zip pattern")
});

// Lookarounds keep the plus-four form from firing inside longer digit runs
// or identifiers.
static ZIP_PLUS_FOUR: Lazy<fancy_regex::Regex> = Lazy::new(|| {
    fancy_regex::Regex::new(r"(?<![\dA-Za-z-])\d{5}-\d{4}(?![\dA-Za-z-])")
        .expect("invalid zip+4 pattern")
});

static ZIP_AFTER_STATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z]{2}\s+(\d{5}(?:-\d{4})?)\b").expect("invalid state zip pattern")
});

static CITY_PREPOSITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:in|at|from|near|to)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)\b")
        .expect("invalid city preposition pattern")
});

static CITY_STATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?),\s*[A-Z]{2}\b")
        .expect("invalid city-state pattern")
});

pub fn scan_phone(text: &str, policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    phone_pass(text, 0.0, &mut spans);
    if policy.ocr_normalization {
        let normalized = ocr_digits(text);
        if normalized != text {
            // 1:1 ASCII mapping keeps offsets stable.
            phone_pass(&normalized, 0.05, &mut spans);
        }
    }
    spans
}

fn phone_pass(text: &str, penalty: f64, spans: &mut Vec<Span>) {
    for (re, confidence) in PHONE_PATTERNS.iter() {
        for m in re.find_iter(text) {
            spans.push(Span::new(
                m.start(),
                m.end(),
                PhiCategory::Phone,
                confidence - penalty,
                "phone",
            ));
        }
    }
    for caps in PHONE_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(
                m.start(),
                m.end(),
                PhiCategory::Phone,
                0.9 - penalty,
                "phone",
            ));
        }
    }
}

pub fn scan_fax(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for caps in FAX_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            // Outranks the unlabeled phone match over the same digits.
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Fax, 0.97, "fax"));
        }
    }
    spans
}

pub fn scan_email(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    EMAIL_RE
        .find_iter(text)
        .map(|m| Span::new(m.start(), m.end(), PhiCategory::Email, 0.99, "email"))
        .collect()
}

pub fn scan_address(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for m in STREET_RE.find_iter(text) {
        spans.push(Span::new(
            m.start(),
            m.end(),
            PhiCategory::Address,
            0.9,
            "address",
        ));
    }
    for m in PO_BOX_RE.find_iter(text) {
        spans.push(Span::new(
            m.start(),
            m.end(),
            PhiCategory::Address,
            0.95,
            "address",
        ));
    }
    for m in CITY_STATE_ZIP_RE.find_iter(text) {
        spans.push(Span::new(
            m.start(),
            m.end(),
            PhiCategory::Address,
            0.92,
            "address",
        ));
    }
    spans
}

pub fn scan_zip(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for caps in ZIP_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Zip, 0.95, "zip"));
        }
    }
    for m in ZIP_PLUS_FOUR.find_iter(text).flatten() {
        spans.push(Span::new(m.start(), m.end(), PhiCategory::Zip, 0.9, "zip"));
    }
    for caps in ZIP_AFTER_STATE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Zip, 0.85, "zip"));
        }
    }
    spans
}

pub fn scan_city(text: &str, _policy: &Policy, lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for caps in CITY_PREPOSITION_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            if lexicon.is_city(m.as_str()) {
                spans.push(Span::new(m.start(), m.end(), PhiCategory::City, 0.8, "city"));
            }
        }
    }
    for caps in CITY_STATE_RE.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            if lexicon.is_city(m.as_str()) {
                spans.push(Span::new(m.start(), m.end(), PhiCategory::City, 0.9, "city"));
            }
        }
    }
    spans
}
