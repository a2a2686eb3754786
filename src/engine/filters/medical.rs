//! Medical identifier filters: MRN, NPI, health plan, age, dates, hospital

use crate::domain::{PhiCategory, Span};
use crate::engine::filters::has_context;
use crate::engine::filters::validators::ocr_digits;
use crate::lexicon::Lexicon;
use crate::policy::Policy;
use once_cell::sync::Lazy;
use regex::Regex;

static MRN_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:MRN|medical\s+record\s*(?:number|no|#)?|record\s*(?:number|no|#)|chart\s*(?:number|no|#))\s*[:#]?\s*([A-Z]{0,3}\d{5,10}[A-Z]?)\b",
    )
    .expect("invalid mrn pattern")
});

static NPI_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bNPI\s*(?:number|no|#)?\s*[:#]?\s*(\d{10})\b").expect("invalid npi pattern")
});

static HEALTH_PLAN_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:member|policy|group|plan|subscriber|beneficiary)\s*(?:id|number|no|#)\s*[:#]?\s*([A-Z0-9][A-Z0-9-]{5,15})\b",
    )
    .expect("invalid health plan pattern")
});

const INSURANCE_KEYWORDS: [&str; 12] = [
    "insurance",
    "insurer",
    "coverage",
    "payer",
    "medicare",
    "medicaid",
    "aetna",
    "cigna",
    "humana",
    "blue cross",
    "bcbs",
    "united healthcare",
];

static AGE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)\bage[d]?\s*:?\s*(\d{1,3})\b").expect("invalid age labeled pattern"),
        Regex::new(r"(?i)\b(\d{1,3})[-\s](?:year|yr)s?[-\s]old\b").expect("invalid age worded pattern"),
        Regex::new(r"(?i)\b(\d{1,3})\s*y/?o\b").expect("invalid age shorthand pattern"),
    ]
});

static DATE_PATTERNS: Lazy<Vec<(Regex, f64)>> = Lazy::new(|| {
    vec![
        // 03/15/2024, 3-15-24
        (
            Regex::new(r"\b(?:0?[1-9]|1[0-2])[/-](?:0?[1-9]|[12]\d|3[01])[/-](?:19|20)?\d{2}\b")
                .expect("invalid numeric date pattern"),
            0.9,
        ),
        // 2024-03-15
        (
            Regex::new(r"\b(?:19|20)\d{2}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])\b")
                .expect("invalid iso date pattern"),
            0.95,
        ),
        // March 15, 2024 / Mar 15 2024
        (
            Regex::new(
                r"(?i)\b(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t|tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+\d{1,2}(?:st|nd|rd|th)?,?\s+(?:19|20)\d{2}\b",
            )
            .expect("invalid month-name date pattern"),
            0.95,
        ),
        // 15 March 2024
        (
            Regex::new(
                r"(?i)\b\d{1,2}\s+(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t|tember)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\.?\s+(?:19|20)\d{2}\b",
            )
            .expect("invalid day-first date pattern"),
            0.9,
        ),
    ]
});

static DOB_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:DOB|date\s+of\s+birth)\s*[:#]?\s*(\d{1,2}[/-]\d{1,2}[/-](?:19|20)?\d{2})\b")
        .expect("invalid dob pattern")
});

static RELATIVE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:yesterday|tomorrow|last\s+(?:night|week|month|year)|next\s+(?:week|month|year)|\d+\s+(?:day|week|month|year)s?\s+ago)\b",
    )
    .expect("invalid relative date pattern")
});

static HOSPITAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[A-Z][A-Za-z'&.-]+(?:\s+(?:of|the|for|&|[A-Z][A-Za-z'&.-]+)){0,4}\s+(?:Hospital|Medical\s+Center|Clinic|Health\s+System|Health\s+Center|Cancer\s+Center|Infirmary)\b",
    )
    .expect("invalid hospital pattern")
});

pub fn scan_mrn(text: &str, policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    mrn_pass(text, 0.0, &mut spans);
    if policy.ocr_normalization {
        let normalized = ocr_digits(text);
        if normalized != text {
            mrn_pass(&normalized, 0.05, &mut spans);
        }
    }
    spans
}

fn mrn_pass(text: &str, penalty: f64, spans: &mut Vec<Span>) {
    for caps in MRN_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Mrn, 0.95 - penalty, "mrn"));
        }
    }
}

pub fn scan_npi(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    NPI_LABELED
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| Span::new(m.start(), m.end(), PhiCategory::Npi, 0.95, "npi"))
        .collect()
}

pub fn scan_health_plan(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    HEALTH_PLAN_LABELED
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter(|m| has_context(text, m.start(), m.end(), &INSURANCE_KEYWORDS))
        .map(|m| Span::new(m.start(), m.end(), PhiCategory::HealthPlan, 0.85, "health-plan"))
        .collect()
}

pub fn scan_age(text: &str, policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for re in AGE_PATTERNS.iter() {
        for caps in re.captures_iter(text) {
            let (whole, value) = match (caps.get(0), caps.get(1)) {
                (Some(w), Some(v)) => (w, v),
                _ => continue,
            };
            let age: u32 = match value.as_str().parse() {
                Ok(a) if a <= 130 => a,
                _ => continue,
            };
            if !policy.redacts_age(age) {
                continue;
            }
            let confidence = if age >= 90 { 0.95 } else { 0.9 };
            spans.push(Span::new(
                whole.start(),
                whole.end(),
                PhiCategory::Age,
                confidence,
                "age",
            ));
        }
    }
    spans
}

pub fn scan_date(text: &str, policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    date_pass(text, 0.0, &mut spans);
    if policy.ocr_normalization {
        let normalized = ocr_digits(text);
        if normalized != text {
            date_pass(&normalized, 0.05, &mut spans);
        }
    }
    spans
}

fn date_pass(text: &str, penalty: f64, spans: &mut Vec<Span>) {
    for (re, confidence) in DATE_PATTERNS.iter() {
        for m in re.find_iter(text) {
            spans.push(Span::new(
                m.start(),
                m.end(),
                PhiCategory::Date,
                confidence - penalty,
                "date",
            ));
        }
    }
    for caps in DOB_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Date, 0.97 - penalty, "date"));
        }
    }
}

pub fn scan_relative_date(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    RELATIVE_DATE_RE
        .find_iter(text)
        .map(|m| {
            Span::new(
                m.start(),
                m.end(),
                PhiCategory::RelativeDate,
                0.8,
                "relative-date",
            )
        })
        .collect()
}

pub fn scan_hospital(text: &str, _policy: &Policy, lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for m in HOSPITAL_RE.find_iter(text) {
        // Dictionary membership lifts confidence; the structural suffix
        // alone is still a solid facility signal.
        let confidence = if lexicon.is_hospital(m.as_str()) { 0.95 } else { 0.85 };
        spans.push(Span::new(
            m.start(),
            m.end(),
            PhiCategory::Hospital,
            confidence,
            "hospital",
        ));
    }
    spans
}
