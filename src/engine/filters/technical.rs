//! Technical identifier filters: IPs, URLs, devices, vehicles, biometrics,
//! and miscellaneous unique identifiers

use crate::domain::{PhiCategory, Span};
use crate::engine::filters::has_context;
use crate::engine::filters::validators::{is_valid_ipv4, is_valid_ipv6, is_valid_vin};
use crate::lexicon::Lexicon;
use crate::policy::Policy;
use once_cell::sync::Lazy;
use regex::Regex;

static IPV4_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b").expect("invalid ipv4 pattern"));

static IPV6_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:[0-9A-Fa-f]{1,4}:){2,7}[0-9A-Fa-f:]{1,4}\b").expect("invalid ipv6 pattern")
});

static URL_HTTPS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bhttps?://[^\s<>"')]+"#).expect("invalid https url pattern")
});

static URL_WWW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bwww\.[A-Za-z0-9-]+\.[A-Za-z]{2,}[^\s<>"')]*"#).expect("invalid www url pattern")
});

static DEVICE_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:serial\s*(?:no|number|#)?|device\s*(?:id|identifier|serial)|model\s*(?:no|number|#)|implant\s*(?:id|serial)|pump\s*(?:id|serial)|udi)\s*[:#]?\s*([A-Z0-9][A-Z0-9-]{4,24})\b",
    )
    .expect("invalid device pattern")
});

const DEVICE_KEYWORDS: [&str; 10] = [
    "device",
    "serial",
    "implant",
    "pacemaker",
    "defibrillator",
    "pump",
    "prosthe",
    "stent",
    "model",
    "udi",
];

const DEVICE_SUPPRESSORS: [&str; 3] = ["call button", "room:", "bed:"];

static VIN_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bVIN\s*(?:no|number|#)?\s*[:#]?\s*([A-HJ-NPR-Z0-9]{17})\b")
        .expect("invalid labeled vin pattern")
});

static VIN_BARE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-HJ-NPR-Z0-9]{17}\b").expect("invalid bare vin pattern"));

static PLATE_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:license\s+plate|plate)\s*(?:no|number|#)?\s*[:#]?\s*([A-Z0-9]{2,3}[- ]?[A-Z0-9]{3,4})\b")
        .expect("invalid plate pattern")
});

static BIOMETRIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:fingerprint|retinal\s+scan|retina\s+scan|iris\s+scan|voice\s*print|voiceprint|facial\s+recognition|palm\s+print|gait\s+pattern)\s*(?:id|identifier|record|code)?\s*[:#]?\s*([A-Z0-9][A-Z0-9-]{3,24})\b",
    )
    .expect("invalid biometric pattern")
});

static UNIQUE_ID_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:patient\s+id|subject\s+id|participant\s+id|study\s+id|case\s+(?:id|number)|badge\s*(?:no|number|#)?|employee\s+(?:id|number))\s*[:#]?\s*([A-Z0-9][A-Z0-9-]{2,19})\b",
    )
    .expect("invalid unique id pattern")
});

pub fn scan_ip(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for m in IPV4_RE.find_iter(text) {
        if is_valid_ipv4(m.as_str()) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::IpAddress, 0.95, "ip"));
        }
    }
    for m in IPV6_RE.find_iter(text) {
        if is_valid_ipv6(m.as_str()) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::IpAddress, 0.85, "ip"));
        }
    }
    spans
}

pub fn scan_url(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for m in URL_HTTPS.find_iter(text) {
        spans.push(Span::new(m.start(), trim_trailing_punct(m.as_str(), m.start()), PhiCategory::Url, 0.95, "url"));
    }
    for m in URL_WWW.find_iter(text) {
        // Skip www forms already covered by a scheme match.
        if m.start() >= 8 && text[..m.start()].ends_with("://") {
            continue;
        }
        spans.push(Span::new(m.start(), trim_trailing_punct(m.as_str(), m.start()), PhiCategory::Url, 0.9, "url"));
    }
    spans
}

fn trim_trailing_punct(matched: &str, start: usize) -> usize {
    let trimmed = matched.trim_end_matches(['.', ',', ';', '!', '?']);
    start + trimmed.len()
}

pub fn scan_device(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for caps in DEVICE_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            if !has_context(text, m.start(), m.end(), &DEVICE_KEYWORDS) {
                continue;
            }
            if has_context(text, m.start(), m.end(), &DEVICE_SUPPRESSORS) {
                continue;
            }
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Device, 0.85, "device"));
        }
    }
    spans
}

pub fn scan_vehicle(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for caps in VIN_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            if is_valid_vin(m.as_str()) {
                spans.push(Span::new(m.start(), m.end(), PhiCategory::Vehicle, 0.95, "vehicle"));
            }
        }
    }
    for m in VIN_BARE.find_iter(text) {
        if is_valid_vin(m.as_str()) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Vehicle, 0.85, "vehicle"));
        }
    }
    for caps in PLATE_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Vehicle, 0.9, "vehicle"));
        }
    }
    spans
}

pub fn scan_biometric(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    BIOMETRIC_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| Span::new(m.start(), m.end(), PhiCategory::Biometric, 0.8, "biometric"))
        .collect()
}

pub fn scan_unique_id(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    UNIQUE_ID_LABELED
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| Span::new(m.start(), m.end(), PhiCategory::UniqueId, 0.85, "unique-id"))
        .collect()
}
