//! False-positive suppression for dictionary-backed categories
//!
//! Name, city, and hospital detectors run on loose capitalization patterns,
//! so their output passes through a suppression cascade before resolution:
//! section headings, document-structure vocabulary, clinical phrases, and
//! label positions are all struck here. Pattern-validated identifiers (SSN,
//! phone, card numbers) never pass through this module.

use crate::domain::{PhiCategory, Span};

/// Whole-span matches against common note headings.
const SECTION_HEADINGS: [&str; 16] = [
    "chief complaint",
    "present illness",
    "review of systems",
    "past medical history",
    "past surgical history",
    "family history",
    "social history",
    "physical exam",
    "physical examination",
    "assessment and plan",
    "discharge summary",
    "discharge instructions",
    "emergency contact",
    "insurance verification",
    "medication list",
    "vital signs",
];

/// A span containing one of these tokens is document structure, not a name.
const STRUCTURE_WORDS: [&str; 20] = [
    "ssn", "dob", "mrn", "npi", "date", "birth", "record", "number", "phone", "address", "email",
    "fax", "member", "account", "status", "id", "room", "bed", "unit", "floor",
];

/// Capitalized sentence-leads and labels that start false name pairs.
/// Checked case-sensitively; these words as surnames stay detectable.
const INVALID_STARTS: [&str; 14] = [
    "Patient", "The", "This", "That", "These", "Those", "Please", "See", "Review", "Continue",
    "History", "Medical", "Following", "Upon",
];

const INVALID_ENDINGS: [&str; 6] = ["Inc", "LLC", "Corp", "Dept", "Department", "Pharmacy"];

/// Clinical vocabulary that pattern-matches as capitalized pairs.
const MEDICAL_PHRASES: [&str; 18] = [
    "ace inhibitor",
    "ace inhibitors",
    "beta blocker",
    "beta blockers",
    "calcium channel",
    "blood pressure",
    "heart rate",
    "bone marrow",
    "multiple sclerosis",
    "diabetes mellitus",
    "rheumatoid arthritis",
    "atrial fibrillation",
    "congestive heart",
    "chronic obstructive",
    "deep vein",
    "pulmonary embolism",
    "normal saline",
    "lactated ringers",
];

/// Directions and region words that read as capitalized pairs.
const GEO_TERMS: [&str; 8] = ["north", "south", "east", "west", "new", "upper", "lower", "central"];

/// Decide whether a dictionary-backed candidate is a false positive.
pub fn should_suppress(text: &str, span: &Span) -> bool {
    if !matches!(
        span.category,
        PhiCategory::Name | PhiCategory::City | PhiCategory::Hospital
    ) {
        return false;
    }

    let matched = span.slice(text);
    let lower = matched.to_lowercase();

    if SECTION_HEADINGS.contains(&lower.as_str()) || MEDICAL_PHRASES.contains(&lower.as_str()) {
        return true;
    }

    let tokens: Vec<&str> = matched.split_whitespace().collect();

    if lower
        .split_whitespace()
        .any(|t| STRUCTURE_WORDS.contains(&t.trim_matches(|c: char| !c.is_alphanumeric())))
    {
        return true;
    }

    if span.category == PhiCategory::Name {
        if let Some(first) = tokens.first() {
            if INVALID_STARTS.contains(first) {
                return true;
            }
            // "North Dakota", "New England" style pairs
            if tokens.len() == 2 && GEO_TERMS.contains(&first.to_lowercase().as_str()) {
                return true;
            }
        }
        if let Some(last) = tokens.last() {
            if INVALID_ENDINGS.contains(&last.trim_end_matches('.')) {
                return true;
            }
        }

        // A name immediately followed by a colon is a field label.
        if text[span.end..].trim_start().starts_with(':') {
            return true;
        }

        // Very short low-confidence singles are mostly noise.
        if matched.chars().count() < 5 && span.confidence < 0.9 && !matched.contains(',') {
            return true;
        }
    }

    false
}
