//! Named policy templates
//!
//! Ready-made profiles usable without writing DSL. Each template is a
//! [`PolicyDocument`], so it passes through the same validation as a
//! compiled policy.

use crate::policy::document::{PolicyDocument, ReplacementStyle};
use std::collections::BTreeMap;

/// Names accepted by [`builtin`], in display order.
pub const TEMPLATE_NAMES: [&str; 5] = [
    "HIPAA_STRICT",
    "RESEARCH",
    "TRAINING",
    "CLINICAL_REVIEW",
    "OCR_TOLERANT",
];

/// Look up a named template. Name matching is case-insensitive.
pub fn builtin(name: &str) -> Option<PolicyDocument> {
    match name.trim().to_ascii_uppercase().as_str() {
        // Full Safe Harbor: everything redacted, including all age mentions.
        "HIPAA_STRICT" => Some(PolicyDocument {
            name: "HIPAA_STRICT".to_string(),
            style: ReplacementStyle::Brackets,
            enabled_types: None,
            disabled_types: vec![],
            default_threshold: 0.7,
            thresholds: BTreeMap::new(),
            age_threshold: 0,
            zip_keep_prefix: false,
            ocr_normalization: false,
        }),

        // De-identified research export: dates and ages below 90 stay,
        // ZIPs keep their three-digit population prefix.
        "RESEARCH" => Some(PolicyDocument {
            name: "RESEARCH".to_string(),
            style: ReplacementStyle::Brackets,
            enabled_types: None,
            disabled_types: vec!["DATE".to_string(), "RELATIVE_DATE".to_string()],
            default_threshold: 0.7,
            thresholds: BTreeMap::new(),
            age_threshold: 90,
            zip_keep_prefix: true,
            ocr_normalization: false,
        }),

        // Corpus preparation for model training: length-preserving masking.
        "TRAINING" => Some(PolicyDocument {
            name: "TRAINING".to_string(),
            style: ReplacementStyle::Asterisks,
            enabled_types: None,
            disabled_types: vec![],
            default_threshold: 0.7,
            thresholds: BTreeMap::new(),
            age_threshold: 0,
            zip_keep_prefix: false,
            ocr_normalization: false,
        }),

        // Chart review: numbered tags so reviewers can cross-reference
        // repeated mentions; clinically relevant dates and ages kept.
        "CLINICAL_REVIEW" => Some(PolicyDocument {
            name: "CLINICAL_REVIEW".to_string(),
            style: ReplacementStyle::Numbered,
            enabled_types: None,
            disabled_types: vec!["DATE".to_string(), "RELATIVE_DATE".to_string()],
            default_threshold: 0.7,
            thresholds: BTreeMap::new(),
            age_threshold: 90,
            zip_keep_prefix: false,
            ocr_normalization: false,
        }),

        // Scanned-document input: OCR digit/letter confusions normalized,
        // phonetic thresholds lowered to tolerate scan noise.
        "OCR_TOLERANT" => Some(PolicyDocument {
            name: "OCR_TOLERANT".to_string(),
            style: ReplacementStyle::Brackets,
            enabled_types: None,
            disabled_types: vec![],
            default_threshold: 0.6,
            thresholds: BTreeMap::from([("NAME".to_string(), 0.6)]),
            age_threshold: 0,
            zip_keep_prefix: false,
            ocr_normalization: true,
        }),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PhiCategory;

    #[test]
    fn test_all_templates_resolve_to_valid_policies() {
        for name in TEMPLATE_NAMES {
            let doc = builtin(name).expect(name);
            doc.into_policy().expect(name);
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(builtin("hipaa_strict").is_some());
        assert!(builtin(" Research ").is_some());
        assert!(builtin("NO_SUCH_TEMPLATE").is_none());
    }

    #[test]
    fn test_research_relaxations() {
        let policy = builtin("RESEARCH").unwrap().into_policy().unwrap();
        assert!(!policy.is_enabled(PhiCategory::Date));
        assert!(!policy.redacts_age(45));
        assert!(policy.redacts_age(90));
        assert!(policy.zip_keep_prefix);
    }

    #[test]
    fn test_strict_redacts_all_ages() {
        let policy = builtin("HIPAA_STRICT").unwrap().into_policy().unwrap();
        assert!(policy.redacts_age(1));
        assert!(policy.is_enabled(PhiCategory::Date));
    }

    #[test]
    fn test_ocr_tolerant_lowers_thresholds() {
        let policy = builtin("OCR_TOLERANT").unwrap().into_policy().unwrap();
        assert!(policy.ocr_normalization);
        assert!(policy.threshold_for(PhiCategory::Name) < 0.7);
    }

    #[test]
    fn test_training_masks_with_asterisks() {
        let policy = builtin("TRAINING").unwrap().into_policy().unwrap();
        assert_eq!(policy.style, crate::policy::ReplacementStyle::Asterisks);
    }
}
