//! End-to-end engine behavior: detection, overlap resolution, rendering,
//! and the invariants every caller depends on.

use scrub::engine::{EngineConfig, RedactionEngine};
use scrub::policy::{templates, ReplacementStyle};
use scrub::PhiCategory;

fn strict_engine() -> RedactionEngine {
    RedactionEngine::from_config(EngineConfig::default()).unwrap()
}

#[test]
fn test_name_and_ssn_bracket_redaction() {
    let result = strict_engine().process("Patient John Smith SSN 123-45-6789");

    assert_eq!(result.text, "Patient [NAME] SSN [SSN]");
    assert_eq!(result.redaction_count, 2);
    assert_eq!(result.count_for(PhiCategory::Name), 1);
    assert_eq!(result.count_for(PhiCategory::Ssn), 1);
}

#[test]
fn test_phone_and_email_both_detected() {
    let result = strict_engine().process("Contact: (555) 123-4567 or jane@example.com");

    assert_eq!(result.redaction_count, 2);
    assert_eq!(result.count_for(PhiCategory::Phone), 1);
    assert_eq!(result.count_for(PhiCategory::Email), 1);
    assert!(!result.text.contains("555"));
    assert!(!result.text.contains("jane@example.com"));
}

#[test]
fn test_structural_span_wins_overlapping_region() {
    // The facility name is also a plausible name-filter candidate; exactly
    // one span must be accepted for the region and it must be the facility.
    let result = strict_engine().process("Seen at Mercy General Hospital on arrival");

    assert_eq!(result.text, "Seen at [HOSPITAL] on arrival");
    assert_eq!(result.redaction_count, 1);
    assert_eq!(result.count_for(PhiCategory::Hospital), 1);
    assert_eq!(result.count_for(PhiCategory::Name), 0);
}

#[test]
fn test_overlapping_date_filters_yield_one_span() {
    // Labeled DOB and the bare numeric pattern cover the same digits.
    let result = strict_engine().process("DOB: 03/15/1962");

    assert_eq!(result.text, "DOB: [DATE]");
    assert_eq!(result.count_for(PhiCategory::Date), 1);
}

#[test]
fn test_whitelist_protects_medication_vocabulary() {
    let input = "Patient was started on ACE inhibitor therapy";
    let result = strict_engine().process(input);

    assert_eq!(result.redaction_count, 0);
    assert_eq!(result.text, input);
}

#[test]
fn test_research_policy_preserves_low_ages() {
    let input = "Patient, age 45, tolerated the procedure";

    let research = RedactionEngine::from_document(templates::builtin("RESEARCH").unwrap()).unwrap();
    let kept = research.process(input);
    assert!(kept.text.contains("age 45"));
    assert_eq!(kept.count_for(PhiCategory::Age), 0);

    let redacted = strict_engine().process(input);
    assert_eq!(redacted.count_for(PhiCategory::Age), 1);
    assert!(!redacted.text.contains("45"));
}

#[test]
fn test_research_policy_still_redacts_ninety_and_up() {
    let research = RedactionEngine::from_document(templates::builtin("RESEARCH").unwrap()).unwrap();
    let result = research.process("Patient, age 92, lives alone");

    assert_eq!(result.count_for(PhiCategory::Age), 1);
    assert!(!result.text.contains("92"));
}

#[test]
fn test_coverage_monotonic_in_enabled_categories() {
    let input = "Dr. Garcia faxed 555-123-4567 about SSN 123-45-6789 on 03/15/2024";

    let ssn_only = RedactionEngine::from_config(EngineConfig {
        enabled_types: Some(vec!["SSN".to_string()]),
        ..EngineConfig::default()
    })
    .unwrap();

    let narrow = ssn_only.process(input).redaction_count;
    let full = strict_engine().process(input).redaction_count;
    assert!(narrow >= 1);
    assert!(full >= narrow);
}

#[test]
fn test_idempotent_on_redacted_output() {
    let once = strict_engine().process("Patient John Smith SSN 123-45-6789");
    let twice = strict_engine().process(&once.text);

    assert_eq!(twice.redaction_count, 0);
    assert_eq!(twice.text, once.text);
}

#[test]
fn test_asterisk_style_preserves_length() {
    let input = "Patient John Smith SSN 123-45-6789 was seen";
    let masked = RedactionEngine::from_config(EngineConfig {
        replacement_style: ReplacementStyle::Asterisks,
        ..EngineConfig::default()
    })
    .unwrap()
    .process(input);

    assert!(masked.has_redactions());
    assert_eq!(masked.text.len(), input.len());
    assert!(!masked.text.contains("6789"));
}

#[test]
fn test_empty_style_removes_spans() {
    let result = RedactionEngine::from_config(EngineConfig {
        replacement_style: ReplacementStyle::Empty,
        ..EngineConfig::default()
    })
    .unwrap()
    .process("SSN 123-45-6789.");

    assert_eq!(result.text, "SSN .");
    assert_eq!(result.redaction_count, 1);
}

#[test]
fn test_match_at_start_of_text() {
    let result = strict_engine().process("123-45-6789 is the SSN on file");

    assert_eq!(result.count_for(PhiCategory::Ssn), 1);
    assert!(result.text.starts_with("[SSN]"));
}

#[test]
fn test_match_at_end_of_text() {
    let result = strict_engine().process("SSN on file: 123-45-6789");

    assert_eq!(result.count_for(PhiCategory::Ssn), 1);
    assert!(result.text.ends_with("[SSN]"));
}

#[test]
fn test_numbered_style_counts_per_category() {
    let result = RedactionEngine::from_config(EngineConfig {
        replacement_style: ReplacementStyle::Numbered,
        ..EngineConfig::default()
    })
    .unwrap()
    .process("Call (555) 123-4567 or (555) 987-6543");

    assert_eq!(result.count_for(PhiCategory::Phone), 2);
    assert!(result.text.contains("[PHONE-1]"));
    assert!(result.text.contains("[PHONE-2]"));
}

#[test]
fn test_process_is_total_on_odd_input() {
    let engine = strict_engine();

    // Non-ASCII, unpaired punctuation, and control characters must never
    // panic or error; degraded detection is acceptable, a crash is not.
    for input in [
        "névé 123-45-6789 café",
        "((((((:::",
        "\u{0}\u{1}\u{2} SSN 123-45-6789",
        "𝕬𝖓𝖓𝖆 👩‍⚕️ saw the patient",
    ] {
        let result = engine.process(input);
        assert!(result.redaction_count == result.breakdown.values().sum::<usize>());
    }
}

#[test]
fn test_clinical_note_composite() {
    let note = "Mr. Robert Johnson (MRN: 48291736) was admitted on 03/15/2024. \
                Phone (617) 555-0142, lives at 42 Beacon Street, Boston, MA 02115. \
                Email robert.j@example.org.";
    let result = strict_engine().process(note);

    assert!(result.count_for(PhiCategory::Name) >= 1);
    assert_eq!(result.count_for(PhiCategory::Mrn), 1);
    assert_eq!(result.count_for(PhiCategory::Date), 1);
    assert_eq!(result.count_for(PhiCategory::Phone), 1);
    assert_eq!(result.count_for(PhiCategory::Email), 1);
    assert!(result.count_for(PhiCategory::Address) >= 1);

    for leaked in ["Robert Johnson", "48291736", "03/15/2024", "555-0142", "robert.j"] {
        assert!(!result.text.contains(leaked), "leaked: {leaked}");
    }
}

#[test]
fn test_ocr_tolerant_template_catches_confused_digits() {
    let engine =
        RedactionEngine::from_document(templates::builtin("OCR_TOLERANT").unwrap()).unwrap();
    let result = engine.process("ssn l23-45-6789 from the scanned intake form");

    assert_eq!(result.count_for(PhiCategory::Ssn), 1);
    assert!(!result.text.contains("l23-45-6789"));
}
