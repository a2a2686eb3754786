//! DSL-to-JSON-to-engine contract: the JSON document is the load-bearing
//! interface between `scrub policy compile` and engine construction.

use scrub::engine::RedactionEngine;
use scrub::policy::{compiler, templates, PolicyDocument};
use scrub::PhiCategory;

const RESEARCH_DSL: &str = r#"
policy "Research Export"
style brackets
disable DATE RELATIVE_DATE
age-threshold 90
zip keep-prefix
"#;

#[test]
fn test_compiled_document_round_trips_through_json() {
    let compiled = compiler::compile(RESEARCH_DSL).unwrap();
    let json = compiled.to_json().unwrap();
    let reloaded = PolicyDocument::from_json(&json).unwrap();

    assert_eq!(reloaded.name, "Research Export");
    assert_eq!(reloaded.disabled_types, vec!["DATE", "RELATIVE_DATE"]);
    assert_eq!(reloaded.age_threshold, 90);
    assert!(reloaded.zip_keep_prefix);

    let policy = reloaded.into_policy().unwrap();
    assert!(!policy.is_enabled(PhiCategory::Date));
    assert!(policy.is_enabled(PhiCategory::Ssn));
}

#[test]
fn test_compiled_policy_drives_the_engine() {
    let document = compiler::compile(RESEARCH_DSL).unwrap();
    let engine = RedactionEngine::from_document(document).unwrap();

    let result = engine.process("Follow-up on 03/15/2024 for patient age 45, SSN 123-45-6789");
    assert_eq!(result.count_for(PhiCategory::Date), 0);
    assert_eq!(result.count_for(PhiCategory::Age), 0);
    assert_eq!(result.count_for(PhiCategory::Ssn), 1);
    assert!(result.text.contains("03/15/2024"));
    assert!(result.text.contains("age 45"));
}

#[test]
fn test_compile_error_names_the_line_and_token() {
    let err = compiler::compile("policy \"x\"\nenable TELEPATHY\n").unwrap_err();

    assert_eq!(err.line, Some(2));
    let message = err.to_string();
    assert!(message.contains("TELEPATHY"));
    // The message must list the valid options so the user can fix the file
    // without reading engine internals.
    assert!(message.contains("SSN"));
}

#[test]
fn test_json_with_unknown_category_fails_closed() {
    let document =
        PolicyDocument::from_json(r#"{"name": "x", "disabled_types": ["WEATHER"]}"#).unwrap();
    assert!(document.into_policy().is_err());
}

#[test]
fn test_minimal_json_document_gets_strict_defaults() {
    let policy = PolicyDocument::from_json(r#"{"name": "bare"}"#)
        .unwrap()
        .into_policy()
        .unwrap();

    assert_eq!(policy.enabled.len(), 25);
    assert_eq!(policy.default_threshold, 0.7);
    assert!(policy.redacts_age(1));
}

#[test]
fn test_every_template_serializes_and_reloads() {
    for name in templates::TEMPLATE_NAMES {
        let document = templates::builtin(name).unwrap();
        let json = document.to_json().unwrap();
        let reloaded = PolicyDocument::from_json(&json).unwrap();
        assert_eq!(reloaded.name, name);
        reloaded.into_policy().unwrap();
    }
}
