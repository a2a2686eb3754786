//! Redaction engine
//!
//! [`RedactionEngine`] is the library's entry point: construct it from an
//! [`EngineConfig`], a compiled [`PolicyDocument`], or a runtime
//! [`Policy`], then call [`RedactionEngine::process`] per document. The
//! engine is immutable after construction and safe to share across threads;
//! `process` is total and never returns an error, because dropping a
//! document on the floor is worse for a de-identification pipeline than
//! redacting conservatively.

pub mod audit;
pub mod coordinator;
pub mod filters;
pub mod renderer;
pub mod report;
pub mod resolver;
pub mod whitelist;

pub use audit::AuditLogger;
pub use report::DryRunReport;

use crate::domain::{PhiCategory, RedactionResult, Result, Span, ALL_PHI_TYPES};
use crate::lexicon::Lexicon;
use crate::policy::{Policy, PolicyDocument, ReplacementStyle};
use filters::FilterKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Construction-time configuration, the programmatic alternative to a
/// compiled policy document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_style")]
    pub replacement_style: ReplacementStyle,
    /// Explicit enable list by category label; `None` enables everything
    #[serde(default)]
    pub enabled_types: Option<Vec<String>>,
    #[serde(default)]
    pub disabled_types: Vec<String>,
    #[serde(default = "default_threshold")]
    pub default_threshold: f64,
    #[serde(default)]
    pub age_threshold: u32,
    #[serde(default)]
    pub ocr_normalization: bool,
    #[serde(default = "default_timeout")]
    pub filter_timeout_ms: u64,
}

fn default_style() -> ReplacementStyle {
    ReplacementStyle::Brackets
}

fn default_threshold() -> f64 {
    0.7
}

fn default_timeout() -> u64 {
    250
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            replacement_style: default_style(),
            enabled_types: None,
            disabled_types: Vec::new(),
            default_threshold: default_threshold(),
            age_threshold: 0,
            ocr_normalization: false,
            filter_timeout_ms: default_timeout(),
        }
    }
}

impl EngineConfig {
    /// Resolve into a validated runtime policy.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ScrubError::Configuration`] on unknown
    /// category labels or out-of-range values.
    pub fn into_policy(self) -> Result<Policy> {
        let document = PolicyDocument {
            name: "engine-config".to_string(),
            style: self.replacement_style,
            enabled_types: self.enabled_types,
            disabled_types: self.disabled_types,
            default_threshold: self.default_threshold,
            thresholds: BTreeMap::new(),
            age_threshold: self.age_threshold,
            zip_keep_prefix: false,
            ocr_normalization: self.ocr_normalization,
        };
        let mut policy = document.into_policy()?;
        policy.filter_timeout_ms = self.filter_timeout_ms;
        policy.validate()?;
        Ok(policy)
    }
}

/// The PHI detection and redaction engine.
pub struct RedactionEngine {
    policy: Arc<Policy>,
    lexicon: Arc<Lexicon>,
    filters: Vec<FilterKind>,
}

impl RedactionEngine {
    /// Build from a programmatic configuration with the embedded lexicon.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        Self::from_policy(config.into_policy()?)
    }

    /// Build from a compiled or template policy document.
    pub fn from_document(document: PolicyDocument) -> Result<Self> {
        Self::from_policy(document.into_policy()?)
    }

    /// Build from an already-resolved policy.
    pub fn from_policy(policy: Policy) -> Result<Self> {
        Self::with_lexicon(policy, Arc::new(Lexicon::embedded()))
    }

    /// Build with a caller-provided lexicon (site-specific dictionaries).
    pub fn with_lexicon(policy: Policy, lexicon: Arc<Lexicon>) -> Result<Self> {
        policy.validate()?;
        let filters = filters::active_filters(&policy);
        Ok(Self {
            policy: Arc::new(policy),
            lexicon,
            filters,
        })
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Names of the filters that run under this engine's policy.
    pub fn active_filters(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Every category the engine can detect, independent of policy.
    pub fn all_phi_types() -> &'static [PhiCategory] {
        &ALL_PHI_TYPES
    }

    /// Detect and redact PHI in `text`.
    ///
    /// Total: filter faults and timeouts degrade coverage for the affected
    /// filter only and are logged, never surfaced.
    pub fn process(&self, text: &str) -> RedactionResult {
        let started = Instant::now();

        if text.is_empty() {
            return RedactionResult::new(String::new(), BTreeMap::new(), elapsed_ms(started));
        }

        let shared: Arc<str> = Arc::from(text);
        let candidates =
            coordinator::run_filters(&shared, &self.policy, &self.lexicon, &self.filters);

        let kept: Vec<Span> = candidates
            .into_iter()
            .filter(|span| !whitelist::should_suppress(text, span))
            .collect();

        let accepted = resolver::resolve(kept, &self.policy);
        let (redacted, breakdown) = renderer::render(text, &accepted, &self.policy);

        let execution_time_ms = elapsed_ms(started);
        debug!(
            policy = %self.policy.name,
            input_bytes = text.len(),
            accepted = accepted.len(),
            execution_time_ms,
            "redaction pass complete"
        );

        RedactionResult::new(redacted, breakdown, execution_time_ms)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::templates;

    fn strict_engine() -> RedactionEngine {
        RedactionEngine::from_config(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_name_and_ssn_scenario() {
        let result = strict_engine().process("Patient John Smith SSN 123-45-6789");
        assert_eq!(result.text, "Patient [NAME] SSN [SSN]");
        assert_eq!(result.redaction_count, 2);
        assert_eq!(result.count_for(PhiCategory::Name), 1);
        assert_eq!(result.count_for(PhiCategory::Ssn), 1);
    }

    #[test]
    fn test_medication_vocabulary_untouched() {
        let result = strict_engine().process("Started on an ACE inhibitor today");
        assert_eq!(result.redaction_count, 0);
        assert_eq!(result.text, "Started on an ACE inhibitor today");
    }

    #[test]
    fn test_empty_input() {
        let result = strict_engine().process("");
        assert_eq!(result.text, "");
        assert_eq!(result.redaction_count, 0);
    }

    #[test]
    fn test_active_filters_follow_policy() {
        let engine = strict_engine();
        assert_eq!(engine.active_filters().len(), filters::ALL_FILTERS.len());

        let config = EngineConfig {
            disabled_types: vec!["NAME".to_string()],
            ..EngineConfig::default()
        };
        let reduced = RedactionEngine::from_config(config).unwrap();
        assert!(reduced.active_filters().len() < filters::ALL_FILTERS.len());
        assert!(!reduced.active_filters().contains(&"exact-name"));
    }

    #[test]
    fn test_unknown_category_fails_at_construction() {
        let config = EngineConfig {
            disabled_types: vec!["MINDREADING".to_string()],
            ..EngineConfig::default()
        };
        assert!(RedactionEngine::from_config(config).is_err());
    }

    #[test]
    fn test_research_template_age_behavior() {
        let document = templates::builtin("RESEARCH").unwrap();
        let research = RedactionEngine::from_document(document).unwrap();
        let kept = research.process("Patient, age 45, seen in clinic");
        assert_eq!(kept.count_for(PhiCategory::Age), 0);
        assert!(kept.text.contains("age 45"));

        let strict = strict_engine();
        let redacted = strict.process("Patient, age 45, seen in clinic");
        assert_eq!(redacted.count_for(PhiCategory::Age), 1);
    }

    #[test]
    fn test_all_phi_types_exposed() {
        assert_eq!(RedactionEngine::all_phi_types().len(), 25);
    }
}
