//! Redaction policies
//!
//! A [`Policy`] is the immutable per-engine configuration: which categories
//! are enabled, at what confidence thresholds, and how accepted spans are
//! rendered. Policies are produced three ways:
//!
//! - directly from an engine configuration object,
//! - from a named template ([`templates::builtin`]),
//! - by compiling a DSL document ([`compiler::compile`]) into a
//!   [`PolicyDocument`], the JSON contract shared with the CLI.
//!
//! A policy is never mutated after engine construction; filters treat it as
//! read-only input alongside the text and lexicon.

pub mod compiler;
pub mod document;
pub mod templates;

pub use document::{PolicyDocument, ReplacementStyle};

use crate::domain::{PhiCategory, Result, ScrubError, ALL_PHI_TYPES};
use std::collections::{BTreeSet, HashMap};

/// Validated, resolved runtime policy.
#[derive(Debug, Clone)]
pub struct Policy {
    /// Display name (template name or DSL `policy` directive)
    pub name: String,
    pub style: ReplacementStyle,
    /// Categories whose filters run
    pub enabled: BTreeSet<PhiCategory>,
    /// Minimum confidence applied when no per-category threshold exists
    pub default_threshold: f64,
    /// Per-category confidence overrides
    pub thresholds: HashMap<PhiCategory, f64>,
    /// Minimum age that gets redacted; 0 redacts every age mention, 90 is
    /// the Safe Harbor floor (ages >= 90 are always redacted)
    pub age_threshold: u32,
    /// Keep the first three ZIP digits when rendering (population rule)
    pub zip_keep_prefix: bool,
    /// Run the OCR-normalized second pass for digit identifiers
    pub ocr_normalization: bool,
    /// Collection deadline for a single filter scan
    pub filter_timeout_ms: u64,
}

impl Policy {
    /// Minimum confidence for a category.
    pub fn threshold_for(&self, category: PhiCategory) -> f64 {
        self.thresholds
            .get(&category)
            .copied()
            .unwrap_or(self.default_threshold)
    }

    pub fn is_enabled(&self, category: PhiCategory) -> bool {
        self.enabled.contains(&category)
    }

    /// Whether an age mention of `age` years must be redacted under this
    /// policy. Ages at or above 90 always are.
    pub fn redacts_age(&self, age: u32) -> bool {
        age >= 90 || age >= self.age_threshold
    }

    /// Validate invariant ranges; called by every construction path.
    pub fn validate(&self) -> Result<()> {
        if self.enabled.is_empty() {
            return Err(ScrubError::Configuration(
                "policy enables no PHI categories".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.default_threshold) {
            return Err(ScrubError::Configuration(format!(
                "default threshold {} out of range [0, 1]",
                self.default_threshold
            )));
        }
        for (category, threshold) in &self.thresholds {
            if !(0.0..=1.0).contains(threshold) {
                return Err(ScrubError::Configuration(format!(
                    "threshold {} for {} out of range [0, 1]",
                    threshold, category
                )));
            }
        }
        if self.age_threshold > 90 {
            return Err(ScrubError::Configuration(format!(
                "age threshold {} above the Safe Harbor floor of 90",
                self.age_threshold
            )));
        }
        if self.filter_timeout_ms == 0 {
            return Err(ScrubError::Configuration(
                "filter timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Policy {
    /// Safe Harbor strict defaults: every category enabled, bracket tags,
    /// every age mention redacted.
    fn default() -> Self {
        Self {
            name: "HIPAA_STRICT".to_string(),
            style: ReplacementStyle::Brackets,
            enabled: ALL_PHI_TYPES.iter().copied().collect(),
            default_threshold: 0.7,
            thresholds: HashMap::new(),
            age_threshold: 0,
            zip_keep_prefix: false,
            ocr_normalization: false,
            filter_timeout_ms: 250,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_valid_and_strict() {
        let policy = Policy::default();
        policy.validate().unwrap();
        assert!(policy.is_enabled(PhiCategory::Ssn));
        assert!(policy.redacts_age(45));
        assert!(policy.redacts_age(92));
    }

    #[test]
    fn test_age_threshold_relaxed() {
        let policy = Policy {
            age_threshold: 90,
            ..Policy::default()
        };
        assert!(!policy.redacts_age(45));
        assert!(policy.redacts_age(90));
        assert!(policy.redacts_age(101));
    }

    #[test]
    fn test_threshold_override() {
        let mut policy = Policy::default();
        policy.thresholds.insert(PhiCategory::Name, 0.85);
        assert_eq!(policy.threshold_for(PhiCategory::Name), 0.85);
        assert_eq!(policy.threshold_for(PhiCategory::Ssn), 0.7);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let policy = Policy {
            default_threshold: 1.5,
            ..Policy::default()
        };
        assert!(policy.validate().is_err());

        let policy = Policy {
            age_threshold: 95,
            ..Policy::default()
        };
        assert!(policy.validate().is_err());

        let policy = Policy {
            enabled: BTreeSet::new(),
            ..Policy::default()
        };
        assert!(policy.validate().is_err());
    }
}
