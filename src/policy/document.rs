//! Policy document - the on-disk JSON contract
//!
//! The compiler emits a [`PolicyDocument`]; the CLI stores and ships it as
//! JSON; the engine resolves it into a runtime [`Policy`](super::Policy) at
//! construction. The JSON schema here is the load-bearing contract between
//! `scrub policy compile/validate` and the engine.

use crate::domain::{PhiCategory, Result, ScrubError, ALL_PHI_TYPES};
use crate::policy::Policy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How an accepted span is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementStyle {
    /// `[CATEGORY]`
    Brackets,
    /// `[CATEGORY-n]` with a per-category running counter
    Numbered,
    /// Asterisk run of the same character length as the original
    Asterisks,
    /// Span deleted outright
    Empty,
}

impl ReplacementStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brackets" => Some(Self::Brackets),
            "numbered" => Some(Self::Numbered),
            "asterisks" => Some(Self::Asterisks),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }
}

/// Serialized policy, as produced by the compiler or a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// Policy display name
    pub name: String,

    #[serde(default = "default_style")]
    pub style: ReplacementStyle,

    /// Explicit enable list; `None` means "all categories"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_types: Option<Vec<String>>,

    /// Categories removed from the enabled set
    #[serde(default)]
    pub disabled_types: Vec<String>,

    #[serde(default = "default_threshold")]
    pub default_threshold: f64,

    /// Per-category confidence overrides keyed by category label
    #[serde(default)]
    pub thresholds: BTreeMap<String, f64>,

    /// Minimum redacted age; 0 redacts all age mentions
    #[serde(default)]
    pub age_threshold: u32,

    #[serde(default)]
    pub zip_keep_prefix: bool,

    #[serde(default)]
    pub ocr_normalization: bool,
}

fn default_style() -> ReplacementStyle {
    ReplacementStyle::Brackets
}

fn default_threshold() -> f64 {
    0.7
}

impl PolicyDocument {
    /// Resolve into a runtime [`Policy`].
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError::Configuration`] for unknown category labels,
    /// enable/disable conflicts, or out-of-range values. The document is
    /// never partially applied.
    pub fn into_policy(self) -> Result<Policy> {
        let parse_category = |label: &str| -> Result<PhiCategory> {
            PhiCategory::parse_label(label).ok_or_else(|| {
                ScrubError::Configuration(format!(
                    "unknown PHI category '{}' (expected one of: {})",
                    label,
                    category_list()
                ))
            })
        };

        let mut enabled: std::collections::BTreeSet<PhiCategory> = match &self.enabled_types {
            None => ALL_PHI_TYPES.iter().copied().collect(),
            Some(labels) => {
                let mut set = std::collections::BTreeSet::new();
                for label in labels {
                    set.insert(parse_category(label)?);
                }
                set
            }
        };

        for label in &self.disabled_types {
            let category = parse_category(label)?;
            if let Some(explicit) = &self.enabled_types {
                if explicit.iter().any(|l| {
                    PhiCategory::parse_label(l) == Some(category)
                }) {
                    return Err(ScrubError::Configuration(format!(
                        "category '{}' is both enabled and disabled",
                        category
                    )));
                }
            }
            enabled.remove(&category);
        }

        let mut thresholds = std::collections::HashMap::new();
        for (label, threshold) in &self.thresholds {
            thresholds.insert(parse_category(label)?, *threshold);
        }

        let policy = Policy {
            name: self.name,
            style: self.style,
            enabled,
            default_threshold: self.default_threshold,
            thresholds,
            age_threshold: self.age_threshold,
            zip_keep_prefix: self.zip_keep_prefix,
            ocr_normalization: self.ocr_normalization,
            filter_timeout_ms: Policy::default().filter_timeout_ms,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Parse a document from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            ScrubError::Serialization(format!("invalid policy document: {e}"))
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn category_list() -> String {
    ALL_PHI_TYPES
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_doc() -> PolicyDocument {
        PolicyDocument {
            name: "test".to_string(),
            style: ReplacementStyle::Brackets,
            enabled_types: None,
            disabled_types: vec![],
            default_threshold: 0.7,
            thresholds: BTreeMap::new(),
            age_threshold: 0,
            zip_keep_prefix: false,
            ocr_normalization: false,
        }
    }

    #[test]
    fn test_none_enabled_means_all() {
        let policy = minimal_doc().into_policy().unwrap();
        assert_eq!(policy.enabled.len(), ALL_PHI_TYPES.len());
    }

    #[test]
    fn test_disable_removes_category() {
        let mut doc = minimal_doc();
        doc.disabled_types = vec!["DATE".to_string(), "age".to_string()];
        let policy = doc.into_policy().unwrap();
        assert!(!policy.is_enabled(PhiCategory::Date));
        assert!(!policy.is_enabled(PhiCategory::Age));
        assert!(policy.is_enabled(PhiCategory::Ssn));
    }

    #[test]
    fn test_unknown_category_fails_closed() {
        let mut doc = minimal_doc();
        doc.disabled_types = vec!["TELEPATHY".to_string()];
        let err = doc.into_policy().unwrap_err();
        assert!(err.to_string().contains("TELEPATHY"));
    }

    #[test]
    fn test_enable_disable_conflict() {
        let mut doc = minimal_doc();
        doc.enabled_types = Some(vec!["SSN".to_string()]);
        doc.disabled_types = vec!["SSN".to_string()];
        let err = doc.into_policy().unwrap_err();
        assert!(err.to_string().contains("both enabled and disabled"));
    }

    #[test]
    fn test_json_round_trip() {
        let mut doc = minimal_doc();
        doc.thresholds.insert("NAME".to_string(), 0.85);
        let json = doc.to_json().unwrap();
        let back = PolicyDocument::from_json(&json).unwrap();
        assert_eq!(back.thresholds.get("NAME"), Some(&0.85));
        assert_eq!(back.style, ReplacementStyle::Brackets);
    }

    #[test]
    fn test_style_parse() {
        assert_eq!(
            ReplacementStyle::parse("Asterisks"),
            Some(ReplacementStyle::Asterisks)
        );
        assert_eq!(ReplacementStyle::parse("sparkles"), None);
    }
}
