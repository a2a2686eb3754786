//! Redaction result models

use crate::domain::PhiCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Output of one `process()` call.
///
/// Immutable value owned by the caller; the engine keeps no reference to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionResult {
    /// Final redacted text
    pub text: String,
    /// Number of accepted (rendered) spans
    pub redaction_count: usize,
    /// Accepted span count per category
    pub breakdown: BTreeMap<PhiCategory, usize>,
    /// Wall-clock time spent in the call, milliseconds
    pub execution_time_ms: u64,
}

impl RedactionResult {
    pub fn new(
        text: String,
        breakdown: BTreeMap<PhiCategory, usize>,
        execution_time_ms: u64,
    ) -> Self {
        let redaction_count = breakdown.values().sum();
        Self {
            text,
            redaction_count,
            breakdown,
            execution_time_ms,
        }
    }

    /// True when at least one span was redacted.
    pub fn has_redactions(&self) -> bool {
        self.redaction_count > 0
    }

    /// Count for a single category, zero when absent.
    pub fn count_for(&self, category: PhiCategory) -> usize {
        self.breakdown.get(&category).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction_count_derived_from_breakdown() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(PhiCategory::Name, 2);
        breakdown.insert(PhiCategory::Ssn, 1);

        let result = RedactionResult::new("x".to_string(), breakdown, 1);
        assert_eq!(result.redaction_count, 3);
        assert_eq!(result.count_for(PhiCategory::Name), 2);
        assert_eq!(result.count_for(PhiCategory::Email), 0);
        assert!(result.has_redactions());
    }

    #[test]
    fn test_breakdown_serializes_with_labels() {
        let mut breakdown = BTreeMap::new();
        breakdown.insert(PhiCategory::Ssn, 1);
        let result = RedactionResult::new("x".to_string(), breakdown, 0);

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"SSN\":1"));
    }
}
