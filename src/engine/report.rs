//! Dry-run reporting
//!
//! Aggregates redaction results across a batch of documents into a report
//! the CLI can print or write as JSON. The report carries counts and
//! category tallies only, never matched text.

use crate::domain::{PhiCategory, RedactionResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DryRunReport {
    pub total_documents: usize,
    pub total_redactions: usize,
    pub redactions_by_category: BTreeMap<PhiCategory, usize>,
    pub warnings: Vec<String>,
    pub stats: ProcessingStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub avg_execution_time_ms: u64,
    pub total_execution_time_ms: u64,
    pub documents_with_phi: usize,
    pub documents_without_phi: usize,
}

impl DryRunReport {
    pub fn new() -> Self {
        Self {
            total_documents: 0,
            total_redactions: 0,
            redactions_by_category: BTreeMap::new(),
            warnings: Vec::new(),
            stats: ProcessingStats {
                avg_execution_time_ms: 0,
                total_execution_time_ms: 0,
                documents_with_phi: 0,
                documents_without_phi: 0,
            },
        }
    }

    /// Fold one document's result into the report.
    pub fn add_result(&mut self, result: &RedactionResult) {
        self.total_documents += 1;
        self.stats.total_execution_time_ms += result.execution_time_ms;

        if result.has_redactions() {
            self.stats.documents_with_phi += 1;
            self.total_redactions += result.redaction_count;
            for (category, count) in &result.breakdown {
                *self.redactions_by_category.entry(*category).or_insert(0) += count;
            }
        } else {
            self.stats.documents_without_phi += 1;
        }

        self.stats.avg_execution_time_ms =
            self.stats.total_execution_time_ms / self.total_documents as u64;
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Human-readable summary for the terminal.
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push_str("\n═══════════════════════════════════════════\n");
        output.push_str("            REDACTION DRY-RUN REPORT\n");
        output.push_str("═══════════════════════════════════════════\n\n");

        output.push_str(&format!("  Documents analyzed:   {}\n", self.total_documents));
        output.push_str(&format!(
            "  Documents with PHI:   {}\n",
            self.stats.documents_with_phi
        ));
        output.push_str(&format!(
            "  Documents without PHI: {}\n",
            self.stats.documents_without_phi
        ));
        output.push_str(&format!("  Total redactions:     {}\n", self.total_redactions));
        output.push_str(&format!(
            "  Avg execution time:   {} ms\n",
            self.stats.avg_execution_time_ms
        ));

        if !self.redactions_by_category.is_empty() {
            output.push_str("\n  REDACTIONS BY CATEGORY\n");
            output.push_str("  ───────────────────────────────────\n");

            let mut categories: Vec<_> = self.redactions_by_category.iter().collect();
            categories.sort_by(|a, b| b.1.cmp(a.1));
            for (category, count) in categories {
                output.push_str(&format!("  {:24} {:>6}\n", category.label(), count));
            }
        }

        if !self.warnings.is_empty() {
            output.push_str("\n  WARNINGS\n");
            output.push_str("  ───────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  - {}\n", warning));
            }
        }

        output.push_str("\n═══════════════════════════════════════════\n");
        output
    }

    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self
            .format_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for DryRunReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name_count: usize, time_ms: u64) -> RedactionResult {
        let mut breakdown = BTreeMap::new();
        if name_count > 0 {
            breakdown.insert(PhiCategory::Name, name_count);
        }
        RedactionResult::new("redacted".to_string(), breakdown, time_ms)
    }

    #[test]
    fn test_empty_report() {
        let report = DryRunReport::new();
        assert_eq!(report.total_documents, 0);
        assert_eq!(report.total_redactions, 0);
    }

    #[test]
    fn test_aggregation() {
        let mut report = DryRunReport::new();
        report.add_result(&result(2, 10));
        report.add_result(&result(0, 20));
        report.add_result(&result(1, 30));

        assert_eq!(report.total_documents, 3);
        assert_eq!(report.total_redactions, 3);
        assert_eq!(report.stats.documents_with_phi, 2);
        assert_eq!(report.stats.documents_without_phi, 1);
        assert_eq!(report.stats.avg_execution_time_ms, 20);
        assert_eq!(report.redactions_by_category[&PhiCategory::Name], 3);
    }

    #[test]
    fn test_console_format() {
        let mut report = DryRunReport::new();
        report.add_result(&result(2, 10));
        report.add_warning("low-confidence name near line 3".to_string());

        let output = report.format_console();
        assert!(output.contains("DRY-RUN REPORT"));
        assert!(output.contains("NAME"));
        assert!(output.contains("low-confidence name"));
    }

    #[test]
    fn test_json_round_trip() {
        let mut report = DryRunReport::new();
        report.add_result(&result(1, 5));
        let json = report.format_json().unwrap();
        let parsed: DryRunReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.total_redactions, 1);
    }
}
