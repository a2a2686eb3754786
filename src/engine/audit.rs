//! Audit logging for redaction operations
//!
//! Append-only trail of `process()` calls. Entries carry a SHA-256 digest
//! of the input so runs can be correlated with source documents without the
//! log ever holding PHI in plaintext.

use crate::domain::{RedactionResult, Result, ScrubError};
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct AuditEntry {
    timestamp: String,
    event_id: String,
    /// SHA-256 of the input text; plaintext never reaches the log
    input_sha256: String,
    input_bytes: usize,
    policy: String,
    redaction_count: usize,
    breakdown: BTreeMap<String, usize>,
    execution_time_ms: u64,
}

pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a logger; when enabled, the parent directory is created up
    /// front so the first write cannot fail on a missing path.
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ScrubError::Configuration(format!(
                        "failed to create audit log directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record one redaction run.
    pub fn log_redaction(
        &self,
        input: &str,
        policy_name: &str,
        result: &RedactionResult,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditEntry {
            timestamp: Utc::now().to_rfc3339(),
            event_id: Uuid::new_v4().to_string(),
            input_sha256: hash_input(input),
            input_bytes: input.len(),
            policy: policy_name.to_string(),
            redaction_count: result.redaction_count,
            breakdown: result
                .breakdown
                .iter()
                .map(|(category, count)| (category.label().to_string(), *count))
                .collect(),
            execution_time_ms: result.execution_time_ms,
        };

        self.write_entry(&entry)
    }

    fn write_entry(&self, entry: &AuditEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                ScrubError::Configuration(format!(
                    "failed to open audit log {}: {}",
                    self.log_path.display(),
                    e
                ))
            })?;

        if self.json_format {
            let line = serde_json::to_string(entry)?;
            writeln!(file, "{line}")?;
        } else {
            writeln!(
                file,
                "[{}] event={} input={} policy={} redactions={} time={}ms",
                entry.timestamp,
                entry.event_id,
                &entry.input_sha256[..12],
                entry.policy,
                entry.redaction_count,
                entry.execution_time_ms
            )?;
        }

        Ok(())
    }
}

fn hash_input(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    format!("{digest:x}")
}
