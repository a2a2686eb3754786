//! Redact command implementation

use crate::config::{load_or_default, ScrubConfig};
use crate::engine::{AuditLogger, DryRunReport, RedactionEngine};
use crate::lexicon::Lexicon;
use crate::policy::{compiler, templates, Policy, PolicyDocument, ReplacementStyle};
use anyhow::{Context, Result};
use clap::Args;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments for the redact command
#[derive(Args, Debug)]
pub struct RedactArgs {
    /// Input file; stdin when omitted
    pub file: Option<PathBuf>,

    /// Policy: template name or path to a .policy / .json document
    #[arg(short, long)]
    pub policy: Option<String>,

    /// Replacement style override (brackets, numbered, asterisks, empty)
    #[arg(short, long)]
    pub style: Option<String>,

    /// Report detections without emitting redacted text
    #[arg(long)]
    pub dry_run: bool,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl RedactArgs {
    /// Execute the redact command
    pub fn execute(&self, config_path: &str) -> Result<i32> {
        let config = match load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let policy = match self.resolve_policy(&config) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Policy error: {e}");
                return Ok(2);
            }
        };
        let policy_name = policy.name.clone();

        let lexicon = match &config.engine.lexicon_dir {
            Some(dir) => match Lexicon::from_dir(dir) {
                Ok(lex) => Arc::new(lex),
                Err(e) => {
                    eprintln!("Lexicon error: {e}");
                    return Ok(2);
                }
            },
            None => Arc::new(Lexicon::embedded()),
        };

        let engine = match RedactionEngine::with_lexicon(policy, lexicon) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let input = self.read_input()?;
        let result = engine.process(&input);

        if config.audit.enabled {
            let logger = AuditLogger::new(
                PathBuf::from(&config.audit.path),
                config.audit.json_format,
                true,
            )
            .context("failed to open audit log")?;
            logger
                .log_redaction(&input, &policy_name, &result)
                .context("failed to write audit entry")?;
        }

        if self.dry_run || config.application.dry_run {
            let mut report = DryRunReport::new();
            report.add_result(&result);
            match &self.output {
                Some(path) => report
                    .write_to_file(path)
                    .with_context(|| format!("failed to write report to {}", path.display()))?,
                None => print!("{}", report.format_console()),
            }
            return Ok(0);
        }

        match &self.output {
            Some(path) => std::fs::write(path, &result.text)
                .with_context(|| format!("failed to write output to {}", path.display()))?,
            None => println!("{}", result.text),
        }

        tracing::info!(
            policy = %policy_name,
            redactions = result.redaction_count,
            execution_time_ms = result.execution_time_ms,
            "redaction complete"
        );

        Ok(0)
    }

    /// Pick the policy source: explicit flag, then config `policy_file`,
    /// then config template name.
    fn resolve_policy(&self, config: &ScrubConfig) -> crate::domain::Result<Policy> {
        let selector = self
            .policy
            .clone()
            .or_else(|| config.engine.policy_file.clone())
            .unwrap_or_else(|| config.engine.policy.clone());

        let document = load_policy_document(&selector)?;
        let mut policy = document.into_policy()?;
        policy.filter_timeout_ms = config.engine.filter_timeout_ms;

        if let Some(style) = &self.style {
            policy.style = ReplacementStyle::parse(style).ok_or_else(|| {
                crate::domain::ScrubError::Configuration(format!(
                    "unknown replacement style '{style}'"
                ))
            })?;
        }

        policy.validate()?;
        Ok(policy)
    }

    fn read_input(&self) -> Result<String> {
        match &self.file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display())),
            None => {
                let mut buffer = String::new();
                std::io::stdin()
                    .read_to_string(&mut buffer)
                    .context("failed to read stdin")?;
                Ok(buffer)
            }
        }
    }
}

/// Resolve a policy selector: template name, JSON document path, or DSL
/// source path.
pub fn load_policy_document(selector: &str) -> crate::domain::Result<PolicyDocument> {
    if let Some(document) = templates::builtin(selector) {
        return Ok(document);
    }

    let path = Path::new(selector);
    if path.exists() {
        let source = std::fs::read_to_string(path)?;
        return if path.extension().is_some_and(|ext| ext == "json") {
            PolicyDocument::from_json(&source)
        } else {
            Ok(compiler::compile(&source)?)
        };
    }

    Err(crate::domain::ScrubError::Configuration(format!(
        "'{}' is neither a template ({}) nor a policy file",
        selector,
        templates::TEMPLATE_NAMES.join(", ")
    )))
}
