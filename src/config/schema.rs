//! Configuration schema types
//!
//! Root structure for `scrub.toml`. Every section has serde defaults, so an
//! empty file (or no file at all) resolves to a usable strict configuration.

use serde::{Deserialize, Serialize};

/// Main configuration, mapped 1:1 onto the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScrubConfig {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub engine: EngineSection,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScrubConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.engine.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode: report detections without writing redacted output
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Engine defaults applied when the CLI is not given explicit flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    /// Template name used when no policy file is given
    #[serde(default = "default_policy")]
    pub policy: String,

    /// Compiled policy document (JSON) or DSL source; overrides `policy`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_file: Option<String>,

    /// Directory of site-specific dictionaries; embedded lists when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lexicon_dir: Option<String>,

    /// Per-filter collection deadline
    #[serde(default = "default_filter_timeout_ms")]
    pub filter_timeout_ms: u64,
}

impl EngineSection {
    fn validate(&self) -> Result<(), String> {
        if self.policy.trim().is_empty() && self.policy_file.is_none() {
            return Err("engine.policy must name a template when no policy_file is set".to_string());
        }
        if self.filter_timeout_ms == 0 {
            return Err("engine.filter_timeout_ms must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            policy_file: None,
            lexicon_dir: None,
            filter_timeout_ms: default_filter_timeout_ms(),
        }
    }
}

/// Audit trail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Append-only audit log file
    #[serde(default = "default_audit_path")]
    pub path: String,

    /// JSON lines when true, plain text lines otherwise
    #[serde(default = "default_true")]
    pub json_format: bool,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.path.trim().is_empty() {
            return Err("audit.path must be set when audit.enabled = true".to_string());
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_audit_path(),
            json_format: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write log files in addition to stderr
    #[serde(default = "default_true")]
    pub file_enabled: bool,

    /// Directory for rolling log files
    #[serde(default = "default_log_dir")]
    pub directory: String,

    /// Log file name prefix
    #[serde(default = "default_log_prefix")]
    pub file_prefix: String,

    /// Emit JSON log lines to the file layer
    #[serde(default)]
    pub json_format: bool,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.file_enabled && self.directory.trim().is_empty() {
            return Err("logging.directory must be set when logging.file_enabled = true".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file_enabled: true,
            directory: default_log_dir(),
            file_prefix: default_log_prefix(),
            json_format: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_policy() -> String {
    "HIPAA_STRICT".to_string()
}

fn default_filter_timeout_ms() -> u64 {
    250
}

fn default_audit_path() -> String {
    "logs/audit.log".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_prefix() -> String {
    "scrub.log".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        ScrubConfig::default().validate().unwrap();
    }

    #[test]
    fn test_empty_toml_resolves_to_defaults() {
        let config: ScrubConfig = toml::from_str("").unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.engine.policy, "HIPAA_STRICT");
        assert_eq!(config.engine.filter_timeout_ms, 250);
        assert!(!config.audit.enabled);
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let config: ScrubConfig = toml::from_str(
            r#"
[application]
log_level = "verbose"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config: ScrubConfig = toml::from_str(
            r#"
[engine]
filter_timeout_ms = 0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_audit_requires_path_when_enabled() {
        let config: ScrubConfig = toml::from_str(
            r#"
[audit]
enabled = true
path = ""
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
