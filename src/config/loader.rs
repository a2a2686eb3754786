//! Configuration loading
//!
//! TOML file → `${VAR}` substitution → parse → `SCRUB_*` environment
//! overrides → validation. Missing files are an error from [`load_config`];
//! [`load_or_default`] is the CLI path, which treats an absent file as the
//! strict defaults.

use super::schema::ScrubConfig;
use crate::domain::{Result, ScrubError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("invalid env placeholder pattern"));

/// Load and validate a configuration file.
///
/// # Errors
///
/// Returns [`ScrubError::Configuration`] when the file is missing or
/// unreadable, a `${VAR}` reference is unset, the TOML does not parse, or
/// validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<ScrubConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ScrubError::Configuration(format!(
            "configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ScrubError::Configuration(format!(
            "failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ScrubConfig = toml::from_str(&contents)
        .map_err(|e| ScrubError::Configuration(format!("failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| ScrubError::Configuration(format!("configuration validation failed: {}", e)))?;

    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to defaults with
/// environment overrides applied.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ScrubConfig> {
    if path.as_ref().exists() {
        return load_config(path);
    }

    let mut config = ScrubConfig::default();
    apply_env_overrides(&mut config);
    config
        .validate()
        .map_err(|e| ScrubError::Configuration(format!("configuration validation failed: {}", e)))?;
    Ok(config)
}

/// Substitute `${VAR}` placeholders outside comment lines. Every referenced
/// variable must be set; collecting all misses first gives one actionable
/// error instead of a fix-rerun loop.
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = String::with_capacity(input.len());
    let mut missing: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed = line.to_string();
        for caps in ENV_PLACEHOLDER.captures_iter(line) {
            let name = &caps[1];
            match std::env::var(name) {
                Ok(value) => {
                    processed = processed.replace(&format!("${{{name}}}"), &value);
                }
                Err(_) => {
                    if !missing.iter().any(|m| m == name) {
                        missing.push(name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing.is_empty() {
        return Err(ScrubError::Configuration(format!(
            "missing required environment variables: {}",
            missing.join(", ")
        )));
    }

    Ok(result)
}

/// Apply `SCRUB_<SECTION>_<KEY>` environment overrides.
fn apply_env_overrides(config: &mut ScrubConfig) {
    if let Ok(val) = std::env::var("SCRUB_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("SCRUB_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("SCRUB_ENGINE_POLICY") {
        config.engine.policy = val;
    }
    if let Ok(val) = std::env::var("SCRUB_ENGINE_POLICY_FILE") {
        config.engine.policy_file = Some(val);
    }
    if let Ok(val) = std::env::var("SCRUB_ENGINE_LEXICON_DIR") {
        config.engine.lexicon_dir = Some(val);
    }
    if let Ok(val) = std::env::var("SCRUB_ENGINE_FILTER_TIMEOUT_MS") {
        if let Ok(timeout) = val.parse() {
            config.engine.filter_timeout_ms = timeout;
        }
    }

    if let Ok(val) = std::env::var("SCRUB_AUDIT_ENABLED") {
        config.audit.enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("SCRUB_AUDIT_PATH") {
        config.audit.path = val;
    }
    if let Ok(val) = std::env::var("SCRUB_AUDIT_JSON_FORMAT") {
        config.audit.json_format = val.parse().unwrap_or(true);
    }

    if let Ok(val) = std::env::var("SCRUB_LOGGING_FILE_ENABLED") {
        config.logging.file_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("SCRUB_LOGGING_DIRECTORY") {
        config.logging.directory = val;
    }
    if let Ok(val) = std::env::var("SCRUB_LOGGING_JSON_FORMAT") {
        config.logging.json_format = val.parse().unwrap_or(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("SCRUB_TEST_SUBST_VAR", "logs/elsewhere");
        let input = "path = \"${SCRUB_TEST_SUBST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result.trim_end(), "path = \"logs/elsewhere\"");
        std::env::remove_var("SCRUB_TEST_SUBST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("SCRUB_TEST_MISSING_VAR");
        let result = substitute_env_vars("path = \"${SCRUB_TEST_MISSING_VAR}\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_comments_are_not_substituted() {
        std::env::remove_var("SCRUB_TEST_COMMENT_VAR");
        let input = "# path = \"${SCRUB_TEST_COMMENT_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("nonexistent.toml").is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = load_or_default("nonexistent.toml").unwrap();
        assert_eq!(config.engine.policy, "HIPAA_STRICT");
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[engine]
policy = "RESEARCH"
filter_timeout_ms = 500

[audit]
enabled = true
path = "logs/audit.jsonl"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.engine.policy, "RESEARCH");
        assert_eq!(config.engine.filter_timeout_ms, 500);
        assert!(config.audit.enabled);
    }

    #[test]
    fn test_invalid_section_value_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[engine]\nfilter_timeout_ms = 0\n")
            .unwrap();
        temp_file.flush().unwrap();
        assert!(load_config(temp_file.path()).is_err());
    }
}
