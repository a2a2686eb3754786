//! Init command implementation
//!
//! Generates a starter configuration file with every section present and
//! commented.

use anyhow::Result;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "scrub.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> Result<i32> {
        if Path::new(&self.output).exists() && !self.force {
            eprintln!("Configuration file already exists: {}", self.output);
            eprintln!("Use --force to overwrite");
            return Ok(2);
        }

        fs::write(&self.output, STARTER_CONFIG)?;
        println!("Created {}", self.output);
        println!("Edit it, then run: scrub redact <file>");
        Ok(0)
    }
}

const STARTER_CONFIG: &str = r#"# scrub configuration
# Values support ${VAR} environment substitution; every key can also be
# overridden with a SCRUB_SECTION_KEY environment variable.

[application]
log_level = "info"
# Report detections without rewriting text
dry_run = false

[engine]
# Built-in template: HIPAA_STRICT, RESEARCH, TRAINING, CLINICAL_REVIEW,
# OCR_TOLERANT
policy = "HIPAA_STRICT"
# Or load a compiled .json / DSL .policy file instead:
# policy_file = "policies/custom.policy"
# Directory of newline-delimited lexicon files (first_names.txt,
# surnames.txt, cities.txt, hospitals.txt). Embedded lists when unset.
# lexicon_dir = "lexicons"
filter_timeout_ms = 250

[audit]
enabled = false
path = "logs/audit.log"
json_format = true

[logging]
file_enabled = false
directory = "logs"
file_prefix = "scrub.log"
json_format = false
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;

    #[test]
    fn test_init_creates_valid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrub.toml");

        let args = InitArgs {
            output: path.to_str().unwrap().to_string(),
            force: false,
        };
        assert_eq!(args.execute().unwrap(), 0);

        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.engine.policy, "HIPAA_STRICT");
        assert!(!config.audit.enabled);
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrub.toml");
        std::fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_str().unwrap().to_string(),
            force: false,
        };
        assert_eq!(args.execute().unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");
    }

    #[test]
    fn test_init_force_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scrub.toml");
        std::fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_str().unwrap().to_string(),
            force: true,
        };
        assert_eq!(args.execute().unwrap(), 0);
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("HIPAA_STRICT"));
    }
}
