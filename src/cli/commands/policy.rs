//! Policy command implementation
//!
//! `scrub policy compile` turns DSL source into the JSON document the
//! engine loads; `scrub policy validate` checks either form without
//! producing output.

use crate::policy::{compiler, PolicyDocument};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Arguments for the policy command
#[derive(Args, Debug)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub action: PolicyAction,
}

#[derive(Subcommand, Debug)]
pub enum PolicyAction {
    /// Compile DSL source into a JSON policy document
    Compile {
        /// Policy DSL source file
        input: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a policy document (DSL or JSON)
    Validate {
        /// Policy file to check
        input: PathBuf,
    },
}

impl PolicyArgs {
    /// Execute the policy command
    pub fn execute(&self) -> Result<i32> {
        match &self.action {
            PolicyAction::Compile { input, output } => {
                let source = std::fs::read_to_string(input)
                    .with_context(|| format!("failed to read {}", input.display()))?;

                let document = match compiler::compile(&source) {
                    Ok(doc) => doc,
                    Err(e) => {
                        eprintln!("{}: {e}", input.display());
                        return Ok(2);
                    }
                };

                // Compilation checks syntax; resolution checks semantics.
                if let Err(e) = document.clone().into_policy() {
                    eprintln!("{}: {e}", input.display());
                    return Ok(2);
                }

                let json = document.to_json().context("failed to serialize policy")?;
                match output {
                    Some(path) => {
                        std::fs::write(path, &json)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        println!("compiled {} -> {}", input.display(), path.display());
                    }
                    None => println!("{json}"),
                }
                Ok(0)
            }

            PolicyAction::Validate { input } => {
                let source = std::fs::read_to_string(input)
                    .with_context(|| format!("failed to read {}", input.display()))?;

                let document = if input.extension().is_some_and(|ext| ext == "json") {
                    PolicyDocument::from_json(&source)
                } else {
                    compiler::compile(&source).map_err(Into::into)
                };

                let resolved = document.and_then(PolicyDocument::into_policy);
                match resolved {
                    Ok(policy) => {
                        println!("{} is valid", input.display());
                        println!("  name:       {}", policy.name);
                        println!("  categories: {}", policy.enabled.len());
                        println!("  threshold:  {}", policy.default_threshold);
                        Ok(0)
                    }
                    Err(e) => {
                        eprintln!("{}: {e}", input.display());
                        Ok(2)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_compile_to_stdout_valid_source() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"policy \"demo\"\nstyle numbered\n").unwrap();
        file.flush().unwrap();

        let args = PolicyArgs {
            action: PolicyAction::Compile {
                input: file.path().to_path_buf(),
                output: None,
            },
        };
        assert_eq!(args.execute().unwrap(), 0);
    }

    #[test]
    fn test_compile_rejects_bad_source() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"teleport home\n").unwrap();
        file.flush().unwrap();

        let args = PolicyArgs {
            action: PolicyAction::Compile {
                input: file.path().to_path_buf(),
                output: None,
            },
        };
        assert_eq!(args.execute().unwrap(), 2);
    }

    #[test]
    fn test_validate_json_document() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(br#"{"name": "demo"}"#).unwrap();
        file.flush().unwrap();

        let args = PolicyArgs {
            action: PolicyAction::Validate {
                input: file.path().to_path_buf(),
            },
        };
        assert_eq!(args.execute().unwrap(), 0);
    }

    #[test]
    fn test_compile_writes_output_file() {
        let mut src = NamedTempFile::new().unwrap();
        src.write_all(b"policy \"demo\"\ndisable DATE\n").unwrap();
        src.flush().unwrap();
        let out = NamedTempFile::with_suffix(".json").unwrap();

        let args = PolicyArgs {
            action: PolicyAction::Compile {
                input: src.path().to_path_buf(),
                output: Some(out.path().to_path_buf()),
            },
        };
        assert_eq!(args.execute().unwrap(), 0);

        let written = std::fs::read_to_string(out.path()).unwrap();
        let doc = PolicyDocument::from_json(&written).unwrap();
        assert_eq!(doc.disabled_types, vec!["DATE".to_string()]);
    }
}
