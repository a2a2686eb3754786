//! CLI interface and argument parsing
//!
//! Thin boundary over the library: argument parsing with clap, file and
//! stdin plumbing, exit codes. All detection logic lives in the engine.

pub mod commands;

use clap::{Parser, Subcommand};

/// scrub - PHI detection and redaction for clinical text
#[derive(Parser, Debug)]
#[command(name = "scrub")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "scrub.toml", env = "SCRUB_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SCRUB_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redact PHI from a file or stdin
    Redact(commands::redact::RedactArgs),

    /// Compile and validate policy documents
    Policy(commands::policy::PolicyArgs),

    /// List detection filters and PHI categories
    Filters(commands::filters::FiltersArgs),

    /// Initialize a starter configuration file
    Init(commands::init::InitArgs),
}
