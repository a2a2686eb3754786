//! Configuration management
//!
//! TOML-based configuration with environment variable substitution,
//! `SCRUB_*` overrides, defaults for every setting, and validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scrub::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("scrub.toml")?;
//! println!("policy: {}", config.engine.policy);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [engine]
//! policy = "HIPAA_STRICT"
//! filter_timeout_ms = 250
//!
//! [audit]
//! enabled = true
//! path = "${SCRUB_AUDIT_DIR}/audit.jsonl"
//!
//! [logging]
//! directory = "logs"
//! ```
//!
//! Use `${VAR_NAME}` for environment variable substitution and
//! `SCRUB_<SECTION>_<KEY>` variables to override individual settings.

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_or_default};
pub use schema::{ApplicationConfig, AuditConfig, EngineSection, LoggingConfig, ScrubConfig};
