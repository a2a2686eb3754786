//! Logging and observability
//!
//! Structured logging via `tracing`: console output plus an optional
//! rolling file layer, both filtered through `RUST_LOG` when set.
//!
//! # Example
//!
//! ```no_run
//! use scrub::logging::init_logging;
//! use scrub::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("starting");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
