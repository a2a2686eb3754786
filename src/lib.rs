//! # scrub - PHI detection and redaction for clinical text
//!
//! scrub removes the HIPAA Safe Harbor identifiers from free-text clinical
//! notes. A pool of regex-and-lexicon detection filters proposes candidate
//! spans, a resolver arbitrates overlaps deterministically, and a renderer
//! rewrites the text in the policy's replacement style.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Detecting** the 18 Safe Harbor identifier classes (25 internal
//!   categories) with confidence-scored spans
//! - **Resolving** overlapping detections by position, length, confidence,
//!   and category specificity
//! - **Rendering** redacted text with bracketed labels, numbered labels,
//!   asterisk masking, or removal
//! - **Policies** as built-in templates, a compiled DSL, or JSON documents
//!
//! ## Architecture
//!
//! scrub follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`engine`] - Detection filters, overlap resolution, rendering, audit
//! - [`policy`] - Policy documents, DSL compiler, built-in templates
//! - [`lexicon`] - Name, city, and hospital dictionaries with phonetic index
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use scrub::engine::{EngineConfig, RedactionEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = RedactionEngine::from_config(EngineConfig::default())?;
//!
//!     let result = engine.process("Patient John Smith, SSN 123-45-6789.");
//!     assert!(result.has_redactions());
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Policies
//!
//! Detection behavior is driven entirely by a [`policy::Policy`]. Start from
//! a built-in template, or compile the DSL:
//!
//! ```rust
//! use scrub::engine::RedactionEngine;
//! use scrub::policy::compiler;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let document = compiler::compile(
//!     "policy \"research\"\n\
//!      disable DATE RELATIVE_DATE\n\
//!      age-threshold 90\n\
//!      zip keep-prefix\n",
//! )?;
//! let engine = RedactionEngine::from_document(document)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! scrub uses the [`domain::ScrubError`] type for all errors:
//!
//! ```rust,no_run
//! use scrub::domain::ScrubError;
//!
//! fn example() -> Result<(), ScrubError> {
//!     let config = scrub::config::load_config("scrub.toml")?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod lexicon;
pub mod logging;
pub mod policy;

pub use domain::{PhiCategory, RedactionResult, ScrubError, Span, ALL_PHI_TYPES};
pub use engine::{EngineConfig, RedactionEngine};
pub use policy::{Policy, PolicyDocument, ReplacementStyle};
