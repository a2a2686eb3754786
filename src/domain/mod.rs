//! Domain models and types.
//!
//! The domain layer holds the vocabulary shared by every other layer:
//!
//! - **PHI categories** ([`PhiCategory`], [`ALL_PHI_TYPES`]) — the closed set
//!   of detectable identifier types and their cross-category specificity
//!   order used for conflict tie-breaking
//! - **Spans** ([`Span`]) — candidate/accepted PHI occurrences, alive only
//!   within one `process()` call
//! - **Results** ([`RedactionResult`]) — the caller-owned output value
//! - **Error types** ([`ScrubError`], [`CompileError`]) and the [`Result`]
//!   alias
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ScrubError>`]:
//!
//! ```rust,no_run
//! use scrub::domain::Result;
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = scrub::config::load_config("scrub.toml")?;
//!     Ok(())
//! }
//! ```

pub mod category;
pub mod errors;
pub mod redaction;
pub mod result;
pub mod span;

// Re-export commonly used types for convenience
pub use category::{PhiCategory, ALL_PHI_TYPES};
pub use errors::{CompileError, ScrubError};
pub use redaction::RedactionResult;
pub use result::Result;
pub use span::Span;
