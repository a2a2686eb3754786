//! Domain error types
//!
//! All errors are domain-specific and don't expose third-party types.
//! `process()` itself is total and never returns these; they cover
//! construction, configuration, and policy compilation, which all fail
//! fast and loudly before any document is processed.

use thiserror::Error;

/// Main error type used throughout the application.
#[derive(Debug, Error)]
pub enum ScrubError {
    /// Construction-time invalid configuration (unknown category name,
    /// bad style, invalid threshold); fails before any `process()` call
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Policy DSL rejected by the compiler; never partially applied
    #[error("Policy error: {0}")]
    Policy(#[from] CompileError),

    /// Lexicon loading errors
    #[error("Lexicon error: {0}")]
    Lexicon(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Policy compiler rejection.
///
/// Carries a human-readable message and, when derivable, the source line,
/// so a user can fix their policy file without reading engine internals.
#[derive(Debug, Clone, Error)]
pub struct CompileError {
    /// 1-based line in the DSL source, if known
    pub line: Option<usize>,
    /// What was wrong and what was expected
    pub message: String,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ScrubError {
    fn from(err: std::io::Error) -> Self {
        ScrubError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ScrubError {
    fn from(err: serde_json::Error) -> Self {
        ScrubError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ScrubError {
    fn from(err: toml::de::Error) -> Self {
        ScrubError::Configuration(format!("TOML parse error: {err}"))
    }
}
