//! Result type alias

use crate::domain::ScrubError;

/// Crate-wide result alias.
pub type Result<T, E = ScrubError> = std::result::Result<T, E>;
