//! CLI command implementations

pub mod filters;
pub mod init;
pub mod policy;
pub mod redact;
