//! Error types for irecord-core.
//!
//! Schema rule violations are *not* errors: they are accumulated into
//! `rules::ValidationReport` so that admin tooling can display every problem
//! at once. `CoreError` covers the remaining failure modes: malformed input,
//! serialization failures, and unsupported record versions.

use thiserror::Error;

/// Result alias used across the crate.
pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("unsupported record version: {0}")]
    UnsupportedVersion(String),
}

impl CoreError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn unsupported_version(version: impl Into<String>) -> Self {
        Self::UnsupportedVersion(version.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_stable() {
        let e = CoreError::invalid_argument("bad");
        assert_eq!(e.to_string(), "invalid argument: bad");

        let e = CoreError::unsupported_version("199901");
        assert_eq!(e.to_string(), "unsupported record version: 199901");
    }
}
