//! Error types for contentseed.
//!
//! Library crates use [`SeedError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all seeding operations.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Configuration loading or validation error. Always fatal.
    #[error("config error: {message}")]
    Config { message: String },

    /// Infrastructure-level network failure (connection reset, timeout, DNS,
    /// overloaded gateway). Safe to retry.
    #[error("transient network error: {0}")]
    Transient(String),

    /// The remote store rejected the request.
    #[error("remote error (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    /// The remote store answered with a body we could not interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// JSON source file parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// A record's natural key could not be determined.
    #[error("{domain}/{entry}: missing natural key `{field}`")]
    MissingNaturalKey {
        domain: String,
        entry: String,
        field: String,
    },

    /// A raw record does not have the shape its domain expects.
    #[error("{domain}/{entry}: {message}")]
    InvalidShape {
        domain: String,
        entry: String,
        message: String,
    },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad identifier, unknown domain, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SeedError>;

impl SeedError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Map an HTTP status to the error class it belongs to.
    ///
    /// Rate limiting and gateway failures are infrastructure problems and
    /// retried; everything else is an application-level rejection.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 | 502 | 503 | 504 => Self::Transient(format!("HTTP {status}: {message}")),
            _ => Self::Remote { status, message },
        }
    }

    /// Whether retrying the same operation may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = SeedError::config("missing write token");
        assert_eq!(err.to_string(), "config error: missing write token");

        let err = SeedError::MissingNaturalKey {
            domain: "pricing".into(),
            entry: "starter".into(),
            field: "title".into(),
        };
        assert_eq!(err.to_string(), "pricing/starter: missing natural key `title`");
    }

    #[test]
    fn status_classification() {
        assert!(SeedError::from_status(503, "unavailable").is_transient());
        assert!(SeedError::from_status(429, "slow down").is_transient());
        assert!(!SeedError::from_status(400, "bad mutation").is_transient());
        assert!(!SeedError::from_status(401, "unauthorized").is_transient());
        assert!(matches!(
            SeedError::from_status(409, "conflict"),
            SeedError::Remote { status: 409, .. }
        ));
    }
}
