//! Error types for the screener.
//!
//! This module provides the shared error hierarchy using `thiserror`.
//! All errors include context and are designed to be actionable.

use thiserror::Error;

/// Result type alias using `ScreenerError`.
pub type Result<T> = std::result::Result<T, ScreenerError>;

/// Main error type for all screener operations.
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// SDN download failed: connection failure, timeout, or non-success status.
    #[error("download failed: {0}")]
    Network(String),

    /// The SDN document is not well-formed XML.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// Lookup attempted before any successful refresh has published a snapshot.
    #[error("sanctions list has not loaded yet")]
    NotReady,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal invariant violation (should never happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ScreenerError {
    /// Returns true if this error is expected to clear on a later refresh.
    ///
    /// Network and parse failures are transient from the cache's point of
    /// view: the next scheduled attempt retries from scratch.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScreenerError::Network(_) | ScreenerError::Parse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScreenerError::Network("connection refused".into());
        assert!(err.to_string().contains("download failed"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_classification() {
        assert!(ScreenerError::Network("timeout".into()).is_transient());
        assert!(ScreenerError::Parse("truncated".into()).is_transient());
        assert!(!ScreenerError::NotReady.is_transient());
        assert!(!ScreenerError::Config("bad url".into()).is_transient());
    }
}
