//! Crate-level error types.
//!
//! [`SolwatchError`] unifies every error source (configuration, transport,
//! upstream status, payload shape, terminal) behind a single enum so callers
//! can match on the variant they care about while still using the `?`
//! operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SolwatchError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolwatchError {
    /// A configuration value was missing, unparsable, or contradictory.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP transport failed before a response status was available.
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a non-success HTTP status.
    #[error("upstream returned status {code}")]
    UpstreamStatus { code: u16 },

    /// The response body was missing expected fields.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A fetch did not complete within the configured timeout.
    #[error("request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    /// A timeframe key that is not in the registry was requested.
    #[error("unknown timeframe: {0}")]
    UnknownTimeframe(String),

    /// A terminal I/O operation failed.
    #[error("io error: {0}")]
    Io(String),

    /// The coordinator task is no longer receiving commands.
    #[error("coordinator channel closed")]
    ChannelClosed,
}

impl From<reqwest::Error> for SolwatchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return SolwatchError::UpstreamStatus {
                code: status.as_u16(),
            };
        }
        if err.is_decode() {
            return SolwatchError::MalformedPayload(err.to_string());
        }
        SolwatchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SolwatchError {
    fn from(err: serde_json::Error) -> Self {
        SolwatchError::MalformedPayload(err.to_string())
    }
}
