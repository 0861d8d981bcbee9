//! `ApiError` - failure taxonomy for the HTTP clients.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors raised by the TMDB and counter service clients.
///
/// Transport-level failures (`Transport`) are raised before any body
/// parsing is attempted; `Parse` means the server answered with a
/// success status but a body that does not match the expected envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection or protocol failure before a status line was received.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success HTTP status.
    #[error("HTTP {status}: {detail}")]
    Transport {
        /// HTTP status code.
        status: u16,
        /// Server-provided detail, or the raw body when undecodable.
        detail: String,
    },

    /// Response body was not the expected JSON envelope.
    #[error("failed to decode response from {path}: {source}")]
    Parse {
        /// Request path the body came from.
        path: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// HTTP 429 persisted beyond the retry budget.
    #[error("rate limit exceeded after {retries} retries")]
    RateLimited {
        /// Number of retries attempted.
        retries: u32,
    },

    /// A request path could not be joined onto the base URL.
    #[error("invalid request path {path}: {source}")]
    Url {
        /// Offending path.
        path: String,
        /// Underlying parse error.
        #[source]
        source: url::ParseError,
    },

    /// Client builder misconfiguration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Creates a [`ApiError::Config`] error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` for non-success HTTP status failures.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` for malformed-body failures.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
