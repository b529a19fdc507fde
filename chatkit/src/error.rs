//! Unified error types for the Chatkit client.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the Chatkit client.
///
/// Status-derived variants carry the raw response body so callers can
/// reconstruct the remote error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed instance locator, API key, service name or base URL.
    ///
    /// Retrying will not help; the configuration has to be fixed first.
    #[error("configuration: {0}")]
    Configuration(String),

    /// An argument passed to the client was rejected before any network I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Connection, I/O or timeout failure below the HTTP status layer.
    #[error("transport: {message}")]
    Transport {
        /// Human-readable cause reported by the HTTP library.
        message: String,
        /// Whether the request hit the backend timeout.
        timed_out: bool,
    },

    /// A 2xx response whose body is not valid JSON.
    #[error("decode: {source}")]
    Decode {
        /// The 2xx status the body came back with.
        status: u16,
        /// The JSON parser error.
        #[source]
        source: serde_json::Error,
        /// The raw response body.
        body: String,
    },

    /// HTTP 400.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// HTTP 401.
    #[error("bad auth: {0}")]
    BadAuth(String),

    /// HTTP 403.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Any other non-2xx status.
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },
}

impl Error {
    pub(crate) fn transport(message: impl Into<String>, timed_out: bool) -> Self {
        Self::Transport {
            message: message.into(),
            timed_out,
        }
    }

    /// The HTTP status this error was derived from, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::BadAuth(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::UnexpectedStatus { status, .. } | Self::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The raw response body, for errors that came back from the server.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::BadRequest(body)
            | Self::BadAuth(body)
            | Self::Forbidden(body)
            | Self::UnexpectedStatus { body, .. }
            | Self::Decode { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether repeating the same call might succeed.
    ///
    /// Only transport failures qualify; the client itself never retries.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
