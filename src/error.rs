//! Failure taxonomy for token exchanges and resource calls.
//!
//! Every network operation in the crate returns a [`SpotifyError`] precise
//! enough for the caller to choose between retrying, re-authenticating and
//! giving up. Nothing in the library retries on its own beyond the single
//! refresh-and-retry a rejected bearer token gets.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SpotifyError {
    /// Bad credentials or a failed exchange at the token endpoint.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The token was refreshed and the API still answered 401.
    #[error("access token still rejected after refresh, re-authenticate")]
    AuthExpired,

    /// HTTP 429. `retry_after` is the `Retry-After` header in seconds, if sent.
    #[error("rate limited by Spotify (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    /// Any 4xx other than 401 and 429.
    #[error("request rejected with status {status}: {body}")]
    Client { status: u16, body: String },

    /// Any 5xx.
    #[error("Spotify failed with status {status}: {body}")]
    Server { status: u16, body: String },

    /// The HTTP timeout or a caller deadline elapsed.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport failure before a status line was received.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// A 2xx body that is not valid JSON, or a corrupt token file.
    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpotifyError {
    /// Classifies a transport-level `reqwest` failure.
    ///
    /// reqwest reports its own timeouts as errors; those become
    /// [`SpotifyError::Timeout`] with the configured limit so callers see a
    /// single timeout variant regardless of which layer gave up.
    pub fn transport(err: reqwest::Error, limit: Duration) -> Self {
        if err.is_timeout() {
            SpotifyError::Timeout(limit)
        } else {
            SpotifyError::Network(err)
        }
    }

    /// True for failures where asking the user to authenticate again is the
    /// only way forward.
    pub fn needs_reauth(&self) -> bool {
        matches!(self, SpotifyError::Auth(_) | SpotifyError::AuthExpired)
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SpotifyError::AuthExpired => Some(401),
            SpotifyError::RateLimited { .. } => Some(429),
            SpotifyError::Client { status, .. } | SpotifyError::Server { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
