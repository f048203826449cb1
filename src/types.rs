use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
}

/// The current OAuth ticket of a session.
///
/// `expires_at` is a unix timestamp in seconds, computed from `expires_in` when
/// the token was fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenState {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_type: String,
    pub expires_at: u64,
    pub scope: String,
}

impl TokenState {
    pub fn seconds_left(&self, now: u64) -> i64 {
        self.expires_at as i64 - now as i64
    }

    /// Session state for a token pair supplied through configuration.
    ///
    /// The real expiry of such a token is unknown. With a refresh token the
    /// state starts out expired so the first call renews it; without one the
    /// usual one-hour lifetime is assumed and a 401 ends the session.
    pub fn provisioned(
        access_token: Option<String>,
        refresh_token: Option<String>,
        scope: &str,
        now: u64,
    ) -> Option<Self> {
        if access_token.is_none() && refresh_token.is_none() {
            return None;
        }

        let expires_at = if refresh_token.is_some() { 0 } else { now.saturating_add(3600) };
        Some(Self {
            access_token: access_token.unwrap_or_default(),
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_at,
            scope: scope.to_string(),
        })
    }
}

/// Raw token endpoint payload. Every field is optional so a malformed answer
/// surfaces as an authentication failure instead of a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub value: Value,
    pub expires_at: u64,
}

/// Shared between the `auth` command and the callback handler.
#[derive(Debug, Clone, Default)]
pub struct CallbackState {
    pub expected_state: String,
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Tabled)]
pub struct EnvCheckRow {
    pub variable: String,
    pub status: String,
    pub value: String,
}
