use std::time::Duration;

use reqwest::{Client, Url, header::AUTHORIZATION};

use crate::{
    SpotifyError,
    config::Settings,
    types::{Credentials, TokenResponse, TokenState},
    utils,
};

/// Seconds before the real expiry at which a token already counts as expired.
pub const DEFAULT_SAFETY_MARGIN: u64 = 60;

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Owns every exchange against the Spotify accounts service.
///
/// A `TokenManager` is constructed once from the process credentials and
/// shared (behind an `Arc`) by every [`SpotifyClient`](super::SpotifyClient)
/// that needs to mint or renew tokens. It holds no token itself: each exchange
/// returns a fresh [`TokenState`] and the caller decides where it lives.
///
/// All token endpoint calls are form-encoded POSTs carrying
/// `Authorization: Basic base64(client_id:client_secret)`.
pub struct TokenManager {
    http: Client,
    credentials: Credentials,
    token_url: String,
    authorize_url: String,
    timeout: Duration,
    safety_margin: u64,
}

impl TokenManager {
    /// Creates a manager talking to `token_url` with the given HTTP timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Network`] if the HTTP client cannot be built
    /// (e.g. no TLS backend available).
    pub fn new(
        credentials: Credentials,
        token_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SpotifyError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SpotifyError::Network)?;

        Ok(Self {
            http,
            credentials,
            token_url: token_url.into(),
            authorize_url: crate::config::DEFAULT_AUTH_URL.to_string(),
            timeout,
            safety_margin: DEFAULT_SAFETY_MARGIN,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, SpotifyError> {
        Ok(Self::new(
            settings.credentials.clone(),
            settings.endpoints.token_url.clone(),
            settings.timeout,
        )?
        .with_authorize_url(settings.endpoints.authorize_url.clone()))
    }

    pub fn with_authorize_url(mut self, authorize_url: impl Into<String>) -> Self {
        self.authorize_url = authorize_url.into();
        self
    }

    pub fn with_safety_margin(mut self, seconds: u64) -> Self {
        self.safety_margin = seconds;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Header value for token endpoint calls.
    pub fn basic_auth_header(&self) -> String {
        format!(
            "Basic {}",
            utils::encode_basic_credentials(
                &self.credentials.client_id,
                &self.credentials.client_secret
            )
        )
    }

    /// Header value for resource calls made with `state`.
    pub fn bearer_header(state: &TokenState) -> String {
        format!("Bearer {}", state.access_token)
    }

    /// Whether `state` should be renewed before use at time `now` (unix seconds).
    ///
    /// A token counts as expired `safety_margin` seconds before its real
    /// expiry so a request never races the deadline on the wire.
    pub fn is_expired(&self, state: &TokenState, now: u64) -> bool {
        now >= state.expires_at.saturating_sub(self.safety_margin)
    }

    /// Builds the URL the user visits to grant access.
    ///
    /// `state` is echoed back to the redirect URI and must be checked by the
    /// callback before the code is exchanged.
    pub fn authorize_url(&self, state: &str) -> Result<String, SpotifyError> {
        let url = Url::parse_with_params(
            &self.authorize_url,
            &[
                ("client_id", self.credentials.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("scope", self.credentials.scope.as_str()),
                ("state", state),
                ("show_dialog", "true"),
            ],
        )
        .map_err(|e| SpotifyError::Config(format!("invalid authorize url: {}", e)))?;

        Ok(url.to_string())
    }

    /// Exchanges an authorization code returned to `redirect_uri`.
    ///
    /// # Errors
    ///
    /// - [`SpotifyError::Auth`] if the endpoint answers with an error status or
    ///   the payload has no `access_token`
    /// - [`SpotifyError::Timeout`] / [`SpotifyError::Network`] on transport
    ///   failures
    pub async fn exchange_authorization_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenState, SpotifyError> {
        self.request_token(
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ],
            None,
        )
        .await
    }

    /// Mints an app-only token. The result never carries a refresh token.
    pub async fn exchange_client_credentials(&self) -> Result<TokenState, SpotifyError> {
        self.request_token(&[("grant_type", "client_credentials")], None)
            .await
    }

    /// Renews `state` with its refresh token.
    ///
    /// Spotify does not always rotate refresh tokens; when the answer omits
    /// one, the new state keeps the refresh token of `state`. On failure
    /// `state` is untouched and still usable by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Auth`] without contacting the endpoint when
    /// `state` has no refresh token.
    pub async fn refresh(&self, state: &TokenState) -> Result<TokenState, SpotifyError> {
        let Some(refresh_token) = state.refresh_token.as_deref() else {
            return Err(SpotifyError::Auth(
                "no refresh token available, re-authenticate".to_string(),
            ));
        };

        self.request_token(
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ],
            Some(refresh_token),
        )
        .await
    }

    async fn request_token(
        &self,
        form: &[(&str, &str)],
        previous_refresh_token: Option<&str>,
    ) -> Result<TokenState, SpotifyError> {
        let res = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, self.basic_auth_header())
            .form(form)
            .send()
            .await
            .map_err(|e| SpotifyError::transport(e, self.timeout))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| SpotifyError::transport(e, self.timeout))?;

        if !status.is_success() {
            let reason = serde_json::from_str::<TokenResponse>(&body)
                .ok()
                .and_then(|r| r.error_description.or(r.error))
                .unwrap_or(body);
            return Err(SpotifyError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                reason
            )));
        }

        let payload: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            SpotifyError::Auth(format!("token endpoint returned invalid JSON: {}", e))
        })?;

        token_state_from(payload, previous_refresh_token, utils::now_timestamp())
    }
}

/// Turns a token endpoint payload into a [`TokenState`] fetched at `now`.
pub fn token_state_from(
    payload: TokenResponse,
    previous_refresh_token: Option<&str>,
    now: u64,
) -> Result<TokenState, SpotifyError> {
    let access_token = match payload.access_token {
        Some(token) if !token.is_empty() => token,
        _ => {
            return Err(SpotifyError::Auth(
                payload
                    .error_description
                    .or(payload.error)
                    .unwrap_or_else(|| "response did not contain an access_token".to_string()),
            ));
        }
    };

    let refresh_token = payload
        .refresh_token
        .filter(|t| !t.is_empty())
        .or_else(|| previous_refresh_token.map(str::to_string));

    Ok(TokenState {
        access_token,
        refresh_token,
        token_type: payload.token_type.unwrap_or_else(|| "Bearer".to_string()),
        expires_at: now.saturating_add(payload.expires_in.unwrap_or(DEFAULT_EXPIRES_IN)),
        scope: payload.scope.unwrap_or_default(),
    })
}
