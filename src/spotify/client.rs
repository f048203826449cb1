use std::{sync::Arc, time::Duration};

use reqwest::{
    Client, Method, Response, StatusCode,
    header::{AUTHORIZATION, RETRY_AFTER},
};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::{
    SpotifyError,
    management::TokenStore,
    spotify::{
        TokenManager,
        cache::{ResponseCache, cache_key},
    },
    types::TokenState,
    utils, warning,
};

/// One logical call against the Web API.
///
/// Built with the method helpers and consumed by [`SpotifyClient::send`]:
///
/// ```
/// let req = Request::get("/artists/0OdUWJ0sBjDrqHygGUXeCF/albums")
///     .param("limit", 20)
///     .cached(cache::USER_TTL);
/// let albums = client.send(req).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    params: Vec<(String, String)>,
    body: Option<Value>,
    cache_ttl: Option<Duration>,
    deadline: Option<Duration>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
            cache_ttl: None,
            deadline: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Opts a GET into the response cache with the given TTL. Ignored for
    /// every other method.
    pub fn cached(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Aborts the call with [`SpotifyError::Timeout`] once `deadline` elapses.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Key this request reads and writes in the cache, if it participates.
    pub fn cache_key(&self) -> Option<String> {
        if self.method == Method::GET && self.cache_ttl.is_some() {
            Some(cache_key(&self.path, &self.params))
        } else {
            None
        }
    }
}

/// How a session obtains a new access token once the current one is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Renewal {
    RefreshToken,
    ClientCredentials,
}

/// Authenticated access to `https://api.spotify.com/v1`.
///
/// The client owns exactly one [`TokenState`] and renews it through the shared
/// [`TokenManager`]:
///
/// - before sending, a token inside the expiry safety margin is renewed
/// - a 401 answer triggers one renewal and one retry; a second 401 fails with
///   [`SpotifyError::AuthExpired`]
///
/// Renewal happens at most once per call and is serialized across concurrent
/// calls: a caller that finds a renewal in flight waits for it and reuses the
/// new token instead of starting its own.
///
/// GET requests may opt into the response cache with
/// [`Request::cached`]; mutating methods never touch it.
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    timeout: Duration,
    tokens: Arc<TokenManager>,
    session: RwLock<TokenState>,
    refresh_lock: Mutex<()>,
    renewal: Renewal,
    cache: ResponseCache,
    store: Option<TokenStore>,
}

impl SpotifyClient {
    /// Creates a client for a user session starting at `state`.
    ///
    /// Renewals use the refresh token of the session.
    pub fn new(
        tokens: Arc<TokenManager>,
        api_url: impl Into<String>,
        state: TokenState,
    ) -> Result<Self, SpotifyError> {
        Self::build(tokens, api_url.into(), state, Renewal::RefreshToken)
    }

    /// Creates a client for app-only calls, starting with a fresh
    /// client-credentials token. Renewals repeat that exchange.
    pub async fn app_only(
        tokens: Arc<TokenManager>,
        api_url: impl Into<String>,
    ) -> Result<Self, SpotifyError> {
        let state = tokens.exchange_client_credentials().await?;
        Self::build(tokens, api_url.into(), state, Renewal::ClientCredentials)
    }

    fn build(
        tokens: Arc<TokenManager>,
        api_url: String,
        state: TokenState,
        renewal: Renewal,
    ) -> Result<Self, SpotifyError> {
        let timeout = tokens.timeout();
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SpotifyError::Network)?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            timeout,
            tokens,
            session: RwLock::new(state),
            refresh_lock: Mutex::new(()),
            renewal,
            cache: ResponseCache::new(),
            store: None,
        })
    }

    /// Writes every renewed token to `store`.
    pub fn with_store(mut self, store: TokenStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Snapshot of the current session token.
    pub async fn token(&self) -> TokenState {
        self.session.read().await.clone()
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Sends `method path` with optional query parameters and JSON body.
    ///
    /// Uncached; use [`SpotifyClient::send`] with [`Request::cached`] to opt
    /// into the cache.
    ///
    /// # Example
    ///
    /// ```
    /// let album = client
    ///     .request(Method::GET, "/albums/1uyf3l2d4XYwiEqAb7t7fX", None, None)
    ///     .await?;
    /// assert_eq!(album["id"], "1uyf3l2d4XYwiEqAb7t7fX");
    /// ```
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        params: Option<&[(&str, &str)]>,
        body: Option<Value>,
    ) -> Result<Value, SpotifyError> {
        let mut req = Request::new(method, path);
        if let Some(params) = params {
            req = req.params(params.iter().copied());
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        self.send(req).await
    }

    /// Sends a prepared [`Request`].
    ///
    /// # Errors
    ///
    /// - [`SpotifyError::AuthExpired`] if the API rejects the token again
    ///   after a renewal
    /// - [`SpotifyError::Auth`] if the renewal itself fails
    /// - [`SpotifyError::RateLimited`] on 429, carrying `Retry-After`
    /// - [`SpotifyError::Client`] / [`SpotifyError::Server`] on other 4xx/5xx
    /// - [`SpotifyError::Timeout`] when the HTTP timeout or the request
    ///   deadline elapses; the session token and cache stay untouched
    /// - [`SpotifyError::Network`] on transport failures
    pub async fn send(&self, req: Request) -> Result<Value, SpotifyError> {
        match req.deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.dispatch(&req))
                .await
                .map_err(|_| SpotifyError::Timeout(deadline))?,
            None => self.dispatch(&req).await,
        }
    }

    async fn dispatch(&self, req: &Request) -> Result<Value, SpotifyError> {
        let key = req.cache_key();
        if let Some(key) = &key {
            if let Some(hit) = self.cache.get(key, utils::now_timestamp()).await {
                return Ok(hit);
            }
        }

        let mut token = self.token().await;
        let mut renewed = false;
        if self.tokens.is_expired(&token, utils::now_timestamp()) {
            token = self.renew(&token.access_token).await?;
            renewed = true;
        }

        let mut response = self.execute(req, &token).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            if renewed {
                return Err(SpotifyError::AuthExpired);
            }
            token = self.renew(&token.access_token).await?;
            response = self.execute(req, &token).await?;
            if response.status() == StatusCode::UNAUTHORIZED {
                return Err(SpotifyError::AuthExpired);
            }
        }

        let status = response.status();
        let value = self.read_response(response).await?;

        if let (Some(key), Some(ttl)) = (key, req.cache_ttl) {
            if status == StatusCode::OK {
                self.cache
                    .insert(key, value.clone(), ttl, utils::now_timestamp())
                    .await;
            }
        }

        Ok(value)
    }

    async fn execute(&self, req: &Request, token: &TokenState) -> Result<Response, SpotifyError> {
        let url = if req.path.starts_with("https://") || req.path.starts_with("http://") {
            req.path.clone()
        } else {
            format!("{}/{}", self.api_url, req.path.trim_start_matches('/'))
        };

        let mut builder = self
            .http
            .request(req.method.clone(), url)
            .header(AUTHORIZATION, TokenManager::bearer_header(token));

        if !req.params.is_empty() {
            builder = builder.query(&req.params);
        }
        builder = match &req.body {
            Some(body) => builder.json(body),
            // Spotify answers 411 to body-less writes without a Content-Length.
            None if req.method != Method::GET => builder.body(""),
            None => builder,
        };

        builder
            .send()
            .await
            .map_err(|e| SpotifyError::transport(e, self.timeout))
    }

    /// Replaces the session token, unless someone else already did.
    ///
    /// `stale_access_token` is the token the caller saw fail or expire. If the
    /// session moved on to a different, still valid token while this caller
    /// waited for the lock, that token is returned without another exchange.
    async fn renew(&self, stale_access_token: &str) -> Result<TokenState, SpotifyError> {
        let _guard = self.refresh_lock.lock().await;

        let current = self.token().await;
        if current.access_token != stale_access_token
            && !self.tokens.is_expired(&current, utils::now_timestamp())
        {
            return Ok(current);
        }

        let renewed = match self.renewal {
            Renewal::RefreshToken => self.tokens.refresh(&current).await?,
            Renewal::ClientCredentials => self.tokens.exchange_client_credentials().await?,
        };
        *self.session.write().await = renewed.clone();

        if let Some(store) = &self.store {
            if let Err(e) = store.persist(&renewed).await {
                warning!("Failed to persist refreshed token: {}", e);
            }
        }

        Ok(renewed)
    }

    async fn read_response(&self, response: Response) -> Result<Value, SpotifyError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            return Err(SpotifyError::RateLimited { retry_after });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SpotifyError::transport(e, self.timeout))?;

        if status.is_success() {
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&body).map_err(SpotifyError::Decode);
        }

        let body = String::from_utf8_lossy(&body).into_owned();
        if status.is_server_error() {
            Err(SpotifyError::Server {
                status: status.as_u16(),
                body,
            })
        } else {
            Err(SpotifyError::Client {
                status: status.as_u16(),
                body,
            })
        }
    }
}
