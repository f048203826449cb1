// Local stand-in for accounts.spotify.com and api.spotify.com.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::json;
use spotwire::{
    spotify::{SpotifyClient, TokenManager},
    types::{Credentials, TokenState},
};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
pub const REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const VALID_CODE: &str = "valid-code";
pub const FRESH_TOKEN: &str = "fresh-token";
pub const REFRESH_TOKEN: &str = "refresh-1";
pub const ROTATING_REFRESH_TOKEN: &str = "rotating";

#[derive(Clone, Default)]
pub struct Mock {
    pub token_hits: Arc<AtomicUsize>,
    pub api_calls: Arc<Mutex<Vec<String>>>,
    pub grants: Arc<Mutex<Vec<String>>>,
}

impl Mock {
    pub fn token_hits(&self) -> usize {
        self.token_hits.load(Ordering::SeqCst)
    }

    pub fn api_calls(&self) -> Vec<String> {
        self.api_calls.lock().unwrap().clone()
    }

    pub fn grants(&self) -> Vec<String> {
        self.grants.lock().unwrap().clone()
    }
}

pub struct Spotify {
    pub addr: SocketAddr,
    pub mock: Mock,
}

impl Spotify {
    pub async fn start() -> Self {
        let mock = Mock::default();
        let app = Router::new()
            .route("/api/token", post(token))
            .fallback(api)
            .with_state(mock.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Spotify { addr, mock }
    }

    pub fn token_url(&self) -> String {
        format!("http://{}/api/token", self.addr)
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn token_manager(&self) -> TokenManager {
        TokenManager::new(credentials(), self.token_url(), Duration::from_secs(5)).unwrap()
    }

    pub fn client(&self, state: TokenState) -> SpotifyClient {
        SpotifyClient::new(Arc::new(self.token_manager()), self.api_url(), state).unwrap()
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        redirect_uri: REDIRECT_URI.to_string(),
        scope: "user-read-private user-library-read".to_string(),
    }
}

pub fn now() -> u64 {
    spotwire::utils::now_timestamp()
}

/// A user session whose access token is still valid for an hour.
pub fn valid_state(access_token: &str) -> TokenState {
    TokenState {
        access_token: access_token.to_string(),
        refresh_token: Some(REFRESH_TOKEN.to_string()),
        token_type: "Bearer".to_string(),
        expires_at: now() + 3600,
        scope: "user-read-private".to_string(),
    }
}

/// A user session whose access token expired a minute ago.
pub fn expired_state(access_token: &str) -> TokenState {
    TokenState {
        expires_at: now().saturating_sub(60),
        ..valid_state(access_token)
    }
}

fn basic_header() -> String {
    // base64("client-id:client-secret")
    "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=".to_string()
}

async fn token(
    State(mock): State<Mock>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    mock.token_hits.fetch_add(1, Ordering::SeqCst);

    let grant = form.get("grant_type").cloned().unwrap_or_default();
    mock.grants.lock().unwrap().push(grant.clone());

    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(basic_header().as_str());
    if !authorized {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_client", "error_description": "Invalid client"})),
        )
            .into_response();
    }

    let invalid_grant = || {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "invalid_grant", "error_description": "Invalid grant"})),
        )
            .into_response()
    };

    match grant.as_str() {
        "authorization_code" => match form.get("code").map(String::as_str) {
            Some(VALID_CODE) if form.get("redirect_uri").map(String::as_str) == Some(REDIRECT_URI) => {
                Json(json!({
                    "access_token": FRESH_TOKEN,
                    "token_type": "Bearer",
                    "expires_in": 3600,
                    "refresh_token": REFRESH_TOKEN,
                    "scope": "user-read-private",
                }))
                .into_response()
            }
            Some("no-token") => Json(json!({"token_type": "Bearer"})).into_response(),
            _ => invalid_grant(),
        },
        "client_credentials" => Json(json!({
            "access_token": FRESH_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3600,
        }))
        .into_response(),
        "refresh_token" => match form.get("refresh_token").map(String::as_str) {
            Some(REFRESH_TOKEN) => Json(json!({
                "access_token": FRESH_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": "user-read-private",
            }))
            .into_response(),
            Some(ROTATING_REFRESH_TOKEN) => Json(json!({
                "access_token": FRESH_TOKEN,
                "token_type": "Bearer",
                "expires_in": 3600,
                "refresh_token": "refresh-2",
            }))
            .into_response(),
            _ => invalid_grant(),
        },
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "unsupported_grant_type"})),
        )
            .into_response(),
    }
}

async fn api(State(mock): State<Mock>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let path = uri.path().trim_start_matches("/v1").to_string();
    let query = uri.query().map(|q| format!("?{}", q)).unwrap_or_default();
    mock.api_calls
        .lock()
        .unwrap()
        .push(format!("{} {}{}", method, path, query));

    let bearer_ok = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {}", FRESH_TOKEN).as_str());

    match path.as_str() {
        "/always-unauthorized" => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"status": 401, "message": "Invalid access token"}})),
            )
                .into_response();
        }
        "/slow" => tokio::time::sleep(Duration::from_secs(2)).await,
        _ => {}
    }

    if !bearer_ok {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"status": 401, "message": "The access token expired"}})),
        )
            .into_response();
    }

    match path.as_str() {
        "/rate-limited" => (
            StatusCode::TOO_MANY_REQUESTS,
            [(header::RETRY_AFTER, "7")],
            "",
        )
            .into_response(),
        "/missing" => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"status": 404, "message": "Non existing id"}})),
        )
            .into_response(),
        "/broken" => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"error": {"status": 503, "message": "Service unavailable"}})),
        )
            .into_response(),
        "/empty" => StatusCode::OK.into_response(),
        "/me" => Json(json!({"id": "user-1", "display_name": "Test User"})).into_response(),
        _ if method != Method::GET => Json(json!({
            "method": method.as_str(),
            "path": path,
            "snapshot_id": "snapshot-1",
        }))
        .into_response(),
        _ => {
            let id = path.rsplit('/').next().unwrap_or_default().to_string();
            let served = mock.api_calls.lock().unwrap().len();
            Json(json!({"id": id, "path": path, "served": served})).into_response()
        }
    }
}
