//! # CLI Module
//!
//! Command implementations for the `spotwire` binary. Each command builds its
//! session from the environment, runs one or a few library calls and prints
//! the JSON answer, pretty-printed.
//!
//! ## Commands
//!
//! - [`auth`] - authorization code login through the browser and the local
//!   callback server
//! - [`token_client_credentials`], [`token_refresh`], [`token_show`],
//!   [`token_clear`] - direct access to the token lifecycle
//! - [`check`] - environment report
//! - [`request`] - any Web API call, optionally cached
//! - resource commands ([`album`], [`artist`], [`track`], [`search`],
//!   [`browse`], [`me`], playlist and library commands)
//!
//! ## Sessions
//!
//! User sessions start from the token stored by `spotwire auth`, falling back
//! to `SPOTIFY_ACCESS_TOKEN` / `SPOTIFY_REFRESH_TOKEN`. Renewed tokens are
//! written back to the store. Commands accepting `--app` use an app-only
//! client-credentials session instead, which can read catalog data but nothing
//! user specific.
//!
//! ## Failures
//!
//! Every failure is reported through the `error!` macro with a hint matching
//! its class (re-authenticate, wait for the rate limit, check the request) and
//! exits with status 1.

mod auth;
mod check;
mod request;
mod resources;
mod token;

use std::sync::Arc;

use serde_json::Value;

use crate::{
    SpotifyError,
    config::Settings,
    error,
    management::TokenStore,
    spotify::{SpotifyClient, TokenManager},
    types::TokenState,
    utils,
};

pub use auth::auth;
pub use check::check;
pub use request::request;
pub use resources::{
    album, artist, browse, library_contains, library_remove, library_save, library_saved, me,
    playlist_add_tracks, playlist_create, playlist_show, playlists, search, track,
};
pub use token::{token_clear, token_client_credentials, token_refresh, token_show};

fn settings() -> Settings {
    match Settings::from_env() {
        Ok(s) => s,
        Err(e) => error!("{}\nRun spotwire check to inspect your configuration.", e),
    }
}

fn token_manager(settings: &Settings) -> Arc<TokenManager> {
    match TokenManager::from_settings(settings) {
        Ok(tm) => Arc::new(tm),
        Err(e) => error!("Cannot create HTTP client. Err: {}", e),
    }
}

/// Current user token: the stored one first, then the configured pair.
async fn user_token(settings: &Settings, store: &TokenStore) -> Option<TokenState> {
    match store.load().await {
        Ok(state) => Some(state),
        Err(_) => TokenState::provisioned(
            settings.access_token.clone(),
            settings.refresh_token.clone(),
            &settings.credentials.scope,
            utils::now_timestamp(),
        ),
    }
}

async fn client(app: bool) -> SpotifyClient {
    let settings = settings();
    let tokens = token_manager(&settings);

    if app {
        return match SpotifyClient::app_only(tokens, settings.endpoints.api_url.clone()).await {
            Ok(c) => c,
            Err(e) => fail(e),
        };
    }

    let store = TokenStore::default_location();
    let Some(state) = user_token(&settings, &store).await else {
        error!("No token found. Please run spotwire auth");
    };

    match SpotifyClient::new(tokens, settings.endpoints.api_url.clone(), state) {
        Ok(c) => c.with_store(store),
        Err(e) => fail(e),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => error!("Cannot render response. Err: {}", e),
    }
}

fn output(result: Result<Value, SpotifyError>) {
    match result {
        Ok(value) => print_json(&value),
        Err(e) => fail(e),
    }
}

fn fail(err: SpotifyError) -> ! {
    if err.needs_reauth() {
        error!("{}\nPlease run spotwire auth", err);
    }

    match err {
        SpotifyError::RateLimited {
            retry_after: Some(secs),
        } => error!("Rate limited by Spotify. Try again in {} seconds.", secs),
        SpotifyError::Timeout(_) | SpotifyError::Network(_) => {
            error!("{}\nCheck your connection and try again.", err)
        }
        _ => error!("{}", err),
    }
}
