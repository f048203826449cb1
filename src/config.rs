//! Configuration management for spotwire.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file. Values are collected once into a [`Settings`] value that is
//! threaded through the token manager and client at construction time; no
//! other module reads the environment.
//!
//! The lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the working directory
//! 3. `.env` in the local data directory
//! 4. Built-in defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::{SpotifyError, types::Credentials, types::EnvCheckRow, utils};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_SCOPE: &str = "user-read-private user-read-email playlist-read-private playlist-read-collaborative playlist-modify-public playlist-modify-private user-library-read user-library-modify user-top-read user-read-recently-played";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const REQUIRED_VARS: [&str; 2] = ["SPOTIFY_CLIENT_ID", "SPOTIFY_CLIENT_SECRET"];
const OPTIONAL_VARS: [&str; 9] = [
    "SPOTIFY_ACCESS_TOKEN",
    "SPOTIFY_REFRESH_TOKEN",
    "SPOTIFY_REDIRECT_URI",
    "SPOTIFY_SCOPE",
    "SPOTIFY_API_URL",
    "SPOTIFY_TOKEN_URL",
    "SPOTIFY_AUTH_URL",
    "SPOTIFY_HTTP_TIMEOUT",
    "SERVER_ADDRESS",
];

/// Base URLs of the two Spotify hosts. Overridable so tests and proxies can
/// point the client elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_url: String,
    pub token_url: String,
    pub authorize_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            authorize_url: DEFAULT_AUTH_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    pub timeout: Duration,
    pub server_addr: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SpotifyError::Config`] if a required variable is missing or
    /// `SPOTIFY_HTTP_TIMEOUT` is not a positive integer.
    pub fn from_env() -> Result<Self, SpotifyError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through an arbitrary key lookup.
    ///
    /// Empty values count as unset, mirroring how `.env` files are usually
    /// written (`SPOTIFY_SCOPE=`).
    ///
    /// # Example
    ///
    /// ```
    /// let settings = Settings::from_lookup(|key| match key {
    ///     "SPOTIFY_CLIENT_ID" => Some("id".to_string()),
    ///     "SPOTIFY_CLIENT_SECRET" => Some("secret".to_string()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(settings.endpoints.api_url, DEFAULT_API_URL);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SpotifyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| SpotifyError::Config(format!("{} must be set", key)))
        };

        let timeout = match get("SPOTIFY_HTTP_TIMEOUT") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(SpotifyError::Config(format!(
                        "SPOTIFY_HTTP_TIMEOUT must be a positive number of seconds, got {:?}",
                        raw
                    )));
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            credentials: Credentials {
                client_id: required("SPOTIFY_CLIENT_ID")?,
                client_secret: required("SPOTIFY_CLIENT_SECRET")?,
                redirect_uri: get("SPOTIFY_REDIRECT_URI")
                    .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
                scope: get("SPOTIFY_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            },
            endpoints: Endpoints {
                api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                token_url: get("SPOTIFY_TOKEN_URL")
                    .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
                authorize_url: get("SPOTIFY_AUTH_URL")
                    .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            },
            timeout,
            server_addr: get("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            access_token: get("SPOTIFY_ACCESS_TOKEN"),
            refresh_token: get("SPOTIFY_REFRESH_TOKEN"),
        })
    }
}

/// Loads environment variables from `.env` files.
///
/// Reads `.env` from the working directory and from the platform-specific
/// local data directory under `spotwire/.env`. Variables already present in
/// the environment are never overwritten, and a missing file is not an error.
///
/// The data directory file lives in:
/// - Linux: `~/.local/share/spotwire/.env`
/// - macOS: `~/Library/Application Support/spotwire/.env`
/// - Windows: `%LOCALAPPDATA%/spotwire/.env`
///
/// # Errors
///
/// Returns an error string if the data directory cannot be created or an
/// existing `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if PathBuf::from(".env").is_file() {
        dotenv::dotenv().map_err(|e| e.to_string())?;
    }
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Root of everything spotwire writes to disk.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotwire");
    path
}

/// Builds the environment report shown by `spotwire check`.
///
/// Secrets (names containing `TOKEN`, `SECRET` or `KEY`) are masked down to
/// their last four characters. The boolean is false when a required variable
/// is missing.
pub fn env_report<F>(lookup: F) -> (Vec<EnvCheckRow>, bool)
where
    F: Fn(&str) -> Option<String>,
{
    let mut all_good = true;
    let mut rows = Vec::new();

    let vars = REQUIRED_VARS
        .iter()
        .map(|v| (*v, true))
        .chain(OPTIONAL_VARS.iter().map(|v| (*v, false)));

    for (name, required) in vars {
        let row = match lookup(name).filter(|v| !v.is_empty()) {
            Some(value) => EnvCheckRow {
                variable: name.to_string(),
                status: "set".to_string(),
                value: if is_sensitive(name) {
                    utils::mask_secret(&value)
                } else {
                    value
                },
            },
            None => {
                if required {
                    all_good = false;
                }
                EnvCheckRow {
                    variable: name.to_string(),
                    status: if required {
                        "missing (required)".to_string()
                    } else {
                        "missing (optional)".to_string()
                    },
                    value: String::new(),
                }
            }
        };
        rows.push(row);
    }

    (rows, all_good)
}

fn is_sensitive(name: &str) -> bool {
    ["TOKEN", "SECRET", "KEY"].iter().any(|m| name.contains(m))
}
