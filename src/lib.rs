//! Spotify Web API client library
//!
//! This library wraps the Spotify Web API behind two cooperating pieces: a
//! [`spotify::TokenManager`] that owns every OAuth exchange against the accounts
//! service, and a [`spotify::SpotifyClient`] that signs resource calls with the
//! current bearer token, renews it when needed and optionally caches GET
//! responses. Everything else in the crate (configuration, persistence, the
//! local callback server and the CLI) is built on top of those two.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Typed failure taxonomy shared by all network operations
//! - `management` - Token persistence in the local data directory
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Token lifecycle, request wrapper, cache and endpoint helpers
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use spotwire::{config::Settings, spotify::{SpotifyClient, TokenManager}};
//!
//! #[tokio::main]
//! async fn main() -> spotwire::Res<()> {
//!     let settings = Settings::from_env()?;
//!     let tokens = Arc::new(TokenManager::from_settings(&settings)?);
//!     let client = SpotifyClient::app_only(tokens, &settings.endpoints.api_url).await?;
//!     let album = client.album("1uyf3l2d4XYwiEqAb7t7fX").await?;
//!     println!("{}", album["name"]);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::SpotifyError;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the CLI glue where any error only needs to be reported. Library
/// operations that callers may want to branch on return
/// `Result<T, SpotifyError>` instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Requesting token from {}", url);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for fatal errors in the CLI layer. Library code returns
/// [`SpotifyError`] and never calls this macro.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, e.g. a refreshed token that could not be
/// written back to disk.
///
/// # Example
///
/// ```
/// warning!("Failed to persist refreshed token: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
