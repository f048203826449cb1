//! # API Module
//!
//! HTTP handlers served by the local callback server while `spotwire auth`
//! runs.
//!
//! ## Endpoints
//!
//! - [`callback`] - receives the redirect from Spotify's `/authorize` page.
//!   The handler checks the `state` parameter against the value generated for
//!   this login and stores the authorization code (or the `error` Spotify sent
//!   back) in the shared [`CallbackState`](crate::types::CallbackState). The
//!   code is exchanged by the `auth` command, not here, so the handler never
//!   sees client secrets.
//! - [`health`] - liveness probe returning status and crate version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spotwire::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
