//! # Spotify Integration Module
//!
//! This module is the integration layer between spotwire and the two Spotify
//! hosts: the accounts service, which mints tokens, and the Web API, which
//! serves resources.
//!
//! ## Architecture
//!
//! ```text
//! CLI / callers
//!      ↓
//! SpotifyClient ── endpoint helpers (albums, artists, playlists, ...)
//!      │  ├── ResponseCache (opt-in, GET only)
//!      │  └── session TokenState (renewed under one lock)
//!      ↓
//! TokenManager ── accounts.spotify.com/api/token
//!      ↓
//! reqwest
//! ```
//!
//! ## Token lifecycle
//!
//! [`TokenManager`] performs the three grants Spotify offers to confidential
//! clients (authorization code, client credentials, refresh token). Each
//! exchange returns a complete [`TokenState`](crate::types::TokenState); a
//! failed exchange returns an error and leaves the caller's state alone.
//!
//! ## Request policy
//!
//! [`SpotifyClient`] renews a token that is about to expire before sending,
//! renews once and retries once on a 401, and reports everything else through
//! [`SpotifyError`](crate::SpotifyError) without retrying. A 429 is surfaced
//! with its `Retry-After` value so the caller can decide how long to back off.
//!
//! ## Caching
//!
//! Caching is opt-in per call via [`Request::cached`]. Entries are keyed by
//! path and sorted query parameters, only 200 answers are stored, and entries
//! live until their TTL runs out even if a later write changes the resource.

pub mod auth;
pub mod cache;
pub mod client;
pub mod endpoints;

pub use auth::TokenManager;
pub use cache::ResponseCache;
pub use client::{Request, SpotifyClient};
