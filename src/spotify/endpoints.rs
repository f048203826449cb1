//! Convenience wrappers over the Web API endpoints the CLI uses.
//!
//! Bodies stay opaque JSON. Cache lifetimes follow how often the data changes:
//! per-user and catalog objects for [`USER_TTL`], editorial browse lists for
//! [`BROWSE_TTL`] and categories for [`CATEGORY_TTL`]. Listing endpoints that
//! page through user data (saved tracks, playlist items, search) are not
//! cached.

use serde_json::{Value, json};

use crate::{
    SpotifyError,
    spotify::{
        Request, SpotifyClient,
        cache::{BROWSE_TTL, CATEGORY_TTL, USER_TTL},
    },
    utils,
};

impl SpotifyClient {
    // user

    pub async fn me(&self) -> Result<Value, SpotifyError> {
        self.send(Request::get("/me").cached(USER_TTL)).await
    }

    pub async fn my_playlists(&self, limit: u32, offset: u32) -> Result<Value, SpotifyError> {
        self.send(
            Request::get("/me/playlists")
                .param("limit", limit)
                .param("offset", offset),
        )
        .await
    }

    /// `kind` is `tracks` or `artists`; `time_range` one of `short_term`,
    /// `medium_term`, `long_term`.
    pub async fn top_items(
        &self,
        kind: &str,
        time_range: &str,
        limit: u32,
    ) -> Result<Value, SpotifyError> {
        self.send(
            Request::get(format!("/me/top/{}", kind))
                .param("time_range", time_range)
                .param("limit", limit)
                .cached(USER_TTL),
        )
        .await
    }

    pub async fn recently_played(&self, limit: u32) -> Result<Value, SpotifyError> {
        self.send(Request::get("/me/player/recently-played").param("limit", limit))
            .await
    }

    // browse

    pub async fn featured_playlists(&self, limit: u32) -> Result<Value, SpotifyError> {
        self.send(
            Request::get("/browse/featured-playlists")
                .param("limit", limit)
                .cached(BROWSE_TTL),
        )
        .await
    }

    pub async fn new_releases(&self, limit: u32) -> Result<Value, SpotifyError> {
        self.send(
            Request::get("/browse/new-releases")
                .param("limit", limit)
                .cached(BROWSE_TTL),
        )
        .await
    }

    pub async fn categories(&self, limit: u32) -> Result<Value, SpotifyError> {
        self.send(
            Request::get("/browse/categories")
                .param("limit", limit)
                .cached(CATEGORY_TTL),
        )
        .await
    }

    // search

    /// `kind` is a comma separated list of `album`, `artist`, `playlist`,
    /// `track`, `show`, `episode`.
    pub async fn search(
        &self,
        query: &str,
        kind: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Value, SpotifyError> {
        self.send(
            Request::get("/search")
                .param("q", query)
                .param("type", kind)
                .param("limit", limit)
                .param("offset", offset),
        )
        .await
    }

    // tracks

    pub async fn track(&self, id: &str) -> Result<Value, SpotifyError> {
        self.send(Request::get(format!("/tracks/{}", id)).cached(USER_TTL))
            .await
    }

    pub async fn audio_features(&self, id: &str) -> Result<Value, SpotifyError> {
        self.send(Request::get(format!("/audio-features/{}", id)).cached(USER_TTL))
            .await
    }

    pub async fn several_audio_features<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Value, SpotifyError> {
        self.send(Request::get("/audio-features").param("ids", utils::join_ids(ids)))
            .await
    }

    // artists

    pub async fn artist(&self, id: &str) -> Result<Value, SpotifyError> {
        self.send(Request::get(format!("/artists/{}", id)).cached(USER_TTL))
            .await
    }

    pub async fn several_artists<S: AsRef<str>>(&self, ids: &[S]) -> Result<Value, SpotifyError> {
        self.send(Request::get("/artists").param("ids", utils::join_ids(ids)))
            .await
    }

    pub async fn artist_albums(&self, id: &str, limit: u32) -> Result<Value, SpotifyError> {
        self.send(
            Request::get(format!("/artists/{}/albums", id))
                .param("limit", limit)
                .cached(USER_TTL),
        )
        .await
    }

    pub async fn artist_top_tracks(&self, id: &str, market: &str) -> Result<Value, SpotifyError> {
        self.send(
            Request::get(format!("/artists/{}/top-tracks", id))
                .param("market", market)
                .cached(USER_TTL),
        )
        .await
    }

    pub async fn related_artists(&self, id: &str) -> Result<Value, SpotifyError> {
        self.send(Request::get(format!("/artists/{}/related-artists", id)).cached(USER_TTL))
            .await
    }

    // albums

    pub async fn album(&self, id: &str) -> Result<Value, SpotifyError> {
        self.send(Request::get(format!("/albums/{}", id)).cached(USER_TTL))
            .await
    }

    pub async fn album_tracks(&self, id: &str, limit: u32) -> Result<Value, SpotifyError> {
        self.send(
            Request::get(format!("/albums/{}/tracks", id))
                .param("limit", limit)
                .cached(USER_TTL),
        )
        .await
    }

    pub async fn save_albums<S: AsRef<str>>(&self, ids: &[S]) -> Result<Value, SpotifyError> {
        self.send(Request::put("/me/albums").param("ids", utils::join_ids(ids)))
            .await
    }

    pub async fn remove_saved_albums<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Value, SpotifyError> {
        self.send(Request::delete("/me/albums").param("ids", utils::join_ids(ids)))
            .await
    }

    // playlists

    pub async fn playlist(&self, id: &str) -> Result<Value, SpotifyError> {
        self.send(Request::get(format!("/playlists/{}", id)).cached(USER_TTL))
            .await
    }

    pub async fn playlist_tracks(
        &self,
        id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Value, SpotifyError> {
        self.send(
            Request::get(format!("/playlists/{}/tracks", id))
                .param("limit", limit)
                .param("offset", offset),
        )
        .await
    }

    /// Creates a playlist owned by the current user.
    ///
    /// Looks up the user id through [`SpotifyClient::me`] first, so a second
    /// call within five minutes reuses the cached profile.
    pub async fn create_playlist(
        &self,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Value, SpotifyError> {
        let profile = self.me().await?;
        let Some(user_id) = profile["id"].as_str() else {
            return Err(SpotifyError::Client {
                status: 404,
                body: "current user profile has no id".to_string(),
            });
        };

        self.send(
            Request::post(format!("/users/{}/playlists", user_id)).json(json!({
                "name": name,
                "description": description,
                "public": public,
            })),
        )
        .await
    }

    pub async fn add_tracks_to_playlist<S: AsRef<str>>(
        &self,
        id: &str,
        uris: &[S],
    ) -> Result<Value, SpotifyError> {
        let uris: Vec<&str> = uris.iter().map(|u| u.as_ref()).collect();
        self.send(Request::post(format!("/playlists/{}/tracks", id)).json(json!({ "uris": uris })))
            .await
    }

    // library

    pub async fn saved_tracks(&self, limit: u32, offset: u32) -> Result<Value, SpotifyError> {
        self.send(
            Request::get("/me/tracks")
                .param("limit", limit)
                .param("offset", offset),
        )
        .await
    }

    pub async fn save_tracks<S: AsRef<str>>(&self, ids: &[S]) -> Result<Value, SpotifyError> {
        self.send(Request::put("/me/tracks").param("ids", utils::join_ids(ids)))
            .await
    }

    pub async fn remove_saved_tracks<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Value, SpotifyError> {
        self.send(Request::delete("/me/tracks").param("ids", utils::join_ids(ids)))
            .await
    }

    pub async fn check_saved_tracks<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Value, SpotifyError> {
        self.send(Request::get("/me/tracks/contains").param("ids", utils::join_ids(ids)))
            .await
    }
}
