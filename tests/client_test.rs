mod support;

use std::{sync::Arc, time::Duration};

use reqwest::Method;
use serde_json::json;
use spotwire::{
    SpotifyError,
    management::TokenStore,
    spotify::{Request, SpotifyClient, cache::USER_TTL},
};
use support::*;

#[tokio::test]
async fn test_get_album_returns_requested_id() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    let album = client
        .request(Method::GET, "/albums/1uyf3l2d4XYwiEqAb7t7fX", None, None)
        .await
        .unwrap();

    assert_eq!(album["id"], "1uyf3l2d4XYwiEqAb7t7fX");
    assert_eq!(spotify.mock.token_hits(), 0);
}

#[tokio::test]
async fn test_query_params_are_sent() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    client
        .request(
            Method::GET,
            "/search",
            Some(&[("q", "daft punk"), ("type", "artist")]),
            None,
        )
        .await
        .unwrap();

    assert_eq!(
        spotify.mock.api_calls(),
        vec!["GET /search?q=daft+punk&type=artist"]
    );
}

#[tokio::test]
async fn test_expired_token_refreshes_once_before_request() {
    let spotify = Spotify::start().await;
    let client = spotify.client(expired_state("stale-token"));

    let album = client.album("abc").await.unwrap();

    assert_eq!(album["id"], "abc");
    assert_eq!(spotify.mock.token_hits(), 1);
    assert_eq!(spotify.mock.grants(), vec!["refresh_token"]);
    // No request went out with the stale token
    assert_eq!(spotify.mock.api_calls().len(), 1);
    assert_eq!(client.token().await.access_token, FRESH_TOKEN);
}

#[tokio::test]
async fn test_unauthorized_refreshes_and_retries_once() {
    let spotify = Spotify::start().await;
    // Not expired by the clock, but revoked server side
    let client = spotify.client(valid_state("revoked-token"));

    let track = client.track("t1").await.unwrap();

    assert_eq!(track["id"], "t1");
    assert_eq!(spotify.mock.token_hits(), 1);
    assert_eq!(spotify.mock.api_calls(), vec!["GET /tracks/t1", "GET /tracks/t1"]);
}

#[tokio::test]
async fn test_second_unauthorized_is_auth_expired() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state("revoked-token"));

    let result = client
        .request(Method::GET, "/always-unauthorized", None, None)
        .await;

    assert!(matches!(result, Err(SpotifyError::AuthExpired)));
    // One refresh, two sends, no loop
    assert_eq!(spotify.mock.token_hits(), 1);
    assert_eq!(spotify.mock.api_calls().len(), 2);

    // The state holds the one refreshed token and nothing after it
    let after = client.token().await;
    assert_eq!(after.access_token, FRESH_TOKEN);
    assert_eq!(spotify.mock.token_hits(), 1);
}

#[tokio::test]
async fn test_unauthorized_after_proactive_refresh_does_not_refresh_again() {
    let spotify = Spotify::start().await;
    let client = spotify.client(expired_state("stale-token"));

    let result = client
        .request(Method::GET, "/always-unauthorized", None, None)
        .await;

    assert!(matches!(result, Err(SpotifyError::AuthExpired)));
    assert_eq!(spotify.mock.token_hits(), 1);
    assert_eq!(spotify.mock.api_calls().len(), 1);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_state() {
    let spotify = Spotify::start().await;
    let mut state = expired_state("stale-token");
    state.refresh_token = Some("revoked".to_string());
    let client = spotify.client(state.clone());

    let result = client.album("abc").await;

    assert!(matches!(result, Err(SpotifyError::Auth(_))));
    assert_eq!(client.token().await, state);
    assert!(spotify.mock.api_calls().is_empty());
}

#[tokio::test]
async fn test_rate_limited_carries_retry_after() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    let result = client.request(Method::GET, "/rate-limited", None, None).await;

    match result {
        Err(SpotifyError::RateLimited { retry_after }) => assert_eq!(retry_after, Some(7)),
        other => panic!("expected rate limit, got {:?}", other),
    }
    // Surfaced, not retried
    assert_eq!(spotify.mock.api_calls().len(), 1);
}

#[tokio::test]
async fn test_client_and_server_errors() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    match client.request(Method::GET, "/missing", None, None).await {
        Err(SpotifyError::Client { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("Non existing id"));
        }
        other => panic!("expected client error, got {:?}", other),
    }

    match client.request(Method::GET, "/broken", None, None).await {
        Err(e @ SpotifyError::Server { .. }) => assert_eq!(e.status(), Some(503)),
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    let value = client.request(Method::PUT, "/empty", None, None).await.unwrap();

    assert!(value.is_null());
}

#[tokio::test]
async fn test_deadline_aborts_without_touching_state_or_cache() {
    let spotify = Spotify::start().await;
    let state = valid_state(FRESH_TOKEN);
    let client = spotify.client(state.clone());

    let result = client
        .send(
            Request::get("/slow")
                .cached(USER_TTL)
                .deadline(Duration::from_millis(100)),
        )
        .await;

    assert!(matches!(result, Err(SpotifyError::Timeout(_))));
    assert_eq!(client.token().await, state);
    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_concurrent_callers_share_one_refresh() {
    let spotify = Spotify::start().await;
    let client = Arc::new(spotify.client(expired_state("stale-token")));

    let mut handles = Vec::new();
    for i in 0..5 {
        let client = Arc::clone(&client);
        handles.push(tokio::spawn(async move {
            client
                .request(Method::GET, &format!("/tracks/t{}", i), None, None)
                .await
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    assert_eq!(spotify.mock.token_hits(), 1);
    assert_eq!(spotify.mock.api_calls().len(), 5);
}

#[tokio::test]
async fn test_app_only_session_renews_with_client_credentials() {
    let spotify = Spotify::start().await;
    let tokens = Arc::new(spotify.token_manager());

    let client = SpotifyClient::app_only(tokens, spotify.api_url())
        .await
        .unwrap();
    assert!(client.token().await.refresh_token.is_none());

    let result = client
        .request(Method::GET, "/always-unauthorized", None, None)
        .await;

    assert!(matches!(result, Err(SpotifyError::AuthExpired)));
    assert_eq!(
        spotify.mock.grants(),
        vec!["client_credentials", "client_credentials"]
    );
}

#[tokio::test]
async fn test_refreshed_token_is_persisted() {
    let spotify = Spotify::start().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    let client = spotify
        .client(expired_state("stale-token"))
        .with_store(TokenStore::new(&path));

    client.artist("a1").await.unwrap();

    let stored = TokenStore::new(&path).load().await.unwrap();
    assert_eq!(stored.access_token, FRESH_TOKEN);
    assert_eq!(stored.refresh_token.as_deref(), Some(REFRESH_TOKEN));
}

#[tokio::test]
async fn test_create_playlist_posts_for_current_user() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    let created = client
        .create_playlist("Weekly Picks", "made by tests", false)
        .await
        .unwrap();

    assert_eq!(created["method"], "POST");
    assert_eq!(created["path"], "/users/user-1/playlists");
    assert_eq!(
        spotify.mock.api_calls(),
        vec!["GET /me", "POST /users/user-1/playlists"]
    );
}

#[tokio::test]
async fn test_library_calls_join_ids() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    client.save_tracks(&["a", "b", "c"]).await.unwrap();
    client.remove_saved_tracks(&["a"]).await.unwrap();

    assert_eq!(
        spotify.mock.api_calls(),
        vec!["PUT /me/tracks?ids=a%2Cb%2Cc", "DELETE /me/tracks?ids=a"]
    );
}

#[tokio::test]
async fn test_add_tracks_sends_json_body() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    let result = client
        .request(
            Method::POST,
            "/playlists/p1/tracks",
            None,
            Some(json!({"uris": ["spotify:track:1"]})),
        )
        .await
        .unwrap();

    assert_eq!(result["snapshot_id"], "snapshot-1");
}
