mod support;

use std::time::Duration;

use serde_json::json;
use spotwire::spotify::{
    Request, ResponseCache,
    cache::{BROWSE_TTL, USER_TTL, cache_key},
};
use support::*;

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_cache_key_sorts_params() {
    let a = cache_key("/me/top/tracks", &params(&[("time_range", "short_term"), ("limit", "5")]));
    let b = cache_key("/me/top/tracks", &params(&[("limit", "5"), ("time_range", "short_term")]));

    assert_eq!(a, b);
    assert_eq!(a, "/me/top/tracks?limit=5&time_range=short_term");
}

#[test]
fn test_cache_key_normalizes_path() {
    assert_eq!(cache_key("albums/abc", &[]), "/albums/abc");
    assert_eq!(cache_key("/albums/abc", &[]), "/albums/abc");
    assert_ne!(
        cache_key("/albums/abc", &params(&[("limit", "5")])),
        cache_key("/albums/abc", &params(&[("limit", "6")]))
    );
}

#[test]
fn test_cache_key_keeps_params_apart() {
    let joined = cache_key("/search", &params(&[("q", "rock&type=artist")]));
    let split = cache_key("/search", &params(&[("q", "rock"), ("type", "artist")]));
    assert_ne!(joined, split);
    assert_eq!(joined, "/search?q=rock%26type%3Dartist");

    // Values go out untrimmed, so they are keyed untrimmed
    assert_ne!(
        cache_key("/search", &params(&[("q", " rock")])),
        cache_key("/search", &params(&[("q", "rock")]))
    );
}

#[test]
fn test_only_cached_gets_have_keys() {
    assert!(Request::get("/albums/a").cache_key().is_none());
    assert!(Request::get("/albums/a").cached(USER_TTL).cache_key().is_some());
    assert!(Request::put("/me/tracks").cached(USER_TTL).cache_key().is_none());
    assert!(Request::post("/playlists/p/tracks").cached(USER_TTL).cache_key().is_none());
    assert!(Request::delete("/me/tracks").cached(USER_TTL).cache_key().is_none());
}

#[tokio::test]
async fn test_entries_expire_after_ttl() {
    let cache = ResponseCache::new();
    cache
        .insert("/albums/a".to_string(), json!({"id": "a"}), Duration::from_secs(300), 1000)
        .await;

    assert_eq!(cache.get("/albums/a", 1000).await, Some(json!({"id": "a"})));
    assert_eq!(cache.get("/albums/a", 1299).await, Some(json!({"id": "a"})));
    assert_eq!(cache.get("/albums/a", 1300).await, None);

    // Expired entries stay until purged
    assert_eq!(cache.len().await, 1);
    assert_eq!(cache.purge_expired(1300).await, 1);
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_huge_ttl_never_expires() {
    let cache = ResponseCache::new();
    cache
        .insert("/x".to_string(), json!(1), Duration::from_secs(u64::MAX), 1000)
        .await;

    assert_eq!(cache.peek("/x").await.unwrap().expires_at, u64::MAX);
    assert_eq!(cache.get("/x", 1_000_000).await, Some(json!(1)));
}

#[tokio::test]
async fn test_insert_overwrites_entry() {
    let cache = ResponseCache::new();
    cache
        .insert("/me".to_string(), json!({"v": 1}), Duration::from_secs(10), 0)
        .await;
    cache
        .insert("/me".to_string(), json!({"v": 2}), Duration::from_secs(10), 5)
        .await;

    let entry = cache.peek("/me").await.unwrap();
    assert_eq!(entry.value, json!({"v": 2}));
    assert_eq!(entry.expires_at, 15);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_identical_gets_hit_network_once() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    let req = Request::get("/browse/new-releases")
        .param("limit", 10)
        .cached(BROWSE_TTL);
    let first = client.send(req.clone()).await.unwrap();
    let second = client.send(req).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
    assert_eq!(spotify.mock.api_calls().len(), 1);
}

#[tokio::test]
async fn test_param_order_shares_cache_entry() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    client.top_items("tracks", "short_term", 5).await.unwrap();
    client
        .send(
            Request::get("/me/top/tracks")
                .param("limit", 5)
                .param("time_range", "short_term")
                .cached(USER_TTL),
        )
        .await
        .unwrap();

    assert_eq!(spotify.mock.api_calls().len(), 1);
}

#[tokio::test]
async fn test_distinct_queries_do_not_share_entry() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    client
        .send(Request::get("/search").param("q", "rock&type=artist").cached(USER_TTL))
        .await
        .unwrap();
    client
        .send(
            Request::get("/search")
                .param("q", "rock")
                .param("type", "artist")
                .cached(USER_TTL),
        )
        .await
        .unwrap();
    client
        .send(Request::get("/search").param("q", " rock").cached(USER_TTL))
        .await
        .unwrap();
    client
        .send(Request::get("/search").param("q", "rock").cached(USER_TTL))
        .await
        .unwrap();

    assert_eq!(spotify.mock.api_calls().len(), 4);
    assert_eq!(client.cache().len().await, 4);
}

#[tokio::test]
async fn test_uncached_gets_always_hit_network() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    client.saved_tracks(20, 0).await.unwrap();
    client.saved_tracks(20, 0).await.unwrap();

    assert_eq!(spotify.mock.api_calls().len(), 2);
    assert!(client.cache().is_empty().await);
}

#[tokio::test]
async fn test_mutating_call_leaves_cache_untouched() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    client.playlist("p1").await.unwrap();
    let key = Request::get("/playlists/p1").cached(USER_TTL).cache_key().unwrap();
    let primed = client.cache().peek(&key).await.unwrap();

    // Same path, mutating method, even with a TTL attached
    client
        .send(
            Request::put("/playlists/p1")
                .json(json!({"name": "renamed"}))
                .cached(USER_TTL),
        )
        .await
        .unwrap();

    assert_eq!(client.cache().peek(&key).await.unwrap(), primed);
    assert_eq!(client.cache().len().await, 1);

    // The stale entry is still served
    let again = client.playlist("p1").await.unwrap();
    assert_eq!(again, primed.value);
    assert_eq!(
        spotify.mock.api_calls(),
        vec!["GET /playlists/p1", "PUT /playlists/p1"]
    );
}

#[tokio::test]
async fn test_error_responses_are_not_cached() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));

    let req = Request::get("/missing").cached(USER_TTL);
    assert!(client.send(req.clone()).await.is_err());
    assert!(client.send(req).await.is_err());

    assert!(client.cache().is_empty().await);
    assert_eq!(spotify.mock.api_calls().len(), 2);
}

#[tokio::test]
async fn test_cache_hit_skips_token_renewal() {
    let spotify = Spotify::start().await;
    let client = spotify.client(valid_state(FRESH_TOKEN));
    client.album("abc").await.unwrap();

    // A cached answer is returned verbatim without touching the session
    let cached = client.album("abc").await.unwrap();

    assert_eq!(cached["id"], "abc");
    assert_eq!(spotify.mock.token_hits(), 0);
    assert_eq!(spotify.mock.api_calls().len(), 1);
}
