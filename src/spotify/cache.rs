use std::{collections::HashMap, time::Duration};

use serde_json::Value;
use tokio::sync::RwLock;

use crate::types::CacheEntry;

/// Per-user data such as profiles, tracks and albums.
pub const USER_TTL: Duration = Duration::from_secs(300);
/// Editorial data that changes a few times a day.
pub const BROWSE_TTL: Duration = Duration::from_secs(1800);
/// Browse categories, which almost never change.
pub const CATEGORY_TTL: Duration = Duration::from_secs(3600);

/// Cache key for `path` with `params`.
///
/// Parameters are sorted so `?limit=5&offset=0` and `?offset=0&limit=5`
/// share one entry. Keys and values are form-encoded exactly as sent, so a
/// value containing `&` or `=` never collides with a separate parameter.
pub fn cache_key(path: &str, params: &[(String, String)]) -> String {
    let path = format!("/{}", path.trim_start_matches('/'));
    if params.is_empty() {
        return path;
    }

    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    pairs.sort();

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{}?{}", path, query)
}

/// In-memory response cache shared by all calls of one client.
///
/// Entries are replaced wholesale and never invalidated early; concurrent
/// writers to the same key simply race, last one wins.
#[derive(Default)]
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live value for `key` at `now`, if any.
    pub async fn get(&self, key: &str, now: u64) -> Option<Value> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.clone())
    }

    /// Entry for `key` regardless of expiry.
    pub async fn peek(&self, key: &str) -> Option<CacheEntry> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn insert(&self, key: String, value: Value, ttl: Duration, now: u64) {
        let entry = CacheEntry {
            key: key.clone(),
            value,
            expires_at: now.saturating_add(ttl.as_secs()),
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Drops entries that expired at or before `now`; returns how many.
    pub async fn purge_expired(&self, now: u64) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
