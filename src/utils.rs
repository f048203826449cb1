use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// `client_id:client_secret` encoded for an HTTP Basic authorization header.
pub fn encode_basic_credentials(client_id: &str, client_secret: &str) -> String {
    STANDARD.encode(format!("{}:{}", client_id, client_secret))
}

pub fn now_timestamp() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

pub fn mask_secret(value: &str) -> String {
    let len = value.chars().count();
    if len > 4 {
        let tail: String = value.chars().skip(len - 4).collect();
        format!("{}{}", "*".repeat(len - 4), tail)
    } else {
        "****".to_string()
    }
}

/// Parses a `key=value` command-line argument into a query parameter pair.
pub fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got {:?}", raw)),
    }
}

/// Joins Spotify ids the way list endpoints expect them (`ids=a,b,c`).
pub fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter()
        .map(|id| id.as_ref().trim())
        .filter(|id| !id.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
