use std::time::Duration;

use reqwest::Method;
use serde_json::Value;

use crate::{error, spotify::Request, utils};

/// Sends an arbitrary Web API request and prints the answer.
///
/// `path` is relative to the API base (`/albums/{id}`) or a full URL such as
/// the `next` link of a paged response. `cache_ttl` only has an effect on GET
/// and within this single process.
pub async fn request(
    method: String,
    path: String,
    params: Vec<(String, String)>,
    body: Option<String>,
    cache_ttl: Option<u64>,
    deadline: Option<u64>,
    app: bool,
) {
    let method = match Method::from_bytes(method.to_uppercase().as_bytes()) {
        Ok(m) => m,
        Err(e) => error!("Invalid HTTP method {:?}: {}", method, e),
    };

    let mut req = Request::new(method, path).params(params);
    if let Some(raw) = body {
        match serde_json::from_str::<Value>(&raw) {
            Ok(json) => req = req.json(json),
            Err(e) => error!("Request body is not valid JSON: {}", e),
        }
    }
    if let Some(ttl) = cache_ttl {
        req = req.cached(Duration::from_secs(ttl));
    }
    if let Some(secs) = deadline {
        req = req.deadline(Duration::from_secs(secs));
    }

    let client = super::client(app).await;
    let pb = utils::spinner(&format!("{} {}", req.method(), req.path()));
    let result = client.send(req).await;
    pb.finish_and_clear();

    super::output(result);
}
