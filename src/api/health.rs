use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::types::CallbackState;

pub async fn health(
    Extension(shared_state): Extension<Arc<Mutex<Option<CallbackState>>>>,
) -> Json<Value> {
    let awaiting_callback = shared_state
        .lock()
        .await
        .as_ref()
        .is_some_and(|s| s.code.is_none() && s.error.is_none());

    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "awaiting_callback": awaiting_callback,
    }))
}
