use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, http::StatusCode, response::Html};
use tokio::sync::Mutex;

use crate::{types::CallbackState, warning};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<CallbackState>>>>,
) -> (StatusCode, Html<&'static str>) {
    let mut lock = shared_state.lock().await;
    let Some(pending) = lock.as_mut() else {
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>No authorization in progress.</h4>"),
        );
    };

    if params.get("state") != Some(&pending.expected_state) {
        warning!("Ignoring callback with mismatching state parameter");
        return (
            StatusCode::BAD_REQUEST,
            Html("<h4>State mismatch, login rejected.</h4>"),
        );
    }

    if let Some(err) = params.get("error") {
        pending.error = Some(err.clone());
        return (StatusCode::OK, Html("<h4>Login was not granted.</h4>"));
    }

    match params.get("code") {
        Some(code) => {
            pending.code = Some(code.clone());
            (
                StatusCode::OK,
                Html("<h2>Authentication successful.</h2><p>Close browser window.</p>"),
            )
        }
        None => (
            StatusCode::BAD_REQUEST,
            Html("<h4>Missing authorization code.</h4>"),
        ),
    }
}
