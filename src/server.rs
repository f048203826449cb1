use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{SpotifyError, api, types::CallbackState};

pub fn router(state: Arc<Mutex<Option<CallbackState>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
}

/// Binds the callback server to `addr`.
pub async fn bind(addr: &str) -> Result<TcpListener, SpotifyError> {
    let addr = SocketAddr::from_str(addr)
        .map_err(|e| SpotifyError::Config(format!("invalid server address {:?}: {}", addr, e)))?;
    Ok(TcpListener::bind(&addr).await?)
}

pub async fn serve(
    listener: TcpListener,
    state: Arc<Mutex<Option<CallbackState>>>,
) -> Result<(), SpotifyError> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}
