use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use crate::{
    error, info,
    management::TokenStore,
    server, success,
    types::CallbackState,
    utils, warning,
};

/// Seconds the user has to finish the login in the browser.
const CALLBACK_WAIT_SECS: u64 = 120;

/// Runs the authorization code login.
///
/// 1. Generates an anti-forgery `state` value
/// 2. Starts the local callback server on `SERVER_ADDRESS`
/// 3. Opens the `/authorize` URL in the browser (or prints it)
/// 4. Waits for Spotify to redirect back with a code
/// 5. Exchanges the code and stores the token for later commands
///
/// The redirect URI registered with Spotify must point at the callback
/// server, e.g. `http://127.0.0.1:8888/callback`.
pub async fn auth() {
    let settings = super::settings();
    let tokens = super::token_manager(&settings);

    let expected_state = utils::generate_state();
    let shared_state: Arc<Mutex<Option<CallbackState>>> =
        Arc::new(Mutex::new(Some(CallbackState {
            expected_state: expected_state.clone(),
            ..Default::default()
        })));

    let listener = match server::bind(&settings.server_addr).await {
        Ok(l) => l,
        Err(e) => error!("Cannot start callback server. Err: {}", e),
    };

    let server_state = Arc::clone(&shared_state);
    tokio::spawn(async move {
        if let Err(e) = server::serve(listener, server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let auth_url = match tokens.authorize_url(&expected_state) {
        Ok(url) => url,
        Err(e) => error!("{}", e),
    };

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }
    info!("Waiting for Spotify to redirect to {}", settings.credentials.redirect_uri);

    let code = match wait_for_code(shared_state).await {
        Ok(Some(code)) => code,
        Ok(None) => error!("Authentication timed out."),
        Err(reason) => error!("Authentication was denied: {}", reason),
    };

    let token = match tokens
        .exchange_authorization_code(&code, &settings.credentials.redirect_uri)
        .await
    {
        Ok(t) => t,
        Err(e) => error!("Token exchange failed. Err: {}", e),
    };

    if let Err(e) = TokenStore::default_location().persist(&token).await {
        error!("Failed to save token to cache: {}", e);
    }

    success!("Authentication successful!");
}

/// Polls the shared state once per second until the callback stored a code
/// or an error, or the wait time runs out (`Ok(None)`).
async fn wait_for_code(
    shared_state: Arc<Mutex<Option<CallbackState>>>,
) -> Result<Option<String>, String> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(CALLBACK_WAIT_SECS);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pending) = lock.as_ref() {
            if let Some(err) = &pending.error {
                return Err(err.clone());
            }
            if let Some(code) = &pending.code {
                return Ok(Some(code.clone()));
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Ok(None)
}
