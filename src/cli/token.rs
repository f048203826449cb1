use tabled::{Table, Tabled};

use crate::{error, info, management::TokenStore, success, utils, warning};

#[derive(Tabled)]
struct TokenRow {
    field: String,
    value: String,
}

/// Mints an app-only token and prints it.
pub async fn token_client_credentials() {
    let settings = super::settings();
    let tokens = super::token_manager(&settings);

    match tokens.exchange_client_credentials().await {
        Ok(state) => super::output(serde_json::to_value(&state).map_err(Into::into)),
        Err(e) => super::fail(e),
    }
}

/// Refreshes the current user token and stores the result.
pub async fn token_refresh() {
    let settings = super::settings();
    let tokens = super::token_manager(&settings);
    let store = TokenStore::default_location();

    let Some(state) = super::user_token(&settings, &store).await else {
        error!("No token found. Please run spotwire auth");
    };

    let renewed = match tokens.refresh(&state).await {
        Ok(t) => t,
        Err(e) => super::fail(e),
    };

    if let Err(e) = store.persist(&renewed).await {
        warning!("Failed to save token to cache: {}", e);
    }
    super::output(serde_json::to_value(&renewed).map_err(Into::into));
}

/// Shows the stored token without revealing it.
pub async fn token_show() {
    let store = TokenStore::default_location();
    let state = match store.load().await {
        Ok(s) => s,
        Err(e) => error!(
            "No stored token at {}. Please run spotwire auth\n Error: {}",
            store.path().display(),
            e
        ),
    };

    let settings = super::settings();
    let tokens = super::token_manager(&settings);
    let now = utils::now_timestamp();

    let rows = vec![
        TokenRow {
            field: "access_token".to_string(),
            value: utils::mask_secret(&state.access_token),
        },
        TokenRow {
            field: "refresh_token".to_string(),
            value: state
                .refresh_token
                .as_deref()
                .map(utils::mask_secret)
                .unwrap_or_else(|| "-".to_string()),
        },
        TokenRow {
            field: "token_type".to_string(),
            value: state.token_type.clone(),
        },
        TokenRow {
            field: "scope".to_string(),
            value: state.scope.clone(),
        },
        TokenRow {
            field: "expires_in".to_string(),
            value: format!("{}s", state.seconds_left(now)),
        },
    ];
    println!("{}", Table::new(rows));

    if tokens.is_expired(&state, now) {
        info!("Token is expired, the next call will refresh it.");
    }
}

pub async fn token_clear() {
    let store = TokenStore::default_location();
    match store.clear().await {
        Ok(()) => success!("Stored token removed."),
        Err(e) => error!("Failed to remove stored token: {}", e),
    }
}
